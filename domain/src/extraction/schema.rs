//! Interpreting decoded JSON as a verdict shape

use crate::evaluation::artifact::Choice;
use crate::evaluation::verdict::{DimensionScore, ScoreCard};
use serde_json::{Map, Value};

/// Which verdict shape the caller expects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    /// Requires a finite `overall_score`
    Score,
    /// Requires `choice` (A/B) and a non-empty `reasoning`
    Choice,
}

/// A usable outcome recovered from model output
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOutcome {
    Score(ScoreCard),
    Choice { choice: Choice, reasoning: String },
}

/// Interpret an object; `None` when required fields are missing or invalid.
///
/// Returns the outcome plus the object's own `inner_monologue`, if any.
pub fn interpret(value: &Value, shape: ExpectedShape) -> Option<(ParsedOutcome, Option<String>)> {
    let object = value.as_object()?;
    let monologue = non_empty_str(object.get("inner_monologue"));

    let outcome = match shape {
        ExpectedShape::Score => ParsedOutcome::Score(score_card(object)?),
        ExpectedShape::Choice => {
            let choice = object
                .get("choice")
                .and_then(Value::as_str)
                .and_then(Choice::parse)?;
            let reasoning = non_empty_str(object.get("reasoning"))?;
            ParsedOutcome::Choice { choice, reasoning }
        }
    };

    Some((outcome, monologue))
}

fn score_card(object: &Map<String, Value>) -> Option<ScoreCard> {
    let overall_score = number(object.get("overall_score")?)?;

    Some(ScoreCard {
        overall_score,
        one_liner: non_empty_str(object.get("one_liner")),
        comment_for_audience: non_empty_str(object.get("comment_for_audience")),
        strengths: string_list(object.get("strengths")),
        weaknesses: string_list(object.get("weaknesses")),
        dimension_scores: dimensions(object.get("dimension_scores")),
        safety_notes: string_list(object.get("safety_notes")),
    })
}

/// Finite number, or a string holding one
fn number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| non_empty_str(Some(item)))
            .collect(),
        Some(Value::String(_)) => non_empty_str(value).into_iter().collect(),
        _ => Vec::new(),
    }
}

// Accepts `[{"name", "score", "comment"}]` or `{"name": score}` / `{"name": {"score", "comment"}}`.
fn dimensions(value: Option<&Value>) -> Vec<DimensionScore> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| {
                let obj = item.as_object()?;
                let name = non_empty_str(obj.get("name").or_else(|| obj.get("dimension")))?;
                Some(DimensionScore {
                    name,
                    score: number(obj.get("score")?)?,
                    comment: non_empty_str(obj.get("comment")),
                })
            })
            .collect(),
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(name, item)| match item {
                Value::Object(obj) => Some(DimensionScore {
                    name: name.clone(),
                    score: number(obj.get("score")?)?,
                    comment: non_empty_str(obj.get("comment")),
                }),
                other => Some(DimensionScore {
                    name: name.clone(),
                    score: number(other)?,
                    comment: None,
                }),
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_score_requires_overall_score() {
        assert!(interpret(&json!({"one_liner": "nice"}), ExpectedShape::Score).is_none());
        assert!(interpret(&json!({"overall_score": "n/a"}), ExpectedShape::Score).is_none());
    }

    #[test]
    fn test_score_accepts_numeric_string() {
        let (outcome, _) = interpret(&json!({"overall_score": " 7.5 "}), ExpectedShape::Score).unwrap();
        match outcome {
            ParsedOutcome::Score(card) => assert_eq!(card.overall_score, 7.5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_score_optional_fields() {
        let value = json!({
            "overall_score": 6,
            "one_liner": "Bold.",
            "strengths": ["color", ""],
            "weaknesses": "fit",
            "dimension_scores": [{"name": "style", "score": 7, "comment": "ok"}, {"name": "x"}],
            "inner_monologue": "ugh"
        });
        let (outcome, monologue) = interpret(&value, ExpectedShape::Score).unwrap();
        let ParsedOutcome::Score(card) = outcome else {
            panic!("expected score");
        };
        assert_eq!(card.one_liner.as_deref(), Some("Bold."));
        assert_eq!(card.strengths, vec!["color"]);
        assert_eq!(card.weaknesses, vec!["fit"]);
        assert_eq!(card.dimension_scores.len(), 1);
        assert_eq!(monologue.as_deref(), Some("ugh"));
    }

    #[test]
    fn test_dimension_map_form() {
        let value = json!({"overall_score": 5, "dimension_scores": {"style": 8, "fit": {"score": 4, "comment": "tight"}}});
        let (ParsedOutcome::Score(card), _) = interpret(&value, ExpectedShape::Score).unwrap() else {
            panic!("expected score");
        };
        assert_eq!(card.dimension_scores.len(), 2);
    }

    #[test]
    fn test_choice_requires_reasoning() {
        assert!(interpret(&json!({"choice": "A"}), ExpectedShape::Choice).is_none());
        assert!(interpret(&json!({"choice": "C", "reasoning": "x"}), ExpectedShape::Choice).is_none());
        let (outcome, _) =
            interpret(&json!({"choice": "b", "reasoning": "fair"}), ExpectedShape::Choice).unwrap();
        assert_eq!(
            outcome,
            ParsedOutcome::Choice {
                choice: Choice::B,
                reasoning: "fair".into()
            }
        );
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(interpret(&json!([1, 2]), ExpectedShape::Score).is_none());
        assert!(interpret(&json!(8), ExpectedShape::Score).is_none());
    }
}
