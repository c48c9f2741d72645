//! Ordered extraction strategies
//!
//! Each strategy proposes candidate objects from raw text and keeps the first
//! one that satisfies the expected shape. [`Extractor`] runs the strategies in
//! order and the first hit wins; when none hits, the result is
//! [`ParsedResult::Failed`] rather than an error.

use super::schema::{ExpectedShape, ParsedOutcome, interpret};
use crate::core::string::truncate;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

/// Bytes of raw text kept on a failed parse
pub const FAILURE_EXCERPT_LEN: usize = 200;

static MONOLOGUE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<inner_monologue>(.*?)</inner_monologue>").unwrap());

static FENCED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[ \t]*(?:json|JSON)?[ \t]*\r?\n?(.*?)```").unwrap());

static SCORE_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""overall_score"\s*:\s*"?\s*(-?\d+(?:\.\d+)?)"#).unwrap()
});

static CHOICE_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""choice"\s*:\s*"\s*([ABab])\s*""#).unwrap());

/// `"<field>": "<json string>"`
macro_rules! string_field_regex {
    ($field:literal) => {
        LazyLock::new(|| {
            Regex::new(concat!(r#"""#, $field, r#""\s*:\s*"((?:[^"\\]|\\.)*)""#)).unwrap()
        })
    };
}

static ONE_LINER_FIELD: LazyLock<Regex> = string_field_regex!("one_liner");
static AUDIENCE_FIELD: LazyLock<Regex> = string_field_regex!("comment_for_audience");
static REASONING_FIELD: LazyLock<Regex> = string_field_regex!("reasoning");
static MONOLOGUE_FIELD: LazyLock<Regex> = string_field_regex!("inner_monologue");

/// Result of [`extract`]
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResult {
    Parsed {
        outcome: ParsedOutcome,
        monologue: Option<String>,
        /// Name of the strategy that matched
        strategy: &'static str,
    },
    /// Nothing usable was found
    Failed {
        /// Raw text truncated for diagnostics
        excerpt: String,
        monologue: Option<String>,
    },
}

impl ParsedResult {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ParsedResult::Parsed { .. })
    }

    pub fn monologue(&self) -> Option<&str> {
        match self {
            ParsedResult::Parsed { monologue, .. } | ParsedResult::Failed { monologue, .. } => {
                monologue.as_deref()
            }
        }
    }
}

/// One way of recovering a structured object from raw text
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// The first candidate satisfying `shape`, with its own monologue field
    fn extract(&self, raw: &str, shape: ExpectedShape) -> Option<(ParsedOutcome, Option<String>)>;
}

/// Whole text is a JSON object
pub struct DirectJson;

impl ExtractionStrategy for DirectJson {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn extract(&self, raw: &str, shape: ExpectedShape) -> Option<(ParsedOutcome, Option<String>)> {
        let value: Value = serde_json::from_str(raw.trim()).ok()?;
        interpret(&value, shape)
    }
}

/// Contents of a ``` fenced block
pub struct FencedBlock;

impl ExtractionStrategy for FencedBlock {
    fn name(&self) -> &'static str {
        "fenced"
    }

    fn extract(&self, raw: &str, shape: ExpectedShape) -> Option<(ParsedOutcome, Option<String>)> {
        FENCED.captures_iter(raw).find_map(|caps| {
            let body = caps.get(1)?.as_str().trim();
            let value: Value = serde_json::from_str(body).ok()?;
            interpret(&value, shape)
        })
    }
}

/// First balanced `{...}` span that decodes, scanning left to right
pub struct BalancedBrace;

impl ExtractionStrategy for BalancedBrace {
    fn name(&self) -> &'static str {
        "brace"
    }

    fn extract(&self, raw: &str, shape: ExpectedShape) -> Option<(ParsedOutcome, Option<String>)> {
        raw.match_indices('{').find_map(|(start, _)| {
            let end = balanced_end(&raw[start..])?;
            let value: Value = serde_json::from_str(&raw[start..start + end]).ok()?;
            interpret(&value, shape)
        })
    }
}

/// Byte length of the balanced object starting at `text[0] == '{'`.
///
/// Braces inside JSON strings are ignored.
fn balanced_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Field-by-field regex over the raw text (last resort)
pub struct FieldRegex;

impl FieldRegex {
    fn string_field(raw: &str, re: &Regex) -> Option<Value> {
        let captured = re.captures(raw)?.get(1)?.as_str();
        // Reuse the JSON string grammar to unescape
        let text = serde_json::from_str::<String>(&format!("\"{}\"", captured))
            .unwrap_or_else(|_| captured.to_string());
        Some(Value::String(text))
    }
}

impl ExtractionStrategy for FieldRegex {
    fn name(&self) -> &'static str {
        "fields"
    }

    fn extract(&self, raw: &str, shape: ExpectedShape) -> Option<(ParsedOutcome, Option<String>)> {
        let mut object = Map::new();
        match shape {
            ExpectedShape::Score => {
                let score = SCORE_FIELD.captures(raw)?.get(1)?.as_str();
                object.insert("overall_score".into(), Value::String(score.to_string()));
                for (field, re) in [
                    ("one_liner", &ONE_LINER_FIELD),
                    ("comment_for_audience", &AUDIENCE_FIELD),
                ] {
                    if let Some(value) = Self::string_field(raw, re) {
                        object.insert(field.into(), value);
                    }
                }
            }
            ExpectedShape::Choice => {
                let choice = CHOICE_FIELD.captures(raw)?.get(1)?.as_str();
                object.insert("choice".into(), Value::String(choice.to_string()));
                object.insert("reasoning".into(), Self::string_field(raw, &REASONING_FIELD)?);
            }
        }
        if let Some(value) = Self::string_field(raw, &MONOLOGUE_FIELD) {
            object.insert("inner_monologue".into(), value);
        }
        interpret(&Value::Object(object), shape)
    }
}

/// Runs strategies in order; the first hit wins
pub struct Extractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl Extractor {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract(&self, raw: &str, shape: ExpectedShape) -> ParsedResult {
        let tagged = extract_monologue(raw);

        for strategy in &self.strategies {
            if let Some((outcome, own)) = strategy.extract(raw, shape) {
                return ParsedResult::Parsed {
                    outcome,
                    monologue: own.or(tagged),
                    strategy: strategy.name(),
                };
            }
        }

        ParsedResult::Failed {
            excerpt: truncate(raw, FAILURE_EXCERPT_LEN),
            monologue: tagged,
        }
    }
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(vec![
            Box::new(DirectJson),
            Box::new(FencedBlock),
            Box::new(BalancedBrace),
            Box::new(FieldRegex),
        ])
    }
}

/// Extract with the default strategy order.
pub fn extract(raw: &str, shape: ExpectedShape) -> ParsedResult {
    static DEFAULT: LazyLock<Extractor> = LazyLock::new(Extractor::default);
    DEFAULT.extract(raw, shape)
}

/// Text between `<inner_monologue>` tags, trimmed; `None` if absent or blank.
pub fn extract_monologue(raw: &str) -> Option<String> {
    MONOLOGUE_TAG
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::artifact::Choice;

    fn score_of(result: &ParsedResult) -> Option<f64> {
        match result {
            ParsedResult::Parsed {
                outcome: ParsedOutcome::Score(card),
                ..
            } => Some(card.overall_score),
            _ => None,
        }
    }

    fn strategy_of(result: &ParsedResult) -> Option<&'static str> {
        match result {
            ParsedResult::Parsed { strategy, .. } => Some(strategy),
            ParsedResult::Failed { .. } => None,
        }
    }

    #[test]
    fn test_direct_json() {
        let result = extract(r#"{"overall_score": 8, "one_liner": "sharp"}"#, ExpectedShape::Score);
        assert_eq!(score_of(&result), Some(8.0));
        assert_eq!(strategy_of(&result), Some("direct"));
    }

    #[test]
    fn test_fenced_block_with_noise() {
        let noise = "Let me think about this outfit carefully. ".repeat(50);
        let raw = format!(
            "{noise}\n```json\n{{\"overall_score\": 6.5, \"one_liner\": \"brave\"}}\n```\n{noise}"
        );
        let result = extract(&raw, ExpectedShape::Score);
        assert_eq!(score_of(&result), Some(6.5));
        assert_eq!(strategy_of(&result), Some("fenced"));
    }

    #[test]
    fn test_fenced_block_wins_over_earlier_brace() {
        let raw = "draft {\"overall_score\": 1}\n```json\n{\"overall_score\": 9}\n```";
        assert_eq!(score_of(&extract(raw, ExpectedShape::Score)), Some(9.0));
    }

    #[test]
    fn test_balanced_brace_skips_invalid_candidates() {
        let raw = r#"Set {x} aside. Verdict: {"overall_score": 4, "one_liner": "a {weird} one"} done"#;
        let result = extract(raw, ExpectedShape::Score);
        assert_eq!(score_of(&result), Some(4.0));
        assert_eq!(strategy_of(&result), Some("brace"));
    }

    #[test]
    fn test_field_regex_last_resort() {
        let raw = r#"broken {"choice": "a", "reasoning": "he \"forgot\" again", oops"#;
        let result = extract(raw, ExpectedShape::Choice);
        match result {
            ParsedResult::Parsed {
                outcome: ParsedOutcome::Choice { choice, reasoning },
                strategy,
                ..
            } => {
                assert_eq!(choice, Choice::A);
                assert_eq!(reasoning, "he \"forgot\" again");
                assert_eq!(strategy, "fields");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_monologue_tag_merged_when_missing() {
        let raw = "<inner_monologue> honestly hideous </inner_monologue>\n```json\n{\"overall_score\": 3}\n```";
        let result = extract(raw, ExpectedShape::Score);
        assert_eq!(result.monologue(), Some("honestly hideous"));
    }

    #[test]
    fn test_structured_monologue_takes_precedence() {
        let raw = "<inner_monologue>tag</inner_monologue>{\"overall_score\": 3, \"inner_monologue\": \"field\"}";
        assert_eq!(extract(raw, ExpectedShape::Score).monologue(), Some("field"));
    }

    #[test]
    fn test_failure_sentinel() {
        let raw = "I refuse to grade this. ".repeat(30);
        match extract(&raw, ExpectedShape::Score) {
            ParsedResult::Failed { excerpt, monologue } => {
                assert!(excerpt.len() <= FAILURE_EXCERPT_LEN);
                assert!(excerpt.starts_with("I refuse"));
                assert!(monologue.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!extract("", ExpectedShape::Choice).is_parsed());
    }

    #[test]
    fn test_shape_mismatch_fails() {
        let raw = r#"{"choice": "A", "reasoning": "x"}"#;
        assert!(!extract(raw, ExpectedShape::Score).is_parsed());
    }

    #[test]
    fn test_balanced_end() {
        assert_eq!(balanced_end(r#"{"a": "}"}"#), Some(10));
        assert_eq!(balanced_end("{{}}rest"), Some(4));
        assert_eq!(balanced_end("{unclosed"), None);
    }

    #[test]
    fn test_default_order() {
        assert_eq!(
            Extractor::default().strategy_names(),
            vec!["direct", "fenced", "brace", "fields"]
        );
    }
}
