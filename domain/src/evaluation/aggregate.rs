//! Mode-dependent aggregation of Stage-One verdicts

use super::artifact::{Choice, EvaluationMode};
use super::verdict::JudgeVerdict;
use serde::{Deserialize, Serialize};

/// A scored verdict's place in the ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedVerdict {
    pub judge_id: String,
    pub display_name: String,
    pub score: f64,
}

/// Vote counts for binary-choice mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceTally {
    pub option_a: String,
    pub option_b: String,
    pub count_a: usize,
    pub count_b: usize,
}

impl ChoiceTally {
    pub fn count(&self, choice: Choice) -> usize {
        match choice {
            Choice::A => self.count_a,
            Choice::B => self.count_b,
        }
    }

    pub fn total(&self) -> usize {
        self.count_a + self.count_b
    }
}

/// Only verdicts with a usable outcome ever appear here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EvaluationAggregate {
    Ranking { entries: Vec<RankedVerdict> },
    Tally(ChoiceTally),
}

impl EvaluationAggregate {
    /// Build the aggregate for `mode` from verdicts in declaration order.
    ///
    /// Scores are sorted descending with a stable sort, so equal scores keep
    /// declaration order.
    pub fn from_verdicts(mode: &EvaluationMode, verdicts: &[JudgeVerdict]) -> Self {
        match mode {
            EvaluationMode::Scoring { .. } => {
                let mut entries: Vec<RankedVerdict> = verdicts
                    .iter()
                    .filter_map(|v| {
                        let score = v.outcome()?.score()?;
                        Some(RankedVerdict {
                            judge_id: v.judge_id.clone(),
                            display_name: v.display_name.clone(),
                            score,
                        })
                    })
                    .collect();
                entries.sort_by(|a, b| b.score.total_cmp(&a.score));
                EvaluationAggregate::Ranking { entries }
            }
            EvaluationMode::BinaryChoice {
                option_a, option_b, ..
            } => {
                let mut tally = ChoiceTally {
                    option_a: option_a.clone(),
                    option_b: option_b.clone(),
                    count_a: 0,
                    count_b: 0,
                };
                for choice in verdicts.iter().filter_map(|v| v.outcome()?.choice()) {
                    match choice {
                        Choice::A => tally.count_a += 1,
                        Choice::B => tally.count_b += 1,
                    }
                }
                EvaluationAggregate::Tally(tally)
            }
        }
    }

    pub fn ranking(&self) -> Option<&[RankedVerdict]> {
        match self {
            EvaluationAggregate::Ranking { entries } => Some(entries),
            EvaluationAggregate::Tally(_) => None,
        }
    }

    pub fn tally(&self) -> Option<&ChoiceTally> {
        match self {
            EvaluationAggregate::Ranking { .. } => None,
            EvaluationAggregate::Tally(tally) => Some(tally),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::verdict::{ScoreCard, VerdictOutcome};
    use crate::judge::entities::JudgeIdentity;

    fn scored(id: &str, score: f64) -> JudgeVerdict {
        let judge = JudgeIdentity::new(id, id, "gpt-4o", "");
        JudgeVerdict::decided(&judge, VerdictOutcome::Score(ScoreCard::new(score)), None, "")
    }

    fn chose(id: &str, choice: Choice) -> JudgeVerdict {
        let judge = JudgeIdentity::new(id, id, "gpt-4o", "");
        let outcome = VerdictOutcome::Choice {
            choice,
            label: choice.to_string(),
            reasoning: "because".into(),
        };
        JudgeVerdict::decided(&judge, outcome, None, "")
    }

    fn failed(id: &str) -> JudgeVerdict {
        let judge = JudgeIdentity::new(id, id, "gpt-4o", "");
        JudgeVerdict::transport_failure(&judge, "timeout")
    }

    #[test]
    fn test_ranking_sorted_with_stable_ties() {
        let verdicts = vec![
            scored("a", 6.0),
            scored("b", 9.0),
            failed("c"),
            scored("d", 6.0),
        ];
        let aggregate =
            EvaluationAggregate::from_verdicts(&EvaluationMode::scoring("outfit"), &verdicts);
        let ids: Vec<_> = aggregate
            .ranking()
            .unwrap()
            .iter()
            .map(|r| r.judge_id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a", "d"]);
    }

    #[test]
    fn test_tally_ignores_failures() {
        let verdicts = vec![
            chose("a", Choice::A),
            chose("b", Choice::B),
            chose("c", Choice::A),
            failed("d"),
        ];
        let mode = EvaluationMode::binary_choice("q", "Yes", "No");
        let aggregate = EvaluationAggregate::from_verdicts(&mode, &verdicts);
        let tally = aggregate.tally().unwrap();
        assert_eq!(tally.count(Choice::A), 2);
        assert_eq!(tally.count(Choice::B), 1);
        assert_eq!(tally.total(), 3);
        assert_eq!(tally.option_a, "Yes");
    }
}
