//! Seed summary that opens a debate

use crate::evaluation::aggregate::EvaluationAggregate;
use crate::evaluation::artifact::{Choice, EvaluationMode};
use crate::evaluation::verdict::{JudgeVerdict, format_score};
use std::fmt::Write;

const NO_COMMENT: &str = "No comment.";

const CLOSING: &str = "-----\n\n\
Judges, the floor is open. Clash as hard as you like, but do not let two of you \
monopolise the exchange; anyone may cut in with a different view at any time.";

/// Render Stage-One verdicts into the debate's first message.
///
/// Deterministic for the same input order. Only verdicts with an outcome are
/// listed; each shows its headline and its most evocative comment.
pub fn build_summary(entry_id: &str, mode: &EvaluationMode, verdicts: &[JudgeVerdict]) -> String {
    let mut out = String::new();

    match mode {
        EvaluationMode::Scoring { competition_type } => {
            let _ = writeln!(out, "[This round's entry]");
            let _ = writeln!(out, "Type: {}", competition_type);
            let _ = writeln!(out, "ID: {}", entry_id);
            let _ = writeln!(out);
            let _ = writeln!(out, "[First-round scores and key takes]");

            let aggregate = EvaluationAggregate::from_verdicts(mode, verdicts);
            for ranked in aggregate.ranking().unwrap_or_default() {
                let comment = verdicts
                    .iter()
                    .find(|v| v.judge_id == ranked.judge_id)
                    .and_then(JudgeVerdict::evocative_comment)
                    .unwrap_or(NO_COMMENT);
                let _ = writeln!(
                    out,
                    "▼ {} (score: {})",
                    ranked.display_name,
                    format_score(ranked.score)
                );
                let _ = writeln!(out, "  Take: \"{}\"", comment);
                let _ = writeln!(out);
            }
        }
        EvaluationMode::BinaryChoice {
            question,
            option_a,
            option_b,
        } => {
            let aggregate = EvaluationAggregate::from_verdicts(mode, verdicts);
            let (count_a, count_b) = aggregate
                .tally()
                .map(|t| (t.count_a, t.count_b))
                .unwrap_or_default();

            let _ = writeln!(out, "[Question] {}", question);
            let _ = writeln!(out, "[Option A] {}", option_a);
            let _ = writeln!(out, "[Option B] {}", option_b);
            let _ = writeln!(out);
            let _ = writeln!(out, "[Votes]");
            let _ = writeln!(out, "A ({}): {} vote(s)", option_a, count_a);
            let _ = writeln!(out, "B ({}): {} vote(s)", option_b, count_b);
            let _ = writeln!(out);
            let _ = writeln!(out, "[Each judge's choice and reasoning]");

            for (choice, label) in [(Choice::A, option_a), (Choice::B, option_b)] {
                let group: Vec<&JudgeVerdict> = verdicts
                    .iter()
                    .filter(|v| v.outcome().and_then(|o| o.choice()) == Some(choice))
                    .collect();
                if group.is_empty() {
                    continue;
                }
                let _ = writeln!(out);
                let _ = writeln!(out, "▶ Judges choosing {} ({}):", choice, label);
                for verdict in group {
                    let comment = verdict.evocative_comment().unwrap_or(NO_COMMENT);
                    let _ = writeln!(out, "- {}: {}", verdict.display_name, comment);
                }
            }
            let _ = writeln!(out);
        }
    }

    out.push_str(CLOSING);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::verdict::{ScoreCard, VerdictOutcome};
    use crate::judge::entities::JudgeIdentity;

    fn judge(id: &str, name: &str) -> JudgeIdentity {
        JudgeIdentity::new(id, name, "gpt-4o", "")
    }

    #[test]
    fn test_scoring_summary_orders_by_score() {
        let verdicts = vec![
            JudgeVerdict::decided(
                &judge("a", "Alpha"),
                VerdictOutcome::Score(ScoreCard::new(4.0).with_one_liner("dull")),
                None,
                "",
            ),
            JudgeVerdict::decided(
                &judge("b", "Beta"),
                VerdictOutcome::Score(ScoreCard::new(9.0).with_one_liner("public")),
                Some("secretly jealous".into()),
                "",
            ),
            JudgeVerdict::transport_failure(&judge("c", "Gamma"), "down"),
        ];
        let summary = build_summary("entry_1", &EvaluationMode::scoring("outfit"), &verdicts);

        let beta = summary.find("▼ Beta (score: 9)").unwrap();
        let alpha = summary.find("▼ Alpha (score: 4)").unwrap();
        assert!(beta < alpha);
        assert!(summary.contains("Take: \"secretly jealous\""));
        assert!(summary.contains("Take: \"dull\""));
        assert!(!summary.contains("Gamma"));
        assert!(summary.contains("ID: entry_1"));
    }

    #[test]
    fn test_binary_summary_groups_choices() {
        let choose = |id: &str, name: &str, choice: Choice, reasoning: &str| {
            JudgeVerdict::decided(
                &judge(id, name),
                VerdictOutcome::Choice {
                    choice,
                    label: choice.to_string(),
                    reasoning: reasoning.into(),
                },
                None,
                "",
            )
        };
        let verdicts = vec![
            choose("a", "Alpha", Choice::B, "fine"),
            choose("b", "Beta", Choice::A, "rude"),
            choose("c", "Gamma", Choice::A, "late"),
        ];
        let mode = EvaluationMode::binary_choice("Is he wrong?", "Wrong", "Not wrong");
        let summary = build_summary("entry_2", &mode, &verdicts);

        assert!(summary.contains("A (Wrong): 2 vote(s)"));
        assert!(summary.contains("B (Not wrong): 1 vote(s)"));
        let group_a = summary.find("▶ Judges choosing A (Wrong):").unwrap();
        let group_b = summary.find("▶ Judges choosing B (Not wrong):").unwrap();
        assert!(group_a < group_b);
        assert!(summary.contains("- Beta: rude"));
    }

    #[test]
    fn test_deterministic() {
        let verdicts = vec![JudgeVerdict::decided(
            &judge("a", "Alpha"),
            VerdictOutcome::Score(ScoreCard::new(5.0)),
            None,
            "",
        )];
        let mode = EvaluationMode::scoring("funny");
        assert_eq!(
            build_summary("e", &mode, &verdicts),
            build_summary("e", &mode, &verdicts)
        );
        assert!(build_summary("e", &mode, &verdicts).contains(NO_COMMENT));
    }
}
