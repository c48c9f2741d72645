//! Console output formatter for panel results

use colored::Colorize;
use panel_application::{DebateResult, EvaluationResult};
use panel_domain::{
    ChoiceTally, DebateState, EntryRecord, EvaluationAggregate, EvaluationMode, JudgeRegistry,
    JudgeVerdict, RankedVerdict, VerdictOutcome, format_score,
};
use serde::Serialize;

/// Formats panel results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colors on or off for everything this formatter renders
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// Stage-One results: every verdict plus the aggregate
    pub fn format_evaluation(result: &EvaluationResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Judge Panel Results"));
        output.push('\n');
        output.push_str(&Self::mode_block(&result.entry_id, &result.mode));

        output.push_str(&Self::section_header("Verdicts"));
        for verdict in &result.verdicts {
            output.push_str(&Self::verdict_block(verdict));
        }

        output.push_str(&Self::aggregate_block(&result.aggregate));

        if let Some(error) = &result.error {
            output.push_str(&format!("\n{} {}\n", "Error:".red().bold(), error));
        } else if result.failed_count() > 0 {
            output.push_str(&format!(
                "\n{}\n",
                format!("{} judge(s) failed", result.failed_count()).yellow()
            ));
        }

        output
    }

    /// One line per judge: headline and short comment
    pub fn format_verdicts_only(result: &EvaluationResult) -> String {
        let mut output = String::new();
        for verdict in &result.verdicts {
            match verdict.outcome() {
                Some(outcome) => output.push_str(&format!(
                    "{}: {}{}\n",
                    verdict.display_name.bold(),
                    outcome.headline().green(),
                    verdict
                        .evocative_comment()
                        .map(|c| format!(" - {}", c))
                        .unwrap_or_default()
                )),
                None => output.push_str(&format!(
                    "{}: {}\n",
                    verdict.display_name.bold(),
                    "failed".red()
                )),
            }
        }
        output
    }

    /// Evaluation and optional debate as one JSON document
    pub fn format_run_json(evaluation: &EvaluationResult, debate: Option<&DebateResult>) -> String {
        let value = serde_json::json!({
            "evaluation": evaluation,
            "debate": debate,
        });
        Self::format_json(&value)
    }

    /// Debate transcript and how it ended
    pub fn format_debate(result: &DebateResult) -> String {
        let mut output = String::new();

        output.push_str(&Self::section_header("Debate"));
        output.push_str(&format!(
            "{} {}\n",
            "Participants:".cyan().bold(),
            result.participants.join(", ")
        ));

        for turn in &result.turns {
            output.push_str(&format!(
                "\n{}\n{}\n",
                format!("#{} {}", turn.sequence, turn.speaker).yellow().bold(),
                turn.content
            ));
        }

        let status = format!(
            "{} turns from {} of {} invocations",
            result.turns.len(),
            result.invocations,
            result.max_turns
        );
        output.push('\n');
        match result.state {
            DebateState::Failed => output.push_str(&format!(
                "{} {} ({})\n",
                "Debate failed:".red().bold(),
                result.error.as_deref().unwrap_or("unknown error"),
                status
            )),
            _ => output.push_str(&format!("{} {}\n", "Debate finished:".green().bold(), status)),
        }

        output.push_str(&Self::footer());
        output
    }

    /// A stored entry: verdicts, aggregate and the stored debate, if any
    pub fn format_entry(record: &EntryRecord, include_debate: bool) -> String {
        let mut output = String::new();

        output.push_str(&Self::header(&format!("Entry {}", record.entry_id)));
        output.push('\n');
        output.push_str(&Self::mode_block(&record.entry_id, &record.mode));
        output.push_str(&format!(
            "{} {}\n",
            "Created:".dimmed(),
            record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str(&Self::section_header("Verdicts"));
        for verdict in &record.verdicts {
            output.push_str(&Self::verdict_block(verdict));
        }
        let aggregate = EvaluationAggregate::from_verdicts(&record.mode, &record.verdicts);
        output.push_str(&Self::aggregate_block(&aggregate));

        if include_debate && let Some(debate) = &record.debate {
            output.push_str(&Self::section_header(&format!("Debate {}", debate.debate_id)));
            for turn in &debate.turns {
                output.push_str(&format!(
                    "\n{}\n{}\n",
                    format!("#{} {}", turn.sequence, turn.speaker).yellow().bold(),
                    turn.content
                ));
            }
            if let Some(error) = &debate.error {
                output.push_str(&format!("\n{} {}\n", "Debate failed:".red().bold(), error));
            }
        }

        output
    }

    /// One line per stored entry
    pub fn format_entry_list(records: &[EntryRecord]) -> String {
        if records.is_empty() {
            return format!("{}\n", "No stored entries.".dimmed());
        }

        let mut output = String::new();
        for record in records {
            let succeeded = record.successful_verdicts().count();
            let debate = match &record.debate {
                Some(d) => format!("debate: {} turns", d.turns.len()),
                None => "no debate".to_string(),
            };
            output.push_str(&format!(
                "{}  {}  {}  {}/{} verdicts, {}\n",
                record.entry_id.bold(),
                record.created_at.format("%Y-%m-%d %H:%M"),
                record.mode.as_str().cyan(),
                succeeded,
                record.verdicts.len(),
                debate
            ));
        }
        output
    }

    /// Registry listing with each judge's core trait
    pub fn format_judges(registry: &JudgeRegistry, origin: &str) -> String {
        let mut output = format!("{} {}\n\n", "Judges from".cyan().bold(), origin);
        for judge in registry.list_judges() {
            output.push_str(&format!(
                "{} {} {}\n    {}\n",
                judge.id.bold(),
                format!("({})", judge.display_name).dimmed(),
                judge.model.to_string().yellow(),
                judge.core_trait()
            ));
        }
        output
    }

    /// Format anything serializable as pretty JSON
    pub fn format_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }

    fn mode_block(entry_id: &str, mode: &EvaluationMode) -> String {
        let mut output = format!("{} {}\n", "Entry:".cyan().bold(), entry_id);
        match mode {
            EvaluationMode::Scoring { competition_type } => {
                output.push_str(&format!("{} {}\n", "Type:".cyan().bold(), competition_type));
            }
            EvaluationMode::BinaryChoice {
                question,
                option_a,
                option_b,
            } => {
                output.push_str(&format!("{} {}\n", "Question:".cyan().bold(), question));
                output.push_str(&format!("  A: {}\n  B: {}\n", option_a, option_b));
            }
        }
        output
    }

    fn verdict_block(verdict: &JudgeVerdict) -> String {
        let title = format!("── {} ({}) ──", verdict.display_name, verdict.model);

        let Some(outcome) = verdict.outcome() else {
            let message = verdict
                .error()
                .map(|e| format!("{}: {}", e.kind.as_str(), e.message))
                .unwrap_or_else(|| "unknown error".to_string());
            return format!("\n{}\n{} {}\n", title.red().bold(), "Error:".red(), message);
        };

        let mut output = format!(
            "\n{}  {}\n",
            title.yellow().bold(),
            outcome.headline().green().bold()
        );
        match outcome {
            VerdictOutcome::Score(card) => {
                if let Some(one_liner) = &card.one_liner {
                    output.push_str(&format!("  \"{}\"\n", one_liner));
                }
                if let Some(comment) = &card.comment_for_audience {
                    output.push_str(&format!("  {}\n", comment));
                }
                for strength in &card.strengths {
                    output.push_str(&format!("  {} {}\n", "+".green(), strength));
                }
                for weakness in &card.weaknesses {
                    output.push_str(&format!("  {} {}\n", "-".red(), weakness));
                }
                for dim in &card.dimension_scores {
                    output.push_str(&format!(
                        "  {} {}{}\n",
                        format!("{}:", dim.name).dimmed(),
                        format_score(dim.score),
                        dim.comment
                            .as_deref()
                            .map(|c| format!(" - {}", c))
                            .unwrap_or_default()
                    ));
                }
                for note in &card.safety_notes {
                    output.push_str(&format!("  {} {}\n", "!".yellow(), note));
                }
            }
            VerdictOutcome::Choice { reasoning, .. } => {
                output.push_str(&format!("  {}\n", reasoning));
            }
        }
        if let Some(monologue) = &verdict.monologue {
            output.push_str(&format!("  {} {}\n", "(inner)".dimmed(), monologue.dimmed()));
        }
        output
    }

    fn aggregate_block(aggregate: &EvaluationAggregate) -> String {
        match aggregate {
            EvaluationAggregate::Ranking { entries } => Self::ranking_block(entries),
            EvaluationAggregate::Tally(tally) => Self::tally_block(tally),
        }
    }

    fn ranking_block(entries: &[RankedVerdict]) -> String {
        let mut output = Self::section_header("Ranking");
        if entries.is_empty() {
            output.push_str("  (no usable scores)\n");
        }
        for (i, entry) in entries.iter().enumerate() {
            output.push_str(&format!(
                "  {}. {} {}\n",
                i + 1,
                entry.display_name.bold(),
                format_score(entry.score).green()
            ));
        }
        output
    }

    fn tally_block(tally: &ChoiceTally) -> String {
        let mut output = Self::section_header("Votes");
        output.push_str(&format!(
            "  A ({}): {}\n  B ({}): {}\n",
            tally.option_a,
            tally.count_a.to_string().green().bold(),
            tally.option_b,
            tally.count_b.to_string().green().bold()
        ));
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_domain::{Artifact, Choice, JudgeIdentity, ScoreCard};

    fn plain() {
        colored::control::set_override(false);
    }

    fn evaluation() -> EvaluationResult {
        let grok = JudgeIdentity::new("grok_judge", "Grok", "grok-beta", "troll");
        let qwen = JudgeIdentity::new("qwen_judge", "Qwen", "qwen-max", "poet");
        let mode = EvaluationMode::scoring("outfit");
        let verdicts = vec![
            JudgeVerdict::decided(
                &grok,
                VerdictOutcome::Score(ScoreCard::new(3.0).with_one_liner("cringe")),
                Some("who dressed him".to_string()),
                "raw",
            ),
            JudgeVerdict::transport_failure(&qwen, "connection reset"),
        ];
        EvaluationResult {
            entry_id: "entry_1".to_string(),
            aggregate: EvaluationAggregate::from_verdicts(&mode, &verdicts),
            mode,
            verdicts,
            error: None,
        }
    }

    #[test]
    fn test_format_evaluation() {
        plain();
        let output = ConsoleFormatter::format_evaluation(&evaluation());
        assert!(output.contains("── Grok (grok-beta) ──  3"));
        assert!(output.contains("\"cringe\""));
        assert!(output.contains("transport failure: connection reset"));
        assert!(output.contains("1. Grok 3"));
        assert!(output.contains("1 judge(s) failed"));
    }

    #[test]
    fn test_format_tally() {
        plain();
        let judge = JudgeIdentity::new("grok_judge", "Grok", "grok-beta", "troll");
        let mode = EvaluationMode::binary_choice("Who is wrong?", "Alice", "Bob");
        let verdicts = vec![JudgeVerdict::decided(
            &judge,
            VerdictOutcome::Choice {
                choice: Choice::B,
                label: "Bob".to_string(),
                reasoning: "fries".to_string(),
            },
            None,
            "raw",
        )];
        let record = EntryRecord::new("entry_2", mode, Artifact::text("story"), verdicts);
        let output = ConsoleFormatter::format_entry(&record, true);
        assert!(output.contains("B (Bob)"));
        assert!(output.contains("A (Alice): 0"));
        assert!(output.contains("B (Bob): 1"));
    }

    #[test]
    fn test_format_verdicts_only() {
        plain();
        let output = ConsoleFormatter::format_verdicts_only(&evaluation());
        assert_eq!(output, "Grok: 3 - who dressed him\nQwen: failed\n");
    }

    #[test]
    fn test_format_run_json_without_debate() {
        let json = ConsoleFormatter::format_run_json(&evaluation(), None);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["evaluation"]["entry_id"], "entry_1");
        assert!(value["debate"].is_null());
    }

    #[test]
    fn test_format_entry_list_empty() {
        plain();
        assert!(ConsoleFormatter::format_entry_list(&[]).contains("No stored entries"));
    }

    #[test]
    fn test_format_judges() {
        plain();
        let output = ConsoleFormatter::format_judges(&JudgeRegistry::builtin(), "built-in panel");
        assert!(output.contains("grok_judge"));
        assert!(output.lines().count() > 10);
    }

    #[test]
    fn test_format_json() {
        let json = ConsoleFormatter::format_json(&evaluation());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entry_id"], "entry_1");
        assert_eq!(value["verdicts"].as_array().unwrap().len(), 2);
    }
}
