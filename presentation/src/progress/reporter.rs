//! Progress reporting for panel runs

use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use panel_application::{ProgressNotifier, Stage};
use panel_domain::core::string::truncate;
use panel_domain::{DebateEvent, DebateTurn, JudgeIdentity};
use std::sync::Mutex;
use std::time::Duration;

const PREVIEW_LEN: usize = 100;

fn stage_display_name(stage: Stage) -> &'static str {
    match stage {
        Stage::Evaluation => "Stage 1: Evaluation",
        Stage::Debate => "Stage 2: Debate",
    }
}

fn stage_short_name(stage: Stage) -> &'static str {
    match stage {
        Stage::Evaluation => "Evaluation",
        Stage::Debate => "Debate",
    }
}

fn turn_preview(turn: &DebateTurn) -> String {
    truncate(&turn.content.replace('\n', " "), PREVIEW_LEN)
}

/// Reports progress with indicatif bars
///
/// Stage One gets a bar with one tick per judge. During the debate the bar
/// counts turns and a spinner shows who is speaking.
pub struct ProgressReporter {
    multi: MultiProgress,
    stage_bar: Mutex<Option<ProgressBar>>,
    speaker_spinner: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            stage_bar: Mutex::new(None),
            speaker_spinner: Mutex::new(None),
        }
    }

    fn stage_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {prefix:.bold} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn finish_spinner(&self) {
        if let Ok(mut spinner) = self.speaker_spinner.lock()
            && let Some(pb) = spinner.take()
        {
            pb.finish_and_clear();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressNotifier for ProgressReporter {
    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        let pb = self.multi.add(ProgressBar::new(total_tasks as u64));
        pb.set_style(Self::stage_style());
        pb.set_prefix(stage_display_name(stage));
        pb.set_message("Starting...");

        if let Ok(mut bar) = self.stage_bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_judge_complete(&self, judge: &JudgeIdentity, success: bool) {
        if let Ok(bar) = self.stage_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} {}", "v".green(), judge.display_name)
            } else {
                format!("{} {}", "x".red(), judge.display_name)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_stage_complete(&self, stage: Stage) {
        self.finish_spinner();
        if let Ok(mut bar) = self.stage_bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_with_message(format!("{} complete!", stage_short_name(stage).green()));
        }
    }

    fn on_turn_start(&self, speaker: &JudgeIdentity) {
        self.finish_spinner();

        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(speaker.display_name.clone());
        pb.set_message("thinking...");
        pb.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut spinner) = self.speaker_spinner.lock() {
            *spinner = Some(pb);
        }
    }

    fn on_turn_chunk(&self, _speaker_id: &str, chunk: &str) {
        if let Ok(spinner) = self.speaker_spinner.lock()
            && let Some(pb) = spinner.as_ref()
        {
            let len = pb.position() + chunk.chars().count() as u64;
            pb.set_position(len);
            pb.set_message(format!("speaking... ({} chars)", len));
        }
    }

    fn on_turn_recorded(&self, turn: &DebateTurn) {
        self.finish_spinner();
        let _ = self.multi.println(format!(
            "  {} {}: {}",
            format!("#{}", turn.sequence).dimmed(),
            turn.speaker.yellow().bold(),
            turn_preview(turn)
        ));
        if let Ok(bar) = self.stage_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.inc(1);
        }
    }

    fn on_debate_event(&self, event: &DebateEvent) {
        self.finish_spinner();
        if let DebateEvent::Other { source, detail } = event {
            let _ = self
                .multi
                .println(format!("  {} {}: {}", "~".yellow(), source, detail.dimmed()));
        }
        if let Ok(bar) = self.stage_bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            pb.inc(1);
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleProgress;

impl ProgressNotifier for SimpleProgress {
    fn on_stage_start(&self, stage: Stage, total_tasks: usize) {
        let unit = match stage {
            Stage::Evaluation => "judges",
            Stage::Debate => "turns max",
        };
        println!(
            "{} {} ({} {})",
            "->".cyan(),
            stage_display_name(stage).bold(),
            total_tasks,
            unit
        );
    }

    fn on_judge_complete(&self, judge: &JudgeIdentity, success: bool) {
        if success {
            println!("  {} {}", "v".green(), judge.display_name);
        } else {
            println!("  {} {} (failed)", "x".red(), judge.display_name);
        }
    }

    fn on_stage_complete(&self, _stage: Stage) {
        println!();
    }

    fn on_turn_recorded(&self, turn: &DebateTurn) {
        println!("  #{} {}: {}", turn.sequence, turn.speaker.bold(), turn_preview(turn));
    }

    fn on_debate_event(&self, event: &DebateEvent) {
        if let DebateEvent::Other { source, detail } = event {
            println!("  {} {}: {}", "~".yellow(), source, detail);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use panel_domain::Model;

    fn turn(content: &str) -> DebateTurn {
        DebateTurn {
            sequence: 1,
            speaker: "grok_judge".to_string(),
            content: content.to_string(),
            raw_content: content.to_string(),
            context: vec![],
            model: Model::GrokBeta,
        }
    }

    #[test]
    fn test_turn_preview_flattens_lines() {
        assert_eq!(turn_preview(&turn("bro\nseriously")), "bro seriously");
    }

    #[test]
    fn test_turn_preview_truncates() {
        let preview = turn_preview(&turn(&"x".repeat(500)));
        assert_eq!(preview.len(), PREVIEW_LEN);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_reporter_tolerates_calls_without_stage() {
        let reporter = ProgressReporter::new();
        let judge = JudgeIdentity::new("grok_judge", "Grok", "grok-beta", "troll");
        reporter.on_judge_complete(&judge, true);
        reporter.on_turn_chunk("grok_judge", "hi");
        reporter.on_stage_complete(Stage::Debate);
    }
}
