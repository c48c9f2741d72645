//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use panel_domain::{Artifact, EvaluationMode, EvaluationRequest, OutputFormat};
use std::path::PathBuf;

/// `--output` values
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Verdicts, aggregate and debate transcript
    Full,
    /// Verdict headlines only, no debate transcript
    Verdicts,
    /// JSON output
    Json,
}

impl From<OutputMode> for OutputFormat {
    fn from(mode: OutputMode) -> Self {
        match mode {
            OutputMode::Full => OutputFormat::Full,
            OutputMode::Verdicts => OutputFormat::Verdicts,
            OutputMode::Json => OutputFormat::Json,
        }
    }
}

/// CLI arguments for judge-panel
#[derive(Parser, Debug)]
#[command(name = "judge-panel")]
#[command(author, version, about = "AI judge panel - persona judges score, vote and argue")]
#[command(long_about = r#"
judge-panel puts an entry in front of a panel of persona-driven AI judges.

Stage One: every judge evaluates the entry concurrently and returns a score
or a binary choice. Stage Two (optional): judges with a usable verdict
debate, with a selector model deciding who speaks next.

Configuration files are loaded from (in priority order):
1. --config <path>                         Explicit config file
2. JUDGE_PANEL_<SECTION>__<KEY>            Environment
3. ./judge-panel.toml                      Project-level config
4. ~/.config/judge-panel/config.toml       Global config

Example:
  judge-panel score --type outfit --image https://example.com/fit.jpg --debate
  judge-panel choose -q "Who is wrong?" -a "Alice" -b "Bob" --text "..."
  judge-panel debate entry_1718000000000 --max-turns 8
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputMode>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short = 'Q', long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Write daily rolling diagnostic logs to this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score an entry (scoring mode)
    Score(ScoreArgs),

    /// Ask the panel to pick between two options (binary-choice mode)
    Choose(ChooseArgs),

    /// Run (or re-run) the debate for a stored entry
    Debate {
        entry_id: String,

        /// Override the turn budget
        #[arg(long)]
        max_turns: Option<usize>,
    },

    /// Show a stored entry
    Show { entry_id: String },

    /// List stored entries, newest first
    List,

    /// Delete a stored entry with its verdicts and debate
    Delete { entry_id: String },

    /// Inspect or reset the judge registry
    #[command(subcommand)]
    Judges(JudgesCommand),
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum JudgesCommand {
    /// List configured judges
    List,
    /// Remove the judges override and return to the built-in panel
    Reset,
}

/// What the judges look at
#[derive(Args, Debug, Clone, Default)]
pub struct ArtifactArgs {
    /// Image URL
    #[arg(long, value_name = "URL")]
    pub image: Option<String>,

    /// Inline text content
    #[arg(long)]
    pub text: Option<String>,

    /// Extra background for the judges
    #[arg(long)]
    pub context: Option<String>,
}

impl ArtifactArgs {
    pub fn to_artifact(&self) -> Artifact {
        Artifact {
            image_url: self.image.clone(),
            text: self.text.clone(),
            extra_context: self.context.clone(),
        }
    }
}

/// Options shared by both evaluation commands
#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Entry id (generated when omitted)
    #[arg(long)]
    pub id: Option<String>,

    /// Follow Stage One with a debate
    #[arg(long)]
    pub debate: bool,

    /// Override the debate turn budget
    #[arg(long)]
    pub max_turns: Option<usize>,

    /// Do not store the entry
    #[arg(long)]
    pub no_save: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ScoreArgs {
    /// Competition type, e.g. outfit or funny
    #[arg(long = "type", default_value = "outfit")]
    pub competition_type: String,

    #[command(flatten)]
    pub artifact: ArtifactArgs,

    #[command(flatten)]
    pub run: RunArgs,
}

impl ScoreArgs {
    pub fn to_request(&self) -> EvaluationRequest {
        EvaluationRequest::new(
            self.run.id.clone().unwrap_or_default(),
            EvaluationMode::scoring(self.competition_type.clone()),
            self.artifact.to_artifact(),
        )
    }
}

#[derive(Args, Debug, Clone)]
pub struct ChooseArgs {
    /// The question put to the panel
    #[arg(short, long)]
    pub question: String,

    /// Label of option A
    #[arg(short = 'a', long)]
    pub option_a: String,

    /// Label of option B
    #[arg(short = 'b', long)]
    pub option_b: String,

    #[command(flatten)]
    pub artifact: ArtifactArgs,

    #[command(flatten)]
    pub run: RunArgs,
}

impl ChooseArgs {
    pub fn to_request(&self) -> EvaluationRequest {
        EvaluationRequest::new(
            self.run.id.clone().unwrap_or_default(),
            EvaluationMode::binary_choice(
                self.question.clone(),
                self.option_a.clone(),
                self.option_b.clone(),
            ),
            self.artifact.to_artifact(),
        )
    }
}
