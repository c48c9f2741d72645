//! CLI entrypoint for judge-panel
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, anyhow, bail};
use clap::{CommandFactory, Parser};
use panel_application::{
    BuiltinRegistrySource, ConversationLogger, DebateResult, EntryStore, EvaluationResult,
    NoConversationLogger, NoProgress, PanelConfig, ProgressNotifier, RegistrySource,
    RunDebateUseCase, RunEvaluationUseCase,
};
use panel_domain::{EntryRecord, EvaluationRequest, OutputFormat};
use panel_infrastructure::{
    ConfigLoader, FileConfig, FileRegistrySource, JsonFileEntryStore, JsonlConversationLogger,
    OpenAiCompatibleGateway,
};
use panel_presentation::{Cli, Command, ConsoleFormatter, JudgesCommand, ProgressReporter, RunArgs};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Everything a command needs, built once from the loaded configuration
struct App {
    panel: PanelConfig,
    gateway: Arc<OpenAiCompatibleGateway>,
    store: JsonFileEntryStore,
    logger: Arc<dyn ConversationLogger>,
    format: OutputFormat,
    quiet: bool,
}

impl App {
    fn progress(&self) -> Box<dyn ProgressNotifier> {
        if self.quiet || self.format == OutputFormat::Json {
            Box::new(NoProgress)
        } else {
            Box::new(ProgressReporter::new())
        }
    }

    async fn evaluate(&self, request: EvaluationRequest, run: &RunArgs) -> Result<()> {
        let panel = match run.max_turns {
            Some(max) => self.panel.clone().with_max_turns(max),
            None => self.panel.clone(),
        };
        let progress = self.progress();

        let artifact = request.artifact.clone();
        let use_case = RunEvaluationUseCase::new(Arc::clone(&self.gateway))
            .with_conversation_logger(Arc::clone(&self.logger));
        let result = use_case
            .execute_with_progress(panel.to_evaluation_input(request), progress.as_ref())
            .await?;

        if !run.no_save {
            let record = EntryRecord::new(
                result.entry_id.clone(),
                result.mode.clone(),
                artifact,
                result.verdicts.clone(),
            );
            self.store.save(&record).await?;
            info!("Saved entry {}", record.entry_id);
        }

        let debate = if run.debate && result.error.is_none() {
            Some(
                self.debate(&panel, &result.entry_id, &result, progress.as_ref(), run.no_save)
                    .await?,
            )
        } else {
            None
        };

        self.print_run(&result, debate.as_ref());

        if let Some(error) = &result.error {
            bail!("{}", error);
        }
        if let Some(debate) = &debate
            && debate.is_failed()
        {
            bail!(
                "debate failed: {}",
                debate.error.as_deref().unwrap_or("unknown error")
            );
        }
        Ok(())
    }

    async fn debate(
        &self,
        panel: &PanelConfig,
        entry_id: &str,
        evaluation: &EvaluationResult,
        progress: &dyn ProgressNotifier,
        no_save: bool,
    ) -> Result<DebateResult> {
        let input = panel.to_debate_input(
            entry_id,
            evaluation.mode.clone(),
            evaluation.verdicts.clone(),
        );
        let use_case = RunDebateUseCase::new(Arc::clone(&self.gateway))
            .with_conversation_logger(Arc::clone(&self.logger));
        let result = use_case.execute_with_progress(input, progress).await;

        if !no_save {
            let record = result.to_record(panel.debate().selector_model.as_str());
            self.store.attach_debate(entry_id, record).await?;
        }
        Ok(result)
    }

    async fn debate_stored(&self, entry_id: &str, max_turns: Option<usize>) -> Result<()> {
        let record = self
            .store
            .get(entry_id)
            .await?
            .ok_or_else(|| anyhow!("Entry not found: {}", entry_id))?;

        let panel = match max_turns {
            Some(max) => self.panel.clone().with_max_turns(max),
            None => self.panel.clone(),
        };
        let input = panel.to_debate_input(&record.entry_id, record.mode, record.verdicts);
        let progress = self.progress();
        let use_case = RunDebateUseCase::new(Arc::clone(&self.gateway))
            .with_conversation_logger(Arc::clone(&self.logger));
        let result = use_case.execute_with_progress(input, progress.as_ref()).await;

        self.store
            .attach_debate(
                entry_id,
                result.to_record(panel.debate().selector_model.as_str()),
            )
            .await?;

        match self.format {
            OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&result)),
            _ => println!("{}", ConsoleFormatter::format_debate(&result)),
        }

        if result.is_failed() {
            bail!(
                "debate failed: {}",
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
        Ok(())
    }

    fn print_run(&self, evaluation: &EvaluationResult, debate: Option<&DebateResult>) {
        match self.format {
            OutputFormat::Json => {
                println!("{}", ConsoleFormatter::format_run_json(evaluation, debate));
            }
            OutputFormat::Verdicts => {
                print!("{}", ConsoleFormatter::format_verdicts_only(evaluation));
            }
            OutputFormat::Full => {
                println!("{}", ConsoleFormatter::format_evaluation(evaluation));
                if let Some(debate) = debate {
                    println!("{}", ConsoleFormatter::format_debate(debate));
                }
            }
        }
    }

    async fn show(&self, entry_id: &str) -> Result<()> {
        let record = self
            .store
            .get(entry_id)
            .await?
            .ok_or_else(|| anyhow!("Entry not found: {}", entry_id))?;
        match self.format {
            OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&record)),
            OutputFormat::Verdicts => print!("{}", ConsoleFormatter::format_entry(&record, false)),
            OutputFormat::Full => print!("{}", ConsoleFormatter::format_entry(&record, true)),
        }
        Ok(())
    }

    async fn list(&self) -> Result<()> {
        let records = self.store.list().await?;
        match self.format {
            OutputFormat::Json => println!("{}", ConsoleFormatter::format_json(&records)),
            _ => print!("{}", ConsoleFormatter::format_entry_list(&records)),
        }
        Ok(())
    }

    async fn delete(&self, entry_id: &str) -> Result<()> {
        if self.store.delete(entry_id).await? {
            println!("Deleted entry {}", entry_id);
            Ok(())
        } else {
            bail!("Entry not found: {}", entry_id)
        }
    }
}

/// Stderr logging from the -v count, plus a daily file when a log dir is set
fn init_logging(verbose: u8, log_dir: Option<&Path>) -> Option<WorkerGuard> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };

    let (file_writer, guard) = match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "judge-panel.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(writer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_writer.map(|writer| fmt::layer().with_ansi(false).with_writer(writer)))
        .init();

    guard
}

fn registry_source(config: &FileConfig) -> Box<dyn RegistrySource> {
    match config.panel.judges_path() {
        Some(path) => Box::new(FileRegistrySource::new(path)),
        None => Box::new(BuiltinRegistrySource),
    }
}

fn conversation_logger(config: &FileConfig) -> Result<Arc<dyn ConversationLogger>> {
    match &config.logging.conversation_log {
        Some(path) => {
            let logger = JsonlConversationLogger::open(path).with_context(|| {
                format!("Failed to open conversation log {}", path.display())
            })?;
            info!("Conversation log: {}", path.display());
            Ok(Arc::new(logger))
        }
        None => Ok(Arc::new(NoConversationLogger)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(());
    }

    let loaded = if cli.no_config {
        Ok(ConfigLoader::load_defaults())
    } else {
        ConfigLoader::load(cli.config.as_deref())
    };

    let log_dir = cli.log_dir.clone().or_else(|| {
        loaded
            .as_ref()
            .ok()
            .and_then(|config| config.logging.log_dir.clone())
    });
    let _log_guard = init_logging(cli.verbose, log_dir.as_deref());

    let config = loaded.map_err(|e| anyhow!("Failed to load configuration: {}", e))?;
    for issue in config.validate() {
        warn!("Config: {}", issue);
    }

    info!("Starting judge-panel");

    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    ConsoleFormatter::set_color(config.output.color);
    let format = cli
        .output
        .map(OutputFormat::from)
        .or(config.output.format)
        .unwrap_or_default();

    // Judge registry commands work even when the registry document is broken
    let source = registry_source(&config);
    match command {
        Command::Judges(JudgesCommand::Reset) => {
            let registry = source.reset()?;
            println!(
                "Judge registry reset to the built-in panel ({} judges)",
                registry.len()
            );
            return Ok(());
        }
        Command::Judges(JudgesCommand::List) => {
            let registry = source.load()?;
            print!(
                "{}",
                ConsoleFormatter::format_judges(&registry, &source.describe())
            );
            return Ok(());
        }
        _ => {}
    }

    // === Dependency Injection ===
    let registry = source
        .load()
        .with_context(|| format!("Failed to load judges from {}", source.describe()))?;
    let app = App {
        panel: PanelConfig::new(registry, config.debate.to_params()),
        gateway: Arc::new(OpenAiCompatibleGateway::from_config(&config.gateway)?),
        store: JsonFileEntryStore::new(config.panel.entries_dir()),
        logger: conversation_logger(&config)?,
        format,
        quiet: cli.quiet,
    };

    match command {
        Command::Score(args) => app.evaluate(args.to_request(), &args.run).await,
        Command::Choose(args) => app.evaluate(args.to_request(), &args.run).await,
        Command::Debate {
            entry_id,
            max_turns,
        } => app.debate_stored(&entry_id, max_turns).await,
        Command::Show { entry_id } => app.show(&entry_id).await,
        Command::List => app.list().await,
        Command::Delete { entry_id } => app.delete(&entry_id).await,
        Command::Judges(_) => Ok(()),
    }
}
