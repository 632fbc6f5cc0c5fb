use anyhow::{Context as AnyhowContext, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use context_aggregator::{
    project_context, splice_project_context, AgentKind, AggregatorConfig, ContextAggregator,
};
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;

mod report;

use report::GatherReport;

const DEFAULT_BASE_PROMPT: &str = "You are a helpful assistant";

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "context-gather")]
#[command(about = "Collect project context files for AI agent prompts", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory context paths are resolved against (default: current directory)
    #[arg(long, global = true)]
    workdir: Option<PathBuf>,

    /// JSON or TOML file with `context_paths` (and optionally `working_dir`)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Context path to collect; repeat for several. A trailing `/` scans the
    /// directory recursively. Overrides configured paths.
    #[arg(long = "path", global = true)]
    paths: Vec<String>,

    /// Maximum number of context paths processed at once (default: unbounded)
    #[arg(long, global = true)]
    concurrency: Option<usize>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the aggregated context (default)
    Gather,

    /// Print an agent prompt with the project context appended
    Prompt(PromptArgs),

    /// Summarize which files were collected
    Report(ReportArgs),
}

#[derive(Args)]
struct PromptArgs {
    /// Agent the prompt is built for
    #[arg(long, value_enum, default_value_t = AgentArg::Coder)]
    agent: AgentArg,

    /// File holding the base prompt (default: a generic assistant prompt)
    #[arg(long)]
    base_file: Option<PathBuf>,
}

#[derive(Args)]
struct ReportArgs {
    /// Output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
    format: ReportFormat,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum AgentArg {
    Coder,
    Task,
    Title,
    Summarizer,
}

impl From<AgentArg> for AgentKind {
    fn from(value: AgentArg) -> Self {
        match value {
            AgentArg::Coder => AgentKind::Coder,
            AgentArg::Task => AgentKind::Task,
            AgentArg::Title => AgentKind::Title,
            AgentArg::Summarizer => AgentKind::Summarizer,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ReportFormat {
    Json,
    Markdown,
}

pub async fn main_entry() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = load_config(&cli)?;
    log::debug!(
        "Collecting {} context paths under {}",
        config.context_paths.len(),
        config.working_dir.display()
    );

    match cli.command.unwrap_or(Commands::Gather) {
        Commands::Gather => run_gather(&config).await,
        Commands::Prompt(args) => run_prompt(&config, args).await,
        Commands::Report(args) => run_report(&config, args).await,
    }
}

fn load_config(cli: &Cli) -> Result<AggregatorConfig> {
    let cwd = env::current_dir().context("Failed to resolve current directory")?;
    let base = match &cli.workdir {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => cwd.join(dir),
        None => cwd,
    };

    let mut config = match &cli.config {
        Some(path) => AggregatorConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AggregatorConfig::default(),
    };
    if cli.workdir.is_some() {
        config.working_dir = base.clone();
    }
    config = config.resolve_working_dir(&base);

    if !cli.paths.is_empty() {
        config.context_paths = cli.paths.clone();
    }
    if cli.concurrency.is_some() {
        config.max_concurrency = cli.concurrency;
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

async fn run_gather(config: &AggregatorConfig) -> Result<()> {
    let context = project_context(config).await;
    if context.is_empty() {
        log::info!("No project context found");
        return Ok(());
    }
    print_stdout(context)
}

async fn run_prompt(config: &AggregatorConfig, args: PromptArgs) -> Result<()> {
    let base = match &args.base_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read base prompt {}", path.display()))?,
        None => DEFAULT_BASE_PROMPT.to_string(),
    };
    let agent = AgentKind::from(args.agent);
    let context = if agent.wants_project_context() {
        project_context(config).await
    } else {
        ""
    };
    print_stdout(&splice_project_context(base.trim_end(), agent, context))
}

async fn run_report(config: &AggregatorConfig, args: ReportArgs) -> Result<()> {
    let result = ContextAggregator::new(config).aggregate().await;
    let report = GatherReport::new(&config.working_dir, &config.context_paths, &result);
    let text = match args.format {
        ReportFormat::Json => report.to_json()?,
        ReportFormat::Markdown => report.to_markdown(),
    };
    print_stdout(&text)
}
