//! Outreach Pack command-line entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Parse CLI (flags may fall back to env vars)
//!   3. Init logger
//!   4. Resolve run configuration + TOML settings
//!   5. Dispatch subcommand

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rand::{SeedableRng, rngs::StdRng};
use tracing::info;

use outreach_pack::{
    config::{self, Configuration, Overrides, Settings},
    error::AppError,
    export::{self, ReportMeta},
    leads::{self, LeadTable},
    llm::providers,
    logger,
    outreach::{self, OutreachTable},
    stats,
};

const PREVIEW_ROWS: usize = 8;
const LISTED_MODELS: usize = 5;

#[derive(Parser, Debug)]
#[command(author, version, about = "Personalized outreach messages for a list of leads")]
struct Cli {
    /// TOML settings file (defaults to config/default.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter: a level (error, warn, info, debug, trace) or EnvFilter directives
    #[arg(long, global = true, env = "OUTREACH_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate messages and write CSV + HTML exports
    Generate(GenerateArgs),
    /// Show the first leads and the resolved configuration
    Preview(RunSettings),
    /// Check the API key by listing available models
    Models(ModelArgs),
}

#[derive(Args, Debug)]
struct RunSettings {
    /// Leads CSV (defaults to the bundled sample, data/leads.csv)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Free template generator
    #[arg(long, overrides_with = "no_mock")]
    mock: bool,

    /// Use the API generator (requires an API key)
    #[arg(long, overrides_with = "mock")]
    no_mock: bool,

    /// Maximum words per message
    #[arg(long, value_parser = clap::value_parser!(u16).range(60..=100))]
    word_limit: Option<u16>,

    /// Maximum leads processed
    #[arg(long, value_parser = clap::value_parser!(u16).range(5..=200))]
    max_leads: Option<u16>,

    /// API key (optional; falls back to OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,

    /// Model used in API mode
    #[arg(long, value_parser = ["gpt-5-mini", "gpt-4o-mini"])]
    model: Option<String>,
}

impl RunSettings {
    fn overrides(&self) -> Overrides {
        let mock_mode = match (self.mock, self.no_mock) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        };
        Overrides {
            mock_mode,
            word_limit: self.word_limit.map(usize::from),
            max_rows: self.max_leads.map(usize::from),
            api_key: self.api_key.clone(),
            model_name: self.model.clone(),
        }
    }
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[command(flatten)]
    run: RunSettings,

    /// Directory for outreach_results.csv and outreach_report.html
    #[arg(long, default_value = "out")]
    out_dir: PathBuf,

    /// Seed for the mock generator (reproducible output)
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Args, Debug)]
struct ModelArgs {
    /// API key (optional; falls back to OPENAI_API_KEY)
    #[arg(long)]
    api_key: Option<String>,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or("info");
    logger::init(level, cli.log_level.is_some())?;

    let base = config::load()?;
    let settings = config::load_settings(cli.config.as_deref())?;

    match cli.command {
        Command::Generate(args) => generate(&base, &settings, args),
        Command::Preview(run) => preview(&base, run),
        Command::Models(args) => list_models(&base, &settings, args),
    }
}

fn load_input(input: Option<&Path>) -> Result<LeadTable, AppError> {
    match input {
        Some(path) => leads::load_leads(path),
        None => leads::load_sample(Path::new(leads::SAMPLE_LEADS_PATH)),
    }
}

fn generate(base: &Configuration, settings: &Settings, args: GenerateArgs) -> Result<(), AppError> {
    let config = base.with_overrides(args.run.overrides());
    let table = load_input(args.run.input.as_deref())?;

    if table.is_empty() {
        info!("no leads to process; pass --input with a leads CSV or add data/leads.csv");
        return Ok(());
    }

    let results: OutreachTable = match args.seed {
        Some(seed) => outreach::build_runner(StdRng::seed_from_u64(seed), &config, &settings.llm).run(&table, &config),
        None => outreach::build_runner(rand::thread_rng(), &config, &settings.llm).run(&table, &config),
    };

    let buckets = stats::histogram(&stats::word_counts(&results), stats::DEFAULT_BINS);
    info!("message length distribution (words):\n{}", stats::render_histogram(&buckets));

    let meta = ReportMeta {
        title: settings.report.title.clone(),
        mode: config.mode_label().to_string(),
        word_limit: config.word_limit,
    };
    let paths = export::export_all(&results, &meta, &args.out_dir)?;

    println!(
        "✓ Generated {} messages ({} failed) → {}, {}",
        results.len(),
        results.failed_count(),
        paths.csv.display(),
        paths.html.display()
    );
    Ok(())
}

fn preview(base: &Configuration, run: RunSettings) -> Result<(), AppError> {
    let config = base.with_overrides(run.overrides());
    let table = load_input(run.input.as_deref())?;

    println!(
        "Mode: {}\nWord limit: {}\nMax rows: {}\nModel: {}",
        if config.uses_mock() { "MOCK (FREE)" } else { "API" },
        config.word_limit,
        config.max_rows,
        config.model_name
    );
    println!();

    if table.is_empty() {
        println!("No leads loaded.");
        return Ok(());
    }

    println!("{}", leads::preview_table(&table, PREVIEW_ROWS));
    if table.len() > PREVIEW_ROWS {
        println!("… {} more", table.len() - PREVIEW_ROWS);
    }
    Ok(())
}

fn list_models(base: &Configuration, settings: &Settings, args: ModelArgs) -> Result<(), AppError> {
    let config = base.with_overrides(Overrides { api_key: args.api_key, ..Overrides::default() });
    if config.api_key.is_empty() {
        return Err(AppError::Config("no API key found; set OPENAI_API_KEY or pass --api-key".into()));
    }

    let provider = providers::build(&settings.llm, &config.model_name, &config.api_key)?;
    let models = provider.list_models()?;
    println!("✓ API key works! First {} models:", LISTED_MODELS.min(models.len()));
    for id in models.iter().take(LISTED_MODELS) {
        println!("- {id}");
    }
    Ok(())
}
