use anyhow::{anyhow, Context, Result};
use clap::Parser;
use keyword_grouper::{GroupingConfig, KeywordPipeline, Language, ReportFormat};
use std::path::PathBuf;
use tracing::info;

/// Group SEO keywords by semantic root and tag search intent and location
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tab-separated keyword export to process
    #[arg(short, long)]
    file: PathBuf,

    /// Grouped report output file, rows sorted by group (default: kw_agrupado.csv)
    #[arg(short, long)]
    save: Option<PathBuf>,

    /// Per-keyword output file (default: kw_procesado.csv)
    #[arg(short, long)]
    processed: Option<PathBuf>,

    /// Detect search intent (bare flag means true)
    #[arg(short, long, num_args = 0..=1, default_missing_value = "true")]
    intent: Option<bool>,

    /// Detect locations (bare flag means true)
    #[arg(short, long, num_args = 0..=1, default_missing_value = "true")]
    location: Option<bool>,

    /// Process only the first N keywords
    #[arg(short, long)]
    debug: Option<usize>,

    /// Intent pattern table (Pattern,Type)
    #[arg(long)]
    intents: Option<PathBuf>,

    /// Location pattern table (Location,Type)
    #[arg(long)]
    locations: Option<PathBuf>,

    /// Keyword language: spanish or english
    #[arg(long)]
    language: Option<String>,

    /// Grouped report format: csv or json
    #[arg(long)]
    format: Option<String>,
}

impl Args {
    fn into_config(self, mut config: GroupingConfig) -> Result<(PathBuf, GroupingConfig)> {
        if let Some(path) = self.save {
            config = config.with_grouped_path(path);
        }
        if let Some(path) = self.processed {
            config = config.with_processed_path(path);
        }
        if let Some(enabled) = self.intent {
            config = config.with_intent_detection(enabled);
        }
        if let Some(enabled) = self.location {
            config = config.with_location_detection(enabled);
        }
        if let Some(limit) = self.debug {
            config = config.with_debug_limit(limit);
        }
        if let Some(path) = self.intents {
            config = config.with_intents_path(path);
        }
        if let Some(path) = self.locations {
            config = config.with_locations_path(path);
        }
        if let Some(name) = self.language {
            let language =
                Language::from_name(&name).ok_or_else(|| anyhow!("unknown language '{name}'"))?;
            config = config.with_language(language);
        }
        if let Some(name) = self.format {
            let format = ReportFormat::from_name(&name)
                .ok_or_else(|| anyhow!("unknown report format '{name}'"))?;
            config = config.with_report_format(format);
        }
        Ok((self.file, config))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    keyword_grouper::init().context("failed to load .env")?;

    let args = Args::parse();
    let (input, config) = args.into_config(GroupingConfig::from_env())?;

    let pipeline = KeywordPipeline::new(config).context("invalid configuration")?;
    let summary = pipeline
        .run(&input)
        .with_context(|| format!("failed to process {}", input.display()))?;

    info!(
        "Done: {} keywords in {} groups -> {}, {}",
        summary.keywords,
        summary.groups,
        summary.processed_path.display(),
        summary.grouped_path.display()
    );
    Ok(())
}
