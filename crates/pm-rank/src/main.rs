use std::{
    fs,
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use clap::Parser;
use dotenvy::dotenv;
use pm_common::{
    api::{MatchResultDto, MatchSummaryDto},
    criteria::CriteriaSet,
    logging::{init_tracing_subscriber, install_tracing_panic_hook},
    matching::{
        DemographicsInactive, MatchResult, ScoreSplit, TotalWeighting, ViewError, above_threshold,
        limit, page, parse_split,
    },
    source::{InMemoryPanelSource, MatchRun, MatchRunError, MatchingService},
};
use serde_json::Value;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "pm-rank",
    about = "Rank panel volunteers against a study's criteria"
)]
struct Cli {
    /// Volunteers array as returned by the panel API
    #[arg(long, env = "PM_VOLUNTEERS_FILE")]
    volunteers: PathBuf,

    /// Habits records array as returned by the panel API
    #[arg(long, env = "PM_HABITS_FILE")]
    habits: PathBuf,

    /// Study criteria (JSON)
    #[arg(long, env = "PM_CRITERIA_FILE")]
    criteria: PathBuf,

    /// Study id reported in the output
    #[arg(long, default_value_t = 1)]
    study_id: i64,

    /// Minimum total percentage to keep
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=100))]
    min_score: u8,

    /// Maximum number of results (0 = all)
    #[arg(long, default_value_t = 0)]
    limit: usize,

    /// 1-based page of the filtered results
    #[arg(long)]
    page: Option<usize>,

    #[arg(long, default_value_t = 50)]
    per_page: usize,

    /// Overrides the stored split: `standard` (70/30), `study` (80/20) or a
    /// demographic share such as `0.75`
    #[arg(long, env = "PM_SCORE_SPLIT", value_parser = split_arg)]
    split: Option<ScoreSplit>,

    /// Overrides the stored policy: `renormalize` or `fixed_split`
    #[arg(long, env = "PM_DEMOGRAPHICS_INACTIVE")]
    demographics_inactive: Option<DemographicsInactive>,

    /// Print a summary line after the results
    #[arg(long)]
    summary: bool,
}

fn split_arg(raw: &str) -> Result<ScoreSplit, String> {
    parse_split(raw).ok_or_else(|| {
        format!("expected `standard`, `study` or a demographic share within 0..=1, got {raw:?}")
    })
}

#[derive(Debug, thiserror::Error)]
enum RankError {
    #[error("failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Run(#[from] MatchRunError),
    #[error(transparent)]
    View(#[from] ViewError),
    #[error("failed to serialize output: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, RankError> {
    let raw = fs::read_to_string(path).map_err(|source| RankError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| RankError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn load_source(cli: &Cli) -> Result<InMemoryPanelSource, RankError> {
    let volunteers: Value = read_json(&cli.volunteers)?;
    let habits: Value = read_json(&cli.habits)?;
    let mut criteria: CriteriaSet = read_json(&cli.criteria)?;

    let stored = criteria.weighting();
    criteria.set_weighting(TotalWeighting::new(
        cli.split.unwrap_or(stored.split),
        cli.demographics_inactive.unwrap_or(stored.demographics_inactive),
    ));

    Ok(InMemoryPanelSource::from_values(&volunteers, &habits).with_study(cli.study_id, criteria))
}

/// `--limit 0` keeps everything.
fn limited(results: &[MatchResult], n: usize) -> &[MatchResult] {
    if n == 0 {
        results
    } else {
        limit(results, n)
    }
}

/// JSON lines for the selected slice of the run, ranks counted over the
/// full ranking.
fn render(run: &MatchRun, cli: &Cli) -> Result<Vec<String>, RankError> {
    let kept = limited(above_threshold(&run.results, cli.min_score), cli.limit);

    let (items, offset) = match cli.page {
        Some(number) => {
            let selected = page(kept, number, cli.per_page)?;
            (selected.items, selected.offset)
        }
        None => (kept, 0),
    };

    let mut lines = MatchResultDto::from_run(run, offset, items)
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()?;

    if cli.summary {
        lines.push(serde_json::to_string(&MatchSummaryDto::from_run(run, kept))?);
    }

    Ok(lines)
}

fn run(cli: Cli) -> Result<(), RankError> {
    let service = MatchingService::new(load_source(&cli)?);
    let run = service.run(cli.study_id)?;
    let lines = render(&run, &cli)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for line in &lines {
        writeln!(out, "{line}")?;
    }
    out.flush()?;

    info!(run_id = %run.run_id, printed = lines.len(), "pm-rank finished");
    Ok(())
}

fn main() {
    dotenv().ok();
    init_tracing_subscriber("pm-rank");
    install_tracing_panic_hook("pm-rank");

    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        tracing::error!(error = %err, "pm-rank failed");
        std::process::exit(1);
    }
}
