//! # CLI Commands
//!
//! Implementations of the Muster subcommands. Each `cmd_*` function does
//! all of its I/O up front (read a JSON record file), hands normalized
//! snapshots to the core, and returns the rendered JSON report as a
//! string so the binary and the integration tests share one code path.

use muster_core::dates::parse_date;
use muster_core::{
    ALL_STAGES, AnimalSnapshot, LifecycleConfig, RawAnimalRecord, StageChange, simulate_many,
};
use chrono::{NaiveDate, NaiveDateTime};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

// =============================================================================
// ERRORS
// =============================================================================

/// Errors surfaced by the CLI layer.
///
/// Per-record simulation failures are NOT here: they are captured inside
/// the report next to the record that produced them.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unrecognized date: {0}")]
    InvalidDate(String),

    #[error("failed to render report: {0}")]
    Render(#[from] serde_json::Error),
}

/// Parse a date argument using the same formats the record boundary
/// accepts.
pub fn parse_cli_date(raw: &str) -> Result<NaiveDate, CliError> {
    parse_date(raw).ok_or_else(|| CliError::InvalidDate(raw.to_string()))
}

// =============================================================================
// RECORD LOADING
// =============================================================================

/// Load a JSON array of raw animal records from disk.
pub fn load_records(path: &Path) -> Result<Vec<RawAnimalRecord>, CliError> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| CliError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

// =============================================================================
// REPORT ROWS
// =============================================================================

#[derive(Debug, Serialize)]
struct StageRow {
    code: &'static str,
    name: &'static str,
}

#[derive(Debug, Serialize)]
struct ClassifyRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    stage: String,
    stage_name: &'static str,
}

#[derive(Debug, Serialize)]
struct ChangeRow {
    date: NaiveDate,
    stage: String,
    stage_name: &'static str,
}

#[derive(Debug, Serialize)]
struct SimulateRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    changes: Option<Vec<ChangeRow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn change_rows(changes: Vec<StageChange>) -> Vec<ChangeRow> {
    changes
        .into_iter()
        .map(|change| ChangeRow {
            date: change.date,
            stage: change.stage.to_string(),
            stage_name: change.stage.display_name(),
        })
        .collect()
}

// =============================================================================
// COMMANDS
// =============================================================================

/// `muster stages` — print the stage registry.
pub fn cmd_stages() -> Result<String, CliError> {
    let rows: Vec<StageRow> = ALL_STAGES
        .iter()
        .map(|stage| StageRow {
            code: stage.as_str(),
            name: stage.display_name(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// `muster classify` — classify every record in the input file at the
/// given instant.
pub fn cmd_classify(
    input: &Path,
    at: NaiveDateTime,
    config: &LifecycleConfig,
) -> Result<String, CliError> {
    let records = load_records(input)?;
    info!(records = records.len(), at = %at.date(), "classifying records");

    let rows: Vec<ClassifyRow> = records
        .iter()
        .map(|raw| {
            let snapshot = AnimalSnapshot::from_raw(raw);
            let stage = muster_core::classify(&snapshot, at, config);
            ClassifyRow {
                tag: raw.tag.clone(),
                stage: stage.to_string(),
                stage_name: stage.display_name(),
            }
        })
        .collect();

    Ok(serde_json::to_string_pretty(&rows)?)
}

/// `muster simulate` — project every record's stage changes across the
/// horizon. Per-record failures land in the report, not in the error
/// channel, so one bad record never takes down the batch.
pub fn cmd_simulate(
    input: &Path,
    start: NaiveDate,
    end: NaiveDate,
    reference_now: NaiveDateTime,
    config: &LifecycleConfig,
    seed: Option<u64>,
) -> Result<String, CliError> {
    let records = load_records(input)?;
    info!(
        records = records.len(),
        %start,
        %end,
        seed,
        "simulating lifecycles"
    );

    let snapshots: Vec<AnimalSnapshot> = records.iter().map(AnimalSnapshot::from_raw).collect();
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let outcomes = simulate_many(&snapshots, start, end, reference_now, config, &mut rng);

    let rows: Vec<SimulateRow> = records
        .iter()
        .zip(outcomes)
        .map(|(raw, outcome)| match outcome {
            Ok(changes) => SimulateRow {
                tag: raw.tag.clone(),
                changes: Some(change_rows(changes)),
                error: None,
            },
            Err(err) => {
                warn!(tag = raw.tag.as_deref(), error = %err, "record simulation failed");
                SimulateRow {
                    tag: raw.tag.clone(),
                    changes: None,
                    error: Some(err.to_string()),
                }
            }
        })
        .collect();

    Ok(serde_json::to_string_pretty(&rows)?)
}
