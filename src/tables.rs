//! Reading and writing the tabular files around the pipeline
//!
//! - Keyword export: tab-separated, one keyword per row
//! - Intent and location tables: comma-separated pattern rules
//! - Processed keywords: every input column plus `SemanticRoot` and `Group`
//! - Grouped report: CSV or JSON, one row per group
//!
//! Headers are matched after [`normalize_header`], so exports in Spanish or
//! English and with odd punctuation (`Pos.Med\nRivales`) are accepted.

use crate::annotate::{IntentTable, LocationTable};
use crate::error::{Error, Result};
use crate::grouping::labelled_keywords;
use crate::normalize::normalize_header;
use crate::types::{AggregatedGroup, KeywordGroup, KeywordRecord, KeywordTable, LocationTag};
use csv::{ReaderBuilder, StringRecord, Writer};
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, warn};

const KEYWORD_COLUMN: &[&str] = &["keyword", "keywords", "palabraclave"];
const VOLUME_COLUMN: &[&str] = &["volume", "searchvolume", "volumen"];
const POSITION_COLUMN: &[&str] = &["position", "posicion"];
const DIFFICULTY_COLUMN: &[&str] = &["difficulty", "keyworddifficulty", "kd", "dificultad"];
const CPC_COLUMN: &[&str] = &["cpc"];
const COMPETITOR_COLUMN: &[&str] = &[
    "posmedrivales",
    "competitorposition",
    "competitorpos",
    "competitorsposition",
];

const PATTERN_COLUMN: &[&str] = &["pattern", "patron"];
const LOCATION_COLUMN: &[&str] = &["location", "ubicacion"];
const TYPE_COLUMN: &[&str] = &["type", "tipo"];

/// Headers used when keywords were built in memory rather than read from a file
const DEFAULT_KEYWORD_HEADERS: [&str; 6] = [
    "Keyword",
    "Volume",
    "Position",
    "Difficulty",
    "CPC",
    "CompetitorPosition",
];

/// Output format of the grouped report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Csv,
    Json,
}

impl ReportFormat {
    /// Parse `"csv"` or `"json"`
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

fn find_column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.contains(&normalize_header(h).as_str()))
}

fn require_column(headers: &StringRecord, aliases: &[&str], source: &str) -> Result<usize> {
    find_column(headers, aliases).ok_or_else(|| Error::MissingColumn {
        file: source.to_string(),
        column: aliases[0].to_string(),
    })
}

fn optional_column(headers: &StringRecord, aliases: &[&str], source: &str) -> Option<usize> {
    let column = find_column(headers, aliases);
    if column.is_none() {
        warn!("{source} has no '{}' column; treating it as empty", aliases[0]);
    }
    column
}

/// Parse a numeric cell; empty, non-numeric and non-finite cells are `None`
fn parse_metric(cell: Option<&str>) -> Option<f64> {
    cell.map(str::trim)
        .filter(|c| !c.is_empty())
        .and_then(|c| c.parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

fn format_metric(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn source_name(path: &Path) -> String {
    path.display().to_string()
}

/// Read the tab-separated keyword export
///
/// # Errors
///
/// Returns an error if the file cannot be read or lacks a `Keyword` or
/// `Volume` column
pub fn read_keywords(path: &Path) -> Result<KeywordTable> {
    read_keywords_from(File::open(path)?, &source_name(path))
}

/// Read a tab-separated keyword export from any reader
///
/// # Errors
///
/// Returns an error on malformed input or a missing `Keyword`/`Volume` column
pub fn read_keywords_from<R: Read>(reader: R, source: &str) -> Result<KeywordTable> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let keyword = require_column(&headers, KEYWORD_COLUMN, source)?;
    let volume = require_column(&headers, VOLUME_COLUMN, source)?;
    let position = optional_column(&headers, POSITION_COLUMN, source);
    let difficulty = optional_column(&headers, DIFFICULTY_COLUMN, source);
    let cpc = optional_column(&headers, CPC_COLUMN, source);
    let competitor = optional_column(&headers, COMPETITOR_COLUMN, source);

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        let cell = |idx: Option<usize>| idx.and_then(|i| row.get(i));

        records.push(KeywordRecord {
            keyword: row.get(keyword).unwrap_or_default().to_string(),
            volume: parse_metric(row.get(volume)),
            position: parse_metric(cell(position)),
            difficulty: parse_metric(cell(difficulty)),
            cpc: parse_metric(cell(cpc)),
            competitor_position: parse_metric(cell(competitor)),
            columns: row.iter().map(str::to_string).collect(),
        });
    }

    debug!("Read {} keywords from {source}", records.len());
    Ok(KeywordTable {
        headers: headers.iter().map(str::to_string).collect(),
        records,
    })
}

/// Read `(first, second)` cell pairs from a comma-separated rule table
fn read_rule_rows<R: Read>(
    reader: R,
    source: &str,
    first: &[&str],
    second: &[&str],
) -> Result<Vec<(String, String)>> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = reader.headers()?.clone();
    let first = require_column(&headers, first, source)?;
    let second = require_column(&headers, second, source)?;

    let mut rows = Vec::new();
    for row in reader.records() {
        let row = row?;
        rows.push((
            row.get(first).unwrap_or_default().trim().to_string(),
            row.get(second).unwrap_or_default().trim().to_string(),
        ));
    }

    debug!("Read {} rules from {source}", rows.len());
    Ok(rows)
}

/// Load the intent table (`Pattern`, `Type` columns)
///
/// # Errors
///
/// Returns an error if the file is missing, malformed, or has an invalid pattern
pub fn read_intent_table(path: &Path) -> Result<IntentTable> {
    read_intent_table_from(File::open(path)?, &source_name(path))
}

/// Load an intent table from any reader
///
/// # Errors
///
/// Returns an error on malformed input or an invalid pattern
pub fn read_intent_table_from<R: Read>(reader: R, source: &str) -> Result<IntentTable> {
    IntentTable::new(read_rule_rows(reader, source, PATTERN_COLUMN, TYPE_COLUMN)?)
}

/// Load the location table (`Location`, `Type` columns)
///
/// The location text is both the pattern and the reported location name.
///
/// # Errors
///
/// Returns an error if the file is missing, malformed, or has an invalid pattern
pub fn read_location_table(path: &Path) -> Result<LocationTable> {
    read_location_table_from(File::open(path)?, &source_name(path))
}

/// Load a location table from any reader
///
/// # Errors
///
/// Returns an error on malformed input or an invalid pattern
pub fn read_location_table_from<R: Read>(reader: R, source: &str) -> Result<LocationTable> {
    let rows = read_rule_rows(reader, source, LOCATION_COLUMN, TYPE_COLUMN)?;
    LocationTable::new(rows.into_iter().map(|(location, kind)| {
        let tag = LocationTag {
            name: location.clone(),
            kind,
        };
        (location, tag)
    }))
}

fn record_cells(record: &KeywordRecord, width: usize) -> Vec<String> {
    if record.columns.is_empty() {
        return vec![
            record.keyword.clone(),
            format_metric(record.volume),
            format_metric(record.position),
            format_metric(record.difficulty),
            format_metric(record.cpc),
            format_metric(record.competitor_position),
        ];
    }

    let mut cells = record.columns.clone();
    cells.resize(width, String::new());
    cells
}

/// Write every grouped keyword with its `SemanticRoot` and `Group`
///
/// Rows follow group order; the original columns are kept as read.
///
/// # Errors
///
/// Returns an error if writing fails
pub fn write_processed<W: Write>(
    writer: W,
    headers: &[String],
    groups: &[KeywordGroup],
) -> Result<()> {
    let mut writer = Writer::from_writer(writer);

    let mut header_row: Vec<&str> = if headers.is_empty() {
        DEFAULT_KEYWORD_HEADERS.to_vec()
    } else {
        headers.iter().map(String::as_str).collect()
    };
    let width = header_row.len();
    header_row.extend(["SemanticRoot", "Group"]);
    writer.write_record(&header_row)?;

    for (keyword, label) in labelled_keywords(groups) {
        let mut row = record_cells(&keyword.record, width);
        row.push(keyword.semantic_root.clone());
        row.push(label.to_string());
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the processed keywords to a file
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn write_processed_file(path: &Path, headers: &[String], groups: &[KeywordGroup]) -> Result<()> {
    write_processed(BufWriter::new(File::create(path)?), headers, groups)
}

/// Annotation columns carried by the grouped report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReportColumns {
    /// `Intention`
    pub intent: bool,
    /// `Location` and `LocationType`
    pub location: bool,
}

impl ReportColumns {
    /// Columns for the annotation passes that ran
    #[must_use]
    pub const fn new(intent: bool, location: bool) -> Self {
        Self { intent, location }
    }
}

/// Write the grouped report
///
/// The CSV header follows `columns` even when there are no rows.
///
/// # Errors
///
/// Returns an error if serialization or writing fails
pub fn write_report<W: Write>(
    mut writer: W,
    groups: &[AggregatedGroup],
    format: ReportFormat,
    columns: ReportColumns,
) -> Result<()> {
    match format {
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, groups)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        ReportFormat::Csv => write_report_csv(writer, groups, columns)?,
    }
    Ok(())
}

fn write_report_csv<W: Write>(
    writer: W,
    groups: &[AggregatedGroup],
    columns: ReportColumns,
) -> Result<()> {
    let with_intent = columns.intent;
    let with_location = columns.location;

    let mut writer = Writer::from_writer(writer);

    let mut header = vec![
        "Group",
        "Position",
        "Volume",
        "Difficulty",
        "CPC",
        "CompetitorPosition",
        "Keyword",
        "CheckSERPs",
    ];
    if with_intent {
        header.push("Intention");
    }
    if with_location {
        header.extend(["Location", "LocationType"]);
    }
    writer.write_record(&header)?;

    for group in groups {
        let mut row = vec![
            group.label.clone(),
            format_metric(group.position),
            group.volume.to_string(),
            format_metric(group.difficulty),
            format_metric(group.cpc),
            format_metric(group.competitor_position),
            group.keywords.clone(),
            group.check_url.clone(),
        ];
        if with_intent {
            row.push(group.intent.clone().unwrap_or_default());
        }
        if with_location {
            row.push(group.location.clone().unwrap_or_default());
            row.push(group.location_type.clone().unwrap_or_default());
        }
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the grouped report to a file
///
/// # Errors
///
/// Returns an error if the file cannot be created or written
pub fn write_report_file(
    path: &Path,
    groups: &[AggregatedGroup],
    format: ReportFormat,
    columns: ReportColumns,
) -> Result<()> {
    write_report(BufWriter::new(File::create(path)?), groups, format, columns)
}
