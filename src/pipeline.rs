//! Keyword grouping pipeline
//!
//! Each phase consumes the previous phase's output and returns a new value:
//!
//! ```text
//! KeywordRecord ─normalize+root─▶ RootedKeyword ─sort+merge─▶ KeywordGroup
//!        ─aggregate─▶ AggregatedGroup ─intent pass─▶ ─location pass─▶ report
//! ```
//!
//! [`KeywordPipeline::process`] runs the in-memory phases;
//! [`KeywordPipeline::run`] adds the file handling of the batch tool.

use crate::aggregate::{aggregate, SerpLink};
use crate::annotate::{annotate_intents, annotate_locations, IntentTable, LocationTable};
use crate::error::Result;
use crate::grouping::{group_keywords, truncate};
use crate::linguistics::{SnowballAnalyzer, TextAnalyzer};
use crate::normalize::normalize_keyword;
use crate::root::semantic_root;
use crate::tables::{self, ReportColumns};
use crate::types::{AggregatedGroup, KeywordGroup, KeywordRecord, RootedKeyword};
use crate::GroupingConfig;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of the in-memory phases
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Groups with their member keywords, in root order
    pub groups: Vec<KeywordGroup>,
    /// One aggregated (and possibly annotated) row per group, by label
    pub report: Vec<AggregatedGroup>,
}

/// Counts and output locations of a finished batch run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub keywords: usize,
    pub groups: usize,
    pub processed_path: PathBuf,
    pub grouped_path: PathBuf,
}

/// Groups keywords by semantic root and builds the annotated report
pub struct KeywordPipeline {
    config: GroupingConfig,
    analyzer: Box<dyn TextAnalyzer>,
    serp: SerpLink,
}

impl std::fmt::Debug for KeywordPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordPipeline")
            .field("config", &self.config)
            .field("serp", &self.serp)
            .finish_non_exhaustive()
    }
}

impl KeywordPipeline {
    /// Create a pipeline using the Snowball analyzer for the configured language
    ///
    /// # Errors
    ///
    /// Returns an error if the configured SERP URL is invalid
    pub fn new(config: GroupingConfig) -> Result<Self> {
        let analyzer = SnowballAnalyzer::new(config.language);
        Self::with_analyzer(config, Box::new(analyzer))
    }

    /// Create a pipeline with a custom tokenizer/stemmer
    ///
    /// # Errors
    ///
    /// Returns an error if the configured SERP URL is invalid
    pub fn with_analyzer(config: GroupingConfig, analyzer: Box<dyn TextAnalyzer>) -> Result<Self> {
        let serp = SerpLink::new(&config.serp_url)?;
        Ok(Self {
            config,
            analyzer,
            serp,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Semantic root of one raw keyword
    #[must_use]
    pub fn root_of(&self, keyword: &str) -> String {
        let tokens = normalize_keyword(self.analyzer.as_ref(), keyword);
        semantic_root(self.analyzer.as_ref(), &tokens)
    }

    /// Attach a semantic root to every record
    #[must_use]
    pub fn compute_roots(&self, records: Vec<KeywordRecord>) -> Vec<RootedKeyword> {
        records
            .into_iter()
            .map(|record| RootedKeyword {
                semantic_root: self.root_of(&record.keyword),
                record,
            })
            .collect()
    }

    /// Truncate to the debug limit, compute roots and group
    #[must_use]
    pub fn group(&self, records: Vec<KeywordRecord>) -> Vec<KeywordGroup> {
        let records = truncate(records, self.config.debug_limit);
        let rooted = self.compute_roots(records);
        info!("Computed semantic roots for {} keywords", rooted.len());

        let groups = group_keywords(rooted);
        info!("Grouped keywords into {} groups", groups.len());
        groups
    }

    /// Aggregate every group into a report row, ordered by group label
    #[must_use]
    pub fn aggregate(&self, groups: &[KeywordGroup]) -> Vec<AggregatedGroup> {
        let mut report: Vec<AggregatedGroup> =
            groups.iter().map(|g| aggregate(g, &self.serp)).collect();
        report.sort_by(|a, b| a.label.cmp(&b.label));
        report
    }

    /// Run the annotation passes for the tables that are present
    #[must_use]
    pub fn annotate(
        &self,
        report: Vec<AggregatedGroup>,
        intents: Option<&IntentTable>,
        locations: Option<&LocationTable>,
    ) -> Vec<AggregatedGroup> {
        let report = match intents {
            Some(table) => {
                let report = annotate_intents(report, table);
                info!("Detected search intents with {} patterns", table.len());
                report
            }
            None => report,
        };

        match locations {
            Some(table) => {
                let report = annotate_locations(report, table);
                info!("Detected locations with {} patterns", table.len());
                report
            }
            None => report,
        }
    }

    /// Run every in-memory phase
    #[must_use]
    pub fn process(
        &self,
        records: Vec<KeywordRecord>,
        intents: Option<&IntentTable>,
        locations: Option<&LocationTable>,
    ) -> PipelineOutput {
        let groups = self.group(records);
        let report = self.annotate(self.aggregate(&groups), intents, locations);
        PipelineOutput { groups, report }
    }

    /// Process a keyword export and write both output files
    ///
    /// Pattern tables are loaded only when their detection is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the input or a pattern table cannot be read, or if
    /// an output file cannot be written
    pub fn run(&self, input: &Path) -> Result<RunSummary> {
        let table = tables::read_keywords(input)?;
        info!("Loaded {} keywords from {}", table.len(), input.display());

        let headers = table.headers;
        let groups = self.group(table.records);
        let keywords = groups.iter().map(|g| g.members.len()).sum();

        let processed_path = self.config.processed_path.clone();
        tables::write_processed_file(&processed_path, &headers, &groups)?;
        info!("Wrote {}", processed_path.display());

        let mut report = self.aggregate(&groups);

        if self.config.detect_intent {
            let intents = tables::read_intent_table(&self.config.intents_path)?;
            report = self.annotate(report, Some(&intents), None);
        }

        if self.config.detect_location {
            let locations = tables::read_location_table(&self.config.locations_path)?;
            report = self.annotate(report, None, Some(&locations));
        }

        let grouped_path = self.config.grouped_path.clone();
        let columns = ReportColumns::new(self.config.detect_intent, self.config.detect_location);
        tables::write_report_file(&grouped_path, &report, self.config.report_format, columns)?;
        info!("Wrote {}", grouped_path.display());

        Ok(RunSummary {
            keywords,
            groups: report.len(),
            processed_path,
            grouped_path,
        })
    }
}
