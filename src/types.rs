//! Core keyword and group types

use serde::{Deserialize, Serialize};

/// One row of the keyword research export
///
/// Numeric metrics are `None` when the cell is empty or not a number; such
/// rows are kept and simply contribute nothing to the metric they lack.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    pub volume: Option<f64>,
    pub position: Option<f64>,
    pub difficulty: Option<f64>,
    pub cpc: Option<f64>,
    pub competitor_position: Option<f64>,

    /// Raw cells of the input row, in header order
    #[serde(skip)]
    pub columns: Vec<String>,
}

impl KeywordRecord {
    /// Create a record with only the keyword text set
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    #[must_use]
    pub const fn with_position(mut self, position: f64) -> Self {
        self.position = Some(position);
        self
    }

    #[must_use]
    pub const fn with_difficulty(mut self, difficulty: f64) -> Self {
        self.difficulty = Some(difficulty);
        self
    }

    #[must_use]
    pub const fn with_cpc(mut self, cpc: f64) -> Self {
        self.cpc = Some(cpc);
        self
    }

    #[must_use]
    pub const fn with_competitor_position(mut self, position: f64) -> Self {
        self.competitor_position = Some(position);
        self
    }
}

/// The loaded keyword file: original headers plus parsed rows
#[derive(Debug, Clone, Default)]
pub struct KeywordTable {
    pub headers: Vec<String>,
    pub records: Vec<KeywordRecord>,
}

impl KeywordTable {
    /// Build a table from records that carry no raw columns
    #[must_use]
    pub fn from_records(records: Vec<KeywordRecord>) -> Self {
        Self {
            headers: Vec::new(),
            records,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// A keyword together with its computed semantic root
#[derive(Debug, Clone, PartialEq)]
pub struct RootedKeyword {
    pub record: KeywordRecord,
    pub semantic_root: String,
}

/// Keywords sharing one semantic root, in (root, volume desc) order
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordGroup {
    /// Keyword of the first (highest-volume) member
    pub label: String,
    pub semantic_root: String,
    pub members: Vec<RootedKeyword>,
}

/// Geographic tag attached by the location pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationTag {
    pub name: String,
    pub kind: String,
}

/// One row of the grouped report
///
/// Annotation fields are `None` when their pass did not run and
/// `Some(String::new())` when it ran without a match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedGroup {
    #[serde(rename = "Group")]
    pub label: String,

    #[serde(rename = "Position")]
    pub position: Option<f64>,

    #[serde(rename = "Volume")]
    pub volume: f64,

    #[serde(rename = "Difficulty")]
    pub difficulty: Option<f64>,

    #[serde(rename = "CPC")]
    pub cpc: Option<f64>,

    #[serde(rename = "CompetitorPosition")]
    pub competitor_position: Option<f64>,

    /// Member keywords joined with `" | "`
    #[serde(rename = "Keyword")]
    pub keywords: String,

    #[serde(rename = "CheckSERPs")]
    pub check_url: String,

    #[serde(rename = "Intention", skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    #[serde(rename = "Location", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(rename = "LocationType", skip_serializing_if = "Option::is_none")]
    pub location_type: Option<String>,
}
