//! Pattern-based annotation of grouped keywords
//!
//! A [`PatternTable`] holds ordered `(pattern, tag)` rules. Each pattern is a
//! regular expression matched as a whole word (`\b...\b`) against a group's
//! label, case-sensitively. Rules are folded in table order and every match
//! overwrites the previous one, so a label matching several rules ends up
//! with the tag of the **last** matching rule.
//!
//! Two independent passes use it: intent detection sets `intent`, location
//! detection sets `location` and `location_type`. Groups without a match get
//! an empty string, never `None`, once their pass has run.

use crate::error::{Error, Result};
use crate::types::{AggregatedGroup, LocationTag};
use regex::Regex;
use tracing::{debug, warn};

/// Rule table mapping intent patterns to intent labels
pub type IntentTable = PatternTable<String>;

/// Rule table mapping location patterns to location tags
pub type LocationTable = PatternTable<LocationTag>;

#[derive(Debug, Clone)]
struct CompiledRule<T> {
    pattern: String,
    matcher: Regex,
    tag: T,
}

/// Ordered whole-word pattern rules
#[derive(Debug, Clone)]
pub struct PatternTable<T> {
    rules: Vec<CompiledRule<T>>,
}

impl<T> Default for PatternTable<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> PatternTable<T> {
    /// Compile rules in the given order
    ///
    /// Blank patterns are skipped with a warning since they would match
    /// every label.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if a pattern is not a valid regex
    pub fn new<I, S>(rules: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
    {
        let mut compiled = Vec::new();

        for (pattern, tag) in rules {
            let pattern = pattern.into();
            if pattern.trim().is_empty() {
                warn!("Skipping blank pattern at rule {}", compiled.len() + 1);
                continue;
            }

            let matcher = Regex::new(&format!(r"\b(?:{pattern})\b")).map_err(|source| {
                Error::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                }
            })?;

            compiled.push(CompiledRule {
                pattern,
                matcher,
                tag,
            });
        }

        debug!("Compiled {} pattern rules", compiled.len());
        Ok(Self { rules: compiled })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Patterns in table order
    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|r| r.pattern.as_str())
    }

    /// Tag of the last rule whose pattern occurs as a whole word in `text`
    #[must_use]
    pub fn resolve(&self, text: &str) -> Option<&T> {
        self.rules
            .iter()
            .fold(None, |current, rule| {
                if rule.matcher.is_match(text) {
                    Some(&rule.tag)
                } else {
                    current
                }
            })
    }
}

/// Set the `intent` of every group from the intent table
#[must_use]
pub fn annotate_intents(groups: Vec<AggregatedGroup>, table: &IntentTable) -> Vec<AggregatedGroup> {
    groups
        .into_iter()
        .map(|mut group| {
            group.intent = Some(table.resolve(&group.label).cloned().unwrap_or_default());
            group
        })
        .collect()
}

/// Set `location` and `location_type` of every group from the location table
#[must_use]
pub fn annotate_locations(
    groups: Vec<AggregatedGroup>,
    table: &LocationTable,
) -> Vec<AggregatedGroup> {
    groups
        .into_iter()
        .map(|mut group| {
            let (name, kind) = table
                .resolve(&group.label)
                .map(|tag| (tag.name.clone(), tag.kind.clone()))
                .unwrap_or_default();
            group.location = Some(name);
            group.location_type = Some(kind);
            group
        })
        .collect()
}
