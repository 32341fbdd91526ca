//! Collapsing a keyword group into one report row

use crate::error::{Error, Result};
use crate::types::{AggregatedGroup, KeywordGroup};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::Url;

/// Default search endpoint for SERP verification links
pub const DEFAULT_SERP_URL: &str = "https://www.google.es/search";

/// Characters left as-is in the query: unreserved marks and `/`
const QUERY_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'/');

/// Builds search-engine links for manually checking a group's SERP
#[derive(Debug, Clone)]
pub struct SerpLink {
    base: Url,
}

impl SerpLink {
    /// Create a link builder for the given search endpoint
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is not an absolute `http`/`https` URL
    pub fn new(base: &str) -> Result<Self> {
        let base = Url::parse(base)?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "SERP URL must use http or https, got '{base}'"
            )));
        }
        Ok(Self { base })
    }

    /// Build the unpersonalized search URL for a query
    ///
    /// # Examples
    ///
    /// ```
    /// use keyword_grouper::aggregate::{SerpLink, DEFAULT_SERP_URL};
    ///
    /// let link = SerpLink::new(DEFAULT_SERP_URL).unwrap().url_for("comprar zapatos");
    /// assert_eq!(
    ///     link,
    ///     "https://www.google.es/search?source=hp&q=comprar%20zapatos&pws=0"
    /// );
    /// ```
    #[must_use]
    pub fn url_for(&self, query: &str) -> String {
        let encoded = utf8_percent_encode(query, QUERY_SAFE);
        let mut url = self.base.clone();
        url.set_query(Some(&format!("source=hp&q={encoded}&pws=0")));
        url.into()
    }
}

/// Collapse a group into its report row
///
/// Volume is summed; position, difficulty, CPC and competitor position are
/// averaged over the members that have a value. Annotation fields are left
/// unset for the annotation passes.
#[must_use]
pub fn aggregate(group: &KeywordGroup, serp: &SerpLink) -> AggregatedGroup {
    let records = || group.members.iter().map(|m| &m.record);

    AggregatedGroup {
        label: group.label.clone(),
        position: mean(records().map(|r| r.position)),
        volume: records().filter_map(|r| r.volume).sum(),
        difficulty: mean(records().map(|r| r.difficulty)),
        cpc: mean(records().map(|r| r.cpc)),
        competitor_position: mean(records().map(|r| r.competitor_position)),
        keywords: records()
            .map(|r| r.keyword.as_str())
            .collect::<Vec<_>>()
            .join(" | "),
        check_url: serp.url_for(&group.label),
        intent: None,
        location: None,
        location_type: None,
    }
}

/// Arithmetic mean of the present values, `None` if there are none
#[allow(clippy::cast_precision_loss)]
fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values
        .flatten()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeywordRecord, RootedKeyword};

    fn group(label: &str, records: Vec<KeywordRecord>) -> KeywordGroup {
        KeywordGroup {
            label: label.to_string(),
            semantic_root: "root".to_string(),
            members: records
                .into_iter()
                .map(|record| RootedKeyword {
                    record,
                    semantic_root: "root".to_string(),
                })
                .collect(),
        }
    }

    fn serp() -> SerpLink {
        SerpLink::new(DEFAULT_SERP_URL).unwrap()
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("value should be present");
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_aggregate_metrics() {
        let g = group(
            "comprar zapatos rojos",
            vec![
                KeywordRecord::new("comprar zapatos rojos")
                    .with_volume(100.0)
                    .with_position(2.0)
                    .with_difficulty(30.0)
                    .with_cpc(0.5)
                    .with_competitor_position(4.0),
                KeywordRecord::new("zapatos rojos comprar")
                    .with_volume(50.0)
                    .with_position(5.0)
                    .with_difficulty(40.0)
                    .with_cpc(0.3)
                    .with_competitor_position(6.0),
            ],
        );

        let row = aggregate(&g, &serp());

        assert_eq!(row.label, "comprar zapatos rojos");
        assert!((row.volume - 150.0).abs() < 1e-9);
        assert_close(row.position, 3.5);
        assert_close(row.difficulty, 35.0);
        assert_close(row.cpc, 0.4);
        assert_close(row.competitor_position, 5.0);
        assert_eq!(row.keywords, "comprar zapatos rojos | zapatos rojos comprar");
        assert_eq!(row.intent, None);
        assert_eq!(row.location, None);
    }

    #[test]
    fn test_aggregate_skips_missing_values() {
        let g = group(
            "zapatos",
            vec![
                KeywordRecord::new("zapatos").with_volume(10.0).with_position(4.0),
                KeywordRecord::new("zapato"),
            ],
        );

        let row = aggregate(&g, &serp());

        assert!((row.volume - 10.0).abs() < 1e-9);
        assert_close(row.position, 4.0);
        assert_eq!(row.cpc, None);
    }

    #[test]
    fn test_serp_link_encoding() {
        let serp = serp();
        assert_eq!(
            serp.url_for("camión & grúa"),
            "https://www.google.es/search?source=hp&q=cami%C3%B3n%20%26%20gr%C3%BAa&pws=0"
        );
        assert_eq!(
            serp.url_for("a/b-c_d.e~f"),
            "https://www.google.es/search?source=hp&q=a/b-c_d.e~f&pws=0"
        );
    }

    #[test]
    fn test_serp_link_custom_base() {
        let serp = SerpLink::new("https://www.google.com/search").unwrap();
        assert_eq!(
            serp.url_for("zapatos"),
            "https://www.google.com/search?source=hp&q=zapatos&pws=0"
        );
        assert!(matches!(SerpLink::new("not a url"), Err(Error::InvalidUrl(_))));
        assert!(matches!(
            SerpLink::new("mailto:seo@example.com"),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_check_url_uses_label() {
        let g = group("zapatos rojos", vec![KeywordRecord::new("zapatos rojos")]);
        let row = aggregate(&g, &serp());
        assert!(row.check_url.contains("q=zapatos%20rojos"));
    }
}
