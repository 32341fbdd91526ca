//! Grouping of keywords by semantic root
//!
//! Keywords are sorted by (root ascending, volume descending) with a stable
//! sort, then merged in a single left-to-right pass: a keyword joins the
//! previous keyword's group when both share a root, otherwise it opens a new
//! group labelled with its own text. The sort makes equal roots contiguous,
//! so the adjacency merge yields exactly one group per distinct root.

use crate::types::{KeywordGroup, KeywordRecord, RootedKeyword};
use std::cmp::Ordering;
use tracing::debug;

/// Keep only the first `limit` records when a limit is set
#[must_use]
pub fn truncate(mut records: Vec<KeywordRecord>, limit: Option<usize>) -> Vec<KeywordRecord> {
    if let Some(limit) = limit {
        if records.len() > limit {
            debug!("Truncating {} keywords to the first {}", records.len(), limit);
            records.truncate(limit);
        }
    }
    records
}

/// Order keywords by root, then by descending volume
///
/// Ties keep their input order. Keywords without a volume sort after every
/// keyword with one.
#[must_use]
pub fn sort_by_root(mut keywords: Vec<RootedKeyword>) -> Vec<RootedKeyword> {
    keywords.sort_by(|a, b| {
        a.semantic_root
            .cmp(&b.semantic_root)
            .then_with(|| volume_desc(a.record.volume, b.record.volume))
    });
    keywords
}

fn volume_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort keywords and merge adjacent ones sharing a root
#[must_use]
pub fn group_keywords(keywords: Vec<RootedKeyword>) -> Vec<KeywordGroup> {
    let mut groups: Vec<KeywordGroup> = Vec::new();

    for keyword in sort_by_root(keywords) {
        if let Some(group) = groups
            .last_mut()
            .filter(|g| g.semantic_root == keyword.semantic_root)
        {
            group.members.push(keyword);
            continue;
        }

        groups.push(KeywordGroup {
            label: keyword.record.keyword.clone(),
            semantic_root: keyword.semantic_root.clone(),
            members: vec![keyword],
        });
    }

    groups
}

/// Iterate every grouped keyword with the label of its group
pub fn labelled_keywords(
    groups: &[KeywordGroup],
) -> impl Iterator<Item = (&RootedKeyword, &str)> + '_ {
    groups
        .iter()
        .flat_map(|g| g.members.iter().map(move |m| (m, g.label.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rooted(keyword: &str, root: &str, volume: Option<f64>) -> RootedKeyword {
        let mut record = KeywordRecord::new(keyword);
        record.volume = volume;
        RootedKeyword {
            record,
            semantic_root: root.to_string(),
        }
    }

    fn keywords(group: &KeywordGroup) -> Vec<&str> {
        group
            .members
            .iter()
            .map(|m| m.record.keyword.as_str())
            .collect()
    }

    #[test]
    fn test_sort_by_root_then_volume_desc() {
        let sorted = sort_by_root(vec![
            rooted("b low", "b", Some(10.0)),
            rooted("a", "a", Some(5.0)),
            rooted("b high", "b", Some(90.0)),
        ]);

        let order: Vec<&str> = sorted.iter().map(|k| k.record.keyword.as_str()).collect();
        assert_eq!(order, vec!["a", "b high", "b low"]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let sorted = sort_by_root(vec![
            rooted("first", "x", Some(10.0)),
            rooted("second", "x", Some(10.0)),
            rooted("third", "x", Some(10.0)),
        ]);

        let order: Vec<&str> = sorted.iter().map(|k| k.record.keyword.as_str()).collect();
        assert_eq!(order, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_missing_volume_sorts_last() {
        let sorted = sort_by_root(vec![
            rooted("none", "x", None),
            rooted("some", "x", Some(0.0)),
        ]);
        assert_eq!(sorted[0].record.keyword, "some");
    }

    #[test]
    fn test_group_label_is_highest_volume_member() {
        let groups = group_keywords(vec![
            rooted("zapatos rojos comprar", "compr roj zapat", Some(50.0)),
            rooted("alquilar coche barato", "alquil barat coch", Some(80.0)),
            rooted("comprar zapatos rojos", "compr roj zapat", Some(100.0)),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "alquilar coche barato");
        assert_eq!(groups[1].label, "comprar zapatos rojos");
        assert_eq!(
            keywords(&groups[1]),
            vec!["comprar zapatos rojos", "zapatos rojos comprar"]
        );
    }

    #[test]
    fn test_empty_roots_collapse_into_one_group() {
        let groups = group_keywords(vec![
            rooted("de la", "", Some(5.0)),
            rooted("zapatos", "zapat", Some(1.0)),
            rooted("1234", "", Some(7.0)),
        ]);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].semantic_root, "");
        assert_eq!(groups[0].label, "1234");
        assert_eq!(keywords(&groups[0]), vec!["1234", "de la"]);
    }

    #[test]
    fn test_group_empty_input() {
        assert!(group_keywords(Vec::new()).is_empty());
    }

    #[test]
    fn test_truncate() {
        let records = vec![
            KeywordRecord::new("a"),
            KeywordRecord::new("b"),
            KeywordRecord::new("c"),
        ];
        assert_eq!(truncate(records.clone(), None).len(), 3);
        assert_eq!(truncate(records.clone(), Some(10)).len(), 3);

        let kept = truncate(records, Some(2));
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[1].keyword, "b");
    }

    #[test]
    fn test_labelled_keywords() {
        let groups = group_keywords(vec![
            rooted("a1", "a", Some(2.0)),
            rooted("a2", "a", Some(1.0)),
            rooted("b1", "b", Some(1.0)),
        ]);

        let labelled: Vec<(&str, &str)> = labelled_keywords(&groups)
            .map(|(k, label)| (k.record.keyword.as_str(), label))
            .collect();
        assert_eq!(labelled, vec![("a1", "a1"), ("a2", "a1"), ("b1", "b1")]);
    }
}
