//! Merge, dedup, and rank recommendation lists.

use std::collections::HashSet;
use tripweave_core::{normalize_name, RecommendationItem};

/// Merge recommendations from several upstream calls into one ranked list.
///
/// Identity is the trimmed, lowercased name. The caller's own seed items
/// are excluded (a recommendation engine suggesting the input back is
/// noise), duplicates keep the first-seen entry, and the survivors are
/// sorted by descending score. Items whose normalized name is empty are
/// dropped. The sort is stable, so equally-scored items keep their
/// merge order.
pub fn reduce(collected: Vec<RecommendationItem>, seed_items: &[String]) -> Vec<RecommendationItem> {
    let seeds: HashSet<String> = seed_items.iter().map(|s| normalize_name(s)).collect();

    let mut seen = HashSet::new();
    let mut merged: Vec<RecommendationItem> = collected
        .into_iter()
        .filter(|item| {
            let key = item.normalized_name();
            !key.is_empty() && !seeds.contains(&key) && seen.insert(key)
        })
        .collect();

    merged.sort_by(|a, b| {
        let a_score = a.score.unwrap_or(f64::NEG_INFINITY);
        let b_score = b.score.unwrap_or(f64::NEG_INFINITY);
        b_score.total_cmp(&a_score)
    });
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str, score: Option<f64>) -> RecommendationItem {
        RecommendationItem {
            name: name.to_string(),
            genres: Vec::new(),
            score,
        }
    }

    #[test]
    fn excludes_seed_items_case_insensitively() {
        let merged = reduce(
            vec![item("Inception", Some(0.9)), item("Matrix", Some(0.8))],
            &["inception".to_string()],
        );
        let names: Vec<_> = merged.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Matrix"]);
    }

    #[test]
    fn dedups_on_trimmed_lowercased_name_keeping_first() {
        let merged = reduce(
            vec![
                item("Dune", Some(0.5)),
                item("dune ", Some(0.9)),
                item("  DUNE", None),
            ],
            &[],
        );
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "Dune");
        assert_eq!(merged[0].score, Some(0.5));
    }

    #[test]
    fn sorts_by_descending_score_with_missing_scores_last() {
        let merged = reduce(
            vec![
                item("low", Some(0.1)),
                item("none", None),
                item("high", Some(0.95)),
                item("mid", Some(0.5)),
            ],
            &[],
        );
        let names: Vec<_> = merged.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["high", "mid", "low", "none"]);
    }

    #[test]
    fn drops_items_with_blank_names() {
        let merged = reduce(vec![item("   ", Some(1.0)), item("keep", Some(0.2))], &[]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].name, "keep");
    }

    #[test]
    fn equal_scores_keep_merge_order() {
        let merged = reduce(
            vec![
                item("first", Some(0.4)),
                item("second", Some(0.4)),
                item("third", Some(0.4)),
            ],
            &[],
        );
        let names: Vec<_> = merged.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }
}
