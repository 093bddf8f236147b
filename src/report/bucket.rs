//! Time bucketing and line rendering.

use serde::Serialize;

use crate::catalog::Catalog;
use crate::models::{Category, ReadinessRecord};

/// Records of one kind whose remaining times lie within this many seconds of
/// a bucket's anchor share a line.
pub const BUCKET_TOLERANCE_SECS: i64 = 60;

/// A group of same-kind records with near-equal remaining time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub category: Category,
    pub kind: String,

    /// Remaining seconds of the record that opened the bucket
    pub anchor_secs: i64,

    pub count: usize,
}

/// Group records by kind, then greedily into time buckets.
///
/// Kinds appear in first-seen order and buckets within a kind in creation
/// order. A record joins the first bucket of its kind whose anchor is within
/// [`BUCKET_TOLERANCE_SECS`], so the result depends on input order.
pub fn bucket_records(records: &[ReadinessRecord]) -> Vec<Bucket> {
    let mut kinds: Vec<(&str, Vec<Bucket>)> = Vec::new();

    for record in records {
        let index = match kinds.iter().position(|(kind, _)| *kind == record.kind) {
            Some(index) => index,
            None => {
                kinds.push((record.kind.as_str(), Vec::new()));
                kinds.len() - 1
            }
        };
        let buckets = &mut kinds[index].1;

        match buckets.iter_mut().find(|bucket| {
            bucket.anchor_secs.abs_diff(record.seconds_remaining)
                <= BUCKET_TOLERANCE_SECS.unsigned_abs()
        }) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(Bucket {
                category: record.category,
                kind: record.kind.clone(),
                anchor_secs: record.seconds_remaining,
                count: 1,
            }),
        }
    }

    kinds.into_iter().flat_map(|(_, buckets)| buckets).collect()
}

/// Render remaining seconds, e.g. `"1h 1m 1s"`, `"5m 12s"` or `"59s"`.
///
/// Zero hour and minute parts are left out; anything at or below zero is
/// ready.
pub fn format_duration(seconds: i64) -> String {
    if seconds <= 0 {
        return "✅ Ready!".to_string();
    }

    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;

    let mut parts = Vec::with_capacity(3);
    if hours > 0 {
        parts.push(format!("{}h", hours));
    }
    if minutes > 0 {
        parts.push(format!("{}m", minutes));
    }
    parts.push(format!("{}s", secs));
    parts.join(" ")
}

/// Render one bucket as a report line.
pub fn format_bucket(bucket: &Bucket, catalog: &Catalog) -> String {
    let icon = catalog.icon(bucket.category, &bucket.kind);
    let mut line = format!(
        "{} {} — {}",
        icon,
        bucket.kind,
        format_duration(bucket.anchor_secs)
    );
    if bucket.count > 1 {
        line.push_str(&format!(" ({})", bucket.count));
    }
    line
}

/// Bucket records and render one line per bucket using the global catalog.
pub fn format_records(records: &[ReadinessRecord]) -> Vec<String> {
    format_records_with(records, Catalog::global())
}

/// Like [`format_records`] with an explicit catalog for icons.
pub fn format_records_with(records: &[ReadinessRecord], catalog: &Catalog) -> Vec<String> {
    bucket_records(records)
        .iter()
        .map(|bucket| format_bucket(bucket, catalog))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn potato(secs: i64) -> ReadinessRecord {
        ReadinessRecord::new(Category::Crops, "Potato", secs)
    }

    #[test]
    fn test_format_duration_ready() {
        assert_eq!(format_duration(0), "✅ Ready!");
        assert_eq!(format_duration(-5), "✅ Ready!");
    }

    #[test]
    fn test_format_duration_components() {
        assert_eq!(format_duration(3661), "1h 1m 1s");
        assert_eq!(format_duration(59), "59s");
        assert_eq!(format_duration(312), "5m 12s");
        assert_eq!(format_duration(60), "1m 0s");
        assert_eq!(format_duration(3600), "1h 0s");
        assert_eq!(format_duration(3605), "1h 5s");
        assert_eq!(format_duration(172_800), "48h 0s");
    }

    #[test]
    fn test_bucket_clustering() {
        let buckets = bucket_records(&[potato(100), potato(140), potato(500)]);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].anchor_secs, 100);
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[1].anchor_secs, 500);
        assert_eq!(buckets[1].count, 1);
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        let buckets = bucket_records(&[potato(100), potato(160), potato(161)]);
        let counts: Vec<_> = buckets.iter().map(|b| (b.anchor_secs, b.count)).collect();
        assert_eq!(counts, vec![(100, 2), (161, 1)]);
    }

    #[test]
    fn test_anchor_does_not_drift() {
        // 165 is close to 140 but more than 60 from the anchor
        let buckets = bucket_records(&[potato(100), potato(140), potato(150), potato(165)]);
        let counts: Vec<_> = buckets.iter().map(|b| (b.anchor_secs, b.count)).collect();
        assert_eq!(counts, vec![(100, 3), (165, 1)]);
    }

    #[test]
    fn test_first_fit_is_order_sensitive() {
        // 130 fits both 100 and 170; it joins whichever bucket was created first
        let forward = bucket_records(&[potato(100), potato(170), potato(130)]);
        let backward = bucket_records(&[potato(170), potato(100), potato(130)]);

        assert_eq!(forward[0].count, 2);
        assert_eq!(forward[0].anchor_secs, 100);
        assert_eq!(backward[0].count, 2);
        assert_eq!(backward[0].anchor_secs, 170);
    }

    #[test]
    fn test_extreme_remaining_times_stay_apart() {
        let buckets = bucket_records(&[potato(i64::MAX), potato(i64::MIN), potato(i64::MAX - 60)]);
        let counts: Vec<_> = buckets.iter().map(|b| (b.anchor_secs, b.count)).collect();
        assert_eq!(counts, vec![(i64::MAX, 2), (i64::MIN, 1)]);
    }

    #[test]
    fn test_format_extreme_durations() {
        assert_eq!(format_duration(i64::MIN), "✅ Ready!");
        assert_eq!(format_duration(i64::MAX), "2562047788015215h 30m 7s");
    }

    #[test]
    fn test_kinds_grouped_in_first_seen_order() {
        let records = vec![
            ReadinessRecord::new(Category::Crops, "Carrot", 1000),
            potato(100),
            ReadinessRecord::new(Category::Crops, "Carrot", 5000),
            ReadinessRecord::new(Category::Crops, "Carrot", 1010),
        ];
        let buckets = bucket_records(&records);
        let summary: Vec<_> = buckets
            .iter()
            .map(|b| (b.kind.as_str(), b.anchor_secs, b.count))
            .collect();

        assert_eq!(
            summary,
            vec![("Carrot", 1000, 2), ("Carrot", 5000, 1), ("Potato", 100, 1)]
        );
    }

    #[test]
    fn test_format_lines() {
        let records = vec![
            ReadinessRecord::new(Category::Crops, "Sunflower", 30),
            ReadinessRecord::new(Category::Crops, "Sunflower", 25),
            ReadinessRecord::new(Category::Crops, "Rhubarb", -10),
            ReadinessRecord::new(Category::Resources, "Iron", 3661),
        ];

        assert_eq!(
            format_records(&records),
            vec![
                "🌻 Sunflower — 30s (2)".to_string(),
                "🌱 Rhubarb — ✅ Ready!".to_string(),
                "🛠️ Iron — 1h 1m 1s".to_string(),
            ]
        );
    }

    #[test]
    fn test_format_empty() {
        assert!(format_records(&[]).is_empty());
    }

    #[test]
    fn test_format_with_custom_catalog() {
        let catalog = Catalog::default().with_icon("Potato", "P");
        let lines = format_records_with(&[potato(59)], &catalog);
        assert_eq!(lines, vec!["P Potato — 59s".to_string()]);
    }
}
