use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::FeedbackRecord;

/// Aggregate view over every stored record.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub total: usize,
    /// Mean rating rounded to two decimals, `0` for an empty store.
    pub average_rating: f64,
    pub course_counts: BTreeMap<String, usize>,
    pub total_courses: usize,
    pub rating_counts: BTreeMap<i64, usize>,
}

impl FeedbackStats {
    pub fn from_records(records: &[FeedbackRecord]) -> Self {
        let total = records.len();
        let average_rating = if total > 0 {
            let sum: i128 = records.iter().map(|r| i128::from(r.rating)).sum();
            round2(sum as f64 / total as f64)
        } else {
            0.0
        };

        let mut course_counts = BTreeMap::new();
        let mut rating_counts = BTreeMap::new();
        for record in records {
            *course_counts.entry(record.course_code.clone()).or_insert(0) += 1;
            *rating_counts.entry(record.rating).or_insert(0) += 1;
        }

        FeedbackStats {
            total,
            average_rating,
            total_courses: course_counts.len(),
            course_counts,
            rating_counts,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
