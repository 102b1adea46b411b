use crate::scoring::round2;
use ecoscore_types::{Distribution, IssueCount, Rating, ScoreBands, SubmissionRecord, SummaryResponse};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

const TOP_ISSUE_LIMIT: usize = 5;

/// In-memory store for scored submissions. History lives for the lifetime of
/// the process; a restart starts from an empty store.
#[derive(Clone, Default)]
pub struct SubmissionStore {
    records: Arc<RwLock<Vec<SubmissionRecord>>>,
}

impl SubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, submission: SubmissionRecord) {
        let mut records = self.records.write().await;
        records.push(submission);
    }

    /// All submissions, newest first.
    pub async fn history(&self) -> Vec<SubmissionRecord> {
        let records = self.records.read().await;
        let mut history = records.clone();
        history.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        history
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn clear(&self) {
        let mut records = self.records.write().await;
        records.clear();
    }

    /// Aggregate statistics across all submissions.
    pub async fn summary(&self) -> SummaryResponse {
        let records = self.records.read().await;

        if records.is_empty() {
            return SummaryResponse {
                success: true,
                total_products: 0,
                average_score: 0.0,
                ratings: BTreeMap::new(),
                top_issues: Vec::new(),
                distribution: None,
                score_range: None,
            };
        }

        let scores: Vec<f64> = records.iter().map(|r| r.score).collect();

        let mut ratings = BTreeMap::new();
        for rating in Rating::ALL {
            let count = records.iter().filter(|r| r.rating == rating).count();
            ratings.insert(rating, count);
        }

        // Count issue occurrences, preserving first-seen order so the stable
        // sort below keeps ties in submission order
        let mut issue_counts: Vec<(String, usize)> = Vec::new();
        for record in records.iter() {
            for issue in &record.issues {
                match issue_counts.iter_mut().find(|(name, _)| name == issue) {
                    Some((_, count)) => *count += 1,
                    None => issue_counts.push((issue.clone(), 1)),
                }
            }
        }
        issue_counts.sort_by(|a, b| b.1.cmp(&a.1));
        let top_issues = issue_counts
            .into_iter()
            .take(TOP_ISSUE_LIMIT)
            .map(|(issue, count)| IssueCount { issue, count })
            .collect();

        let mean = scores.iter().sum::<f64>() / scores.len() as f64;

        let distribution = Distribution {
            min_score: scores.iter().copied().fold(f64::INFINITY, f64::min),
            max_score: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            median_score: median(&scores),
            std_dev: round2(sample_std_dev(&scores, mean)),
        };

        let score_range = ScoreBands {
            excellent: scores.iter().filter(|s| **s >= 85.0).count(),
            good: scores.iter().filter(|s| **s >= 70.0 && **s < 85.0).count(),
            fair: scores.iter().filter(|s| **s >= 55.0 && **s < 70.0).count(),
            poor: scores.iter().filter(|s| **s >= 40.0 && **s < 55.0).count(),
            failing: scores.iter().filter(|s| **s < 40.0).count(),
        };

        SummaryResponse {
            success: true,
            total_products: records.len(),
            average_score: round2(mean),
            ratings,
            top_issues,
            distribution: Some(distribution),
            score_range: Some(score_range),
        }
    }
}

fn median(scores: &[f64]) -> f64 {
    let mut sorted = scores.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

// Sample standard deviation; 0 for fewer than two scores
fn sample_std_dev(scores: &[f64], mean: f64) -> f64 {
    if scores.len() < 2 {
        return 0.0;
    }
    let variance = scores
        .iter()
        .map(|s| (s - mean).powi(2))
        .sum::<f64>()
        / (scores.len() - 1) as f64;
    variance.sqrt()
}
