use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

// Letter rating derived from a sustainability score
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub enum Rating {
    A,
    B,
    C,
    D,
    F,
}

impl Rating {
    pub const ALL: [Rating; 5] = [Rating::A, Rating::B, Rating::C, Rating::D, Rating::F];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::A => "A",
            Rating::B => "B",
            Rating::C => "C",
            Rating::D => "D",
            Rating::F => "F",
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Scoring weights; must sum to 1.0 (within tolerance)
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Weights {
    pub gwp: f64,
    pub circularity: f64,
    pub cost: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Weights {
            gwp: 0.40,
            circularity: 0.35,
            cost: 0.25,
        }
    }
}

// Request types
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ScoreRequest {
    pub product_name: String,
    pub materials: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_grams: Option<f64>,
    pub transport: String,
    pub packaging: String,
    pub gwp: f64,
    pub cost: f64,
    pub circularity: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weights: Option<Weights>,
}

// Response types
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ScoreResponse {
    pub product_name: String,
    pub sustainability_score: f64,
    pub rating: Rating,
    pub suggestions: Vec<String>,
    pub issues: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SubmissionRecord {
    pub id: Uuid,
    pub product_name: String,
    pub materials: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_grams: Option<f64>,
    pub transport: String,
    pub packaging: String,
    pub gwp: f64,
    pub cost: f64,
    pub circularity: f64,
    pub weights_used: Weights,
    pub score: f64,
    pub rating: Rating,
    pub suggestions: Vec<String>,
    pub issues: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct HistoryResponse {
    pub success: bool,
    pub count: usize,
    pub submissions: Vec<SubmissionRecord>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct IssueCount {
    pub issue: String,
    pub count: usize,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct Distribution {
    pub min_score: f64,
    pub max_score: f64,
    pub median_score: f64,
    pub std_dev: f64,
}

// Counts of submissions per score band
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Debug)]
pub struct ScoreBands {
    pub excellent: usize,
    pub good: usize,
    pub fair: usize,
    pub poor: usize,
    pub failing: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SummaryResponse {
    pub success: bool,
    pub total_products: usize,
    pub average_score: f64,
    pub ratings: BTreeMap<Rating, usize>,
    pub top_issues: Vec<IssueCount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Distribution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_range: Option<ScoreBands>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ClearResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
