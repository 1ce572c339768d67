use serde::{Deserialize, Serialize};

/// A company in the curated registry.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct Company {
    pub name: String,
    /// Stable identifier; keys the job-board lookup tables and job IDs.
    pub slug: String,
    pub domain: String,
    #[serde(default)]
    pub careers_url: Option<String>,
    /// Tier label (e.g. "S+", "A").
    pub tier: String,
    /// Ranking weight of the tier.
    pub tier_score: i32,
}
