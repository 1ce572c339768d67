use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    company::Company,
    job_board::RawListing,
    location::{extract_remote_info, normalize_location},
};

/// A normalized job listing.
#[derive(Serialize, Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct Job {
    /// Stable identifier: the company slug joined with the provider's native job ID.
    pub id: String,
    /// The name of the company offering the job.
    pub company: String,
    pub company_slug: String,
    /// The company's tier label (e.g. "S+", "A").
    pub tier: String,
    pub tier_score: i32,
    /// The job title as published.
    pub title: String,
    /// The URL to the job page.
    pub url: Url,
    /// The location string as published.
    #[serde(default)]
    pub location: Option<String>,
    /// Canonical short form of the location.
    #[serde(default)]
    pub location_normalized: Option<String>,
    /// True if the location indicates remote/hybrid work.
    #[serde(default)]
    pub remote: bool,
    /// The seniority level inferred from the title.
    pub level: JobLevel,
    /// The role type inferred from the title and team.
    pub job_type: JobType,
    /// The department/team name, when the source provides one.
    #[serde(default)]
    pub team: Option<String>,
    /// All department names from the source.
    #[serde(default)]
    pub departments: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub salary_min: Option<i64>,
    #[serde(default)]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub salary_currency: Option<String>,
    /// When the source first published the listing.
    #[serde(default)]
    pub posted_at: Option<DateTime<Utc>>,
    /// The time when this record was built.
    pub scraped_at: DateTime<Utc>,
}

impl Display for Job {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", &self.title)
    }
}

impl Job {
    /// Builds the canonical listing record from raw per-source fields.
    ///
    /// All derived fields (role type, level, normalized location, remote flag)
    /// are computed here, once, from the raw fields. Adapters hand over raw
    /// fields only; they never classify.
    pub fn new(company: &Company, raw: RawListing) -> Self {
        let (remote, _) = extract_remote_info(raw.location.as_deref());

        Self {
            id: format!("{}_{}", company.slug, raw.id),
            company: company.name.clone(),
            company_slug: company.slug.clone(),
            tier: company.tier.clone(),
            tier_score: company.tier_score,
            level: parse_level(&raw.title),
            job_type: parse_job_type(&raw.title, raw.team.as_deref()),
            location_normalized: normalize_location(raw.location.as_deref()),
            remote,
            title: raw.title,
            url: raw.url,
            location: raw.location,
            team: raw.team,
            departments: raw.departments,
            description: raw.description,
            salary_min: None,
            salary_max: None,
            salary_currency: None,
            posted_at: raw.posted_at,
            scraped_at: Utc::now(),
        }
    }

    /// Recomputes the derived fields from the stored raw fields.
    /// Useful for when the classification or normalization rules change.
    pub fn reparse(&mut self) {
        self.level = parse_level(&self.title);
        self.job_type = parse_job_type(&self.title, self.team.as_deref());
        self.location_normalized = normalize_location(self.location.as_deref());
        self.remote = extract_remote_info(self.location.as_deref()).0;
    }

    // TODO: Load the level/type weights from a config file.
    pub fn score(&self) -> i32 {
        let mut score = self.tier_score;

        score += match self.level {
            JobLevel::Intern => -30,
            JobLevel::NewGrad => 10,
            JobLevel::Junior => 5,
            JobLevel::Mid => 0,
            JobLevel::Senior => 5,
            JobLevel::Staff => 5,
            JobLevel::Principal => 0,
            JobLevel::Director => -10,
            JobLevel::Vp => -20,
            JobLevel::Exec => -30,
            JobLevel::Unknown => 0,
        };
        score += match self.job_type {
            JobType::SoftwareEngineer => 10,
            JobType::MlEngineer => 10,
            JobType::Research => 5,
            JobType::DataScientist => 5,
            JobType::Devops => 5,
            JobType::Security => 5,
            JobType::Quant => 0,
            JobType::ProductManager => 0,
            JobType::Designer => 0,
            JobType::Other => -10,
        };
        if self.remote {
            score += 5;
        }

        score
    }
}

/// The role type of a listing. Serialized values are the stable wire tags.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum JobType {
    #[serde(rename = "swe")]
    SoftwareEngineer,
    #[serde(rename = "mle")]
    MlEngineer,
    #[serde(rename = "ds")]
    DataScientist,
    #[serde(rename = "quant")]
    Quant,
    #[serde(rename = "pm")]
    ProductManager,
    #[serde(rename = "design")]
    Designer,
    #[serde(rename = "devops")]
    Devops,
    #[serde(rename = "security")]
    Security,
    #[serde(rename = "research")]
    Research,
    #[serde(rename = "other")]
    Other,
}

impl JobType {
    pub const ALL: [Self; 10] = [
        Self::SoftwareEngineer,
        Self::MlEngineer,
        Self::DataScientist,
        Self::Quant,
        Self::ProductManager,
        Self::Designer,
        Self::Devops,
        Self::Security,
        Self::Research,
        Self::Other,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::SoftwareEngineer => "swe",
            Self::MlEngineer => "mle",
            Self::DataScientist => "ds",
            Self::Quant => "quant",
            Self::ProductManager => "pm",
            Self::Designer => "design",
            Self::Devops => "devops",
            Self::Security => "security",
            Self::Research => "research",
            Self::Other => "other",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|job_type| job_type.tag() == tag)
    }
}

impl Display for JobType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// The seniority level of a listing. Serialized values are the stable wire tags.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum JobLevel {
    #[serde(rename = "intern")]
    Intern,
    #[serde(rename = "new_grad")]
    NewGrad,
    #[serde(rename = "junior")]
    Junior,
    #[serde(rename = "mid")]
    Mid,
    #[serde(rename = "senior")]
    Senior,
    #[serde(rename = "staff")]
    Staff,
    #[serde(rename = "principal")]
    Principal,
    #[serde(rename = "director")]
    Director,
    #[serde(rename = "vp")]
    Vp,
    #[serde(rename = "exec")]
    Exec,
    #[serde(rename = "unknown")]
    Unknown,
}

impl JobLevel {
    pub const ALL: [Self; 11] = [
        Self::Intern,
        Self::NewGrad,
        Self::Junior,
        Self::Mid,
        Self::Senior,
        Self::Staff,
        Self::Principal,
        Self::Director,
        Self::Vp,
        Self::Exec,
        Self::Unknown,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::Intern => "intern",
            Self::NewGrad => "new_grad",
            Self::Junior => "junior",
            Self::Mid => "mid",
            Self::Senior => "senior",
            Self::Staff => "staff",
            Self::Principal => "principal",
            Self::Director => "director",
            Self::Vp => "vp",
            Self::Exec => "exec",
            Self::Unknown => "unknown",
        }
    }
}

impl Display for JobLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// Ordered keyword groups for role classification. Categories overlap, so the
/// first group with any substring match wins (e.g. "research engineer" must
/// resolve to research, not swe).
const JOB_TYPE_RULES: &[(JobType, &[&str])] = &[
    (
        JobType::MlEngineer,
        &[
            "machine learning",
            "ml engineer",
            "ml ",
            "ai engineer",
            "deep learning",
            "nlp",
            "computer vision",
            "cv engineer",
            "llm",
            "language model",
            "generative ai",
        ],
    ),
    (
        JobType::Research,
        &[
            "research scientist",
            "research engineer",
            "researcher",
            "research fellow",
            "applied research",
        ],
    ),
    (
        JobType::DataScientist,
        &[
            "data scientist",
            "data science",
            "analytics engineer",
            "data analyst",
        ],
    ),
    (
        JobType::Quant,
        &["quant", "quantitative", "trading", "algorithmic"],
    ),
    (
        JobType::ProductManager,
        &[
            "product manager",
            "program manager",
            "technical program",
            "tpm",
            "product lead",
            "product owner",
        ],
    ),
    (
        JobType::Designer,
        &[
            "designer",
            "design",
            "ux",
            "ui",
            "user experience",
            "user interface",
            "visual design",
            "interaction design",
        ],
    ),
    (
        JobType::Devops,
        &[
            "devops",
            "sre",
            "site reliability",
            "infrastructure",
            "platform engineer",
            "cloud engineer",
            "systems engineer",
        ],
    ),
    (
        JobType::Security,
        &[
            "security",
            "infosec",
            "cybersecurity",
            "appsec",
            "penetration",
            "red team",
            "blue team",
        ],
    ),
    (
        JobType::SoftwareEngineer,
        &[
            "software engineer",
            "software developer",
            "backend",
            "frontend",
            "full stack",
            "fullstack",
            "web developer",
            "mobile engineer",
            "ios engineer",
            "android engineer",
            "engineer",
            "developer",
            "sde",
        ],
    ),
];

/// Ordered keyword groups for level classification, checked top-down.
const JOB_LEVEL_RULES: &[(JobLevel, &[&str])] = &[
    (JobLevel::Exec, &["cto", "ceo", "cfo", "coo", "chief"]),
    (JobLevel::Vp, &["vp", "vice president"]),
    (JobLevel::Director, &["director"]),
    (
        JobLevel::Principal,
        &["principal", "distinguished", "fellow"],
    ),
    (JobLevel::Staff, &["staff"]),
    // Trailing-space variants avoid matching "sr"/"jr" inside other words.
    (JobLevel::Senior, &["senior", "sr.", "sr "]),
    (JobLevel::Junior, &["junior", "jr.", "jr "]),
    (
        JobLevel::NewGrad,
        &["new grad", "entry level", "early career", "associate"],
    ),
    (JobLevel::Intern, &["intern"]),
];

/// Infers the role type from a title and an optional team hint.
///
/// Both are lower-cased and joined with a space to widen the match surface;
/// a missing team contributes an empty string, keeping the separator.
pub fn parse_job_type(title: &str, team: Option<&str>) -> JobType {
    let combined = format!(
        "{} {}",
        title.to_lowercase(),
        team.map(str::to_lowercase).unwrap_or_default(),
    );

    for (job_type, keywords) in JOB_TYPE_RULES {
        if keywords.iter().any(|keyword| combined.contains(keyword)) {
            return *job_type;
        }
    }

    JobType::Other
}

/// Infers the seniority level from a title. Unmatched titles are mid-level.
pub fn parse_level(title: &str) -> JobLevel {
    let title = title.to_lowercase();

    for (level, keywords) in JOB_LEVEL_RULES {
        if keywords.iter().any(|keyword| title.contains(keyword)) {
            return *level;
        }
    }

    JobLevel::Mid
}

/// Checks a role type against a filter set. An empty set matches everything.
pub fn matches_role_filter(job_type: JobType, filters: &[JobType]) -> bool {
    filters.is_empty() || filters.contains(&job_type)
}
