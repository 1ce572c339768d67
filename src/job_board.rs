use chrono::{DateTime, TimeZone as _, Utc};
use html_escape::decode_html_entities;
use reqwest::blocking::Client;
use serde::Deserialize;
use tiny_bail::prelude::*;
use url::Url;

use crate::company::Company;

/// Map of company slugs to their Greenhouse board tokens.
const GREENHOUSE_BOARDS: &[(&str, &str)] = &[
    ("airbnb", "airbnb"),
    ("anduril", "andurilindustries"),
    ("anthropic", "anthropic"),
    ("asana", "asana"),
    ("block", "block"),
    ("cloudflare", "cloudflare"),
    ("coinbase", "coinbase"),
    ("databricks", "databricks"),
    ("datadog", "datadog"),
    ("discord", "discord"),
    ("doordash", "doordashusa"),
    ("dropbox", "dropbox"),
    ("duolingo", "duolingo"),
    ("epic_games", "epicgames"),
    ("etsy", "etsy"),
    ("figma", "figma"),
    ("instacart", "instacart"),
    ("mongodb", "mongodb"),
    ("pinterest", "pinterestpostings"),
    ("reddit", "reddit"),
    ("robinhood", "Robinhood"),
    ("roblox", "roblox"),
    ("snap", "snap"),
    ("spotify", "spotify"),
    ("stripe", "stripe"),
    ("twilio", "twilio"),
    ("uber", "uber"),
    ("waymo", "Waymo"),
    ("xai", "xai"),
];

/// Map of company slugs to their Lever site names.
const LEVER_SITES: &[(&str, &str)] = &[
    ("atlassian", "atlassian"),
    ("palantir", "palantir"),
    ("plaid", "plaid"),
];

/// Raw per-listing fields extracted from a provider payload.
///
/// This is everything a board adapter knows; classification and location
/// normalization happen later, in `Job::new`.
#[derive(Debug)]
pub struct RawListing {
    /// The provider's native job identifier.
    pub id: String,
    pub title: String,
    pub url: Url,
    pub location: Option<String>,
    pub team: Option<String>,
    pub departments: Vec<String>,
    pub description: Option<String>,
    pub posted_at: Option<DateTime<Utc>>,
}

/// A job board exposing the open listings of one company.
pub trait JobBoard {
    /// The listings endpoint, for logging.
    fn endpoint(&self) -> String;

    /// Fetches and extracts all open listings.
    fn fetch(&self, client: &Client) -> reqwest::Result<Vec<RawListing>>;
}

/// Resolves the job board for a company: Greenhouse first, then Lever.
/// Unlisted companies default to a Greenhouse board named after the slug.
pub fn board_for(company: &Company, full: bool) -> Box<dyn JobBoard> {
    let slug = company.slug.as_str();

    if let Some((_, board)) = GREENHOUSE_BOARDS.iter().find(|(s, _)| *s == slug) {
        return Box::new(GreenhouseBoard::new(*board, full));
    }
    if let Some((_, site)) = LEVER_SITES.iter().find(|(s, _)| *s == slug) {
        return Box::new(LeverBoard::new(*site));
    }

    Box::new(GreenhouseBoard::new(slug, full))
}

/// Board-style API: one JSON document with all open listings.
/// <https://boards-api.greenhouse.io/v1/boards/{board}/jobs>
pub struct GreenhouseBoard {
    board: String,
    /// Fetch the per-job detail page of each listing for its description.
    full: bool,
}

#[derive(Deserialize, Debug)]
struct GreenhouseResponse {
    #[serde(default)]
    jobs: Vec<serde_json::Value>,
}

#[derive(Deserialize, Debug)]
struct GreenhouseJob {
    id: u64,
    title: String,
    absolute_url: Url,
    #[serde(default)]
    location: Option<GreenhouseLocation>,
    #[serde(default)]
    departments: Option<Vec<GreenhouseDepartment>>,
    #[serde(default)]
    first_published: Option<String>,
    #[serde(default)]
    updated_at: Option<String>,
    /// HTML job description; present on detail pages only.
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GreenhouseLocation {
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GreenhouseDepartment {
    name: String,
}

impl GreenhouseBoard {
    pub fn new(board: impl Into<String>, full: bool) -> Self {
        Self {
            board: board.into(),
            full,
        }
    }

    fn fetch_full(&self, client: &Client, id: u64) -> reqwest::Result<RawListing> {
        let url = format!("{}/{}", self.endpoint(), id);
        let job: GreenhouseJob = client.get(&url).send()?.error_for_status()?.json()?;
        Ok(parse_greenhouse_job(job))
    }
}

impl JobBoard for GreenhouseBoard {
    fn endpoint(&self) -> String {
        format!(
            "https://boards-api.greenhouse.io/v1/boards/{}/jobs",
            self.board,
        )
    }

    fn fetch(&self, client: &Client) -> reqwest::Result<Vec<RawListing>> {
        let response: GreenhouseResponse = client
            .get(self.endpoint())
            .send()?
            .error_for_status()?
            .json()?;

        // Extract listings one by one; a malformed entry is skipped, not fatal.
        let mut listings = Vec::with_capacity(response.jobs.len());
        for value in response.jobs {
            let job: GreenhouseJob = c!(serde_json::from_value(value));
            let listing = if self.full {
                c!(self.fetch_full(client, job.id))
            } else {
                parse_greenhouse_job(job)
            };
            listings.push(listing);
        }

        Ok(listings)
    }
}

fn parse_greenhouse_job(job: GreenhouseJob) -> RawListing {
    let departments: Vec<String> = job
        .departments
        .unwrap_or_default()
        .into_iter()
        .map(|department| department.name)
        .collect();

    // Prefer the first-published date over the last update.
    let posted_at = job
        .first_published
        .or(job.updated_at)
        .and_then(|date| DateTime::parse_from_rfc3339(&date).ok())
        .map(|date| date.with_timezone(&Utc));

    RawListing {
        id: job.id.to_string(),
        title: job.title,
        url: job.absolute_url,
        location: job.location.and_then(|location| location.name),
        team: departments.first().cloned(),
        departments,
        description: job
            .content
            .map(|content| decode_html_entities(&content).into_owned()),
        posted_at,
    }
}

/// Postings-style API: one JSON array of listing objects.
/// <https://api.lever.co/v0/postings/{site}?mode=json>
pub struct LeverBoard {
    site: String,
}

#[derive(Deserialize, Debug)]
struct LeverPosting {
    id: String,
    /// The job title.
    text: String,
    #[serde(rename = "hostedUrl")]
    hosted_url: Url,
    #[serde(default)]
    categories: LeverCategories,
    #[serde(rename = "descriptionPlain", default)]
    description_plain: Option<String>,
    /// Unix timestamp in milliseconds.
    #[serde(rename = "createdAt", default)]
    created_at: Option<i64>,
}

#[derive(Deserialize, Default, Debug)]
struct LeverCategories {
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    team: Option<String>,
}

impl LeverBoard {
    pub fn new(site: impl Into<String>) -> Self {
        Self { site: site.into() }
    }
}

impl JobBoard for LeverBoard {
    fn endpoint(&self) -> String {
        format!("https://api.lever.co/v0/postings/{}?mode=json", self.site)
    }

    fn fetch(&self, client: &Client) -> reqwest::Result<Vec<RawListing>> {
        let postings: Vec<serde_json::Value> = client
            .get(self.endpoint())
            .send()?
            .error_for_status()?
            .json()?;

        let mut listings = Vec::with_capacity(postings.len());
        for value in postings {
            let posting: LeverPosting = c!(serde_json::from_value(value));
            listings.push(parse_lever_posting(posting));
        }

        Ok(listings)
    }
}

fn parse_lever_posting(posting: LeverPosting) -> RawListing {
    let posted_at = posting
        .created_at
        .and_then(|millis| Utc.timestamp_millis_opt(millis).single());

    RawListing {
        id: posting.id,
        title: posting.text,
        url: posting.hosted_url,
        location: posting.categories.location,
        team: posting.categories.team,
        departments: Vec::new(),
        description: posting
            .description_plain
            .map(|description| description.chars().take(500).collect()),
        posted_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(slug: &str) -> Company {
        Company {
            name: slug.to_string(),
            slug: slug.to_string(),
            domain: format!("{slug}.com"),
            careers_url: None,
            tier: "A".to_string(),
            tier_score: 70,
        }
    }

    #[test]
    fn board_lookup() {
        let board = board_for(&company("pinterest"), false);
        assert_eq!(
            board.endpoint(),
            "https://boards-api.greenhouse.io/v1/boards/pinterestpostings/jobs",
        );

        let board = board_for(&company("plaid"), false);
        assert_eq!(
            board.endpoint(),
            "https://api.lever.co/v0/postings/plaid?mode=json",
        );

        // Unlisted companies fall back to a Greenhouse board named after the slug.
        let board = board_for(&company("initech"), false);
        assert_eq!(
            board.endpoint(),
            "https://boards-api.greenhouse.io/v1/boards/initech/jobs",
        );
    }

    #[test]
    fn greenhouse_parsing() {
        let job: GreenhouseJob = serde_json::from_value(serde_json::json!({
            "id": 4000001,
            "title": "Senior Software Engineer, Payments",
            "absolute_url": "https://boards.greenhouse.io/initech/jobs/4000001",
            "location": { "name": "New York, NY" },
            "departments": [{ "name": "Engineering" }, { "name": "Payments" }],
            "first_published": "2025-05-02T16:40:00-04:00",
            "updated_at": "2025-06-01T09:00:00-04:00",
            "metadata": null
        }))
        .unwrap();

        let listing = parse_greenhouse_job(job);
        assert_eq!(listing.id, "4000001");
        assert_eq!(listing.title, "Senior Software Engineer, Payments");
        assert_eq!(listing.location.as_deref(), Some("New York, NY"));
        assert_eq!(listing.team.as_deref(), Some("Engineering"));
        assert_eq!(listing.departments, ["Engineering", "Payments"]);
        assert_eq!(
            listing.posted_at.unwrap().to_rfc3339(),
            "2025-05-02T20:40:00+00:00",
        );
    }

    #[test]
    fn greenhouse_decodes_content() {
        let job: GreenhouseJob = serde_json::from_value(serde_json::json!({
            "id": 7,
            "title": "Data Scientist",
            "absolute_url": "https://boards.greenhouse.io/initech/jobs/7",
            "content": "&lt;p&gt;Ship &amp; iterate&lt;/p&gt;"
        }))
        .unwrap();

        let listing = parse_greenhouse_job(job);
        assert_eq!(listing.description.as_deref(), Some("<p>Ship & iterate</p>"));
        assert_eq!(listing.location, None);
        assert_eq!(listing.team, None);
        assert_eq!(listing.posted_at, None);
    }

    #[test]
    fn lever_parsing() {
        let posting: LeverPosting = serde_json::from_value(serde_json::json!({
            "id": "a8c5-1b2d",
            "text": "Machine Learning Engineer",
            "hostedUrl": "https://jobs.lever.co/initech/a8c5-1b2d",
            "categories": { "location": "Remote - US", "team": "ML Platform" },
            "descriptionPlain": "x".repeat(600),
            "createdAt": 1717200000000i64
        }))
        .unwrap();

        let listing = parse_lever_posting(posting);
        assert_eq!(listing.id, "a8c5-1b2d");
        assert_eq!(listing.title, "Machine Learning Engineer");
        assert_eq!(listing.location.as_deref(), Some("Remote - US"));
        assert_eq!(listing.team.as_deref(), Some("ML Platform"));
        // Long plain-text descriptions are truncated to 500 characters.
        assert_eq!(listing.description.as_ref().unwrap().len(), 500);
        assert_eq!(
            listing.posted_at.unwrap().to_rfc3339(),
            "2024-06-01T00:00:00+00:00",
        );
    }

    #[test]
    fn lever_missing_categories() {
        let posting: LeverPosting = serde_json::from_value(serde_json::json!({
            "id": "ffff-0000",
            "text": "Recruiting Coordinator",
            "hostedUrl": "https://jobs.lever.co/initech/ffff-0000"
        }))
        .unwrap();

        let listing = parse_lever_posting(posting);
        assert_eq!(listing.location, None);
        assert_eq!(listing.team, None);
        assert_eq!(listing.posted_at, None);
    }
}
