use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    company::Company,
    job::{Job, JobLevel, JobType},
};

const DEFAULT_SITE_URL: &str = "http://localhost:8787";

/// Number of jobs per bulk upsert request.
const BATCH_SIZE: usize = 100;

/// HTTP client for the remote job store.
pub struct RemoteStore {
    site_url: String,
    client: Client,
}

impl RemoteStore {
    /// Connects to the store at `TIERJOBS_SITE_URL`, or the local default.
    pub fn new() -> Self {
        let site_url = std::env::var("TIERJOBS_SITE_URL")
            .unwrap_or_else(|_| DEFAULT_SITE_URL.to_string());
        Self::with_site_url(site_url)
    }

    pub fn with_site_url(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }

    /// Checks whether the store is reachable.
    pub fn health_check(&self) -> bool {
        self.client
            .get(format!("{}/health", self.site_url))
            .send()
            .map(|response| response.status().is_success())
            .unwrap_or(false)
    }

    /// Upserts jobs in batches, returning the combined created/updated counts.
    pub fn bulk_upsert_jobs(&self, jobs: &[&Job]) -> reqwest::Result<UpsertSummary> {
        let mut summary = UpsertSummary::default();

        for (i, batch) in jobs.chunks(BATCH_SIZE).enumerate() {
            let payload = BulkUpsert {
                jobs: batch.iter().copied().map(JobUpsert::from).collect(),
            };
            let response: UpsertSummary = self
                .client
                .post(format!("{}/jobs/bulk", self.site_url))
                .json(&payload)
                .send()?
                .error_for_status()?
                .json()?;

            summary.created += response.created;
            summary.updated += response.updated;
            log::debug!("Pushed batch {} ({} jobs)", i + 1, batch.len());
        }

        Ok(summary)
    }

    /// Updates a company's job count after a scrape.
    pub fn update_company_job_count(
        &self,
        company: &Company,
        job_count: usize,
        last_scraped: DateTime<Utc>,
    ) -> reqwest::Result<()> {
        let payload = JobCountUpdate {
            slug: &company.slug,
            job_count,
            last_scraped: last_scraped.timestamp_millis(),
        };
        self.client
            .post(format!("{}/companies/job-count", self.site_url))
            .json(&payload)
            .send()?
            .error_for_status()?;

        Ok(())
    }
}

impl Default for RemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Deserialize, Default, Debug)]
pub struct UpsertSummary {
    #[serde(default)]
    pub created: u64,
    #[serde(default)]
    pub updated: u64,
}

#[derive(Serialize)]
struct BulkUpsert<'a> {
    jobs: Vec<JobUpsert<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobCountUpdate<'a> {
    slug: &'a str,
    job_count: usize,
    last_scraped: i64,
}

/// The store's job document: camelCase keys, epoch-millisecond dates.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JobUpsert<'a> {
    job_id: &'a str,
    company: &'a str,
    company_slug: &'a str,
    tier: &'a str,
    tier_score: i32,
    title: &'a str,
    url: &'a Url,
    location: Option<&'a str>,
    remote: bool,
    level: JobLevel,
    job_type: JobType,
    team: Option<&'a str>,
    description: Option<&'a str>,
    salary_min: Option<i64>,
    salary_max: Option<i64>,
    posted_at: Option<i64>,
    scraped_at: i64,
    score: i32,
}

impl<'a> From<&'a Job> for JobUpsert<'a> {
    fn from(job: &'a Job) -> Self {
        Self {
            job_id: &job.id,
            company: &job.company,
            company_slug: &job.company_slug,
            tier: &job.tier,
            tier_score: job.tier_score,
            title: &job.title,
            url: &job.url,
            location: job.location.as_deref(),
            remote: job.remote,
            level: job.level,
            job_type: job.job_type,
            team: job.team.as_deref(),
            description: job.description.as_deref(),
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            posted_at: job.posted_at.map(|date| date.timestamp_millis()),
            scraped_at: job.scraped_at.timestamp_millis(),
            score: job.score(),
        }
    }
}
