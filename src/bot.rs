use std::{collections::HashMap, path::Path};

use chrono::Utc;
use colored::{Color, Colorize as _};
use reqwest::blocking::Client;
use tiny_bail::prelude::*;

use crate::{
    company::Company,
    job::{matches_role_filter, Job, JobType},
    job_board::board_for,
    store::RemoteStore,
};

#[derive(Default)]
pub struct Bot {
    client: Client,
    pub companies: Vec<Company>,
    pub jobs: HashMap<String, Job>,
    /// Fetch per-job detail pages where the board supports it.
    pub full: bool,
}

impl Bot {
    const JOBS_FILE_PATH: &str = "data/jobs.ron";
    const JOBS_BACKUP_FILE_PATH: &str = "data/jobs.ron.backup";
    const COMPANIES_FILE_PATH: &str = "data/companies.ron";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&mut self) {
        self.load_companies();
        self.load_jobs();
    }

    pub fn load_companies(&mut self) {
        let companies_str = r!(std::fs::read_to_string(Self::COMPANIES_FILE_PATH));
        self.companies = r!(ron::from_str(&companies_str));
    }

    pub fn load_jobs(&mut self) {
        let jobs_str = r!(std::fs::read_to_string(Self::JOBS_FILE_PATH));
        self.jobs = r!(ron::from_str(&jobs_str));
    }

    pub fn save_jobs(&self) {
        if Path::new(Self::JOBS_FILE_PATH).exists() {
            r!(std::fs::copy(
                Self::JOBS_FILE_PATH,
                Self::JOBS_BACKUP_FILE_PATH,
            ));
        }
        let jobs_str = r!(ron::to_string(&self.jobs));
        r!(std::fs::write(Self::JOBS_FILE_PATH, jobs_str));
    }

    // Re-derive classification and location fields from the stored raw
    // fields. Useful for when the rules change.
    pub fn fix_jobs(&mut self) {
        for job in self.jobs.values_mut() {
            job.reparse();
        }
    }

    /// Fetches listings for every company, or only the given slugs.
    /// A failing company is logged and skipped; the rest still update.
    pub fn update_jobs(&mut self, slugs: &[String]) {
        let companies: Vec<Company> = self
            .companies
            .iter()
            .filter(|company| slugs.is_empty() || slugs.contains(&company.slug))
            .cloned()
            .collect();

        let mut jobs = HashMap::with_capacity(2 * self.jobs.len());
        for company in &companies {
            let board = board_for(company, self.full);
            log::debug!("[{}] Fetching {}", company.name, board.endpoint());
            let listings = c!(board.fetch(&self.client));
            log::info!("[{}] Found {} listings", company.name, listings.len());

            for raw in listings {
                let job = Job::new(company, raw);
                jobs.insert(job.id.clone(), job);
            }
        }

        // Replace only the entries of the companies that were fetched.
        self.jobs
            .retain(|_, job| !companies.iter().any(|company| company.slug == job.company_slug));
        self.jobs.extend(jobs);
    }

    pub fn list_jobs(&self, filters: &[JobType]) {
        let jobs = sorted(
            self.jobs
                .values()
                .filter(|job| matches_role_filter(job.job_type, filters)),
        );

        for job in &jobs {
            // Ugly code makes pretty columns.
            println!(
                "{} {} {} {} {} {}",
                format!("{:>3}", job.tier).bold().cyan(),
                format!("{:12}", job.company.chars().take(12).collect::<String>()),
                format!("{:<9}", job.job_type.tag()).green(),
                format!("{:<8}", job.level.tag()),
                format!(
                    "{:56}",
                    job.to_string().chars().take(56).collect::<String>(),
                )
                .color(if job.score() > 100 {
                    Color::Green
                } else {
                    Color::White
                }),
                format!("({})", job.location_normalized.as_deref().unwrap_or("N/A"))
                    .italic()
                    .black(),
            );
        }
        println!("{} jobs", jobs.len());
    }

    pub fn list_companies(&self) {
        let mut companies: Vec<&Company> = self.companies.iter().collect();
        companies.sort_by_key(|company| (std::cmp::Reverse(company.tier_score), &company.name));

        for company in &companies {
            println!(
                "{} {} {}",
                format!("{:>3}", company.tier).bold().cyan(),
                format!("{:14}", company.name.chars().take(14).collect::<String>()),
                format!("({})", company.slug).italic().black(),
            );
        }
        println!("{} companies", companies.len());
    }

    /// Pushes all jobs to the remote store in batches, then refreshes the
    /// per-company job counts.
    pub fn push_jobs(&self) {
        let store = RemoteStore::new();
        if !store.health_check() {
            log::error!("Remote store unreachable");
            return;
        }

        let jobs: Vec<&Job> = self.jobs.values().collect();
        let summary = r!(store.bulk_upsert_jobs(&jobs));
        log::info!(
            "Pushed {} jobs: {} created, {} updated",
            jobs.len(),
            summary.created,
            summary.updated,
        );

        let now = Utc::now();
        for company in &self.companies {
            let job_count = jobs
                .iter()
                .filter(|job| job.company_slug == company.slug)
                .count();
            cq!(job_count > 0);
            c!(store.update_company_job_count(company, job_count, now));
        }
        log::info!("Updated company job counts");
    }
}

fn sorted<'a>(jobs: impl IntoIterator<Item = &'a Job>) -> Vec<&'a Job> {
    let mut jobs: Vec<_> = jobs.into_iter().collect();
    jobs.sort_by_key(|job| {
        (
            std::cmp::Reverse(job.score()),
            &job.company,
            &job.title,
        )
    });
    jobs
}
