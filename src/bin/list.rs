use tierjobs::{init_logger, Bot, JobType};

fn main() {
    init_logger(log::LevelFilter::Info);

    // Optional role-tag filters, e.g. `list swe mle`.
    let mut filters = Vec::new();
    for arg in std::env::args().skip(1) {
        match JobType::from_tag(&arg) {
            Some(job_type) => filters.push(job_type),
            None => log::warn!("Unknown role tag: {}", arg),
        }
    }

    let mut bot = Bot::new();
    bot.load_jobs();
    bot.list_jobs(&filters);
}
