mod bot;
mod company;
mod job;
mod job_board;
mod location;
mod store;

pub use bot::Bot;
pub use company::Company;
pub use job::{matches_role_filter, parse_job_type, parse_level, Job, JobLevel, JobType};
pub use job_board::{board_for, GreenhouseBoard, JobBoard, LeverBoard, RawListing};
pub use location::{extract_remote_info, normalize_location};
pub use store::RemoteStore;

pub fn init_logger(default_level: log::LevelFilter) {
    pretty_env_logger::formatted_timed_builder()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}
