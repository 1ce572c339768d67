use tierjobs::{init_logger, Bot};

fn main() {
    init_logger(log::LevelFilter::Info);
    let mut bot = Bot::new();
    bot.load_jobs();
    bot.fix_jobs();
    bot.save_jobs();
}
