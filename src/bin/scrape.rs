use tierjobs::{init_logger, Bot};

fn main() {
    init_logger(log::LevelFilter::Debug);

    // `scrape [--full] [--push] [slug ...]`
    let mut push = false;
    let mut full = false;
    let mut slugs = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--push" => push = true,
            "--full" => full = true,
            _ => slugs.push(arg),
        }
    }

    let mut bot = Bot::new();
    bot.full = full;
    bot.load();
    bot.update_jobs(&slugs);
    bot.save_jobs();
    if push {
        bot.push_jobs();
    }
}
