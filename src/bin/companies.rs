use tierjobs::{init_logger, Bot};

fn main() {
    init_logger(log::LevelFilter::Info);
    let mut bot = Bot::new();
    bot.load_companies();
    bot.list_companies();
}
