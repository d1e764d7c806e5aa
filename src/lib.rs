pub mod config;
pub mod crawler;
pub mod epub;
pub mod logger;
pub mod utils;

pub use config::Settings;
pub use crawler::NovelCrawler;
pub use epub::{Chapter, Epub, Volume};
pub use utils::{UserInput, ask_continue, display_elapsed_time, get_user_input};
