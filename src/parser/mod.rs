pub mod dynamic_parser;
pub mod errors;
pub mod models;
pub mod user_parser;

pub use dynamic_parser::parse_videos;
pub use models::{ErrorBody, LiveSummary, UserSummary, VideoItem, WidgetResponse};
