pub mod aggregator;
pub mod cli;
pub mod common;
pub mod parser;
pub mod server;

pub use aggregator::{Aggregator, UpstreamApi, WidgetError};
pub use common::client::client::BiliClient;
pub use common::config::{AppConfig, Credential, Endpoints, Variant};
