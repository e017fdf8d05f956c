pub mod client {
    pub mod models {
        pub mod common;
        pub mod dynamic;
        pub mod live;
        pub mod user_info;
    }
    pub mod client;
    pub mod error;
}

pub mod config;
pub mod logger;
