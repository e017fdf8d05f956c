pub mod handlers;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method},
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};

use crate::aggregator::{Aggregator, UpstreamApi};
use crate::common::config::AppConfig;

// 挂件页面可能带上的请求头
const ALLOWED_HEADERS: [&str; 9] = [
    "x-csrf-token",
    "x-requested-with",
    "accept",
    "accept-version",
    "content-length",
    "content-md5",
    "content-type",
    "date",
    "x-api-version",
];

pub struct AppState<A> {
    pub aggregator: Arc<Aggregator<A>>,
    pub cache_control: Option<HeaderValue>,
}

impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            aggregator: Arc::clone(&self.aggregator),
            cache_control: self.cache_control.clone(),
        }
    }
}

impl<A: UpstreamApi> AppState<A> {
    pub fn new(aggregator: Aggregator<A>, config: &AppConfig) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
            cache_control: config
                .cache_control()
                .and_then(|value| HeaderValue::from_str(&value).ok()),
        }
    }
}

pub fn cors_layer() -> CorsLayer {
    // 允许任意来源，所以不能同时开启 allow_credentials
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS.map(HeaderName::from_static))
}

pub fn router<A: UpstreamApi + 'static>(state: AppState<A>) -> Router {
    Router::new()
        .route("/", get(handlers::widget::<A>).options(handlers::preflight))
        .route("/api", get(handlers::widget::<A>).options(handlers::preflight))
        .layer(cors_layer())
        .with_state(state)
}
