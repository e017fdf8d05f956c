use axum::{
    Json,
    extract::State,
    http::{StatusCode, header::CACHE_CONTROL},
    response::{IntoResponse, Response},
};
use tracing::{Instrument, error, info_span};
use uuid::Uuid;

use crate::aggregator::{UpstreamApi, WidgetError};
use crate::parser::models::ErrorBody;
use crate::server::AppState;

impl IntoResponse for WidgetError {
    fn into_response(self) -> Response {
        error!("API Error: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new(self.to_string())),
        )
            .into_response()
    }
}

/// 挂件数据
pub async fn widget<A: UpstreamApi + 'static>(State(state): State<AppState<A>>) -> Response {
    let request_id = Uuid::new_v4();

    async move {
        match state.aggregator.aggregate().await {
            Ok(body) => {
                let mut resp = (StatusCode::OK, Json(body)).into_response();
                if let Some(value) = &state.cache_control {
                    resp.headers_mut().insert(CACHE_CONTROL, value.clone());
                }
                resp
            }
            Err(e) => e.into_response(),
        }
    }
    .instrument(info_span!("widget", %request_id))
    .await
}

/// 没被 CORS 层拦下的 OPTIONS 请求
pub async fn preflight() -> StatusCode {
    StatusCode::OK
}
