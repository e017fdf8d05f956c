use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("网络请求失败: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("上游服务器连接失败: HTTP {0}")]
    Status(u16),

    // 403 / 412 一般是 Cookie 失效或者触发了风控
    #[error("请求被B站拦截: HTTP {0}")]
    Blocked(u16),

    #[error("B站接口报错: {1} (code: {0})")]
    Api(i64, String),

    #[error("响应解析失败: {0}")]
    InvalidResponse(String),

    #[error("无效的接口地址: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ApiError {
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            code @ (403 | 412) => ApiError::Blocked(code),
            code => ApiError::Status(code),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::InvalidResponse(e.to_string())
    }
}
