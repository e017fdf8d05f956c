use thiserror::Error;

/// 单条动态的解析错误，只影响这一条
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("动态外层结构无效: {0}")]
    InvalidEnvelope(serde_json::Error),

    #[error("动态缺少 card 详情")]
    MissingDetail,

    #[error("card 详情解码失败: {0}")]
    InvalidDetail(serde_json::Error),

    #[error("找不到视频 BV 号")]
    MissingBvid,
}
