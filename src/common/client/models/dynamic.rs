use serde::Deserializer;
use serde_derive::Deserialize;
use serde_json::Value;

/// 投稿视频的动态类型
pub const DYNAMIC_TYPE_VIDEO: i64 = 8;

/// space_history 接口的 data 字段
///
/// 动态卡片的结构随类型变化很大，这里先保留原始 JSON，
/// 由解析器逐条解码，避免一条奇怪的卡片拖垮整个列表。
#[derive(Debug, Default, Deserialize)]
pub struct SpaceHistory {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub cards: Vec<Value>,

    #[serde(default)]
    pub has_more: i64,
}

// 没有动态时接口会返回 "cards": null
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let cards: Option<Vec<Value>> = serde::Deserialize::deserialize(deserializer)?;
    Ok(cards.unwrap_or_default())
}

/// 单条动态卡片的外层
#[derive(Debug, Deserialize)]
pub struct DynamicCard {
    pub desc: DynamicDesc,

    /// 内层详情，本身是一段 JSON 字符串
    pub card: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DynamicDesc {
    #[serde(rename = "type")]
    pub kind: i64,

    #[serde(default)]
    pub timestamp: i64,

    #[serde(default)]
    pub bvid: Option<String>,
}

/// 投稿视频动态的内层详情
#[derive(Debug, Deserialize)]
pub struct VideoCardDetail {
    pub title: Option<String>,

    pub desc: Option<String>,

    pub pic: Option<String>,

    #[serde(default)]
    pub bvid: Option<String>,

    pub duration: Option<u64>,

    pub stat: Option<VideoStat>,
}

#[derive(Debug, Deserialize)]
pub struct VideoStat {
    pub view: Option<u64>,
    pub reply: Option<u64>,
}
