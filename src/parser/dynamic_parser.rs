use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::common::client::models::dynamic::{
    DYNAMIC_TYPE_VIDEO, DynamicCard, SpaceHistory, VideoCardDetail,
};
use crate::parser::errors::ParseError;
use crate::parser::models::VideoItem;

const BEIJING_OFFSET_SECS: i32 = 8 * 3600;

/// 从动态列表里挑出投稿视频，保持原有顺序
///
/// 解析失败的动态只打印警告并跳过，不影响其它条目。
pub fn parse_videos(history: &SpaceHistory) -> Vec<VideoItem> {
    let videos: Vec<VideoItem> = history
        .cards
        .iter()
        .enumerate()
        .filter(|(_, raw)| dynamic_type(raw) == Some(DYNAMIC_TYPE_VIDEO))
        .filter_map(|(index, raw)| match parse_video_card(raw) {
            Ok(video) => Some(video),
            Err(e) => {
                warn!(index, "解析单条动态失败，跳过: {}", e);
                None
            }
        })
        .collect();

    debug!("动态 {} 条，其中投稿视频 {} 条", history.cards.len(), videos.len());
    videos
}

fn dynamic_type(raw: &Value) -> Option<i64> {
    raw.get("desc")?.get("type")?.as_i64()
}

/// 解码一条投稿视频动态：先解外层，再解 card 里嵌套的 JSON 字符串
pub fn parse_video_card(raw: &Value) -> Result<VideoItem, ParseError> {
    let outer = DynamicCard::deserialize(raw).map_err(ParseError::InvalidEnvelope)?;
    let card = outer.card.as_deref().ok_or(ParseError::MissingDetail)?;
    let detail: VideoCardDetail = serde_json::from_str(card).map_err(ParseError::InvalidDetail)?;

    let bvid = non_empty(outer.desc.bvid)
        .or_else(|| non_empty(detail.bvid))
        .ok_or(ParseError::MissingBvid)?;
    let stat = detail.stat.as_ref();

    Ok(VideoItem {
        url: format!("https://www.bilibili.com/video/{}", bvid),
        bvid,
        title: detail.title.unwrap_or_default(),
        desc: detail.desc.unwrap_or_default(),
        pic: detail.pic.unwrap_or_default(),
        created: outer.desc.timestamp,
        length: detail.duration,
        play: stat.and_then(|s| s.view),
        comment: stat.and_then(|s| s.reply),
        date: format_date(outer.desc.timestamp),
    })
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// 按北京时间格式化日期，不补零
pub fn format_date(timestamp: i64) -> String {
    FixedOffset::east_opt(BEIJING_OFFSET_SECS)
        .zip(DateTime::from_timestamp(timestamp, 0))
        .map(|(tz, dt)| dt.with_timezone(&tz).format("%Y/%-m/%-d").to_string())
        .unwrap_or_default()
}
