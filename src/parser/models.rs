use serde_derive::Serialize;

/// 挂件展示的一条投稿视频
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoItem {
    pub title: String,
    pub desc: String,
    pub pic: String,
    pub bvid: String,
    pub url: String,
    /// 发布时间戳（秒）
    pub created: i64,
    /// 时长（秒）
    pub length: Option<u64>,
    pub play: Option<u64>,
    pub comment: Option<u64>,
    /// 北京时间的发布日期，如 2024/1/5
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveSummary {
    pub is_live: bool,
    pub title: String,
    pub url: String,
    pub cover: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserSummary {
    pub name: String,
    pub face: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follower: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live: Option<LiveSummary>,
}

/// 成功时返回给挂件的数据
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetResponse {
    pub success: bool,
    pub uid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserSummary>,
    pub video_count: usize,
    pub videos: Vec<VideoItem>,
}

impl WidgetResponse {
    pub fn new(uid: u64, user: Option<UserSummary>, videos: Vec<VideoItem>) -> Self {
        Self {
            success: true,
            uid: uid.to_string(),
            user,
            video_count: videos.len(),
            videos,
        }
    }
}

/// 失败时的统一结构
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub error: String,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}
