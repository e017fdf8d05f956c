use serde_derive::Deserialize;

/// x/web-interface/card 的 data 字段
#[derive(Debug, Deserialize)]
pub struct UserCard {
    pub card: CardInfo,

    pub follower: Option<u64>,

    #[serde(default)]
    pub archive_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct CardInfo {
    pub name: String,

    pub face: String,

    #[serde(default)]
    pub fans: u64,

    /// 关注数
    #[serde(default)]
    pub attention: u64,

    #[serde(default)]
    pub sign: String,
}

/// x/space/acc/info 的 data 字段
#[derive(Debug, Deserialize)]
pub struct SpaceInfo {
    pub name: String,

    pub face: String,

    #[serde(default)]
    pub sign: String,

    pub live_room: Option<SpaceLiveRoom>,
}

/// 空间信息里附带的直播间信息，更新不及时
#[derive(Debug, Deserialize)]
pub struct SpaceLiveRoom {
    #[serde(rename = "liveStatus", default)]
    pub live_status: i64,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub cover: String,

    #[serde(default)]
    pub roomid: u64,
}
