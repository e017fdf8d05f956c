use serde_derive::Deserialize;

/// room/v1/Room/getRoomInfoOld 的 data 字段
#[derive(Debug, Deserialize)]
pub struct RoomInfo {
    /// 0 = 没有直播间, 1 = 有
    #[serde(rename = "roomStatus", default)]
    pub room_status: i64,

    /// 0 = 未开播, 1 = 直播中
    #[serde(rename = "liveStatus", default)]
    pub live_status: i64,

    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub title: String,

    #[serde(default)]
    pub cover: String,

    #[serde(default)]
    pub roomid: u64,

    #[serde(default)]
    pub online: u64,
}
