use crate::common::client::models::live::RoomInfo;
use crate::common::client::models::user_info::{SpaceInfo, SpaceLiveRoom, UserCard};
use crate::parser::models::{LiveSummary, UserSummary};

pub fn profile_from_card(card: &UserCard) -> UserSummary {
    UserSummary {
        name: card.card.name.clone(),
        face: card.card.face.clone(),
        follower: Some(card.follower.unwrap_or(card.card.fans)),
        following: Some(card.card.attention),
        live: None,
    }
}

// 旧版空间接口不带粉丝数
pub fn profile_from_space(info: &SpaceInfo) -> UserSummary {
    UserSummary {
        name: info.name.clone(),
        face: info.face.clone(),
        follower: None,
        following: None,
        live: None,
    }
}

pub fn live_from_room(room: &RoomInfo) -> LiveSummary {
    LiveSummary {
        is_live: room.live_status == 1,
        title: room.title.clone(),
        url: room.url.clone(),
        cover: room.cover.clone(),
        room_id: (room.roomid != 0).then_some(room.roomid),
    }
}

pub fn live_from_space(room: &SpaceLiveRoom) -> LiveSummary {
    LiveSummary {
        is_live: room.live_status == 1,
        title: room.title.clone(),
        url: room.url.clone(),
        cover: room.cover.clone(),
        room_id: (room.roomid != 0).then_some(room.roomid),
    }
}

/// 合并两个来源的直播状态
///
/// `primary` 来自直播间接口，开播状态以它为准；它留空的字段才用 `fallback` 补上。
pub fn merge_live(
    primary: Option<LiveSummary>,
    fallback: Option<LiveSummary>,
) -> Option<LiveSummary> {
    match (primary, fallback) {
        (Some(primary), Some(fallback)) => Some(LiveSummary {
            is_live: primary.is_live,
            title: or_fallback(primary.title, fallback.title),
            url: or_fallback(primary.url, fallback.url),
            cover: or_fallback(primary.cover, fallback.cover),
            room_id: primary.room_id.or(fallback.room_id),
        }),
        (Some(primary), None) => Some(primary),
        (None, fallback) => fallback,
    }
}

fn or_fallback(value: String, fallback: String) -> String {
    if value.is_empty() { fallback } else { value }
}
