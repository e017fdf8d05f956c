use std::fmt;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::common::client::client::BiliClient;
use crate::common::client::error::ApiError;
use crate::common::client::models::dynamic::SpaceHistory;
use crate::common::client::models::live::RoomInfo;
use crate::common::client::models::user_info::{SpaceInfo, UserCard};
use crate::common::config::{AppConfig, Credential, Variant};
use crate::parser::models::{UserSummary, WidgetResponse};
use crate::parser::parse_videos;
use crate::parser::user_parser::{
    live_from_room, live_from_space, merge_live, profile_from_card, profile_from_space,
};

/// 挂件用到的上游接口
#[async_trait]
pub trait UpstreamApi: Send + Sync {
    async fn space_history(&self, uid: u64, credential: &Credential) -> Result<SpaceHistory, ApiError>;

    async fn user_card(&self, uid: u64, credential: &Credential) -> Result<UserCard, ApiError>;

    async fn space_info(&self, uid: u64, credential: &Credential) -> Result<SpaceInfo, ApiError>;

    async fn room_info(&self, uid: u64, credential: &Credential) -> Result<RoomInfo, ApiError>;
}

#[async_trait]
impl UpstreamApi for BiliClient {
    async fn space_history(&self, uid: u64, credential: &Credential) -> Result<SpaceHistory, ApiError> {
        BiliClient::space_history(self, uid, credential).await
    }

    async fn user_card(&self, uid: u64, credential: &Credential) -> Result<UserCard, ApiError> {
        BiliClient::user_card(self, uid, credential).await
    }

    async fn space_info(&self, uid: u64, credential: &Credential) -> Result<SpaceInfo, ApiError> {
        BiliClient::space_info(self, uid, credential).await
    }

    async fn room_info(&self, uid: u64, credential: &Credential) -> Result<RoomInfo, ApiError> {
        BiliClient::room_info(self, uid, credential).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Feed,
    Card,
    Space,
    Room,
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Upstream::Feed => "动态列表",
            Upstream::Card => "用户卡片",
            Upstream::Space => "空间信息",
            Upstream::Room => "直播间",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("环境变量 BI_COOKIE 未配置")]
    MissingCredential,

    #[error("获取{upstream}失败: {source}")]
    Upstream {
        upstream: Upstream,
        #[source]
        source: ApiError,
    },
}

impl WidgetError {
    fn upstream(upstream: Upstream) -> impl FnOnce(ApiError) -> Self {
        move |source| WidgetError::Upstream { upstream, source }
    }
}

/// 一次请求内并发拉取上游数据并拼装成挂件格式
pub struct Aggregator<A> {
    api: A,
    uid: u64,
    variant: Variant,
    credential: Option<Credential>,
}

impl<A: UpstreamApi> Aggregator<A> {
    pub fn new(api: A, config: &AppConfig) -> Self {
        Self {
            api,
            uid: config.uid,
            variant: config.variant,
            credential: config.credential.clone(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub async fn aggregate(&self) -> Result<WidgetResponse, WidgetError> {
        // 没有 Cookie 时不发任何请求
        let credential = self
            .credential
            .as_ref()
            .ok_or(WidgetError::MissingCredential)?;
        let uid = self.uid;
        let variant = self.variant;
        debug!("聚合模式 {}，上游请求 {} 个", variant, variant.fan_out());

        let feed = self.api.space_history(uid, credential);
        let card = async {
            if variant.wants_card() {
                self.api.user_card(uid, credential).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let space = async {
            if variant.wants_space() {
                self.api.space_info(uid, credential).await.map(Some)
            } else {
                Ok(None)
            }
        };
        let room = async {
            if variant.wants_room() {
                self.api.room_info(uid, credential).await.map(Some)
            } else {
                Ok(None)
            }
        };

        // 等所有请求都结束再处理结果，任何一个失败整体失败
        let (feed, card, space, room) = futures::join!(feed, card, space, room);
        let feed = feed.map_err(WidgetError::upstream(Upstream::Feed))?;
        let card = card.map_err(WidgetError::upstream(Upstream::Card))?;
        let space = space.map_err(WidgetError::upstream(Upstream::Space))?;
        let room = room.map_err(WidgetError::upstream(Upstream::Room))?;

        let videos = parse_videos(&feed);
        let user = compose_user(card, space, room);
        info!("聚合完成: 视频 {} 条", videos.len());

        Ok(WidgetResponse::new(uid, user, videos))
    }
}

fn compose_user(
    card: Option<UserCard>,
    space: Option<SpaceInfo>,
    room: Option<RoomInfo>,
) -> Option<UserSummary> {
    let mut user = card
        .as_ref()
        .map(profile_from_card)
        .or_else(|| space.as_ref().map(profile_from_space))?;

    let space_live = space
        .as_ref()
        .and_then(|info| info.live_room.as_ref())
        .map(live_from_space);
    user.live = merge_live(room.as_ref().map(live_from_room), space_live);

    Some(user)
}
