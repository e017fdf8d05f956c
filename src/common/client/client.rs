use std::io::Read;
use std::time::Duration;

use flate2::read::GzDecoder;
use reqwest::{
    Client, ClientBuilder, Response, Url,
    header::{ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, COOKIE, HeaderMap, HeaderValue, REFERER, USER_AGENT},
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::common::client::error::ApiError;
use crate::common::client::models::common::CommonResponse;
use crate::common::client::models::dynamic::SpaceHistory;
use crate::common::client::models::live::RoomInfo;
use crate::common::client::models::user_info::{SpaceInfo, UserCard};
use crate::common::config::{Credential, Endpoints};

const BROWSER_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

// 携带转发 Cookie 的B站客户端，内部的连接池在请求之间共享
#[derive(Debug, Clone)]
pub struct BiliClient {
    pub inner: Client,
    pub endpoints: Endpoints,
}

impl BiliClient {
    pub fn new(endpoints: Endpoints) -> Result<Self, ApiError> {
        let inner = ClientBuilder::new()
            .timeout(Duration::from_secs(10))
            .default_headers(Self::get_default_headers())
            .build()?;

        Ok(Self { inner, endpoints })
    }

    /// 使用外部构造好的 reqwest 客户端，需要自行带上默认请求头
    pub fn from_client(inner: Client, endpoints: Endpoints) -> Self {
        Self { inner, endpoints }
    }

    pub fn get_default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("zh-CN,zh;q=0.9"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("gzip"));
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));

        headers
    }

    // 伪造空间页的 Referer，否则动态接口会拒绝请求
    fn space_referer(uid: u64, dynamic: bool) -> String {
        if dynamic {
            format!("https://space.bilibili.com/{}/dynamic", uid)
        } else {
            format!("https://space.bilibili.com/{}", uid)
        }
    }

    // 通用请求，data 缺失视为错误
    pub async fn get<T: DeserializeOwned>(
        &self,
        url: Url,
        referer: &str,
        credential: &Credential,
    ) -> Result<T, ApiError> {
        self.fetch_data(url, referer, credential)
            .await?
            .ok_or_else(Self::missing_data)
    }

    // data 为空时返回默认值，动态列表为空时接口就是这样返回的
    pub async fn get_or_default<T: DeserializeOwned + Default>(
        &self,
        url: Url,
        referer: &str,
        credential: &Credential,
    ) -> Result<T, ApiError> {
        Ok(self
            .fetch_data(url, referer, credential)
            .await?
            .unwrap_or_default())
    }

    async fn fetch_data<T: DeserializeOwned>(
        &self,
        url: Url,
        referer: &str,
        credential: &Credential,
    ) -> Result<Option<T>, ApiError> {
        debug!("请求上游接口: {}", url);

        let resp = self
            .inner
            .get(url)
            .header(REFERER, referer)
            .header(COOKIE, credential.header_value())
            .send()
            .await
            .map_err(|e| {
                error!("请求失败: {}", e);
                e
            })?;

        Self::handle_response::<T>(resp).await
    }

    /// 用户动态列表
    pub async fn space_history(
        &self,
        uid: u64,
        credential: &Credential,
    ) -> Result<SpaceHistory, ApiError> {
        let uid_str = uid.to_string();
        let url = Url::parse_with_params(
            &format!("{}/dynamic_svr/v1/dynamic_svr/space_history", self.endpoints.vc),
            &[
                ("host_uid", uid_str.as_str()),
                ("offset_dynamic_id", "0"),
                ("need_top", "1"),
                ("platform", "web"),
            ],
        )?;

        self.get_or_default(url, &Self::space_referer(uid, true), credential)
            .await
    }

    /// 用户卡片，带粉丝数和关注数
    pub async fn user_card(&self, uid: u64, credential: &Credential) -> Result<UserCard, ApiError> {
        let uid_str = uid.to_string();
        let url = Url::parse_with_params(
            &format!("{}/x/web-interface/card", self.endpoints.api),
            &[("mid", uid_str.as_str()), ("photo", "false")],
        )?;

        self.get(url, &Self::space_referer(uid, false), credential).await
    }

    /// 旧版空间信息接口，不需要 WBI 签名，但容易被风控
    pub async fn space_info(&self, uid: u64, credential: &Credential) -> Result<SpaceInfo, ApiError> {
        let uid_str = uid.to_string();
        let url = Url::parse_with_params(
            &format!("{}/x/space/acc/info", self.endpoints.api),
            &[("mid", uid_str.as_str())],
        )?;

        self.get(url, &Self::space_referer(uid, false), credential).await
    }

    /// 直播间状态
    pub async fn room_info(&self, uid: u64, credential: &Credential) -> Result<RoomInfo, ApiError> {
        let uid_str = uid.to_string();
        let url = Url::parse_with_params(
            &format!("{}/room/v1/Room/getRoomInfoOld", self.endpoints.live),
            &[("mid", uid_str.as_str())],
        )?;

        self.get(url, &Self::space_referer(uid, false), credential).await
    }

    fn try_decompress(raw: &[u8]) -> Result<Vec<u8>, std::io::Error> {
        let mut decoder = GzDecoder::new(raw);
        let mut decoded = Vec::new();
        decoder.read_to_end(&mut decoded)?;
        Ok(decoded)
    }

    async fn handle_response<T: DeserializeOwned>(resp: Response) -> Result<Option<T>, ApiError> {
        let status = resp.status();
        if !status.is_success() {
            error!("上游返回异常状态码: {} ({})", status, resp.url());
            return Err(ApiError::from_status(status));
        }

        let raw_body = resp.bytes().await?;
        let decompressed = match Self::try_decompress(&raw_body) {
            Ok(data) => data,
            Err(_) => raw_body.to_vec(), // 解压失败则原样使用
        };

        Self::decode_data(&decompressed)
    }

    fn missing_data() -> ApiError {
        ApiError::InvalidResponse("缺少 data 字段".to_string())
    }

    pub fn decode_body<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
        Self::decode_data(body)?.ok_or_else(Self::missing_data)
    }

    pub fn decode_body_or_default<T: DeserializeOwned + Default>(body: &[u8]) -> Result<T, ApiError> {
        Ok(Self::decode_data(body)?.unwrap_or_default())
    }

    // 检查业务错误码，再取出 data（null 和缺失都是 None）
    fn decode_data<T: DeserializeOwned>(body: &[u8]) -> Result<Option<T>, ApiError> {
        let text = String::from_utf8_lossy(body);
        let json_value: Value = serde_json::from_str(&text).map_err(|_| {
            if text.contains("<!DOCTYPE html>") || text.contains("<html") {
                ApiError::InvalidResponse("返回了 HTML 页面".to_string())
            } else {
                ApiError::InvalidResponse(text.chars().take(200).collect())
            }
        })?;

        if let Some(code) = json_value.get("code").and_then(|v| v.as_i64()) {
            if code != 0 {
                let message = json_value
                    .get("message")
                    .or_else(|| json_value.get("msg"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("Unknown error")
                    .to_string();
                return Err(ApiError::Api(code, message));
            }
        }

        let resp: CommonResponse<T> = serde_json::from_value(json_value).map_err(|e| {
            error!("JSON 结构匹配失败: {}", e);
            error!("期望的结构 可能是: {}", std::any::type_name::<T>());
            ApiError::InvalidResponse(format!("结构匹配失败: {}", e))
        })?;

        Ok(resp.data)
    }
}
