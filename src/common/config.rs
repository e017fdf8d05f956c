use std::fmt;

use clap::ValueEnum;
use cookie::Cookie;
use reqwest::header::HeaderValue;
use thiserror::Error;
use tracing::warn;

/// 挂件默认展示的 UP 主
pub const DEFAULT_TARGET_UID: u64 = 3546779356235807;

pub const API_BASE: &str = "https://api.bilibili.com";
pub const VC_BASE: &str = "https://api.vc.bilibili.com";
pub const LIVE_BASE: &str = "https://api.live.bilibili.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("BI_COOKIE 格式无效: {0}")]
    InvalidCredential(String),
}

/// 转发给B站的登录 Cookie
///
/// 只在构造时校验一次，之后可以直接作为请求头使用。`Debug` 输出不包含 Cookie 的值。
#[derive(Clone)]
pub struct Credential {
    raw: String,
    header: HeaderValue,
}

impl Credential {
    /// 解析配置里的 Cookie 字符串，空白字符串视为未配置
    ///
    /// 值本身原样转发，只要求能放进请求头。
    pub fn parse(raw: &str) -> Result<Option<Self>, ConfigError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        let mut header = HeaderValue::from_str(raw)
            .map_err(|_| ConfigError::InvalidCredential("包含非法的请求头字符".to_string()))?;
        header.set_sensitive(true);

        let credential = Self {
            raw: raw.to_string(),
            header,
        };
        if credential.cookie_names().is_empty() {
            warn!("BI_COOKIE 里没有 name=value 键值对，仍然原样转发");
        }

        Ok(Some(credential))
    }

    pub fn header_value(&self) -> HeaderValue {
        self.header.clone()
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Cookie 名称列表，用于日志
    pub fn cookie_names(&self) -> Vec<String> {
        Cookie::split_parse(self.raw.as_str())
            .filter_map(|c| c.ok())
            .map(|c| c.name().to_string())
            .collect()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("cookies", &self.cookie_names())
            .finish()
    }
}

/// 聚合哪些上游接口
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Variant {
    /// 只拉取投稿动态
    #[default]
    Videos,
    /// 动态 + 用户卡片（粉丝数、关注数）
    Profile,
    /// 动态 + 空间信息 + 直播间状态
    Live,
}

impl Variant {
    pub fn wants_card(self) -> bool {
        self == Variant::Profile
    }

    pub fn wants_space(self) -> bool {
        self == Variant::Live
    }

    pub fn wants_room(self) -> bool {
        self == Variant::Live
    }

    /// 单次请求发出的上游调用数
    pub fn fan_out(self) -> usize {
        1 + [self.wants_card(), self.wants_space(), self.wants_room()]
            .iter()
            .filter(|wanted| **wanted)
            .count()
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Videos => "videos",
            Variant::Profile => "profile",
            Variant::Live => "live",
        };
        f.write_str(name)
    }
}

/// 上游接口的域名，测试时指向本地 mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api: String,
    pub vc: String,
    pub live: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api: API_BASE.to_string(),
            vc: VC_BASE.to_string(),
            live: LIVE_BASE.to_string(),
        }
    }
}

impl Endpoints {
    /// 所有接口共用同一个域名
    pub fn uniform(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_string();
        Self {
            api: base.clone(),
            vc: base.clone(),
            live: base,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub uid: u64,
    pub variant: Variant,
    pub credential: Option<Credential>,
    /// 为 0 时不下发 Cache-Control
    pub cache_seconds: u32,
    pub endpoints: Endpoints,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            uid: DEFAULT_TARGET_UID,
            variant: Variant::default(),
            credential: None,
            cache_seconds: 0,
            endpoints: Endpoints::default(),
        }
    }
}

impl AppConfig {
    pub fn cache_control(&self) -> Option<String> {
        (self.cache_seconds > 0)
            .then(|| format!("s-maxage={}, stale-while-revalidate", self.cache_seconds))
    }
}
