use clap::Parser;

use crate::common::config::{AppConfig, ConfigError, Credential, DEFAULT_TARGET_UID, Endpoints, Variant};

/// B站个人挂件数据服务
#[derive(Parser, Debug)]
#[command(name = "biliwidget")]
#[command(version = "0.1")]
#[command(author = "rpeng252@gmail.com")]
#[command(about = "聚合B站动态、用户卡片和直播状态，供个人网站挂件调用", long_about = None)]
pub struct Cli {
    /// 监听地址
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// 监听端口
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// 目标 UP 主的 UID
    #[arg(long, env = "BI_TARGET_UID", default_value_t = DEFAULT_TARGET_UID)]
    pub uid: u64,

    /// 聚合模式
    #[arg(long, env = "BI_VARIANT", value_enum, default_value_t = Variant::Videos)]
    pub variant: Variant,

    /// 转发给B站的 Cookie
    #[arg(long, value_name = "COOKIE", env = "BI_COOKIE", hide_env_values = true)]
    pub cookie: Option<String>,

    /// CDN 缓存秒数，0 表示不缓存
    #[arg(long, env = "BI_CACHE_SECONDS", default_value_t = 0)]
    pub cache_seconds: u32,

    /// 输出调试日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn app_config(&self) -> Result<AppConfig, ConfigError> {
        let credential = match &self.cookie {
            Some(raw) => Credential::parse(raw)?,
            None => None,
        };

        Ok(AppConfig {
            uid: self.uid,
            variant: self.variant,
            credential,
            cache_seconds: self.cache_seconds,
            endpoints: Endpoints::default(),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
