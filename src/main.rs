use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use bili_widget::cli::Cli;
use bili_widget::common::config::AppConfig;
use bili_widget::common::logger::PrettyLogger;
use bili_widget::server::{self, AppState};
use bili_widget::{Aggregator, BiliClient};

/// 打印启动配置，Cookie 只显示名称
fn print_banner(cli: &Cli, config: &AppConfig) {
    PrettyLogger::title("bili widget");
    PrettyLogger::field("监听地址", cli.listen_addr());
    PrettyLogger::field("目标 UID", config.uid.to_string());
    PrettyLogger::field("聚合模式", config.variant.to_string());
    PrettyLogger::field(
        "CDN 缓存",
        config.cache_control().unwrap_or_else(|| "关闭".to_string()),
    );
    match &config.credential {
        Some(credential) => {
            PrettyLogger::success(format!("已配置 Cookie: {}", credential.cookie_names().join(", ")))
        }
        None => PrettyLogger::warning("未配置 BI_COOKIE，所有请求都会返回错误"),
    }
    PrettyLogger::separator();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("无法监听退出信号: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，正在关闭");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 初始化日志
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    let config = cli.app_config()?;
    print_banner(&cli, &config);
    if config.credential.is_none() {
        warn!("BI_COOKIE 未配置");
    }

    let client = BiliClient::new(config.endpoints.clone()).context("创建 HTTP 客户端失败")?;
    let state = AppState::new(Aggregator::new(client, &config), &config);
    let app = server::router(state);

    let addr = cli.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("无法监听 {}", addr))?;
    info!("服务已启动: http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
