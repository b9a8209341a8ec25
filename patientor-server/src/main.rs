//! Patientor 服务器主程序

mod settings;

use anyhow::Result;
use clap::Parser;
use patientor_web::{PatientStore, WebServer};
use std::sync::Arc;
use tracing::{error, info};

use crate::settings::Settings;

/// Patientor 服务器命令行参数
#[derive(Parser, Debug)]
#[command(name = "patientor-server")]
#[command(about = "Patientor 患者病历 REST API 服务器")]
struct Args {
    /// 监听主机
    #[arg(long)]
    host: Option<String>,

    /// 服务器端口
    #[arg(short, long)]
    port: Option<u16>,

    /// 允许跨域的前端地址
    #[arg(long)]
    cors_origin: Option<String>,

    /// 配置文件路径
    #[arg(short, long)]
    config: Option<String>,

    /// 日志级别
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if let Some(origin) = args.cors_origin {
        settings.server.cors_origin = origin;
    }
    if let Some(level) = args.log_level {
        settings.logging.level = level;
    }
    settings.validate()?;

    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(settings.logging.level.as_str())
        .init();

    info!("启动Patientor服务器...");

    let web_config = settings.web_config()?;
    info!("Patientor服务器配置:");
    info!("  监听地址: {}", web_config.addr);
    info!("  允许跨域来源: {}", web_config.cors_origin);

    let store = Arc::new(PatientStore::seeded()?);
    let server = WebServer::new(web_config, store)?;

    if let Err(e) = server.run().await {
        error!("服务器启动失败: {}", e);
        return Err(e.into());
    }

    Ok(())
}
