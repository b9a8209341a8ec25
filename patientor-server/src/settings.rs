//! 配置管理
//!
//! 加载顺序：内置默认值 -> 配置文件 -> `PATIENTOR__` 前缀的环境变量，
//! 例如 `PATIENTOR__SERVER__PORT=8080`。

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use patientor_web::{WebConfig, DEFAULT_CORS_ORIGIN};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use tracing::info;

/// 服务完整配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerConfig,
    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听主机
    pub host: String,
    /// 监听端口
    pub port: u16,
    /// 允许跨域的前端地址
    pub cors_origin: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别或过滤表达式
    pub level: String,
}

impl Settings {
    /// 加载配置
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.cors_origin", DEFAULT_CORS_ORIGIN)?
            .set_default("logging.level", "info")?;

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path));
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix("PATIENTOR")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        settings.validate()?;
        if let Some(path) = config_path {
            info!("Configuration loaded successfully from: {}", path);
        }
        Ok(settings)
    }

    /// 配置校验
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if self.server.cors_origin.trim().is_empty() {
            anyhow::bail!("server.cors_origin must not be empty");
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip: IpAddr = self
            .server
            .host
            .parse()
            .with_context(|| format!("Invalid server.host: {}", self.server.host))?;
        Ok(SocketAddr::new(ip, self.server.port))
    }

    pub fn web_config(&self) -> Result<WebConfig> {
        Ok(WebConfig {
            addr: self.socket_addr()?,
            cors_origin: self.server.cors_origin.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::load(None).unwrap();
        let web = settings.web_config().unwrap();
        assert_eq!(web.addr.port(), 3000);
        assert_eq!(web.cors_origin, "http://localhost:5173");
        assert_eq!(settings.logging.level, "info");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("patientor-{}.toml", std::process::id()));
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[server]\nport = 8081\ncors_origin = \"http://example.test\"").unwrap();

        let settings = Settings::load(Some(path.to_str().unwrap())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(settings.server.port, 8081);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.server.cors_origin, "http://example.test");
    }

    #[test]
    fn test_invalid_host_rejected() {
        let settings = Settings {
            server: ServerConfig {
                host: "not-an-ip".to_string(),
                port: 3000,
                cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        };
        assert!(settings.validate().is_err());
    }
}
