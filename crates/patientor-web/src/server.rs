//! Web服务器

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use patientor_core::{PatientorError, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::handlers::{
    create_entry, create_patient, get_diagnoses, get_patient, get_patients, health, ping,
};
use crate::store::PatientStore;

/// 默认允许跨域访问的前端地址
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

/// Web服务配置
#[derive(Debug, Clone)]
pub struct WebConfig {
    pub addr: SocketAddr,
    pub cors_origin: String,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
        }
    }
}

pub struct WebServer {
    addr: SocketAddr,
    app: Router,
}

impl WebServer {
    pub fn new(config: WebConfig, store: Arc<PatientStore>) -> Result<Self> {
        let app = create_app(store, &config.cors_origin)?;

        Ok(Self {
            addr: config.addr,
            app,
        })
    }

    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        self.run_on(listener).await
    }

    /// 在已绑定的监听器上运行
    pub async fn run_on(self, listener: TcpListener) -> Result<()> {
        info!("Starting web server on {}", listener.local_addr()?);
        axum::serve(listener, self.app).await?;
        Ok(())
    }
}

/// 创建应用路由
pub fn create_app(store: Arc<PatientStore>, cors_origin: &str) -> Result<Router> {
    let origin = cors_origin
        .parse::<HeaderValue>()
        .map_err(|e| PatientorError::Config(format!("invalid CORS origin {}: {}", cors_origin, e)))?;

    let app = Router::new()
        // 健康检查
        .route("/health", get(health))
        // API路由
        .nest("/api", api_routes())
        .with_state(store)
        // 全局中间件
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(origin)
                        .allow_methods([Method::GET, Method::POST])
                        .allow_headers([header::CONTENT_TYPE])
                        .allow_credentials(true),
                ),
        );

    Ok(app)
}

/// API 路由
fn api_routes() -> Router<Arc<PatientStore>> {
    Router::new()
        .route("/ping", get(ping))
        .route("/diagnoses", get(get_diagnoses))
        .route("/patients", get(get_patients).post(create_patient))
        .route("/patients/:id", get(get_patient))
        .route("/patients/:id/entries", post(create_entry))
}
