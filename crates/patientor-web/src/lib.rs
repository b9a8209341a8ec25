//! # Patientor Web
//!
//! 患者病历 REST API：诊断列表、患者查询与条目创建。数据保存在内存中。

pub mod handlers;
pub mod server;
pub mod store;

pub use handlers::{ApiError, AppState};
pub use server::{create_app, WebConfig, WebServer, DEFAULT_CORS_ORIGIN};
pub use store::{PatientRecord, PatientStore};
