//! API客户端
//!
//! 通过 HTTP 访问 Patientor 后端接口

use async_trait::async_trait;
use patientor_core::{Diagnosis, Entry, NewEntry, Patient, PatientorError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 默认的后端 API 地址
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// 后端接口
#[async_trait]
pub trait PatientorApi: Send + Sync + 'static {
    /// 获取全部诊断代码
    async fn list_diagnoses(&self) -> Result<Vec<Diagnosis>>;

    /// 获取全部患者
    async fn list_patients(&self) -> Result<Vec<Patient>>;

    /// 为指定患者创建条目，返回服务端生成的条目
    async fn create_entry(&self, patient_id: &str, entry: &NewEntry) -> Result<Entry>;
}

/// 客户端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiClientConfig {
    pub base_url: String,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

/// 基于 reqwest 的接口实现
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpApiClient {
    pub fn new(config: ApiClientConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(PatientorError::Http {
                status: status.as_u16(),
                message,
            });
        }
        response.json::<T>().await.map_err(network_error)
    }
}

#[async_trait]
impl PatientorApi for HttpApiClient {
    async fn list_diagnoses(&self) -> Result<Vec<Diagnosis>> {
        let url = self.url("/diagnoses");
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await.map_err(network_error)?;
        Self::read_json(response).await
    }

    async fn list_patients(&self) -> Result<Vec<Patient>> {
        let url = self.url("/patients");
        debug!("GET {}", url);
        let response = self.client.get(&url).send().await.map_err(network_error)?;
        Self::read_json(response).await
    }

    async fn create_entry(&self, patient_id: &str, entry: &NewEntry) -> Result<Entry> {
        let url = self.url(&format!("/patients/{}/entries", patient_id));
        debug!("POST {}", url);
        let response = self
            .client
            .post(&url)
            .json(entry)
            .send()
            .await
            .map_err(network_error)?;
        Self::read_json(response).await
    }
}

fn network_error(e: reqwest::Error) -> PatientorError {
    PatientorError::Network(e.to_string())
}
