//! HTTP处理器

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use patientor_core::{NewEntry, NewPatient, PatientorError};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{info, warn};

use crate::store::PatientStore;

pub type AppState = Arc<PatientStore>;

/// 处理器错误，包装统一错误类型以便转换为 HTTP 响应
#[derive(Debug)]
pub struct ApiError(pub PatientorError);

impl From<PatientorError> for ApiError {
    fn from(err: PatientorError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            PatientorError::NotFound(_) => StatusCode::NOT_FOUND,
            PatientorError::Validation(_) | PatientorError::Serialization(_) => {
                StatusCode::BAD_REQUEST
            }
            PatientorError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("Request failed with {}: {}", status, self.0);

        let body = Json(json!({
            "error": true,
            "message": self.0.to_string(),
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

type ApiResult<T> = std::result::Result<T, ApiError>;

pub async fn ping() -> &'static str {
    info!("someone pinged here");
    "pong"
}

/// 健康检查处理器
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// 诊断列表处理器
pub async fn get_diagnoses(State(store): State<AppState>) -> impl IntoResponse {
    Json(store.diagnoses().to_vec())
}

/// 患者列表处理器（不含 ssn）
pub async fn get_patients(State(store): State<AppState>) -> impl IntoResponse {
    Json(store.patients().await)
}

pub async fn get_patient(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    Ok(Json(store.patient(&id).await?))
}

pub async fn create_patient(
    State(store): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let new_patient: NewPatient = parse_body(body)?;
    let patient = store.add_patient(new_patient).await?;
    Ok((StatusCode::CREATED, Json(patient)))
}

/// 新增条目处理器
pub async fn create_entry(
    State(store): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let new_entry: NewEntry = parse_body(body)?;
    let entry = store.add_entry(&id, new_entry).await?;
    info!("Added {} entry for patient {}", entry.kind(), id);
    Ok((StatusCode::CREATED, Json(entry)))
}

/// 解析请求体，格式错误统一转换为验证错误
fn parse_body<T: serde::de::DeserializeOwned>(
    body: Result<Json<Value>, JsonRejection>,
) -> Result<T, PatientorError> {
    let Json(value) = body.map_err(|rejection| PatientorError::Validation(rejection.body_text()))?;
    serde_json::from_value(value).map_err(|e| PatientorError::Validation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::server::create_app;
    use crate::store::PatientStore;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const DANA: &str = "d2773822-f723-11e9-8f0b-362b9e155667";

    fn app() -> Router {
        let store = Arc::new(PatientStore::seeded().unwrap());
        create_app(store, "http://localhost:5173").unwrap()
    }

    async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn health_check_body(date: &str, rating: i64) -> Value {
        json!({
            "type": "HealthCheck",
            "description": "checkup",
            "date": date,
            "specialist": "Dr. X",
            "diagnosisCodes": ["A10", "Z99"],
            "healthCheckRating": rating
        })
    }

    #[tokio::test]
    async fn test_ping() {
        let response = app()
            .oneshot(Request::builder().uri("/api/ping").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"pong");
    }

    #[tokio::test]
    async fn test_list_diagnoses() {
        let (status, body) = send(app(), Method::GET, "/api/diagnoses", None).await;
        assert_eq!(status, StatusCode::OK);
        let list = body.as_array().unwrap();
        assert_eq!(list.len(), 15);
        assert!(list.iter().any(|d| d["code"] == "M24.2"));
    }

    #[tokio::test]
    async fn test_patients_hide_ssn() {
        let (status, body) = send(app(), Method::GET, "/api/patients", None).await;
        assert_eq!(status, StatusCode::OK);
        for patient in body.as_array().unwrap() {
            assert!(patient.get("ssn").is_none());
            assert!(patient.get("entries").is_some());
        }

        let (status, body) = send(app(), Method::GET, &format!("/api/patients/{}", DANA), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "Dana Scully");
        assert!(body.get("ssn").is_none());
    }

    #[tokio::test]
    async fn test_create_entry() {
        let app = app();
        let uri = format!("/api/patients/{}/entries", DANA);

        let (status, created) = send(app.clone(), Method::POST, &uri, Some(health_check_body("2024-01-01", 1))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["type"], "HealthCheck");
        assert_eq!(created["healthCheckRating"], 1);
        assert!(created["id"].as_str().is_some());

        let (_, patient) = send(app, Method::GET, &format!("/api/patients/{}", DANA), None).await;
        let entries = patient["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries[3], created);
    }

    #[tokio::test]
    async fn test_create_entry_errors() {
        let app = app();
        let uri = format!("/api/patients/{}/entries", DANA);

        let (status, body) = send(app.clone(), Method::POST, &uri, Some(health_check_body("Jan 1st", 1))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);

        let (status, _) = send(app.clone(), Method::POST, &uri, Some(health_check_body("2024-01-01", 9))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            app,
            Method::POST,
            "/api/patients/unknown/entries",
            Some(health_check_body("2024-01-01", 0)),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
    }

    #[tokio::test]
    async fn test_malformed_body_uses_error_shape() {
        let request = Request::builder()
            .method(Method::POST)
            .uri(format!("/api/patients/{}/entries", DANA))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], true);
        assert_eq!(body["status"], 400);
        assert!(body["message"].as_str().unwrap().contains("JSON"));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/patients")
            .body(Body::from("{}"))
            .unwrap();
        let (status, body) = {
            let response = app().oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, serde_json::from_slice::<Value>(&bytes).unwrap())
        };
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
    }

    #[test]
    fn test_server_side_errors_map_to_500() {
        use super::ApiError;
        use axum::response::IntoResponse;
        use patientor_core::PatientorError;

        let response = ApiError(PatientorError::Network("upstream down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = ApiError(PatientorError::NotFound("patient x".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_create_patient() {
        let app = app();
        let (status, created) = send(
            app.clone(),
            Method::POST,
            "/api/patients",
            Some(json!({
                "name": "Fox Mulder",
                "dateOfBirth": "1961-10-13",
                "ssn": "131061-000F",
                "gender": "male",
                "occupation": "Special Agent"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert!(created.get("ssn").is_none());

        let (_, list) = send(app, Method::GET, "/api/patients", None).await;
        assert_eq!(list.as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn test_cors_allows_configured_origin() {
        let request = Request::builder()
            .uri("/api/diagnoses")
            .header(header::ORIGIN, "http://localhost:5173")
            .body(Body::empty())
            .unwrap();
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
            "http://localhost:5173"
        );
    }
}
