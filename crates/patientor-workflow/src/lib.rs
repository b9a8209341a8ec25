//! # 病历条目工作流模块
//!
//! 患者详情页的客户端逻辑，包括：
//! - 条目展示解析：按条目类型生成展示内容，并将诊断代码解析为可读名称
//! - 视图状态机：管理“查看”与“新增健康检查条目”两种模式的切换
//! - 条目提交流程：收集表单、校验评级、调用远端接口并合并服务端返回的条目
//! - API客户端：访问诊断列表与条目创建接口

pub mod client;
pub mod display;
pub mod form;
pub mod page;
pub mod state_machine;

// 重新导出主要类型
pub use client::{ApiClientConfig, HttpApiClient, PatientorApi};
pub use display::{render_entry, DiagnosisLookup, EntryDetails, EntryView, PatientView};
pub use form::HealthCheckForm;
pub use page::{find_patient, Notifier, PatientPage, SubmitOutcome, TracingNotifier};
pub use state_machine::{ViewEvent, ViewState, ViewStateMachine};
