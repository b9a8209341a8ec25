//! 患者详情页工作流
//!
//! 页面持有当前患者的只读快照。挂载时后台加载诊断列表，卸载或销毁时
//! 取消未完成的任务；新增条目只在服务端确认后追加到本地。

use patientor_core::{Entry, Patient, PatientorError, Result};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::client::PatientorApi;
use crate::display::{DiagnosisLookup, PatientView};
use crate::form::HealthCheckForm;
use crate::state_machine::{ViewEvent, ViewState, ViewStateMachine};

/// 阻塞式用户提示
pub trait Notifier: Send + Sync {
    fn alert(&self, message: &str);
}

/// 将提示写入日志
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn alert(&self, message: &str) {
        warn!("{}", message);
    }
}

/// 提交结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// 服务端确认的条目已追加
    Appended(Entry),
    /// 本地校验未通过，没有发出请求
    Rejected(String),
    /// 请求失败，条目被丢弃
    Failed(String),
}

/// 在已加载的患者列表中查找患者
pub fn find_patient<'a>(patients: &'a [Patient], id: &str) -> Option<&'a Patient> {
    patients.iter().find(|p| p.id == id)
}

/// 患者详情页
pub struct PatientPage<C: PatientorApi> {
    client: Arc<C>,
    notifier: Arc<dyn Notifier>,
    patient: Arc<Patient>,
    diagnoses: Arc<RwLock<DiagnosisLookup>>,
    form: HealthCheckForm,
    state: ViewState,
    state_machine: ViewStateMachine,
    tasks: JoinSet<()>,
}

impl<C: PatientorApi> PatientPage<C> {
    pub fn new(client: Arc<C>, patient: Patient, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            client,
            notifier,
            patient: Arc::new(patient),
            diagnoses: Arc::new(RwLock::new(DiagnosisLookup::default())),
            form: HealthCheckForm::new(),
            state: ViewState::Viewing,
            state_machine: ViewStateMachine::new(),
            tasks: JoinSet::new(),
        }
    }

    /// 挂载页面，后台加载诊断列表
    pub fn mount(&mut self) {
        let client = self.client.clone();
        let diagnoses = self.diagnoses.clone();
        debug!("Mounting page for patient {}", self.patient.id);

        self.tasks.spawn(async move {
            match client.list_diagnoses().await {
                Ok(list) => {
                    info!("Loaded {} diagnoses", list.len());
                    *diagnoses.write().await = DiagnosisLookup::new(list);
                }
                Err(e) => error!("Error fetching diagnosis data: {}", e),
            }
        });
    }

    /// 等待后台任务结束
    pub async fn wait_loaded(&mut self) {
        while let Some(result) = self.tasks.join_next().await {
            if let Err(e) = result {
                if e.is_cancelled() {
                    debug!("Background task cancelled");
                } else {
                    error!("Background task failed: {}", e);
                }
            }
        }
    }

    /// 卸载页面，取消未完成的后台任务
    pub fn unmount(&mut self) {
        debug!("Unmounting page for patient {}", self.patient.id);
        self.tasks.abort_all();
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn patient(&self) -> &Arc<Patient> {
        &self.patient
    }

    pub fn form(&self) -> &HealthCheckForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut HealthCheckForm {
        &mut self.form
    }

    /// 当前状态下可触发的事件
    pub fn available_events(&self) -> Vec<ViewEvent> {
        self.state_machine.get_possible_events(self.state)
    }

    pub async fn diagnoses(&self) -> DiagnosisLookup {
        self.diagnoses.read().await.clone()
    }

    /// 生成患者详情展示内容
    pub async fn render(&self) -> PatientView {
        let lookup = self.diagnoses.read().await;
        PatientView::new(&self.patient, &lookup)
    }

    /// 进入新增健康检查条目模式，保留之前填写的字段
    pub fn open_health_check_form(&mut self) -> Result<()> {
        self.apply(ViewEvent::OpenHealthCheckForm)
    }

    pub fn open_hospital_form(&self) -> Result<()> {
        warn!("Add Hospitalization Entry is not wired to a submission handler");
        Err(PatientorError::Unsupported(
            "hospital entries cannot be added from this page".to_string(),
        ))
    }

    pub fn open_occupational_form(&self) -> Result<()> {
        warn!("Add Occupational Health Check Entry is not wired to a submission handler");
        Err(PatientorError::Unsupported(
            "occupational healthcare entries cannot be added from this page".to_string(),
        ))
    }

    /// 放弃填写，返回查看模式
    pub fn cancel(&mut self) -> Result<()> {
        self.apply(ViewEvent::Cancel)
    }

    /// 提交健康检查条目
    ///
    /// 仅在新增模式下可调用。评级不在 0-3 范围内时不发出请求并保持新增模式；
    /// 请求成功或失败都会回到查看模式。
    pub async fn submit_health_check(&mut self) -> Result<SubmitOutcome> {
        if !self
            .state_machine
            .can_transition(self.state, ViewEvent::SubmissionSucceeded)
        {
            return Err(PatientorError::InvalidStateTransition {
                from: format!("{:?}", self.state),
                event: "Submit".to_string(),
            });
        }

        let new_entry = match self.form.to_new_entry() {
            Ok(entry) => entry,
            Err(e) => {
                let message = e.to_string();
                self.notifier.alert(&message);
                self.apply(ViewEvent::ValidationRejected)?;
                return Ok(SubmitOutcome::Rejected(message));
            }
        };

        match self.client.create_entry(&self.patient.id, &new_entry).await {
            Ok(entry) => {
                info!(
                    "Added {} entry {} for patient {}",
                    entry.kind(),
                    entry.id().unwrap_or("-"),
                    self.patient.id
                );
                self.patient = Arc::new(self.patient.with_entry(entry.clone()));
                self.apply(ViewEvent::SubmissionSucceeded)?;
                Ok(SubmitOutcome::Appended(entry))
            }
            Err(e) => {
                error!("Error adding new entry: {}", e);
                self.apply(ViewEvent::SubmissionFailed)?;
                Ok(SubmitOutcome::Failed(e.to_string()))
            }
        }
    }

    fn apply(&mut self, event: ViewEvent) -> Result<()> {
        self.state = self.state_machine.transition(self.state, event)?;
        Ok(())
    }
}
