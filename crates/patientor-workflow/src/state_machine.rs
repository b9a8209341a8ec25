//! 视图状态机
//!
//! 管理患者详情页“查看”与“新增健康检查条目”两种模式的切换

use patientor_core::{PatientorError, Result};
use std::collections::HashMap;

/// 视图状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewState {
    Viewing,
    AddingHealthCheck,
}

/// 视图状态转换事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewEvent {
    OpenHealthCheckForm,
    ValidationRejected,
    SubmissionSucceeded,
    SubmissionFailed,
    Cancel,
}

/// 视图状态机
#[derive(Debug)]
pub struct ViewStateMachine {
    transitions: HashMap<(ViewState, ViewEvent), ViewState>,
}

impl ViewStateMachine {
    /// 创建新的状态机实例
    pub fn new() -> Self {
        let mut transitions = HashMap::new();

        // 定义状态转换规则
        transitions.insert((ViewState::Viewing, ViewEvent::OpenHealthCheckForm), ViewState::AddingHealthCheck);
        transitions.insert((ViewState::AddingHealthCheck, ViewEvent::ValidationRejected), ViewState::AddingHealthCheck);
        transitions.insert((ViewState::AddingHealthCheck, ViewEvent::SubmissionSucceeded), ViewState::Viewing);
        transitions.insert((ViewState::AddingHealthCheck, ViewEvent::SubmissionFailed), ViewState::Viewing);
        transitions.insert((ViewState::AddingHealthCheck, ViewEvent::Cancel), ViewState::Viewing);

        Self { transitions }
    }

    /// 检查状态转换是否有效
    pub fn can_transition(&self, from: ViewState, event: ViewEvent) -> bool {
        self.transitions.contains_key(&(from, event))
    }

    /// 执行状态转换
    pub fn transition(&self, from: ViewState, event: ViewEvent) -> Result<ViewState> {
        match self.transitions.get(&(from, event)) {
            Some(to) => Ok(*to),
            None => Err(PatientorError::InvalidStateTransition {
                from: format!("{:?}", from),
                event: format!("{:?}", event),
            }),
        }
    }

    /// 获取状态的所有可能事件
    pub fn get_possible_events(&self, current_state: ViewState) -> Vec<ViewEvent> {
        self.transitions
            .keys()
            .filter(|(state, _)| *state == current_state)
            .map(|(_, event)| *event)
            .collect()
    }
}

impl Default for ViewStateMachine {
    fn default() -> Self {
        Self::new()
    }
}
