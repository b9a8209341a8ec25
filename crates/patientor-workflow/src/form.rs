//! 健康检查条目表单

use patientor_core::utils::{join_diagnosis_codes, parse_leading_integer, split_diagnosis_codes};
use patientor_core::{
    HealthCheckRating, NewBaseEntry, NewEntry, NewHealthCheckEntry, PatientorError, Result,
};

/// 健康检查表单字段
///
/// 日期只作为文本收集，不在客户端校验。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthCheckForm {
    pub description: String,
    pub date: String,
    pub specialist: String,
    pub diagnosis_codes: Vec<String>,
    pub health_check_rating: Option<i64>,
}

impl HealthCheckForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.description = value.into();
    }

    pub fn set_date(&mut self, value: impl Into<String>) {
        self.date = value.into();
    }

    pub fn set_specialist(&mut self, value: impl Into<String>) {
        self.specialist = value.into();
    }

    /// 逗号分隔的诊断代码输入
    pub fn set_diagnosis_codes_text(&mut self, text: &str) {
        self.diagnosis_codes = split_diagnosis_codes(text);
    }

    pub fn diagnosis_codes_text(&self) -> String {
        join_diagnosis_codes(&self.diagnosis_codes)
    }

    /// 评级输入；取开头的整数部分，空白或无前导数字视为未填写
    pub fn set_health_check_rating_text(&mut self, text: &str) {
        self.health_check_rating = parse_leading_integer(text);
    }

    pub fn health_check_rating_text(&self) -> String {
        self.health_check_rating
            .map(|rating| rating.to_string())
            .unwrap_or_default()
    }

    /// 校验评级并组装提交内容
    pub fn to_new_entry(&self) -> Result<NewEntry> {
        let health_check_rating = match self.health_check_rating {
            Some(value) => HealthCheckRating::try_from(value)?,
            None => {
                return Err(PatientorError::Validation(
                    "Health check rating must be 0 (healthy), 1 (low risk), 2 (high risk) or 3 (critical risk)"
                        .to_string(),
                ))
            }
        };

        Ok(NewEntry::HealthCheck(NewHealthCheckEntry {
            base: NewBaseEntry {
                description: self.description.clone(),
                date: self.date.clone(),
                specialist: self.specialist.clone(),
                diagnosis_codes: Some(self.diagnosis_codes.clone()),
            },
            health_check_rating,
        }))
    }
}
