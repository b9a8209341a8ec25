//! 核心数据模型定义
//!
//! 线上 JSON 字段统一使用 camelCase，条目类型通过 `type` 字段区分。

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PatientorError, Result};
use crate::utils::is_valid_date;

/// 诊断代码
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub code: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latin: Option<String>,
}

/// 性别枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Other => "other",
        };
        f.write_str(s)
    }
}

/// 健康检查评级，线上编码为 0-3 的整数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum HealthCheckRating {
    Healthy = 0,
    LowRisk = 1,
    HighRisk = 2,
    CriticalRisk = 3,
}

impl HealthCheckRating {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::LowRisk => "low risk",
            Self::HighRisk => "high risk",
            Self::CriticalRisk => "critical risk",
        }
    }
}

impl TryFrom<i64> for HealthCheckRating {
    type Error = PatientorError;

    fn try_from(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::Healthy),
            1 => Ok(Self::LowRisk),
            2 => Ok(Self::HighRisk),
            3 => Ok(Self::CriticalRisk),
            other => Err(PatientorError::Validation(format!(
                "Health check rating must be 0 (healthy), 1 (low risk), 2 (high risk) or 3 (critical risk), got {}",
                other
            ))),
        }
    }
}

impl TryFrom<u8> for HealthCheckRating {
    type Error = PatientorError;

    fn try_from(value: u8) -> Result<Self> {
        Self::try_from(i64::from(value))
    }
}

impl From<HealthCheckRating> for u8 {
    fn from(rating: HealthCheckRating) -> Self {
        rating as u8
    }
}

/// 条目公共字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaseEntry {
    pub id: String,
    pub description: String,
    pub date: String,
    pub specialist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_codes: Option<Vec<String>>,
}

/// 出院信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discharge {
    pub date: String,
    pub criteria: String,
}

/// 病假信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SickLeave {
    pub start_date: String,
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckEntry {
    #[serde(flatten)]
    pub base: BaseEntry,
    pub health_check_rating: HealthCheckRating,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalEntry {
    #[serde(flatten)]
    pub base: BaseEntry,
    pub discharge: Discharge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupationalHealthcareEntry {
    #[serde(flatten)]
    pub base: BaseEntry,
    pub employer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sick_leave: Option<SickLeave>,
}

/// 病历条目
///
/// 服务端控制条目类型集合；无法识别的 `type` 解码为 [`Entry::Unknown`]，
/// 不会导致整个患者记录解码失败。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Entry {
    HealthCheck(HealthCheckEntry),
    Hospital(HospitalEntry),
    OccupationalHealthcare(OccupationalHealthcareEntry),
    #[serde(other)]
    Unknown,
}

impl Entry {
    /// 条目公共字段，未知类型没有公共字段
    pub fn base(&self) -> Option<&BaseEntry> {
        match self {
            Entry::HealthCheck(e) => Some(&e.base),
            Entry::Hospital(e) => Some(&e.base),
            Entry::OccupationalHealthcare(e) => Some(&e.base),
            Entry::Unknown => None,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.base().map(|b| b.id.as_str())
    }

    /// 线上 `type` 字段的值
    pub fn kind(&self) -> &'static str {
        match self {
            Entry::HealthCheck(_) => "HealthCheck",
            Entry::Hospital(_) => "Hospital",
            Entry::OccupationalHealthcare(_) => "OccupationalHealthcare",
            Entry::Unknown => "Unknown",
        }
    }
}

/// 新建条目的公共字段（无 id）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBaseEntry {
    pub description: String,
    pub date: String,
    pub specialist: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis_codes: Option<Vec<String>>,
}

impl NewBaseEntry {
    fn with_id(self, id: String) -> BaseEntry {
        BaseEntry {
            id,
            description: self.description,
            date: self.date,
            specialist: self.specialist,
            diagnosis_codes: self.diagnosis_codes,
        }
    }

    fn validate(&self) -> Result<()> {
        require_non_empty("description", &self.description)?;
        require_non_empty("specialist", &self.specialist)?;
        require_date("date", &self.date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHealthCheckEntry {
    #[serde(flatten)]
    pub base: NewBaseEntry,
    pub health_check_rating: HealthCheckRating,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHospitalEntry {
    #[serde(flatten)]
    pub base: NewBaseEntry,
    pub discharge: Discharge,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOccupationalHealthcareEntry {
    #[serde(flatten)]
    pub base: NewBaseEntry,
    pub employer_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sick_leave: Option<SickLeave>,
}

/// 客户端提交的新条目
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NewEntry {
    HealthCheck(NewHealthCheckEntry),
    Hospital(NewHospitalEntry),
    OccupationalHealthcare(NewOccupationalHealthcareEntry),
}

impl NewEntry {
    /// 服务端字段校验
    pub fn validate(&self) -> Result<()> {
        match self {
            NewEntry::HealthCheck(e) => e.base.validate(),
            NewEntry::Hospital(e) => {
                e.base.validate()?;
                require_date("discharge.date", &e.discharge.date)?;
                require_non_empty("discharge.criteria", &e.discharge.criteria)
            }
            NewEntry::OccupationalHealthcare(e) => {
                e.base.validate()?;
                require_non_empty("employerName", &e.employer_name)?;
                if let Some(leave) = &e.sick_leave {
                    require_date("sickLeave.startDate", &leave.start_date)?;
                    require_date("sickLeave.endDate", &leave.end_date)?;
                }
                Ok(())
            }
        }
    }

    /// 分配 id，生成完整条目
    pub fn into_entry(self, id: String) -> Entry {
        match self {
            NewEntry::HealthCheck(e) => Entry::HealthCheck(HealthCheckEntry {
                base: e.base.with_id(id),
                health_check_rating: e.health_check_rating,
            }),
            NewEntry::Hospital(e) => Entry::Hospital(HospitalEntry {
                base: e.base.with_id(id),
                discharge: e.discharge,
            }),
            NewEntry::OccupationalHealthcare(e) => {
                Entry::OccupationalHealthcare(OccupationalHealthcareEntry {
                    base: e.base.with_id(id),
                    employer_name: e.employer_name,
                    sick_leave: e.sick_leave,
                })
            }
        }
    }
}

/// 患者信息（不含敏感字段）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub name: String,
    pub date_of_birth: String,
    pub gender: Gender,
    pub occupation: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl Patient {
    /// 返回追加了一条条目的新患者记录，原记录保持不变
    pub fn with_entry(&self, entry: Entry) -> Patient {
        let mut entries = self.entries.clone();
        entries.push(entry);
        Patient {
            id: self.id.clone(),
            name: self.name.clone(),
            date_of_birth: self.date_of_birth.clone(),
            gender: self.gender,
            occupation: self.occupation.clone(),
            entries,
        }
    }
}

/// 新建患者请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPatient {
    pub name: String,
    pub date_of_birth: String,
    pub ssn: String,
    pub gender: Gender,
    pub occupation: String,
}

impl NewPatient {
    pub fn validate(&self) -> Result<()> {
        require_non_empty("name", &self.name)?;
        require_non_empty("ssn", &self.ssn)?;
        require_non_empty("occupation", &self.occupation)?;
        require_date("dateOfBirth", &self.date_of_birth)
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PatientorError::Validation(format!("Missing {}", field)));
    }
    Ok(())
}

fn require_date(field: &str, value: &str) -> Result<()> {
    if !is_valid_date(value) {
        return Err(PatientorError::Validation(format!(
            "Incorrect {}: {}",
            field, value
        )));
    }
    Ok(())
}
