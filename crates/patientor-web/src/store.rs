//! 内存患者存储
//!
//! 启动时从内置 JSON 数据加载，进程退出即丢失。

use patientor_core::utils::generate_id;
use patientor_core::{
    Diagnosis, Entry, Gender, NewEntry, NewPatient, Patient, PatientorError, Result,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};

const DIAGNOSES_JSON: &str = include_str!("../data/diagnoses.json");
const PATIENTS_JSON: &str = include_str!("../data/patients.json");

/// 服务端患者记录，包含不对外暴露的 ssn
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: String,
    pub name: String,
    pub date_of_birth: String,
    pub ssn: String,
    pub gender: Gender,
    pub occupation: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

impl PatientRecord {
    /// 去除敏感字段
    pub fn to_patient(&self) -> Patient {
        Patient {
            id: self.id.clone(),
            name: self.name.clone(),
            date_of_birth: self.date_of_birth.clone(),
            gender: self.gender,
            occupation: self.occupation.clone(),
            entries: self.entries.clone(),
        }
    }
}

/// 患者与诊断数据存储
#[derive(Debug)]
pub struct PatientStore {
    diagnoses: Vec<Diagnosis>,
    patients: RwLock<Vec<PatientRecord>>,
}

impl PatientStore {
    pub fn new(diagnoses: Vec<Diagnosis>, patients: Vec<PatientRecord>) -> Self {
        Self {
            diagnoses,
            patients: RwLock::new(patients),
        }
    }

    /// 使用内置示例数据创建存储
    pub fn seeded() -> Result<Self> {
        let diagnoses: Vec<Diagnosis> = serde_json::from_str(DIAGNOSES_JSON)?;
        let patients: Vec<PatientRecord> = serde_json::from_str(PATIENTS_JSON)?;
        info!(
            "Loaded {} diagnoses and {} patients",
            diagnoses.len(),
            patients.len()
        );
        Ok(Self::new(diagnoses, patients))
    }

    pub fn diagnoses(&self) -> &[Diagnosis] {
        &self.diagnoses
    }

    pub async fn patients(&self) -> Vec<Patient> {
        self.patients
            .read()
            .await
            .iter()
            .map(PatientRecord::to_patient)
            .collect()
    }

    pub async fn patient(&self, id: &str) -> Result<Patient> {
        self.patients
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .map(PatientRecord::to_patient)
            .ok_or_else(|| PatientorError::NotFound(format!("patient {}", id)))
    }

    pub async fn add_patient(&self, new_patient: NewPatient) -> Result<Patient> {
        new_patient.validate()?;

        let record = PatientRecord {
            id: generate_id(),
            name: new_patient.name,
            date_of_birth: new_patient.date_of_birth,
            ssn: new_patient.ssn,
            gender: new_patient.gender,
            occupation: new_patient.occupation,
            entries: Vec::new(),
        };
        let patient = record.to_patient();
        self.patients.write().await.push(record);

        info!("Created patient {}", patient.id);
        Ok(patient)
    }

    /// 校验并为患者追加条目，返回带服务端 id 的条目
    pub async fn add_entry(&self, patient_id: &str, new_entry: NewEntry) -> Result<Entry> {
        new_entry.validate()?;

        let mut patients = self.patients.write().await;
        let record = patients
            .iter_mut()
            .find(|p| p.id == patient_id)
            .ok_or_else(|| PatientorError::NotFound(format!("patient {}", patient_id)))?;

        let entry = new_entry.into_entry(generate_id());
        record.entries.push(entry.clone());
        debug!(
            "Patient {} now has {} entries",
            patient_id,
            record.entries.len()
        );
        Ok(entry)
    }
}
