//! 条目展示解析
//!
//! 按条目类型选择展示内容，并把诊断代码解析为 `"<code>: <name>"`。

use patientor_core::{Diagnosis, Entry, Gender, Patient};
use std::collections::HashMap;
use std::fmt;
use tracing::warn;

/// 诊断代码查找表，页面生命周期内只读
#[derive(Debug, Clone, Default)]
pub struct DiagnosisLookup {
    by_code: HashMap<String, Diagnosis>,
}

impl DiagnosisLookup {
    pub fn new(diagnoses: Vec<Diagnosis>) -> Self {
        let by_code = diagnoses
            .into_iter()
            .map(|d| (d.code.clone(), d))
            .collect();
        Self { by_code }
    }

    pub fn get(&self, code: &str) -> Option<&Diagnosis> {
        self.by_code.get(code)
    }

    /// 可解析时返回 `"<code>: <name>"`，否则原样返回代码
    pub fn describe(&self, code: &str) -> String {
        match self.by_code.get(code) {
            Some(diagnosis) => format!("{}: {}", diagnosis.code, diagnosis.name),
            None => code.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// 各条目类型的专属展示字段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryDetails {
    HealthCheck {
        rating: String,
    },
    Hospital {
        discharge_date: String,
        criteria: String,
    },
    OccupationalHealthcare {
        employer: String,
        sick_leave: Option<(String, String)>,
    },
}

/// 单条条目的展示结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryView {
    pub kind: &'static str,
    pub date: String,
    pub description: String,
    pub specialist: String,
    pub diagnoses: Vec<String>,
    pub details: EntryDetails,
}

impl fmt::Display for EntryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} [{}]", self.date, self.kind)?;
        writeln!(f, "  {}", self.description)?;
        for diagnosis in &self.diagnoses {
            writeln!(f, "  - {}", diagnosis)?;
        }
        match &self.details {
            EntryDetails::HealthCheck { rating } => {
                writeln!(f, "  health check rating: {}", rating)?;
            }
            EntryDetails::Hospital {
                discharge_date,
                criteria,
            } => {
                writeln!(f, "  discharged {}: {}", discharge_date, criteria)?;
            }
            EntryDetails::OccupationalHealthcare {
                employer,
                sick_leave,
            } => {
                writeln!(f, "  employer: {}", employer)?;
                if let Some((start, end)) = sick_leave {
                    writeln!(f, "  sick leave: {} - {}", start, end)?;
                }
            }
        }
        write!(f, "  diagnosed by {}", self.specialist)
    }
}

/// 生成条目展示内容
///
/// 未知条目类型返回 `None` 并记录警告。
pub fn render_entry<F>(entry: &Entry, describe: F) -> Option<EntryView>
where
    F: Fn(&str) -> String,
{
    let (base, details) = match entry {
        Entry::HealthCheck(e) => (
            &e.base,
            EntryDetails::HealthCheck {
                rating: e.health_check_rating.label().to_string(),
            },
        ),
        Entry::Hospital(e) => (
            &e.base,
            EntryDetails::Hospital {
                discharge_date: e.discharge.date.clone(),
                criteria: e.discharge.criteria.clone(),
            },
        ),
        Entry::OccupationalHealthcare(e) => (
            &e.base,
            EntryDetails::OccupationalHealthcare {
                employer: e.employer_name.clone(),
                sick_leave: e
                    .sick_leave
                    .as_ref()
                    .map(|s| (s.start_date.clone(), s.end_date.clone())),
            },
        ),
        Entry::Unknown => {
            warn!("Unknown entry variant, skipping render");
            return None;
        }
    };

    let diagnoses = base
        .diagnosis_codes
        .iter()
        .flatten()
        .map(|code| describe(code))
        .collect();

    Some(EntryView {
        kind: entry.kind(),
        date: base.date.clone(),
        description: base.description.clone(),
        specialist: base.specialist.clone(),
        diagnoses,
        details,
    })
}

/// 患者详情展示结构
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientView {
    pub name: String,
    pub gender: Gender,
    pub date_of_birth: String,
    pub occupation: String,
    pub entries: Vec<EntryView>,
}

impl PatientView {
    pub fn new(patient: &Patient, lookup: &DiagnosisLookup) -> Self {
        Self {
            name: patient.name.clone(),
            gender: patient.gender,
            date_of_birth: patient.date_of_birth.clone(),
            occupation: patient.occupation.clone(),
            entries: patient
                .entries
                .iter()
                .filter_map(|entry| render_entry(entry, |code| lookup.describe(code)))
                .collect(),
        }
    }
}

impl fmt::Display for PatientView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Patient: {} / {}", self.name, self.gender)?;
        writeln!(f, "Date of Birth: {}", self.date_of_birth)?;
        write!(f, "Occupation: {}", self.occupation)?;
        for entry in &self.entries {
            write!(f, "\n\n{}", entry)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patientor_core::{
        BaseEntry, Discharge, HealthCheckEntry, HealthCheckRating, HospitalEntry,
        OccupationalHealthcareEntry, SickLeave,
    };

    fn base(codes: Option<Vec<&str>>) -> BaseEntry {
        BaseEntry {
            id: "e1".to_string(),
            description: "checkup".to_string(),
            date: "2024-01-01".to_string(),
            specialist: "Dr. X".to_string(),
            diagnosis_codes: codes.map(|c| c.into_iter().map(String::from).collect()),
        }
    }

    fn flu_lookup() -> DiagnosisLookup {
        DiagnosisLookup::new(vec![Diagnosis {
            code: "A10".to_string(),
            name: "Flu".to_string(),
            latin: None,
        }])
    }

    fn all_variants() -> Vec<Entry> {
        vec![
            Entry::HealthCheck(HealthCheckEntry {
                base: base(None),
                health_check_rating: HealthCheckRating::HighRisk,
            }),
            Entry::Hospital(HospitalEntry {
                base: base(Some(vec!["A10"])),
                discharge: Discharge {
                    date: "2024-01-05".to_string(),
                    criteria: "Healed".to_string(),
                },
            }),
            Entry::OccupationalHealthcare(OccupationalHealthcareEntry {
                base: base(None),
                employer_name: "HyPD".to_string(),
                sick_leave: Some(SickLeave {
                    start_date: "2024-01-01".to_string(),
                    end_date: "2024-01-10".to_string(),
                }),
            }),
        ]
    }

    #[test]
    fn test_describe_known_and_unknown_codes() {
        let lookup = flu_lookup();
        assert_eq!(lookup.describe("A10"), "A10: Flu");
        assert!(lookup.describe("A10").starts_with("A10: "));
        assert_eq!(lookup.describe("Z99"), "Z99");
    }

    #[test]
    fn test_codes_resolve_in_order() {
        let lookup = flu_lookup();
        let entry = Entry::HealthCheck(HealthCheckEntry {
            base: base(Some(vec!["A10", "Z99"])),
            health_check_rating: HealthCheckRating::Healthy,
        });

        let view = render_entry(&entry, |code| lookup.describe(code)).unwrap();
        assert_eq!(view.diagnoses, vec!["A10: Flu", "Z99"]);
    }

    #[test]
    fn test_every_known_variant_renders() {
        let lookup = flu_lookup();
        for entry in all_variants() {
            let view = render_entry(&entry, |code| lookup.describe(code))
                .expect("known variants always render");
            let text = view.to_string();
            assert!(text.contains("checkup"));
            assert!(text.contains("Dr. X"));
            assert_eq!(view.kind, entry.kind());
        }
    }

    #[test]
    fn test_variant_details() {
        let lookup = DiagnosisLookup::default();
        let views: Vec<EntryView> = all_variants()
            .iter()
            .filter_map(|e| render_entry(e, |code| lookup.describe(code)))
            .collect();

        assert_eq!(
            views[0].details,
            EntryDetails::HealthCheck {
                rating: "high risk".to_string()
            }
        );
        assert!(views[1].to_string().contains("discharged 2024-01-05: Healed"));
        assert!(views[2].to_string().contains("sick leave: 2024-01-01 - 2024-01-10"));
    }

    #[test]
    fn test_unknown_variant_renders_nothing() {
        assert!(render_entry(&Entry::Unknown, |code| code.to_string()).is_none());
    }

    #[test]
    fn test_patient_view_skips_unknown_entries() {
        let mut entries = all_variants();
        entries.insert(1, Entry::Unknown);
        let patient = Patient {
            id: "p1".to_string(),
            name: "Dana Scully".to_string(),
            date_of_birth: "1974-01-05".to_string(),
            gender: Gender::Female,
            occupation: "Forensic Pathologist".to_string(),
            entries,
        };

        let view = PatientView::new(&patient, &flu_lookup());
        assert_eq!(view.entries.len(), 3);
        let text = view.to_string();
        assert!(text.starts_with("Patient: Dana Scully / female"));
        assert!(text.contains("A10: Flu"));
    }
}
