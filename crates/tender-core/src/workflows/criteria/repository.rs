use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::construction::CreatedCriteria;
use super::domain::{AwardCriteria, AwardCriteriaDetails, Conversion, Criterion};

/// Stored form of a tender's constructed criteria tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderCriteriaRecord {
    pub ocid: String,
    pub award_criteria: AwardCriteria,
    pub award_criteria_details: AwardCriteriaDetails,
    pub criteria: Vec<Criterion>,
    pub conversions: Vec<Conversion>,
}

impl TenderCriteriaRecord {
    pub fn from_created(ocid: String, created: CreatedCriteria) -> Self {
        Self {
            ocid,
            award_criteria: created.award_criteria,
            award_criteria_details: created.award_criteria_details,
            criteria: created.criteria,
            conversions: created.conversions,
        }
    }

    pub fn summary_view(&self) -> CriteriaSummaryView {
        CriteriaSummaryView {
            ocid: self.ocid.clone(),
            award_criteria: self.award_criteria.label(),
            award_criteria_details: self.award_criteria_details.label(),
            criteria_count: self.criteria.len(),
            conversions_count: self.conversions.len(),
        }
    }
}

/// Condensed representation for status-style API responses.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CriteriaSummaryView {
    pub ocid: String,
    pub award_criteria: &'static str,
    pub award_criteria_details: &'static str,
    pub criteria_count: usize,
    pub conversions_count: usize,
}

/// Storage abstraction so the service module can be exercised in isolation.
pub trait CriteriaRepository: Send + Sync {
    fn insert(&self, record: TenderCriteriaRecord)
        -> Result<TenderCriteriaRecord, RepositoryError>;
    fn fetch(&self, ocid: &str) -> Result<Option<TenderCriteriaRecord>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("criteria already created for this tender")]
    Conflict,
    #[error("tender criteria not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Process-local store used by the service binary and tests. Real deployments
/// swap in the persistence collaborator behind the same trait.
#[derive(Debug, Default)]
pub struct InMemoryCriteriaRepository {
    records: Mutex<HashMap<String, TenderCriteriaRecord>>,
}

impl CriteriaRepository for InMemoryCriteriaRepository {
    fn insert(
        &self,
        record: TenderCriteriaRecord,
    ) -> Result<TenderCriteriaRecord, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("criteria store poisoned".to_string()))?;
        if guard.contains_key(&record.ocid) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.ocid.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, ocid: &str) -> Result<Option<TenderCriteriaRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("criteria store poisoned".to_string()))?;
        Ok(guard.get(ocid).cloned())
    }
}
