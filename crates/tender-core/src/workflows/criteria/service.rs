use std::sync::Arc;

use super::construction::{ConstructionError, CriteriaBuilder};
use super::domain::TenderCriteriaRequest;
use super::identifier::{IdGenerator, UuidGenerator};
use super::repository::{CriteriaRepository, RepositoryError, TenderCriteriaRecord};
use super::validation::{CriteriaValidator, CriteriaViolation};

/// Service composing the validator, the construction pipeline, and the
/// persistence collaborator.
pub struct TenderCriteriaService<R, G = UuidGenerator> {
    repository: Arc<R>,
    validator: CriteriaValidator,
    builder: CriteriaBuilder<G>,
}

impl<R> TenderCriteriaService<R, UuidGenerator>
where
    R: CriteriaRepository + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            validator: CriteriaValidator::new(),
            builder: CriteriaBuilder::new(),
        }
    }
}

impl<R, G> TenderCriteriaService<R, G>
where
    R: CriteriaRepository + 'static,
    G: IdGenerator + 'static,
{
    pub fn with_parts(
        repository: Arc<R>,
        validator: CriteriaValidator,
        builder: CriteriaBuilder<G>,
    ) -> Self {
        Self {
            repository,
            validator,
            builder,
        }
    }

    /// Run the full validation sequence without creating anything.
    pub fn validate(&self, request: &TenderCriteriaRequest) -> Result<(), CriteriaServiceError> {
        self.validator.validate(request)?;
        Ok(())
    }

    /// Validate the request, construct the permanent-id tree, and persist it.
    pub fn create(
        &self,
        ocid: impl Into<String>,
        request: TenderCriteriaRequest,
    ) -> Result<TenderCriteriaRecord, CriteriaServiceError> {
        self.validator.validate(&request)?;

        let TenderCriteriaRequest {
            award_criteria,
            award_criteria_details,
            criteria,
            conversions,
            ..
        } = request;
        let created = self
            .builder
            .build(award_criteria, award_criteria_details, criteria, conversions)?;

        let record = TenderCriteriaRecord::from_created(ocid.into(), created);
        let stored = self.repository.insert(record)?;
        Ok(stored)
    }

    /// Fetch a stored criteria tree for API responses.
    pub fn get(&self, ocid: &str) -> Result<TenderCriteriaRecord, CriteriaServiceError> {
        let record = self
            .repository
            .fetch(ocid)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

/// Error raised by the criteria service.
#[derive(Debug, thiserror::Error)]
pub enum CriteriaServiceError {
    #[error(transparent)]
    Validation(#[from] CriteriaViolation),
    #[error(transparent)]
    Construction(#[from] ConstructionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
