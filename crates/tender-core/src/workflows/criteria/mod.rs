//! Tender criteria validation and construction.
//!
//! A tender request arrives with a criteria/conversions tree referencing
//! itself through client-supplied temporal ids. The validation pass checks
//! the tree's shape, its cross-references against the tender's items and
//! lots, the award-criteria policy, and the cast-coefficient ceiling; the
//! construction pass then rebuilds the tree with server-generated permanent
//! ids before it is handed to persistence.

pub mod construction;
pub mod domain;
pub mod identifier;
pub mod repository;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use construction::{ConstructionError, CreatedCriteria, CriteriaBuilder};
pub use domain::{
    AwardCriteria, AwardCriteriaDetails, Coefficient, CoefficientValue, Conversion,
    ConversionRelatesTo, Criterion, CriteriaSource, CriterionRelatesTo, ExpectedValue,
    ItemReference, MainProcurementCategory, NumericValue, Requirement, RequirementDataType,
    RequirementGroup, RequirementPeriod, RequirementValue, TenderCriteriaRequest,
};
pub use identifier::{
    CoefficientId, ConversionId, CriterionId, EntityId, IdGenerator, IdState, InvalidPermanentId,
    RequirementGroupId, RequirementId, UuidGenerator,
};
pub use repository::{
    CriteriaRepository, CriteriaSummaryView, InMemoryCriteriaRepository, RepositoryError,
    TenderCriteriaRecord,
};
pub use router::criteria_router;
pub use service::{CriteriaServiceError, TenderCriteriaService};
pub use validation::{CriteriaValidator, CriteriaViolation, EntityKind};
