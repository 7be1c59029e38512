mod cast;
mod policy;
mod relations;
mod structure;

use std::fmt;

use chrono::{Datelike, Utc};
use rust_decimal::Decimal;

use super::domain::{
    AwardCriteria, CriterionRelatesTo, MainProcurementCategory, RequirementDataType,
    TenderCriteriaRequest,
};

/// Collection whose shape a structural rule was violated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Items,
    Criteria,
    RequirementGroups,
    Requirements,
    Conversions,
    Coefficients,
}

impl EntityKind {
    pub const fn label(self) -> &'static str {
        match self {
            EntityKind::Items => "items",
            EntityKind::Criteria => "criteria",
            EntityKind::RequirementGroups => "requirement groups",
            EntityKind::Requirements => "requirements",
            EntityKind::Conversions => "conversions",
            EntityKind::Coefficients => "coefficients",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation failures raised while checking a criteria/conversions tree.
///
/// Grouped the way callers consume them: structural shape errors, cross-entity
/// reference errors, data-correctness errors, and award-criteria policy
/// errors. The first violation encountered aborts the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CriteriaViolation {
    #[error("{0} must not be empty")]
    EmptyList(EntityKind),
    #[error("{0} contain duplicate ids")]
    NotUniqueIds(EntityKind),
    #[error("conversions were supplied without criteria")]
    ConversionsWithoutCriteria,
    #[error("criterion '{criterion_id}' relates to {relates_to} but carries no relatedItem")]
    MissingRelatedItem {
        criterion_id: String,
        relates_to: CriterionRelatesTo,
    },
    #[error(
        "criterion '{criterion_id}' relates to the tenderer and must not reference '{related_item}'"
    )]
    UnexpectedRelatedItem {
        criterion_id: String,
        related_item: String,
    },
    #[error("criterion '{criterion_id}' references unknown item '{related_item}'")]
    UnknownItemReference {
        criterion_id: String,
        related_item: String,
    },
    #[error("criterion '{criterion_id}' references unknown lot '{related_item}'")]
    UnknownLotReference {
        criterion_id: String,
        related_item: String,
    },
    #[error(
        "requirement '{requirement_id}' carries a {found} value but is declared as {expected}"
    )]
    DatatypeMismatch {
        requirement_id: String,
        expected: RequirementDataType,
        found: RequirementDataType,
    },
    #[error("requirement '{requirement_id}' range is invalid: min {min} must be below max {max}")]
    InvalidRange {
        requirement_id: String,
        min: Decimal,
        max: Decimal,
    },
    #[error("requirement '{requirement_id}' period is invalid")]
    InvalidPeriod { requirement_id: String },
    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: EntityKind, id: String },
    #[error("conversion '{conversion_id}' references unknown requirement '{requirement_id}'")]
    UnknownRequirementReference {
        conversion_id: String,
        requirement_id: String,
    },
    #[error(
        "requirement '{requirement_id}' is already bound to a conversion; '{conversion_id}' cannot bind it again"
    )]
    RequirementAlreadyBound {
        conversion_id: String,
        requirement_id: String,
    },
    #[error("coefficient '{coefficient_id}' rate {rate} is outside [0.01, 1.00]")]
    InvalidCoefficientRate {
        coefficient_id: String,
        rate: Decimal,
    },
    #[error("conversion '{conversion_id}' repeats coefficient value {value}")]
    DuplicateCoefficientValue {
        conversion_id: String,
        value: String,
    },
    #[error(
        "coefficient '{coefficient_id}' carries a {found} value but requirement '{requirement_id}' is declared as {expected}"
    )]
    CoefficientDatatypeMismatch {
        coefficient_id: String,
        requirement_id: String,
        expected: RequirementDataType,
        found: RequirementDataType,
    },
    #[error(
        "coefficient '{coefficient_id}' value {value} falls outside the value bounds of requirement '{requirement_id}'"
    )]
    CoefficientValueIncompatible {
        coefficient_id: String,
        requirement_id: String,
        value: String,
    },
    #[error(
        "coefficient '{coefficient_id}' must carry relatedOption because requirement '{requirement_id}' is string-typed"
    )]
    MissingRelatedOption {
        coefficient_id: String,
        requirement_id: String,
    },
    #[error("awardCriteriaDetails is required when awardCriteria is {award_criteria}")]
    MissingAwardCriteriaDetails { award_criteria: AwardCriteria },
    #[error(
        "criteria and conversions are required when awardCriteria is {award_criteria} and awardCriteriaDetails is automated"
    )]
    CriteriaAndConversionRequired { award_criteria: AwardCriteria },
    #[error("conversions are not allowed when awardCriteria is priceOnly")]
    UnexpectedConversions,
    #[error("criterion '{criterion_id}' must relate to the tenderer when awardCriteria is priceOnly")]
    NonTendererCriteriaForPriceOnly { criterion_id: String },
    #[error("cast coefficient {computed} exceeds the {category} ceiling of {limit}")]
    CastCoefficientExceedsLimit {
        category: MainProcurementCategory,
        limit: Decimal,
        computed: Decimal,
        lot: Option<String>,
    },
}

/// Runs the structural, relational, policy, and cast-coefficient checks over
/// one criteria/conversions tree, short-circuiting on the first violation.
///
/// The current year is captured at construction so a validator instance is a
/// pure function of its input.
#[derive(Debug, Clone)]
pub struct CriteriaValidator {
    current_year: i32,
}

impl CriteriaValidator {
    pub fn new() -> Self {
        Self {
            current_year: Utc::now().year(),
        }
    }

    pub fn with_current_year(current_year: i32) -> Self {
        Self { current_year }
    }

    pub fn validate(&self, request: &TenderCriteriaRequest) -> Result<(), CriteriaViolation> {
        let criteria = request.criteria.as_deref();
        let conversions = request.conversions.as_deref();

        structure::check(&request.items, criteria, conversions)?;
        relations::check_criteria_scope(&request.items, criteria.unwrap_or_default())?;
        relations::check_requirements_and_conversions(
            criteria.unwrap_or_default(),
            conversions.unwrap_or_default(),
            self.current_year,
        )?;
        policy::check(
            request.award_criteria,
            request.award_criteria_details,
            criteria,
            conversions,
        )?;
        cast::check(
            request.main_procurement_category,
            &request.items,
            criteria.unwrap_or_default(),
            conversions.unwrap_or_default(),
        )?;
        Ok(())
    }
}

impl Default for CriteriaValidator {
    fn default() -> Self {
        Self::new()
    }
}
