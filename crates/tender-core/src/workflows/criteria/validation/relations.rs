use std::collections::{HashMap, HashSet};

use chrono::Datelike;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::{CriteriaViolation, EntityKind};
use crate::workflows::criteria::domain::{
    Coefficient, CoefficientValue, Conversion, ConversionRelatesTo, Criterion, CriterionRelatesTo,
    ExpectedValue, ItemReference, Requirement, RequirementDataType, RequirementValue,
};

const MIN_RATE: Decimal = dec!(0.01);
const MAX_RATE: Decimal = dec!(1.00);

/// Criterion scoping: relatedItem presence and item/lot existence.
pub(super) fn check_criteria_scope(
    items: &[ItemReference],
    criteria: &[Criterion],
) -> Result<(), CriteriaViolation> {
    let item_ids: HashSet<&str> = items.iter().map(|item| item.id.as_str()).collect();
    let lot_ids: HashSet<&str> = items.iter().map(|item| item.related_lot.as_str()).collect();

    for criterion in criteria {
        match (criterion.relates_to, criterion.related_item.as_deref()) {
            (None, _) => {}
            (Some(CriterionRelatesTo::Tenderer), None) => {}
            (Some(CriterionRelatesTo::Tenderer), Some(related_item)) => {
                return Err(CriteriaViolation::UnexpectedRelatedItem {
                    criterion_id: criterion.id.as_str().to_string(),
                    related_item: related_item.to_string(),
                });
            }
            (Some(relates_to), None) => {
                return Err(CriteriaViolation::MissingRelatedItem {
                    criterion_id: criterion.id.as_str().to_string(),
                    relates_to,
                });
            }
            (Some(CriterionRelatesTo::Item), Some(related_item)) => {
                if !item_ids.contains(related_item) {
                    return Err(CriteriaViolation::UnknownItemReference {
                        criterion_id: criterion.id.as_str().to_string(),
                        related_item: related_item.to_string(),
                    });
                }
            }
            (Some(CriterionRelatesTo::Lot), Some(related_item)) => {
                if !lot_ids.contains(related_item) {
                    return Err(CriteriaViolation::UnknownLotReference {
                        criterion_id: criterion.id.as_str().to_string(),
                        related_item: related_item.to_string(),
                    });
                }
            }
            (Some(CriterionRelatesTo::Award | CriterionRelatesTo::Qualification), Some(_)) => {}
        }
    }
    Ok(())
}

/// Requirement-level data rules plus the conversion/coefficient relation.
pub(super) fn check_requirements_and_conversions(
    criteria: &[Criterion],
    conversions: &[Conversion],
    current_year: i32,
) -> Result<(), CriteriaViolation> {
    let requirements = check_requirement_tree(criteria, current_year)?;
    check_conversions(&requirements, conversions)
}

/// Walks the criteria tree once: re-verifies id uniqueness per entity and
/// checks each requirement's value/period. Returns the requirement index the
/// conversion pass resolves against.
fn check_requirement_tree<'a>(
    criteria: &'a [Criterion],
    current_year: i32,
) -> Result<HashMap<&'a str, &'a Requirement>, CriteriaViolation> {
    let mut criterion_ids = HashSet::new();
    let mut group_ids = HashSet::new();
    let mut requirements: HashMap<&str, &Requirement> = HashMap::new();

    for criterion in criteria {
        if !criterion_ids.insert(criterion.id.as_str()) {
            return Err(CriteriaViolation::DuplicateId {
                kind: EntityKind::Criteria,
                id: criterion.id.as_str().to_string(),
            });
        }
        for group in &criterion.requirement_groups {
            if !group_ids.insert(group.id.as_str()) {
                return Err(CriteriaViolation::DuplicateId {
                    kind: EntityKind::RequirementGroups,
                    id: group.id.as_str().to_string(),
                });
            }
            for requirement in &group.requirements {
                if requirements
                    .insert(requirement.id.as_str(), requirement)
                    .is_some()
                {
                    return Err(CriteriaViolation::DuplicateId {
                        kind: EntityKind::Requirements,
                        id: requirement.id.as_str().to_string(),
                    });
                }
                check_requirement_value(requirement)?;
                check_requirement_period(requirement, current_year)?;
            }
        }
    }

    Ok(requirements)
}

fn check_requirement_value(requirement: &Requirement) -> Result<(), CriteriaViolation> {
    let Some(value) = &requirement.value else {
        return Ok(());
    };

    if !value.matches_data_type(requirement.data_type) {
        return Err(CriteriaViolation::DatatypeMismatch {
            requirement_id: requirement.id.as_str().to_string(),
            expected: requirement.data_type,
            found: value.data_type(),
        });
    }

    if let RequirementValue::RangeValue {
        min_value,
        max_value,
    } = value
    {
        let min = min_value.as_decimal();
        let max = max_value.as_decimal();
        if min >= max {
            return Err(CriteriaViolation::InvalidRange {
                requirement_id: requirement.id.as_str().to_string(),
                min,
                max,
            });
        }
    }

    Ok(())
}

fn check_requirement_period(
    requirement: &Requirement,
    current_year: i32,
) -> Result<(), CriteriaViolation> {
    let Some(period) = &requirement.period else {
        return Ok(());
    };

    if period.start_date.year() > current_year
        || period.end_date.year() > current_year
        || period.start_date > period.end_date
    {
        return Err(CriteriaViolation::InvalidPeriod {
            requirement_id: requirement.id.as_str().to_string(),
        });
    }
    Ok(())
}

/// Requirement conversions must resolve 1:1 onto requirements; coefficients
/// must fit the bound requirement's type and value constraints.
fn check_conversions(
    requirements: &HashMap<&str, &Requirement>,
    conversions: &[Conversion],
) -> Result<(), CriteriaViolation> {
    let mut unbound: HashSet<&str> = requirements.keys().copied().collect();

    for conversion in conversions {
        if conversion.relates_to != ConversionRelatesTo::Requirement {
            continue;
        }

        let requirement = match requirements.get(conversion.related_item.as_str()) {
            Some(requirement) => *requirement,
            None => {
                return Err(CriteriaViolation::UnknownRequirementReference {
                    conversion_id: conversion.id.as_str().to_string(),
                    requirement_id: conversion.related_item.clone(),
                });
            }
        };

        if !unbound.remove(conversion.related_item.as_str()) {
            return Err(CriteriaViolation::RequirementAlreadyBound {
                conversion_id: conversion.id.as_str().to_string(),
                requirement_id: conversion.related_item.clone(),
            });
        }

        check_coefficients(conversion, requirement)?;
    }

    Ok(())
}

/// Normalized key for coefficient-value uniqueness. Numbers collapse scale so
/// 1.0 and 1.00 collide; strings are exempt.
#[derive(PartialEq, Eq, Hash)]
enum ValueKey {
    Boolean(bool),
    Numeric(Decimal),
}

fn value_key(value: &CoefficientValue) -> Option<ValueKey> {
    match value {
        CoefficientValue::Boolean(value) => Some(ValueKey::Boolean(*value)),
        CoefficientValue::Integer(value) => Some(ValueKey::Numeric(Decimal::from(*value))),
        CoefficientValue::Number(value) => Some(ValueKey::Numeric(value.normalize())),
        CoefficientValue::Text(_) => None,
    }
}

fn check_coefficients(
    conversion: &Conversion,
    requirement: &Requirement,
) -> Result<(), CriteriaViolation> {
    let mut seen_values = HashSet::new();

    for coefficient in &conversion.coefficients {
        if coefficient.rate < MIN_RATE || coefficient.rate > MAX_RATE {
            return Err(CriteriaViolation::InvalidCoefficientRate {
                coefficient_id: coefficient.id.as_str().to_string(),
                rate: coefficient.rate,
            });
        }

        if let Some(key) = value_key(&coefficient.value) {
            if !seen_values.insert(key) {
                return Err(CriteriaViolation::DuplicateCoefficientValue {
                    conversion_id: conversion.id.as_str().to_string(),
                    value: coefficient.value.to_string(),
                });
            }
        }

        if coefficient.value.data_type() != requirement.data_type {
            return Err(CriteriaViolation::CoefficientDatatypeMismatch {
                coefficient_id: coefficient.id.as_str().to_string(),
                requirement_id: requirement.id.as_str().to_string(),
                expected: requirement.data_type,
                found: coefficient.value.data_type(),
            });
        }

        check_value_compatibility(coefficient, requirement)?;

        if requirement.data_type == RequirementDataType::String
            && coefficient.related_option.is_none()
        {
            return Err(CriteriaViolation::MissingRelatedOption {
                coefficient_id: coefficient.id.as_str().to_string(),
                requirement_id: requirement.id.as_str().to_string(),
            });
        }
    }

    Ok(())
}

/// Compares the coefficient value against the requirement's value constraint.
/// Numeric comparisons promote through exact decimals; string coefficients
/// are only type-checked.
fn check_value_compatibility(
    coefficient: &Coefficient,
    requirement: &Requirement,
) -> Result<(), CriteriaViolation> {
    let Some(constraint) = &requirement.value else {
        return Ok(());
    };

    let compatible = match &coefficient.value {
        CoefficientValue::Text(_) => true,
        CoefficientValue::Boolean(actual) => match constraint {
            RequirementValue::ExpectedValue(ExpectedValue::Boolean(expected)) => {
                actual == expected
            }
            _ => true,
        },
        CoefficientValue::Integer(_) | CoefficientValue::Number(_) => {
            match coefficient.value.as_decimal() {
                Some(actual) => match constraint {
                    RequirementValue::ExpectedValue(expected) => expected
                        .as_decimal()
                        .map(|value| actual == value)
                        .unwrap_or(true),
                    RequirementValue::MinValue(min) => actual >= min.as_decimal(),
                    RequirementValue::MaxValue(max) => actual <= max.as_decimal(),
                    RequirementValue::RangeValue {
                        min_value,
                        max_value,
                    } => actual >= min_value.as_decimal() && actual <= max_value.as_decimal(),
                },
                None => true,
            }
        }
    };

    if !compatible {
        return Err(CriteriaViolation::CoefficientValueIncompatible {
            coefficient_id: coefficient.id.as_str().to_string(),
            requirement_id: requirement.id.as_str().to_string(),
            value: coefficient.value.to_string(),
        });
    }
    Ok(())
}
