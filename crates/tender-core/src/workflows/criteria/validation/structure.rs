use std::collections::HashSet;

use super::{CriteriaViolation, EntityKind};
use crate::workflows::criteria::domain::{Conversion, Criterion, ItemReference};

/// Shape checks: every present list non-empty, ids unique at every level,
/// and conversions only alongside criteria.
pub(super) fn check(
    items: &[ItemReference],
    criteria: Option<&[Criterion]>,
    conversions: Option<&[Conversion]>,
) -> Result<(), CriteriaViolation> {
    if items.is_empty() {
        return Err(CriteriaViolation::EmptyList(EntityKind::Items));
    }
    ensure_unique(EntityKind::Items, items.iter().map(|item| item.id.as_str()))?;

    if let Some(criteria) = criteria {
        if criteria.is_empty() {
            return Err(CriteriaViolation::EmptyList(EntityKind::Criteria));
        }
        for criterion in criteria {
            if criterion.requirement_groups.is_empty() {
                return Err(CriteriaViolation::EmptyList(EntityKind::RequirementGroups));
            }
            for group in &criterion.requirement_groups {
                if group.requirements.is_empty() {
                    return Err(CriteriaViolation::EmptyList(EntityKind::Requirements));
                }
            }
        }
        ensure_unique(
            EntityKind::Criteria,
            criteria.iter().map(|criterion| criterion.id.as_str()),
        )?;
        ensure_unique(
            EntityKind::RequirementGroups,
            criteria
                .iter()
                .flat_map(|criterion| criterion.requirement_groups.iter())
                .map(|group| group.id.as_str()),
        )?;
        ensure_unique(
            EntityKind::Requirements,
            criteria
                .iter()
                .flat_map(|criterion| criterion.requirement_groups.iter())
                .flat_map(|group| group.requirements.iter())
                .map(|requirement| requirement.id.as_str()),
        )?;
    }

    if let Some(conversions) = conversions {
        if conversions.is_empty() {
            return Err(CriteriaViolation::EmptyList(EntityKind::Conversions));
        }
        for conversion in conversions {
            if conversion.coefficients.is_empty() {
                return Err(CriteriaViolation::EmptyList(EntityKind::Coefficients));
            }
        }
        ensure_unique(
            EntityKind::Conversions,
            conversions.iter().map(|conversion| conversion.id.as_str()),
        )?;
        ensure_unique(
            EntityKind::Coefficients,
            conversions
                .iter()
                .flat_map(|conversion| conversion.coefficients.iter())
                .map(|coefficient| coefficient.id.as_str()),
        )?;

        if criteria.is_none() {
            return Err(CriteriaViolation::ConversionsWithoutCriteria);
        }
    }

    Ok(())
}

fn ensure_unique<'a>(
    kind: EntityKind,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), CriteriaViolation> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CriteriaViolation::NotUniqueIds(kind));
        }
    }
    Ok(())
}
