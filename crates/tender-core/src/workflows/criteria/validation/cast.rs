use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::CriteriaViolation;
use crate::workflows::criteria::domain::{
    Conversion, ConversionRelatesTo, Criterion, CriterionRelatesTo, ItemReference,
    MainProcurementCategory,
};

/// Scope a conversion's contribution counts toward, derived from the
/// criterion owning its target requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope<'a> {
    Tender,
    Lot(&'a str),
}

const fn ceiling_for(category: MainProcurementCategory) -> Decimal {
    match category {
        MainProcurementCategory::Goods => dec!(0.60),
        MainProcurementCategory::Works => dec!(0.80),
        MainProcurementCategory::Services => dec!(0.40),
    }
}

/// Bounds the aggregate cost-adjustment potential of non-price criteria.
///
/// Each requirement conversion contributes `1 - min(rate)`. Contributions are
/// summed per lot (tender-scoped conversions count toward every lot) or, when
/// no lot/item-scoped criteria exist, into a single tender-wide total. Every
/// total must stay within the category ceiling.
pub(super) fn check(
    category: Option<MainProcurementCategory>,
    items: &[ItemReference],
    criteria: &[Criterion],
    conversions: &[Conversion],
) -> Result<(), CriteriaViolation> {
    let Some(category) = category else {
        return Ok(());
    };
    let limit = ceiling_for(category);

    let lot_of_item: HashMap<&str, &str> = items
        .iter()
        .map(|item| (item.id.as_str(), item.related_lot.as_str()))
        .collect();

    let mut scope_of_requirement: HashMap<&str, Option<Scope>> = HashMap::new();
    let mut has_scoped_criteria = false;
    for criterion in criteria {
        let scope = match (criterion.relates_to, criterion.related_item.as_deref()) {
            (None, _) | (Some(CriterionRelatesTo::Tenderer), _) => Some(Scope::Tender),
            (Some(CriterionRelatesTo::Lot), Some(lot)) => {
                has_scoped_criteria = true;
                Some(Scope::Lot(lot))
            }
            (Some(CriterionRelatesTo::Item), Some(item)) => {
                has_scoped_criteria = true;
                lot_of_item.get(item).copied().map(Scope::Lot)
            }
            _ => None,
        };
        for group in &criterion.requirement_groups {
            for requirement in &group.requirements {
                scope_of_requirement.insert(requirement.id.as_str(), scope);
            }
        }
    }

    let contributions: Vec<(Option<Scope>, Decimal)> = conversions
        .iter()
        .filter(|conversion| conversion.relates_to == ConversionRelatesTo::Requirement)
        .filter_map(|conversion| {
            let min_rate = conversion
                .coefficients
                .iter()
                .map(|coefficient| coefficient.rate)
                .min()?;
            let scope = scope_of_requirement
                .get(conversion.related_item.as_str())
                .copied()
                .flatten();
            Some((scope, Decimal::ONE - min_rate))
        })
        .collect();

    let tender_total: Decimal = contributions
        .iter()
        .filter(|(scope, _)| *scope == Some(Scope::Tender))
        .map(|(_, contribution)| *contribution)
        .sum();

    if !has_scoped_criteria {
        if tender_total > limit {
            return Err(CriteriaViolation::CastCoefficientExceedsLimit {
                category,
                limit,
                computed: tender_total,
                lot: None,
            });
        }
        return Ok(());
    }

    let mut lots: Vec<&str> = Vec::new();
    for item in items {
        if !lots.contains(&item.related_lot.as_str()) {
            lots.push(item.related_lot.as_str());
        }
    }

    for lot in lots {
        let lot_total: Decimal = contributions
            .iter()
            .filter(|(scope, _)| matches!(scope, Some(Scope::Lot(scoped)) if *scoped == lot))
            .map(|(_, contribution)| *contribution)
            .sum();
        let total = tender_total + lot_total;
        if total > limit {
            return Err(CriteriaViolation::CastCoefficientExceedsLimit {
                category,
                limit,
                computed: total,
                lot: Some(lot.to_string()),
            });
        }
    }

    Ok(())
}
