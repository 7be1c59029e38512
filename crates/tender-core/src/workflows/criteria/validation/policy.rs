use super::CriteriaViolation;
use crate::workflows::criteria::domain::{
    AwardCriteria, AwardCriteriaDetails, Conversion, Criterion, CriterionRelatesTo,
};

/// Award-criteria policy: which combinations require or forbid criteria and
/// conversions, and the tenderer-only restriction under price-only awards.
pub(super) fn check(
    award_criteria: AwardCriteria,
    award_criteria_details: Option<AwardCriteriaDetails>,
    criteria: Option<&[Criterion]>,
    conversions: Option<&[Conversion]>,
) -> Result<(), CriteriaViolation> {
    if award_criteria.is_price_only() {
        if conversions.is_some() {
            return Err(CriteriaViolation::UnexpectedConversions);
        }
        for criterion in criteria.unwrap_or_default() {
            match criterion.relates_to {
                None | Some(CriterionRelatesTo::Tenderer) => {}
                Some(_) => {
                    return Err(CriteriaViolation::NonTendererCriteriaForPriceOnly {
                        criterion_id: criterion.id.as_str().to_string(),
                    });
                }
            }
        }
        return Ok(());
    }

    let Some(details) = award_criteria_details else {
        return Err(CriteriaViolation::MissingAwardCriteriaDetails { award_criteria });
    };

    if details == AwardCriteriaDetails::Automated && (criteria.is_none() || conversions.is_none()) {
        return Err(CriteriaViolation::CriteriaAndConversionRequired { award_criteria });
    }

    Ok(())
}
