use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::domain::{
    AwardCriteria, AwardCriteriaDetails, Coefficient, Conversion, ConversionRelatesTo, Criterion,
    CriteriaSource, CriterionRelatesTo, Requirement, RequirementGroup,
};
use super::identifier::{EntityId, IdGenerator, RequirementId, UuidGenerator};

/// Raised when construction is invoked on input that never passed validation.
/// These are caller contract violations, not domain failures.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstructionError {
    #[error(
        "conversion '{conversion_id}' references requirement '{requirement_id}' that was never assigned a permanent id"
    )]
    DanglingRequirementReference {
        conversion_id: String,
        requirement_id: String,
    },
    #[error("awardCriteriaDetails missing for {award_criteria} at construction time")]
    MissingAwardCriteriaDetails { award_criteria: AwardCriteria },
}

/// Fully rewritten tree with permanent ids, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedCriteria {
    pub award_criteria: AwardCriteria,
    pub award_criteria_details: AwardCriteriaDetails,
    pub criteria: Vec<Criterion>,
    pub conversions: Vec<Conversion>,
}

/// Rebuilds a validated request tree with permanent identifiers, rewriting
/// every conversion's requirement reference through the temporal-to-permanent
/// mapping built while the requirements are emitted.
#[derive(Debug, Clone)]
pub struct CriteriaBuilder<G = UuidGenerator> {
    ids: G,
}

impl CriteriaBuilder<UuidGenerator> {
    pub fn new() -> Self {
        Self { ids: UuidGenerator }
    }
}

impl Default for CriteriaBuilder<UuidGenerator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: IdGenerator> CriteriaBuilder<G> {
    pub fn with_generator(ids: G) -> Self {
        Self { ids }
    }

    pub fn build(
        &self,
        award_criteria: AwardCriteria,
        award_criteria_details: Option<AwardCriteriaDetails>,
        criteria: Option<Vec<Criterion>>,
        conversions: Option<Vec<Conversion>>,
    ) -> Result<CreatedCriteria, ConstructionError> {
        let award_criteria_details = if award_criteria.is_price_only() {
            AwardCriteriaDetails::Automated
        } else {
            award_criteria_details
                .ok_or(ConstructionError::MissingAwardCriteriaDetails { award_criteria })?
        };

        let mut requirement_ids: HashMap<String, String> = HashMap::new();
        let criteria = criteria
            .unwrap_or_default()
            .into_iter()
            .map(|criterion| self.rebuild_criterion(criterion, &mut requirement_ids))
            .collect();
        let conversions = conversions
            .unwrap_or_default()
            .into_iter()
            .map(|conversion| self.rebuild_conversion(conversion, &requirement_ids))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CreatedCriteria {
            award_criteria,
            award_criteria_details,
            criteria,
            conversions,
        })
    }

    fn fresh<K>(&self) -> EntityId<K> {
        EntityId::permanent_unchecked(self.ids.generate())
    }

    fn rebuild_criterion(
        &self,
        criterion: Criterion,
        requirement_ids: &mut HashMap<String, String>,
    ) -> Criterion {
        let Criterion {
            id: _,
            title,
            description,
            relates_to,
            related_item,
            source: _,
            requirement_groups,
        } = criterion;

        // Tenderer-targeted criteria come from a separately declared source.
        let source = match relates_to {
            Some(CriterionRelatesTo::Tenderer) => None,
            _ => Some(CriteriaSource::Tenderer),
        };

        let requirement_groups = requirement_groups
            .into_iter()
            .map(|group| self.rebuild_group(group, requirement_ids))
            .collect();

        Criterion {
            id: self.fresh(),
            title,
            description,
            relates_to,
            related_item,
            source,
            requirement_groups,
        }
    }

    fn rebuild_group(
        &self,
        group: RequirementGroup,
        requirement_ids: &mut HashMap<String, String>,
    ) -> RequirementGroup {
        let RequirementGroup {
            id: _,
            description,
            requirements,
        } = group;

        let requirements = requirements
            .into_iter()
            .map(|requirement| {
                let id: RequirementId = self.fresh();
                requirement_ids.insert(
                    requirement.id.as_str().to_string(),
                    id.as_str().to_string(),
                );
                Requirement { id, ..requirement }
            })
            .collect();

        RequirementGroup {
            id: self.fresh(),
            description,
            requirements,
        }
    }

    fn rebuild_conversion(
        &self,
        conversion: Conversion,
        requirement_ids: &HashMap<String, String>,
    ) -> Result<Conversion, ConstructionError> {
        let Conversion {
            id,
            relates_to,
            related_item,
            rationale,
            description,
            coefficients,
        } = conversion;

        let related_item = match relates_to {
            ConversionRelatesTo::Requirement => requirement_ids
                .get(&related_item)
                .cloned()
                .ok_or_else(|| ConstructionError::DanglingRequirementReference {
                    conversion_id: id.as_str().to_string(),
                    requirement_id: related_item.clone(),
                })?,
            _ => related_item,
        };

        let coefficients = coefficients
            .into_iter()
            .map(|coefficient| Coefficient {
                id: self.fresh(),
                ..coefficient
            })
            .collect();

        Ok(Conversion {
            id: self.fresh(),
            relates_to,
            related_item,
            rationale,
            description,
            coefficients,
        })
    }
}
