use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tender_core::workflows::criteria::{
    AwardCriteria, AwardCriteriaDetails, Coefficient, CoefficientId, CoefficientValue, Conversion,
    ConversionId, ConversionRelatesTo, Criterion, CriterionId, CriterionRelatesTo, CriteriaBuilder,
    CriteriaValidator, CriteriaViolation, IdGenerator, InMemoryCriteriaRepository,
    ItemReference, MainProcurementCategory, NumericValue, Requirement, RequirementDataType,
    RequirementGroup, RequirementGroupId, RequirementId, RequirementValue, TenderCriteriaRequest,
    TenderCriteriaService,
};

#[derive(Debug, Default)]
struct CountingGenerator {
    counter: AtomicU64,
}

impl IdGenerator for CountingGenerator {
    fn generate(&self) -> String {
        let next = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("00000000-0000-4000-9000-{next:012x}")
    }
}

fn requirement(id: &str, value: Option<RequirementValue>) -> Requirement {
    Requirement {
        id: RequirementId::temporal(id),
        title: format!("Requirement {id}"),
        description: None,
        data_type: RequirementDataType::Integer,
        value,
        period: None,
    }
}

fn criterion(
    id: &str,
    relates_to: Option<CriterionRelatesTo>,
    related_item: Option<&str>,
    requirements: Vec<Requirement>,
) -> Criterion {
    Criterion {
        id: CriterionId::temporal(id),
        title: format!("Criterion {id}"),
        description: None,
        relates_to,
        related_item: related_item.map(str::to_string),
        source: None,
        requirement_groups: vec![RequirementGroup {
            id: RequirementGroupId::temporal(format!("{id}-group")),
            description: None,
            requirements,
        }],
    }
}

fn conversion(id: &str, requirement_id: &str, rate: Decimal) -> Conversion {
    Conversion {
        id: ConversionId::temporal(id),
        relates_to: ConversionRelatesTo::Requirement,
        related_item: requirement_id.to_string(),
        rationale: format!("Conversion {id}"),
        description: None,
        coefficients: vec![Coefficient {
            id: CoefficientId::temporal(format!("{id}-coef")),
            value: CoefficientValue::Integer(1),
            rate,
            related_option: None,
        }],
    }
}

fn rated_request() -> TenderCriteriaRequest {
    TenderCriteriaRequest {
        main_procurement_category: Some(MainProcurementCategory::Goods),
        award_criteria: AwardCriteria::RatedCriteria,
        award_criteria_details: Some(AwardCriteriaDetails::Automated),
        items: vec![
            ItemReference {
                id: "item-1".to_string(),
                related_lot: "lot-1".to_string(),
            },
            ItemReference {
                id: "item-2".to_string(),
                related_lot: "lot-2".to_string(),
            },
        ],
        criteria: Some(vec![
            criterion(
                "crit-tender",
                None,
                None,
                vec![
                    requirement("req-a", Some(RequirementValue::MinValue(NumericValue::Integer(1)))),
                    requirement("req-b", None),
                ],
            ),
            criterion(
                "crit-lot1",
                Some(CriterionRelatesTo::Lot),
                Some("lot-1"),
                vec![requirement("req-c", None)],
            ),
            criterion(
                "crit-item2",
                Some(CriterionRelatesTo::Item),
                Some("item-2"),
                vec![requirement("req-d", None)],
            ),
        ]),
        conversions: Some(vec![
            conversion("conv-a", "req-a", dec!(0.9)),
            conversion("conv-b", "req-b", dec!(0.95)),
            conversion("conv-c", "req-c", dec!(0.8)),
            conversion("conv-d", "req-d", dec!(0.85)),
        ]),
    }
}

#[test]
fn a_full_tree_passes_validation_and_constructs_bijectively() {
    let request = rated_request();
    CriteriaValidator::new()
        .validate(&request)
        .expect("the rated request is consistent");

    // Remember which requirement each conversion pointed at, by position.
    let criteria = request.criteria.clone().expect("criteria present");
    let conversions = request.conversions.clone().expect("conversions present");
    let original_targets: Vec<String> = conversions
        .iter()
        .map(|conversion| conversion.related_item.clone())
        .collect();

    let builder = CriteriaBuilder::with_generator(CountingGenerator::default());
    let created = builder
        .build(
            request.award_criteria,
            request.award_criteria_details,
            Some(criteria),
            Some(conversions),
        )
        .expect("validated input constructs");

    // Map each original requirement id onto its rebuilt counterpart by
    // position in the tree walk.
    let originals: Vec<&Requirement> = request
        .criteria
        .as_ref()
        .expect("criteria present")
        .iter()
        .flat_map(|criterion| criterion.requirement_groups.iter())
        .flat_map(|group| group.requirements.iter())
        .collect();
    let rebuilt: Vec<&Requirement> = created
        .criteria
        .iter()
        .flat_map(|criterion| criterion.requirement_groups.iter())
        .flat_map(|group| group.requirements.iter())
        .collect();
    assert_eq!(originals.len(), rebuilt.len());

    for (index, target) in original_targets.iter().enumerate() {
        let position = originals
            .iter()
            .position(|requirement| requirement.id.as_str() == target)
            .expect("conversion target exists in the original tree");
        assert_eq!(
            created.conversions[index].related_item,
            rebuilt[position].id.as_str(),
            "conversion {index} must follow its requirement through the rewrite"
        );
    }

    // Permanent ids everywhere, and no id used twice.
    let mut seen = HashSet::new();
    for requirement in &rebuilt {
        assert!(requirement.id.is_permanent());
        assert!(seen.insert(requirement.id.as_str().to_string()));
    }
    for conversion in &created.conversions {
        assert!(conversion.id.is_permanent());
        assert!(seen.insert(conversion.id.as_str().to_string()));
    }
}

#[test]
fn lot_totals_are_checked_against_the_category_ceiling() {
    let mut request = rated_request();
    // lot-1: (1 - 0.9) + (1 - 0.95) tender-wide + (1 - 0.45) = 0.7 > 0.6
    request.conversions.as_mut().expect("conversions present")[2].coefficients[0].rate =
        dec!(0.45);

    match CriteriaValidator::new().validate(&request) {
        Err(CriteriaViolation::CastCoefficientExceedsLimit { computed, lot, .. }) => {
            assert_eq!(computed, dec!(0.7));
            assert_eq!(lot.as_deref(), Some("lot-1"));
        }
        other => panic!("expected the lot-1 total to breach the ceiling, got {other:?}"),
    }
}

#[test]
fn price_only_tenders_reject_conversions_outright() {
    let mut request = rated_request();
    request.award_criteria = AwardCriteria::PriceOnly;

    assert!(matches!(
        CriteriaValidator::new().validate(&request),
        Err(CriteriaViolation::UnexpectedConversions)
    ));
}

#[test]
fn the_service_persists_created_trees_for_later_retrieval() {
    let repository = Arc::new(InMemoryCriteriaRepository::default());
    let service = TenderCriteriaService::new(repository);

    let record = service
        .create("ocds-b3wdp1-MD-1700000000001", rated_request())
        .expect("creation succeeds");
    assert_eq!(
        record.award_criteria_details,
        AwardCriteriaDetails::Automated
    );

    let fetched = service
        .get("ocds-b3wdp1-MD-1700000000001")
        .expect("record retrievable");
    assert_eq!(fetched, record);
}
