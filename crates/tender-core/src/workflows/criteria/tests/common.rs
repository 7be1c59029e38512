use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::response::Response;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use crate::workflows::criteria::construction::CriteriaBuilder;
use crate::workflows::criteria::domain::{
    AwardCriteria, AwardCriteriaDetails, Coefficient, CoefficientValue, Conversion,
    ConversionRelatesTo, Criterion, CriterionRelatesTo, ExpectedValue, ItemReference,
    MainProcurementCategory, NumericValue, Requirement, RequirementDataType, RequirementGroup,
    RequirementValue, TenderCriteriaRequest,
};
use crate::workflows::criteria::identifier::{
    CoefficientId, ConversionId, CriterionId, IdGenerator, RequirementGroupId, RequirementId,
};
use crate::workflows::criteria::repository::{
    CriteriaRepository, InMemoryCriteriaRepository, RepositoryError, TenderCriteriaRecord,
};
use crate::workflows::criteria::router::criteria_router;
use crate::workflows::criteria::service::TenderCriteriaService;
use crate::workflows::criteria::validation::CriteriaValidator;

pub(super) fn item(id: &str, lot: &str) -> ItemReference {
    ItemReference {
        id: id.to_string(),
        related_lot: lot.to_string(),
    }
}

pub(super) fn items() -> Vec<ItemReference> {
    vec![item("item-1", "lot-1"), item("item-2", "lot-1")]
}

pub(super) fn requirement(
    id: &str,
    data_type: RequirementDataType,
    value: Option<RequirementValue>,
) -> Requirement {
    Requirement {
        id: RequirementId::temporal(id),
        title: format!("Requirement {id}"),
        description: None,
        data_type,
        value,
        period: None,
    }
}

pub(super) fn group(id: &str, requirements: Vec<Requirement>) -> RequirementGroup {
    RequirementGroup {
        id: RequirementGroupId::temporal(id),
        description: None,
        requirements,
    }
}

pub(super) fn criterion(
    id: &str,
    relates_to: Option<CriterionRelatesTo>,
    related_item: Option<&str>,
    groups: Vec<RequirementGroup>,
) -> Criterion {
    Criterion {
        id: CriterionId::temporal(id),
        title: format!("Criterion {id}"),
        description: None,
        relates_to,
        related_item: related_item.map(str::to_string),
        source: None,
        requirement_groups: groups,
    }
}

pub(super) fn conversion(
    id: &str,
    requirement_id: &str,
    coefficients: Vec<Coefficient>,
) -> Conversion {
    Conversion {
        id: ConversionId::temporal(id),
        relates_to: ConversionRelatesTo::Requirement,
        related_item: requirement_id.to_string(),
        rationale: format!("Conversion {id}"),
        description: None,
        coefficients,
    }
}

pub(super) fn coefficient(id: &str, value: CoefficientValue, rate: Decimal) -> Coefficient {
    Coefficient {
        id: CoefficientId::temporal(id),
        value,
        rate,
        related_option: None,
    }
}

/// Rated-criteria request with one tender-scoped criterion (a boolean and an
/// integer requirement) and a conversion bound to each requirement. Cast
/// contributions add up to 0.3, well inside the goods ceiling.
pub(super) fn base_request() -> TenderCriteriaRequest {
    TenderCriteriaRequest {
        main_procurement_category: Some(MainProcurementCategory::Goods),
        award_criteria: AwardCriteria::RatedCriteria,
        award_criteria_details: Some(AwardCriteriaDetails::Automated),
        items: items(),
        criteria: Some(vec![criterion(
            "crit-1",
            None,
            None,
            vec![group(
                "group-1",
                vec![
                    requirement(
                        "req-1",
                        RequirementDataType::Boolean,
                        Some(RequirementValue::ExpectedValue(ExpectedValue::Boolean(
                            true,
                        ))),
                    ),
                    requirement(
                        "req-2",
                        RequirementDataType::Integer,
                        Some(RequirementValue::MinValue(NumericValue::Integer(5))),
                    ),
                ],
            )],
        )]),
        conversions: Some(vec![
            conversion(
                "conv-1",
                "req-1",
                vec![coefficient(
                    "coef-1",
                    CoefficientValue::Boolean(true),
                    dec!(0.9),
                )],
            ),
            conversion(
                "conv-2",
                "req-2",
                vec![
                    coefficient("coef-2", CoefficientValue::Integer(5), dec!(0.8)),
                    coefficient("coef-3", CoefficientValue::Integer(7), dec!(0.9)),
                ],
            ),
        ]),
    }
}

/// Tenderer-scoped string criterion with a conversion whose coefficients all
/// carry related options.
pub(super) fn string_fixture() -> (Criterion, Conversion) {
    let string_criterion = criterion(
        "crit-str",
        Some(CriterionRelatesTo::Tenderer),
        None,
        vec![group(
            "group-str",
            vec![requirement("req-str", RequirementDataType::String, None)],
        )],
    );

    let mut economy = coefficient(
        "coef-str-1",
        CoefficientValue::Text("economy".to_string()),
        dec!(0.95),
    );
    economy.related_option = Some("option-1".to_string());
    let mut premium = coefficient(
        "coef-str-2",
        CoefficientValue::Text("premium".to_string()),
        dec!(1.00),
    );
    premium.related_option = Some("option-2".to_string());

    (
        string_criterion,
        conversion("conv-str", "req-str", vec![economy, premium]),
    )
}

pub(super) fn validator() -> CriteriaValidator {
    CriteriaValidator::new()
}

/// Deterministic generator emitting UUID-shaped ids in sequence.
#[derive(Debug, Default)]
pub(super) struct SequenceGenerator {
    counter: AtomicU64,
}

impl IdGenerator for SequenceGenerator {
    fn generate(&self) -> String {
        let next = self.counter.fetch_add(1, Ordering::Relaxed);
        format!("00000000-0000-4000-8000-{next:012x}")
    }
}

pub(super) fn build_service() -> (
    TenderCriteriaService<InMemoryCriteriaRepository, SequenceGenerator>,
    Arc<InMemoryCriteriaRepository>,
) {
    let repository = Arc::new(InMemoryCriteriaRepository::default());
    let service = TenderCriteriaService::with_parts(
        repository.clone(),
        CriteriaValidator::new(),
        CriteriaBuilder::with_generator(SequenceGenerator::default()),
    );
    (service, repository)
}

pub(super) fn criteria_router_with_service(
    service: TenderCriteriaService<InMemoryCriteriaRepository, SequenceGenerator>,
) -> axum::Router {
    criteria_router(Arc::new(service))
}

pub(super) struct ConflictRepository;

impl CriteriaRepository for ConflictRepository {
    fn insert(
        &self,
        _record: TenderCriteriaRecord,
    ) -> Result<TenderCriteriaRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn fetch(&self, _ocid: &str) -> Result<Option<TenderCriteriaRecord>, RepositoryError> {
        Ok(None)
    }
}

pub(super) struct UnavailableRepository;

impl CriteriaRepository for UnavailableRepository {
    fn insert(
        &self,
        _record: TenderCriteriaRecord,
    ) -> Result<TenderCriteriaRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _ocid: &str) -> Result<Option<TenderCriteriaRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
