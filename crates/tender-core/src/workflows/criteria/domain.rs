use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::identifier::{
    CoefficientId, ConversionId, CriterionId, RequirementGroupId, RequirementId,
};

/// Award criteria selected for the tender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AwardCriteria {
    PriceOnly,
    CostOnly,
    QualityOnly,
    RatedCriteria,
}

impl AwardCriteria {
    pub const fn label(self) -> &'static str {
        match self {
            AwardCriteria::PriceOnly => "priceOnly",
            AwardCriteria::CostOnly => "costOnly",
            AwardCriteria::QualityOnly => "qualityOnly",
            AwardCriteria::RatedCriteria => "ratedCriteria",
        }
    }

    pub const fn is_price_only(self) -> bool {
        matches!(self, AwardCriteria::PriceOnly)
    }
}

impl fmt::Display for AwardCriteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How award criteria responses are weighed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AwardCriteriaDetails {
    Automated,
    Manual,
}

impl AwardCriteriaDetails {
    pub const fn label(self) -> &'static str {
        match self {
            AwardCriteriaDetails::Automated => "automated",
            AwardCriteriaDetails::Manual => "manual",
        }
    }
}

impl fmt::Display for AwardCriteriaDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Procurement category driving the cast-coefficient ceiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MainProcurementCategory {
    Goods,
    Works,
    Services,
}

impl MainProcurementCategory {
    pub const fn label(self) -> &'static str {
        match self {
            MainProcurementCategory::Goods => "goods",
            MainProcurementCategory::Works => "works",
            MainProcurementCategory::Services => "services",
        }
    }
}

impl fmt::Display for MainProcurementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Scope a criterion applies to. Absent means tender-level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriterionRelatesTo {
    Tenderer,
    Lot,
    Item,
    Award,
    Qualification,
}

impl CriterionRelatesTo {
    pub const fn label(self) -> &'static str {
        match self {
            CriterionRelatesTo::Tenderer => "tenderer",
            CriterionRelatesTo::Lot => "lot",
            CriterionRelatesTo::Item => "item",
            CriterionRelatesTo::Award => "award",
            CriterionRelatesTo::Qualification => "qualification",
        }
    }
}

impl fmt::Display for CriterionRelatesTo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a conversion translates. Only requirement conversions are checked
/// against the criteria tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ConversionRelatesTo {
    Requirement,
    Observation,
    Option,
}

/// Declared origin of a criterion, assigned during construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CriteriaSource {
    Tenderer,
    ProcuringEntity,
    Buyer,
}

/// Primitive type of a requirement response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequirementDataType {
    Boolean,
    String,
    Number,
    Integer,
}

impl RequirementDataType {
    pub const fn label(self) -> &'static str {
        match self {
            RequirementDataType::Boolean => "boolean",
            RequirementDataType::String => "string",
            RequirementDataType::Number => "number",
            RequirementDataType::Integer => "integer",
        }
    }
}

impl fmt::Display for RequirementDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Flat item reference supplied by the surrounding tender request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemReference {
    pub id: String,
    pub related_lot: String,
}

/// Top-level evaluation condition, optionally scoped to a lot, item, or the
/// tenderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Criterion {
    pub id: CriterionId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relates_to: Option<CriterionRelatesTo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<CriteriaSource>,
    pub requirement_groups: Vec<RequirementGroup>,
}

/// OR-alternative bundle of requirements under one criterion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementGroup {
    pub id: RequirementGroupId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub requirements: Vec<Requirement>,
}

/// Single measurable condition, typed and optionally value-constrained.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub id: RequirementId,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub data_type: RequirementDataType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<RequirementValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub period: Option<RequirementPeriod>,
}

/// Constraint attached to a requirement. A requirement with no value accepts
/// any response of its data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RequirementValue {
    ExpectedValue(ExpectedValue),
    MinValue(NumericValue),
    MaxValue(NumericValue),
    #[serde(rename_all = "camelCase")]
    RangeValue {
        min_value: NumericValue,
        max_value: NumericValue,
    },
}

impl RequirementValue {
    /// Primitive type carried by the variant (the lower bound's, for ranges).
    pub fn data_type(&self) -> RequirementDataType {
        match self {
            RequirementValue::ExpectedValue(value) => value.data_type(),
            RequirementValue::MinValue(value) | RequirementValue::MaxValue(value) => {
                value.data_type()
            }
            RequirementValue::RangeValue { min_value, .. } => min_value.data_type(),
        }
    }

    /// Whether every primitive carried by the variant matches `data_type`.
    pub fn matches_data_type(&self, data_type: RequirementDataType) -> bool {
        match self {
            RequirementValue::ExpectedValue(value) => value.data_type() == data_type,
            RequirementValue::MinValue(value) | RequirementValue::MaxValue(value) => {
                value.data_type() == data_type
            }
            RequirementValue::RangeValue {
                min_value,
                max_value,
            } => min_value.data_type() == data_type && max_value.data_type() == data_type,
        }
    }
}

/// Exact response a requirement expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedValue {
    Boolean(bool),
    Integer(i64),
    Number(Decimal),
    Text(String),
}

impl ExpectedValue {
    pub fn data_type(&self) -> RequirementDataType {
        match self {
            ExpectedValue::Boolean(_) => RequirementDataType::Boolean,
            ExpectedValue::Integer(_) => RequirementDataType::Integer,
            ExpectedValue::Number(_) => RequirementDataType::Number,
            ExpectedValue::Text(_) => RequirementDataType::String,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            ExpectedValue::Integer(value) => Some(Decimal::from(*value)),
            ExpectedValue::Number(value) => Some(*value),
            ExpectedValue::Boolean(_) | ExpectedValue::Text(_) => None,
        }
    }
}

/// Numeric bound of a min/max/range constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumericValue {
    Integer(i64),
    Number(Decimal),
}

impl NumericValue {
    pub fn data_type(&self) -> RequirementDataType {
        match self {
            NumericValue::Integer(_) => RequirementDataType::Integer,
            NumericValue::Number(_) => RequirementDataType::Number,
        }
    }

    /// Promote to an exact decimal for cross-type comparison.
    pub fn as_decimal(&self) -> Decimal {
        match self {
            NumericValue::Integer(value) => Decimal::from(*value),
            NumericValue::Number(value) => *value,
        }
    }
}

/// Validity window of a date-bounded requirement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequirementPeriod {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

/// Rule translating a requirement's fulfillment into a cost coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversion {
    pub id: ConversionId,
    pub relates_to: ConversionRelatesTo,
    pub related_item: String,
    pub rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub coefficients: Vec<Coefficient>,
}

/// One discrete value-to-rate mapping within a conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coefficient {
    pub id: CoefficientId,
    pub value: CoefficientValue,
    #[serde(rename = "coefficient")]
    pub rate: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_option: Option<String>,
}

/// Requirement response value a coefficient applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoefficientValue {
    Boolean(bool),
    Integer(i64),
    Number(Decimal),
    Text(String),
}

impl CoefficientValue {
    pub fn data_type(&self) -> RequirementDataType {
        match self {
            CoefficientValue::Boolean(_) => RequirementDataType::Boolean,
            CoefficientValue::Integer(_) => RequirementDataType::Integer,
            CoefficientValue::Number(_) => RequirementDataType::Number,
            CoefficientValue::Text(_) => RequirementDataType::String,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CoefficientValue::Integer(value) => Some(Decimal::from(*value)),
            CoefficientValue::Number(value) => Some(*value),
            CoefficientValue::Boolean(_) | CoefficientValue::Text(_) => None,
        }
    }
}

impl fmt::Display for CoefficientValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoefficientValue::Boolean(value) => write!(f, "{value}"),
            CoefficientValue::Integer(value) => write!(f, "{value}"),
            CoefficientValue::Number(value) => write!(f, "{value}"),
            CoefficientValue::Text(value) => write!(f, "'{value}'"),
        }
    }
}

/// Criteria portion of a tender request as handed over by the parsing layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderCriteriaRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_procurement_category: Option<MainProcurementCategory>,
    pub award_criteria: AwardCriteria,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub award_criteria_details: Option<AwardCriteriaDetails>,
    pub items: Vec<ItemReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criteria: Option<Vec<Criterion>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversions: Option<Vec<Conversion>>,
}
