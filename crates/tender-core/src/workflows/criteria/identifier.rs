use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Lifecycle state of an entity identifier.
///
/// Temporal ids are client-supplied placeholders that only exist while a
/// request is being validated and constructed; permanent ids are generated
/// server-side and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdState {
    Temporal,
    Permanent,
}

/// Identifier for one entity kind, tagged with its lifecycle state.
///
/// Two identifiers of the same kind are equal iff their string values are
/// equal, regardless of state, so a temporal placeholder and the permanent id
/// that replaces it can never be conflated by value.
pub struct EntityId<K> {
    value: String,
    state: IdState,
    _kind: PhantomData<K>,
}

/// Raised when a string fails the permanent-id pattern check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid permanent identifier")]
pub struct InvalidPermanentId {
    pub value: String,
}

impl<K> EntityId<K> {
    /// Wrap a client-supplied placeholder. Never fails; no pattern applies.
    pub fn temporal(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            state: IdState::Temporal,
            _kind: PhantomData,
        }
    }

    /// Accept a server-generated identifier, enforcing the UUID pattern.
    pub fn permanent(value: impl Into<String>) -> Result<Self, InvalidPermanentId> {
        let value = value.into();
        if Uuid::try_parse(&value).is_err() {
            return Err(InvalidPermanentId { value });
        }
        Ok(Self::permanent_unchecked(value))
    }

    pub(crate) fn permanent_unchecked(value: String) -> Self {
        Self {
            value,
            state: IdState::Permanent,
            _kind: PhantomData,
        }
    }

    /// Interop entry point for external layers: a permanent id or nothing.
    pub fn parse(value: &str) -> Option<Self> {
        Uuid::try_parse(value)
            .ok()
            .map(|_| Self::permanent_unchecked(value.to_string()))
    }

    fn from_wire(value: String) -> Self {
        if Uuid::try_parse(&value).is_ok() {
            Self::permanent_unchecked(value)
        } else {
            Self::temporal(value)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn state(&self) -> IdState {
        self.state
    }

    pub fn is_permanent(&self) -> bool {
        self.state == IdState::Permanent
    }
}

impl<K> Clone for EntityId<K> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            state: self.state,
            _kind: PhantomData,
        }
    }
}

impl<K> fmt::Debug for EntityId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityId")
            .field("value", &self.value)
            .field("state", &self.state)
            .finish()
    }
}

impl<K> fmt::Display for EntityId<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<K> PartialEq for EntityId<K> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<K> Eq for EntityId<K> {}

impl<K> Hash for EntityId<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<K> Serialize for EntityId<K> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, K> Deserialize<'de> for EntityId<K> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_wire(value))
    }
}

/// Marker kinds so ids for different entities stay distinct types.
#[derive(Debug)]
pub enum CriterionTag {}
#[derive(Debug)]
pub enum RequirementGroupTag {}
#[derive(Debug)]
pub enum RequirementTag {}
#[derive(Debug)]
pub enum ConversionTag {}
#[derive(Debug)]
pub enum CoefficientTag {}

pub type CriterionId = EntityId<CriterionTag>;
pub type RequirementGroupId = EntityId<RequirementGroupTag>;
pub type RequirementId = EntityId<RequirementTag>;
pub type ConversionId = EntityId<ConversionTag>;
pub type CoefficientId = EntityId<CoefficientTag>;

/// Source of fresh permanent identifier strings.
///
/// Injected into the construction pipeline so tests can supply a
/// deterministic sequence instead of the process-wide random source.
pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Production generator backed by random v4 UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporal_and_permanent_ids_compare_by_value() {
        let temporal = CriterionId::temporal("4ce922a4-e008-4ea3-b078-6df69f0c7479");
        let permanent = CriterionId::permanent("4ce922a4-e008-4ea3-b078-6df69f0c7479")
            .expect("uuid text is a valid permanent id");

        assert_eq!(temporal, permanent);
        assert_ne!(temporal.state(), permanent.state());
    }

    #[test]
    fn permanent_rejects_non_uuid_text() {
        let error = RequirementId::permanent("req-1").expect_err("free-form text must fail");
        assert_eq!(error.value, "req-1");
    }

    #[test]
    fn parse_returns_none_for_temporal_shapes() {
        assert!(ConversionId::parse("conv-1").is_none());
        let parsed = ConversionId::parse("b78a4e5f-b2e8-41b6-b6ad-2c2bb4cd7e1c")
            .expect("uuid text parses");
        assert!(parsed.is_permanent());
    }

    #[test]
    fn generated_ids_satisfy_the_permanent_pattern() {
        let generated = UuidGenerator.generate();
        assert!(CoefficientId::parse(&generated).is_some());
    }
}
