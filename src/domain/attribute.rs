use std::{
    collections::{BTreeSet, HashSet},
    fmt,
};

use serde::{Deserialize, Serialize};

/// The identifier of a DUT attribute, e.g. `system_build_target`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeId(String);

impl AttributeId {
    /// Portage overlay of the build running on the DUT.
    pub const SYSTEM_BUILD_TARGET: &'static str = "system_build_target";
    /// Physical location of the fingerprint sensor.
    pub const FINGERPRINT_LOCATION: &'static str = "fingerprint_location";
    /// Hardware design of the DUT.
    pub const DESIGN_ID: &'static str = "design_id";
    /// Major version of the RO firmware.
    pub const FIRMWARE_RO_MAJOR_VERSION: &'static str = "firmware_ro_major_version";
    /// Minor version of the RO firmware.
    pub const FIRMWARE_RO_MINOR_VERSION: &'static str = "firmware_ro_minor_version";
    /// Patch version of the RO firmware.
    pub const FIRMWARE_RO_PATCH_VERSION: &'static str = "firmware_ro_patch_version";

    /// Creates a new attribute identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AttributeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for AttributeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single predicate of a device selection.
///
/// A device matches if the value of its attribute `attribute_id` is one of
/// `values`. Values are held in a sorted set so that every rendering of a
/// criterion is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutCriterion {
    /// The attribute being constrained.
    pub attribute_id: AttributeId,
    /// Accepted values of the attribute.
    #[serde(default)]
    pub values: BTreeSet<String>,
}

impl DutCriterion {
    /// Creates a criterion from an attribute and any collection of values.
    #[must_use]
    pub fn new<I, S>(attribute_id: impl Into<AttributeId>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attribute_id: attribute_id.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// The values shared by this criterion and `other`.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> BTreeSet<String> {
        self.values.intersection(&other.values).cloned().collect()
    }
}

/// An attribute declared in a [`DutAttributeList`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutAttribute {
    /// Identifier referenced by [`DutCriterion::attribute_id`].
    pub id: AttributeId,
}

/// The schema of attributes a coverage rule may reference.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutAttributeList {
    /// All known attributes.
    #[serde(default)]
    pub dut_attributes: Vec<DutAttribute>,
}

impl DutAttributeList {
    /// Builds a schema containing the given attribute ids.
    #[must_use]
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<AttributeId>,
    {
        Self {
            dut_attributes: ids
                .into_iter()
                .map(|id| DutAttribute { id: id.into() })
                .collect(),
        }
    }

    /// The set of valid attribute identifiers.
    #[must_use]
    pub fn ids(&self) -> HashSet<&str> {
        self.dut_attributes.iter().map(|a| a.id.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criterion_values_are_sorted_and_deduplicated() {
        let criterion = DutCriterion::new("attr", ["b", "a", "b"]);
        assert_eq!(
            criterion.values.into_iter().collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn intersect_returns_shared_values() {
        let a = DutCriterion::new("attr", ["1", "2"]);
        let b = DutCriterion::new("attr", ["2", "3"]);
        assert_eq!(a.intersect(&b), BTreeSet::from(["2".to_string()]));
    }

    #[test]
    fn attribute_id_serializes_as_plain_string() {
        let id = AttributeId::new(AttributeId::DESIGN_ID);
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""design_id""#);
    }

    #[test]
    fn schema_ids() {
        let schema = DutAttributeList::from_ids(["a", "b"]);
        let ids = schema.ids();
        assert!(ids.contains("a"));
        assert!(ids.contains("b"));
        assert!(!ids.contains("c"));
    }
}
