use serde::{Deserialize, Serialize};

use crate::domain::DutCriterion;

/// Test case tag filters selecting the tests of a [`TestSuite`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCriteria {
    /// Tests must carry all of these tags.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Tests carrying any of these tags are excluded.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tag_excludes: Vec<String>,
}

/// A selection of tests.
///
/// The coverage engine never inspects test suites, it only carries them from
/// the rule that contributed them to the output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSuite {
    /// Optional name of the suite.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Tag criteria selecting the tests in the suite.
    #[serde(default)]
    pub test_case_tag_criteria: TagCriteria,
}

impl TestSuite {
    /// An unnamed suite selecting tests by tags.
    #[must_use]
    pub fn from_tags(tags: Vec<String>, tag_excludes: Vec<String>) -> Self {
        Self {
            name: String::new(),
            test_case_tag_criteria: TagCriteria { tags, tag_excludes },
        }
    }

    /// A named suite selecting tests carrying `tag`.
    #[must_use]
    pub fn named(name: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            test_case_tag_criteria: TagCriteria {
                tags: vec![tag.into()],
                tag_excludes: Vec::new(),
            },
        }
    }
}

/// Pairs a device selection with the test suites to run on matching devices.
///
/// Within one rule every [`DutCriterion`] constrains a distinct attribute; a
/// device is selected when it satisfies all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRule {
    /// Name of the rule, built from the names of the requirements it covers.
    pub name: String,
    /// The device selection.
    #[serde(default)]
    pub dut_criteria: Vec<DutCriterion>,
    /// Test suites to run on selected devices.
    #[serde(default)]
    pub test_suites: Vec<TestSuite>,
}

impl CoverageRule {
    /// The rule's criteria ordered by attribute id.
    #[must_use]
    pub fn sorted_criteria(&self) -> Vec<&DutCriterion> {
        let mut criteria: Vec<_> = self.dut_criteria.iter().collect();
        criteria.sort_by(|a, b| a.attribute_id.cmp(&b.attribute_id));
        criteria
    }
}
