use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::lab_report::TestResult;

/// Category assigned to tests with a missing or blank category
pub const FALLBACK_CATEGORY: &str = "Other";

/// Whether sections are split further by subcategory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupingLayout {
    /// Category, then subcategory
    #[default]
    Nested,

    /// Category only
    Flat,
}

impl GroupingLayout {
    pub fn uses_subcategories(self) -> bool {
        self == GroupingLayout::Nested
    }
}

/// Tests keyed by category, then by subcategory, in first-appearance order.
///
/// The subcategory key is `None` for tests without one, and for every test
/// when subcategories are not in use.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedTests {
    groups: IndexMap<String, IndexMap<Option<String>, Vec<TestResult>>>,
}

impl GroupedTests {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of categories
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Total number of tests across all groups
    pub fn test_count(&self) -> usize {
        self.groups
            .values()
            .flat_map(IndexMap::values)
            .map(Vec::len)
            .sum()
    }

    /// Category keys in order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Subgroups of one category
    pub fn category(&self, name: &str) -> Option<&IndexMap<Option<String>, Vec<TestResult>>> {
        self.groups.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexMap<Option<String>, Vec<TestResult>>)> {
        self.groups.iter().map(|(category, subgroups)| (category.as_str(), subgroups))
    }

    /// Flatten back to a sequence in group-major order
    pub fn into_flat(self) -> Vec<TestResult> {
        self.groups
            .into_values()
            .flat_map(IndexMap::into_values)
            .flatten()
            .collect()
    }
}

/// Group tests by category, and by subcategory when `use_subcategories` is set.
pub fn group_tests<I>(tests: I, use_subcategories: bool) -> GroupedTests
where
    I: IntoIterator<Item = TestResult>,
{
    let mut groups: IndexMap<String, IndexMap<Option<String>, Vec<TestResult>>> = IndexMap::new();

    for test in tests {
        let category = non_blank(test.test_category.as_deref())
            .unwrap_or(FALLBACK_CATEGORY)
            .to_string();
        let subcategory = if use_subcategories {
            non_blank(test.test_subcategory.as_deref()).map(str::to_string)
        } else {
            None
        };

        groups
            .entry(category)
            .or_default()
            .entry(subcategory)
            .or_default()
            .push(test);
    }

    debug!(categories = groups.len(), use_subcategories, "grouped tests");
    GroupedTests { groups }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|value| !value.trim().is_empty())
}
