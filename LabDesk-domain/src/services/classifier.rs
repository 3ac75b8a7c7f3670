use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entities::classification::{Classification, StatusKind};
use crate::entities::lab_report::TestResult;
use crate::services::reference_range::{leading_number, RangeDialect, ReferenceRange};

/// How a single-bound range treats a value sitting exactly on the bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundInclusivity {
    /// `<5` flags 5 as High, `>10` flags 10 as Low
    Inclusive,

    /// Only values strictly past the bound are flagged
    Exclusive,
}

/// Status given to a value that does not read as a number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NonNumericOutcome {
    Normal,
    Unclassified,
}

/// Full set of knobs the classifier runs with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifierPolicy {
    pub dialect: RangeDialect,
    pub single_bound: BoundInclusivity,
    pub non_numeric: NonNumericOutcome,
}

impl ClassifierPolicy {
    /// Report-builder behavior
    pub const STANDARD: ClassifierPolicy = ClassifierPolicy {
        dialect: RangeDialect::Normalized,
        single_bound: BoundInclusivity::Inclusive,
        non_numeric: NonNumericOutcome::Normal,
    };

    /// Public report page behavior
    pub const PUBLIC_VIEW: ClassifierPolicy = ClassifierPolicy {
        dialect: RangeDialect::EnDashSplit,
        single_bound: BoundInclusivity::Exclusive,
        non_numeric: NonNumericOutcome::Unclassified,
    };
}

impl Default for ClassifierPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Named classifier variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationStrategy {
    /// Qualitative detection, normalized intervals, inclusive single bounds
    #[default]
    Standard,

    /// En-dash intervals only, strict bounds, blank status for non-numeric values
    PublicView,
}

impl ClassificationStrategy {
    pub fn policy(self) -> ClassifierPolicy {
        match self {
            ClassificationStrategy::Standard => ClassifierPolicy::STANDARD,
            ClassificationStrategy::PublicView => ClassifierPolicy::PUBLIC_VIEW,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ClassificationStrategy::Standard => "standard",
            ClassificationStrategy::PublicView => "public-view",
        }
    }
}

impl fmt::Display for ClassificationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ClassificationStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(ClassificationStrategy::Standard),
            "public-view" | "public_view" | "publicview" => Ok(ClassificationStrategy::PublicView),
            other => Err(format!("Unknown classification strategy: {}", other)),
        }
    }
}

/// Classify a raw value against a reference range with the standard strategy
pub fn classify(value: &str, reference_range: &str) -> Classification {
    classify_with(value, reference_range, ClassifierPolicy::STANDARD)
}

/// Classify a test result's own value and range
pub fn classify_test(test: &TestResult, strategy: ClassificationStrategy) -> Classification {
    classify_with(&test.test_value, &test.normal_range, strategy.policy())
}

/// Classify a raw value against a reference range under `policy`.
///
/// Never fails. Ranges that cannot be read leave the value Normal, except
/// that a non-numeric value under [`NonNumericOutcome::Unclassified`] always
/// comes back unclassified with a blank label.
pub fn classify_with(value: &str, reference_range: &str, policy: ClassifierPolicy) -> Classification {
    let range = ReferenceRange::parse_with(reference_range, policy.dialect);

    let classification = match range {
        ReferenceRange::Qualitative => classify_qualitative(value),
        numeric_range => match leading_number(value) {
            Some(number) => Classification::from_status(compare(number, numeric_range, policy.single_bound)),
            None => match policy.non_numeric {
                NonNumericOutcome::Normal => Classification::from_status(StatusKind::Normal),
                NonNumericOutcome::Unclassified => Classification::unclassified(""),
            },
        },
    };

    debug!(
        value,
        range = reference_range,
        status = ?classification.status,
        "classified test value"
    );
    classification
}

fn classify_qualitative(value: &str) -> Classification {
    let normalized = value.trim().to_lowercase();
    match normalized.as_str() {
        "negative" => Classification::from_status(StatusKind::Negative),
        "positive" => Classification::from_status(StatusKind::Positive),
        _ => Classification::unclassified(value),
    }
}

fn compare(value: f64, range: ReferenceRange, single_bound: BoundInclusivity) -> StatusKind {
    let inclusive = single_bound == BoundInclusivity::Inclusive;
    match range {
        ReferenceRange::Between { low, .. } if value < low => StatusKind::Low,
        ReferenceRange::Between { high, .. } if value > high => StatusKind::High,
        ReferenceRange::Below { high } if value > high || (inclusive && value == high) => StatusKind::High,
        ReferenceRange::Above { low } if value < low || (inclusive && value == low) => StatusKind::Low,
        _ => StatusKind::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::classification::{ArrowKind, Severity};
    use proptest::prelude::*;

    fn public_view(value: &str, range: &str) -> Classification {
        classify_with(value, range, ClassifierPolicy::PUBLIC_VIEW)
    }

    #[test]
    fn test_interval_classification() {
        let normal = classify("95", "70-110");
        assert_eq!(normal.status, StatusKind::Normal);
        assert_eq!(normal.arrow, ArrowKind::None);
        assert!(!normal.is_abnormal);

        let low = classify("60", "70-110");
        assert_eq!(low.status, StatusKind::Low);
        assert_eq!(low.arrow, ArrowKind::Down);
        assert!(low.is_abnormal);

        let high = classify("120", "70-110");
        assert_eq!(high.status, StatusKind::High);
        assert_eq!(high.arrow, ArrowKind::Up);
        assert!(high.is_abnormal);
    }

    #[test]
    fn test_interval_bounds_are_inside() {
        assert_eq!(classify("70", "70-110").status, StatusKind::Normal);
        assert_eq!(classify("110", "70 – 110").status, StatusKind::Normal);
    }

    #[test]
    fn test_qualitative_ranges() {
        assert_eq!(classify("negative", "Negative").status, StatusKind::Negative);
        assert_eq!(classify(" NEGATIVE ", "Negative").status, StatusKind::Negative);

        let positive = classify("positive", "Negative");
        assert_eq!(positive.status, StatusKind::Positive);
        assert!(positive.is_abnormal);
        assert_eq!(positive.arrow, ArrowKind::None);

        let other = classify("Trace", "Negative");
        assert_eq!(other.status, StatusKind::Unclassified);
        assert_eq!(other.label, "Trace");
        assert_eq!(other.arrow, ArrowKind::None);
    }

    #[test]
    fn test_numeric_value_against_qualitative_range() {
        let result = classify("12", "Positive > 10");
        assert_eq!(result.status, StatusKind::Unclassified);
        assert_eq!(result.label, "12");
    }

    #[test]
    fn test_non_numeric_value_is_normal() {
        assert_eq!(classify("abc", "70-110").status, StatusKind::Normal);
        assert_eq!(classify("abc", "<5").status, StatusKind::Normal);
    }

    #[test]
    fn test_single_bounds_are_inclusive() {
        assert_eq!(classify("10", "<5").status, StatusKind::High);
        assert_eq!(classify("5", "<5").status, StatusKind::High);
        assert_eq!(classify("4.9", "<5").status, StatusKind::Normal);

        assert_eq!(classify("5", ">10").status, StatusKind::Low);
        assert_eq!(classify("10", ">10").status, StatusKind::Low);
        assert_eq!(classify("11", ">10").status, StatusKind::Normal);
    }

    #[test]
    fn test_unreadable_ranges_are_normal() {
        for range in ["", "see note", "Up to 60", "M: 13–16; F: 11.5–14.5"] {
            let result = classify("5", range);
            assert_eq!(result.status, StatusKind::Normal, "range {range:?}");
            assert_eq!(result.arrow, ArrowKind::None);
        }
    }

    #[test]
    fn test_value_with_trailing_flag() {
        assert_eq!(classify("12.5 H", "4-11").status, StatusKind::High);
    }

    #[test]
    fn test_public_view_strict_bounds() {
        assert_eq!(public_view("5", "<5").status, StatusKind::Normal);
        assert_eq!(public_view("6", "<5").status, StatusKind::High);
        assert_eq!(public_view("10", ">10").status, StatusKind::Normal);
        assert_eq!(public_view("9", "> 10").status, StatusKind::Low);
    }

    #[test]
    fn test_public_view_en_dash_interval() {
        let low = public_view("60", "70–110");
        assert_eq!(low.status, StatusKind::Low);
        assert_eq!(low.arrow, ArrowKind::Down);

        assert_eq!(public_view("120", "70 – 110").status, StatusKind::High);
        assert_eq!(public_view("60", "70-110").status, StatusKind::Normal);
    }

    #[test]
    fn test_public_view_non_numeric_is_blank() {
        let result = public_view("abc", "70–110");
        assert_eq!(result.status, StatusKind::Unclassified);
        assert_eq!(result.label, "");
        assert_eq!(result.severity().color(), "#222222");

        assert_eq!(public_view("negative", "Negative").status, StatusKind::Unclassified);
        assert_eq!(public_view("5", "Negative").status, StatusKind::Normal);
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!("standard".parse::<ClassificationStrategy>(), Ok(ClassificationStrategy::Standard));
        assert_eq!("Public-View".parse::<ClassificationStrategy>(), Ok(ClassificationStrategy::PublicView));
        assert_eq!("public_view".parse::<ClassificationStrategy>(), Ok(ClassificationStrategy::PublicView));
        assert!("strict".parse::<ClassificationStrategy>().is_err());
        assert_eq!(ClassificationStrategy::PublicView.to_string(), "public-view");
        assert_eq!(ClassificationStrategy::default(), ClassificationStrategy::Standard);
    }

    #[test]
    fn test_classify_test_uses_strategy() {
        let test = TestResult::new("TSH", Some("Thyroid"), "5", "<5");
        assert_eq!(classify_test(&test, ClassificationStrategy::Standard).status, StatusKind::High);
        assert_eq!(classify_test(&test, ClassificationStrategy::PublicView).status, StatusKind::Normal);
    }

    fn range_text() -> impl Strategy<Value = String> {
        prop_oneof![
            ".*",
            "[<>]? ?-?[0-9]{0,4}(\\.[0-9]{0,3})?( ?[-–] ?-?[0-9.]{0,5})?",
            "(Negative|positive|NEGATIVE)( ?/ ?(Negative|Positive))?",
        ]
    }

    fn policy() -> impl Strategy<Value = ClassifierPolicy> {
        prop_oneof![Just(ClassifierPolicy::STANDARD), Just(ClassifierPolicy::PUBLIC_VIEW)]
    }

    proptest! {
        #[test]
        fn prop_classification_is_total_and_consistent(
            value in prop_oneof![".*", "-?[0-9]{0,5}(\\.[0-9]{0,3})?[ a-zA-Z]{0,3}"],
            range in range_text(),
            policy in policy(),
        ) {
            let result = classify_with(&value, &range, policy);
            prop_assert_eq!(result.arrow, ArrowKind::for_status(result.status));
            prop_assert_eq!(result.is_abnormal, result.severity() == Severity::Abnormal);
        }

        #[test]
        fn prop_values_inside_interval_are_normal(
            low in 0u32..1000,
            span in 0u32..1000,
            offset in 0u32..1000,
            policy in policy(),
        ) {
            let high = low + span;
            let value = low + offset % (span + 1);
            let result = classify_with(&value.to_string(), &format!("{low}–{high}"), policy);
            prop_assert_eq!(result.status, StatusKind::Normal);
        }
    }
}
