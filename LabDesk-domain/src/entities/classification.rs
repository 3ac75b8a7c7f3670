use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome of classifying one test value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    /// Value within the reference range
    Normal,

    /// Value below the reference range
    Low,

    /// Value above the reference range
    High,

    /// Qualitative positive result
    Positive,

    /// Qualitative negative result
    Negative,

    /// No status could be assigned
    Unclassified,
}

impl StatusKind {
    /// Display label
    pub fn label(self) -> &'static str {
        match self {
            StatusKind::Normal => "Normal",
            StatusKind::Low => "Low",
            StatusKind::High => "High",
            StatusKind::Positive => "Positive",
            StatusKind::Negative => "Negative",
            StatusKind::Unclassified => "",
        }
    }

    /// How the status is flagged on the report
    pub fn severity(self) -> Severity {
        match self {
            StatusKind::Low | StatusKind::High | StatusKind::Positive => Severity::Abnormal,
            StatusKind::Normal | StatusKind::Negative => Severity::Normal,
            StatusKind::Unclassified => Severity::Neutral,
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction indicator printed next to out-of-range values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ArrowKind {
    None,
    Down,
    Up,
}

impl ArrowKind {
    /// Arrow implied by a status
    pub fn for_status(status: StatusKind) -> Self {
        match status {
            StatusKind::Low => ArrowKind::Down,
            StatusKind::High => ArrowKind::Up,
            _ => ArrowKind::None,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            ArrowKind::None => "",
            ArrowKind::Down => "↓",
            ArrowKind::Up => "↑",
        }
    }
}

/// Display severity of a status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Rendered in the alert color
    Abnormal,

    /// Rendered in the reassuring color
    Normal,

    /// Rendered in the body text color
    Neutral,
}

impl Severity {
    /// Hex color used by the report layouts
    pub fn color(self) -> &'static str {
        match self {
            Severity::Abnormal => "#d32f2f",
            Severity::Normal => "#388e3c",
            Severity::Neutral => "#222222",
        }
    }
}

/// Classification of one test value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub status: StatusKind,
    pub arrow: ArrowKind,
    pub is_abnormal: bool,

    /// Text shown in the status column
    pub label: String,
}

impl Classification {
    /// Classification carrying the status' own label and arrow
    pub fn from_status(status: StatusKind) -> Self {
        Self {
            status,
            arrow: ArrowKind::for_status(status),
            is_abnormal: status.severity() == Severity::Abnormal,
            label: status.label().to_string(),
        }
    }

    /// Unclassified result shown with the given text
    pub fn unclassified(label: impl Into<String>) -> Self {
        Self {
            status: StatusKind::Unclassified,
            arrow: ArrowKind::None,
            is_abnormal: false,
            label: label.into(),
        }
    }

    pub fn severity(&self) -> Severity {
        self.status.severity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_mapping() {
        assert_eq!(StatusKind::Low.severity(), Severity::Abnormal);
        assert_eq!(StatusKind::High.severity(), Severity::Abnormal);
        assert_eq!(StatusKind::Positive.severity(), Severity::Abnormal);
        assert_eq!(StatusKind::Normal.severity(), Severity::Normal);
        assert_eq!(StatusKind::Negative.severity(), Severity::Normal);
        assert_eq!(StatusKind::Unclassified.severity(), Severity::Neutral);
    }

    #[test]
    fn test_arrows_only_for_out_of_range() {
        assert_eq!(ArrowKind::for_status(StatusKind::Low), ArrowKind::Down);
        assert_eq!(ArrowKind::for_status(StatusKind::High), ArrowKind::Up);
        assert_eq!(ArrowKind::for_status(StatusKind::Positive), ArrowKind::None);
        assert_eq!(ArrowKind::for_status(StatusKind::Unclassified), ArrowKind::None);
    }

    #[test]
    fn test_from_status_flags_abnormal() {
        let high = Classification::from_status(StatusKind::High);
        assert!(high.is_abnormal);
        assert_eq!(high.label, "High");
        assert_eq!(high.arrow.glyph(), "↑");

        let negative = Classification::from_status(StatusKind::Negative);
        assert!(!negative.is_abnormal);
        assert_eq!(negative.severity().color(), "#388e3c");
    }

    #[test]
    fn test_unclassified_keeps_label() {
        let result = Classification::unclassified("Trace");
        assert_eq!(result.status, StatusKind::Unclassified);
        assert_eq!(result.label, "Trace");
        assert!(!result.is_abnormal);
        assert_eq!(result.severity().color(), "#222222");
    }
}
