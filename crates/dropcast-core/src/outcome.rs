//! Predicted outcome labels and their advice text

use serde::{Deserialize, Serialize};
use std::fmt;

/// Student outcome predicted by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Class label 0
    Dropout,
    /// Class label 1
    Enrolled,
    /// Class label 2
    Graduate,
    /// Any label outside the trained domain
    Unknown,
}

impl Outcome {
    /// All outcomes the classifier can produce, in label order
    pub const KNOWN: [Outcome; 3] = [Self::Dropout, Self::Enrolled, Self::Graduate];

    /// Map a class label to its outcome. Out-of-domain labels become `Unknown`.
    pub fn from_label(label: i64) -> Self {
        match label {
            0 => Self::Dropout,
            1 => Self::Enrolled,
            2 => Self::Graduate,
            _ => Self::Unknown,
        }
    }

    /// The class label, if this is a trained outcome
    pub fn label(&self) -> Option<i64> {
        match self {
            Self::Dropout => Some(0),
            Self::Enrolled => Some(1),
            Self::Graduate => Some(2),
            Self::Unknown => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Dropout => "Dropout",
            Self::Enrolled => "Enrolled",
            Self::Graduate => "Graduate",
            Self::Unknown => "Unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Dropout => "Student likely to drop out",
            Self::Enrolled => "Student likely to remain enrolled",
            Self::Graduate => "Student likely to graduate successfully",
            Self::Unknown => "Unable to determine outcome",
        }
    }

    /// One-line summary shown alongside the result
    pub fn advice(&self) -> Option<&'static str> {
        match self {
            Self::Dropout => Some(
                "Risk factors for dropout may include poor academic performance, \
                 financial difficulties, or personal circumstances.",
            ),
            Self::Enrolled => Some(
                "The student is likely to remain enrolled but may need support \
                 to progress to graduation.",
            ),
            Self::Graduate => Some(
                "The student shows strong indicators for academic success and graduation.",
            ),
            Self::Unknown => None,
        }
    }

    pub fn recommendations(&self) -> &'static [&'static str] {
        match self {
            Self::Dropout => &[
                "Consider providing additional academic support",
                "Review financial aid options",
                "Schedule academic counseling session",
            ],
            Self::Enrolled => &[
                "Monitor academic progress closely",
                "Provide career guidance",
                "Encourage participation in student support services",
            ],
            Self::Graduate => &[
                "Consider advanced learning opportunities",
                "Provide information about graduate studies",
                "Encourage mentorship roles for other students",
            ],
            Self::Unknown => &[],
        }
    }
}

impl From<i64> for Outcome {
    fn from(label: i64) -> Self {
        Self::from_label(label)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_mapping() {
        assert_eq!(Outcome::from_label(0), Outcome::Dropout);
        assert_eq!(Outcome::from_label(1), Outcome::Enrolled);
        assert_eq!(Outcome::from_label(2), Outcome::Graduate);
        assert_eq!(Outcome::from_label(3), Outcome::Unknown);
        assert_eq!(Outcome::from_label(-1), Outcome::Unknown);
    }

    #[test]
    fn test_label_roundtrip_for_known() {
        for (idx, outcome) in Outcome::KNOWN.iter().enumerate() {
            assert_eq!(outcome.label(), Some(idx as i64));
            assert_eq!(outcome.recommendations().len(), 3);
            assert!(outcome.advice().is_some());
        }
        assert_eq!(Outcome::Unknown.label(), None);
        assert!(Outcome::Unknown.recommendations().is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Outcome::Graduate.to_string(), "Graduate");
        assert_eq!(Outcome::Unknown.description(), "Unable to determine outcome");
    }
}
