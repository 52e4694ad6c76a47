use serde::{Deserialize, Serialize};

const DUPLICATE_CODES: &[&str] = &["12.6", "4834", "P08"];
const AUTHORIZATION_CODES: &[&str] = &["11.1", "11.2", "11.3", "4808"];
const LATE_PRESENTMENT_CODES: &[&str] = &["12.1", "4842"];

/// Keyword groups checked in order against the lowercased case description.
const DESCRIPTION_PATTERNS: &[(ProcessingErrorKind, &[&str])] = &[
    (
        ProcessingErrorKind::DuplicateProcessing,
        &["duplicate", "multiple", "twice"],
    ),
    (
        ProcessingErrorKind::AuthorizationFailure,
        &["auth", "authorization", "declined"],
    ),
    (
        ProcessingErrorKind::SettlementError,
        &["settlement", "clearing", "batch"],
    ),
    (
        ProcessingErrorKind::AmountMismatch,
        &["amount", "currency", "total"],
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingErrorKind {
    DuplicateProcessing,
    AuthorizationFailure,
    SettlementError,
    AmountMismatch,
    Unknown,
}

impl ProcessingErrorKind {
    pub const fn recommended_action(self) -> &'static str {
        match self {
            ProcessingErrorKind::DuplicateProcessing => {
                "Refund duplicate transaction, review processing controls"
            }
            ProcessingErrorKind::AuthorizationFailure => {
                "Investigate authorization logs, verify merchant compliance"
            }
            ProcessingErrorKind::SettlementError => {
                "Review settlement timing, check batch processing"
            }
            ProcessingErrorKind::AmountMismatch => {
                "Reconcile transaction amounts, verify currency conversion"
            }
            ProcessingErrorKind::Unknown => {
                "Escalate to technical team for detailed investigation"
            }
        }
    }
}

/// Technical reading of a dispute: how likely the processing stack itself is at fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalAssessment {
    pub error_kind: ProcessingErrorKind,
    pub technical_score: u8,
}

/// Network reason codes take precedence; the description only names the error kind.
pub fn technical_assessment(reason_code: Option<&str>, description: &str) -> TechnicalAssessment {
    let code = reason_code.map(str::trim).unwrap_or_default();

    if DUPLICATE_CODES.contains(&code) {
        return TechnicalAssessment {
            error_kind: ProcessingErrorKind::DuplicateProcessing,
            technical_score: 85,
        };
    }
    if AUTHORIZATION_CODES.contains(&code) {
        return TechnicalAssessment {
            error_kind: ProcessingErrorKind::AuthorizationFailure,
            technical_score: 75,
        };
    }
    if LATE_PRESENTMENT_CODES.contains(&code) {
        return TechnicalAssessment {
            error_kind: ProcessingErrorKind::SettlementError,
            technical_score: 70,
        };
    }

    let description = description.to_lowercase();
    let error_kind = DESCRIPTION_PATTERNS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|keyword| description.contains(keyword)))
        .map(|(kind, _)| *kind)
        .unwrap_or(ProcessingErrorKind::Unknown);

    TechnicalAssessment {
        error_kind,
        technical_score: 0,
    }
}
