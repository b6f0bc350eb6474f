use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub u64);
    };
}

id_newtype!(SubscriptionId);

/// Stage of the guided flow. The order of [`Step::ALL`] is the logical sequence.
///
/// Decoding goes through [`FromStr`], so JSON and plain text accept the same names.
///
/// The flow has exactly five stages:
///
/// ```compile_fail
/// let _ = shared::domain::Step::Finished;
/// ```
///
/// and matches over it must name all of them:
///
/// ```compile_fail
/// use shared::domain::Step;
///
/// fn label(step: Step) -> &'static str {
///     match step {
///         Step::Connect => "connect",
///         Step::Select => "select",
///         Step::Analyze => "analyze",
///         Step::Visualize => "visualize",
///     }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Step {
    #[default]
    Connect,
    Select,
    Analyze,
    Visualize,
    Wrapped,
}

impl Step {
    pub const ALL: [Step; 5] = [
        Step::Connect,
        Step::Select,
        Step::Analyze,
        Step::Visualize,
        Step::Wrapped,
    ];

    /// Zero-based position in the flow.
    pub fn position(self) -> usize {
        match self {
            Step::Connect => 0,
            Step::Select => 1,
            Step::Analyze => 2,
            Step::Visualize => 3,
            Step::Wrapped => 4,
        }
    }

    /// Following step, or `None` at the end of the flow.
    pub fn next(self) -> Option<Step> {
        Self::ALL.get(self.position() + 1).copied()
    }

    /// Preceding step, or `None` at the start of the flow.
    pub fn previous(self) -> Option<Step> {
        self.position()
            .checked_sub(1)
            .and_then(|idx| Self::ALL.get(idx).copied())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Connect => "connect",
            Step::Select => "select",
            Step::Analyze => "analyze",
            Step::Visualize => "visualize",
            Step::Wrapped => "wrapped",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = StoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalized = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|step| step.as_str() == normalized)
            .ok_or_else(|| StoreError::UnknownStep(raw.to_string()))
    }
}

impl TryFrom<String> for Step {
    type Error = StoreError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        raw.parse()
    }
}

/// Lifecycle marker for an in-flight fetch/analysis run by an outside collaborator.
///
/// Decoded through [`FromStr`], like [`Step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ProcessingStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl ProcessingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessingStatus::Idle => "idle",
            ProcessingStatus::Loading => "loading",
            ProcessingStatus::Success => "success",
            ProcessingStatus::Error => "error",
        }
    }
}

impl fmt::Display for ProcessingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProcessingStatus {
    type Err = StoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(ProcessingStatus::Idle),
            // "running" is what some fetchers report for the same state.
            "loading" | "running" => Ok(ProcessingStatus::Loading),
            "success" => Ok(ProcessingStatus::Success),
            "error" => Ok(ProcessingStatus::Error),
            _ => Err(StoreError::UnknownProcessingStatus(raw.to_string())),
        }
    }
}

impl TryFrom<String> for ProcessingStatus {
    type Error = StoreError;

    fn try_from(raw: String) -> Result<Self, StoreError> {
        raw.parse()
    }
}
