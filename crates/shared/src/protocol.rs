use serde::{Deserialize, Serialize};

use crate::domain::{ProcessingStatus, Step};

/// A store mutation as it travels over a loosely-typed channel (JSON lines, IPC, ...).
///
/// Encoded as `{"type": "set_volume", "payload": {"value": 0.5}}`. Unknown variants and
/// unknown step/status names fail to deserialize, so they can never reach the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum StoreAction {
    SetInitialized {
        value: bool,
    },
    SetCurrentStep {
        step: Step,
    },
    SetDarkMode {
        value: bool,
    },
    SetMuted {
        value: bool,
    },
    SetVolume {
        value: f64,
    },
    SetFullscreen {
        value: bool,
    },
    SetError {
        #[serde(default)]
        error: Option<String>,
    },
    SetSelectedRepos {
        repos: Vec<String>,
    },
    SetProcessingStatus {
        status: ProcessingStatus,
    },
    SetWrappedSlideIndex {
        index: usize,
    },
    ToggleMuted,
    ToggleDarkMode,
    ToggleFullscreen,
    AdvanceStep,
    RetreatStep,
    Reset,
}

impl StoreAction {
    /// Stable snake_case name, used for log fields.
    pub fn name(&self) -> &'static str {
        match self {
            StoreAction::SetInitialized { .. } => "set_initialized",
            StoreAction::SetCurrentStep { .. } => "set_current_step",
            StoreAction::SetDarkMode { .. } => "set_dark_mode",
            StoreAction::SetMuted { .. } => "set_muted",
            StoreAction::SetVolume { .. } => "set_volume",
            StoreAction::SetFullscreen { .. } => "set_fullscreen",
            StoreAction::SetError { .. } => "set_error",
            StoreAction::SetSelectedRepos { .. } => "set_selected_repos",
            StoreAction::SetProcessingStatus { .. } => "set_processing_status",
            StoreAction::SetWrappedSlideIndex { .. } => "set_wrapped_slide_index",
            StoreAction::ToggleMuted => "toggle_muted",
            StoreAction::ToggleDarkMode => "toggle_dark_mode",
            StoreAction::ToggleFullscreen => "toggle_fullscreen",
            StoreAction::AdvanceStep => "advance_step",
            StoreAction::RetreatStep => "retreat_step",
            StoreAction::Reset => "reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tagged_actions() {
        let action: StoreAction =
            serde_json::from_str(r#"{"type":"set_current_step","payload":{"step":"analyze"}}"#)
                .expect("decode");
        assert_eq!(
            action,
            StoreAction::SetCurrentStep {
                step: Step::Analyze
            }
        );

        let action: StoreAction = serde_json::from_str(r#"{"type":"reset"}"#).expect("decode");
        assert_eq!(action, StoreAction::Reset);
    }

    #[test]
    fn set_error_without_message_clears() {
        let action: StoreAction =
            serde_json::from_str(r#"{"type":"set_error","payload":{}}"#).expect("decode");
        assert_eq!(action, StoreAction::SetError { error: None });
    }

    #[test]
    fn rejects_steps_outside_the_flow() {
        let decoded = serde_json::from_str::<StoreAction>(
            r#"{"type":"set_current_step","payload":{"step":"checkout"}}"#,
        );
        assert!(decoded.is_err());
    }

    #[test]
    fn rejects_negative_slide_index() {
        let decoded = serde_json::from_str::<StoreAction>(
            r#"{"type":"set_wrapped_slide_index","payload":{"index":-1}}"#,
        );
        assert!(decoded.is_err());
    }
}
