//! Pure read-only views derived from an [`AppState`] snapshot.

use crate::{AppState, ProcessingStatus, Step};

pub fn selected_repos(state: &AppState) -> &[String] {
    &state.selected_repos
}

pub fn has_selection(state: &AppState) -> bool {
    !state.selected_repos.is_empty()
}

/// `(1-based position of the current step, number of steps)`, for progress indicators.
pub fn step_progress(state: &AppState) -> (usize, usize) {
    (state.current_step.position() + 1, Step::ALL.len())
}

pub fn is_processing(state: &AppState) -> bool {
    state.processing_status == ProcessingStatus::Loading
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_snapshot_has_no_selection() {
        let state = AppState::default();
        assert!(!has_selection(&state));
        assert!(selected_repos(&state).is_empty());
        assert_eq!(step_progress(&state), (1, 5));
        assert!(!is_processing(&state));
    }

    #[test]
    fn selection_is_returned_unchanged() {
        let state = AppState {
            selected_repos: vec!["a/b".into(), "a/b".into(), "c/d".into()],
            current_step: Step::Wrapped,
            processing_status: ProcessingStatus::Loading,
            ..AppState::default()
        };
        assert!(has_selection(&state));
        assert_eq!(selected_repos(&state), ["a/b", "a/b", "c/d"]);
        assert_eq!(step_progress(&state), (5, 5));
        assert!(is_processing(&state));
    }
}
