//! Replays a JSON-lines script of store actions against a store.

use std::io::BufRead;

use anyhow::{Context, Result};
use app_store::AppStore;
use shared::protocol::StoreAction;
use tracing::debug;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub skipped: usize,
}

/// Applies every action in `script`. Blank lines and `#` comments are skipped.
///
/// With `slide_count` set, slide index actions go through the bounded setter.
/// Stops at the first line that does not decode to a [`StoreAction`].
pub fn replay_script(
    store: &AppStore,
    script: impl BufRead,
    slide_count: Option<usize>,
) -> Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (idx, line) in script.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read script line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            summary.skipped += 1;
            continue;
        }

        let action: StoreAction = serde_json::from_str(trimmed)
            .with_context(|| format!("invalid store action on line {line_no}: {trimmed}"))?;
        debug!(line = line_no, action = action.name(), "replaying action");

        match (action, slide_count) {
            (StoreAction::SetWrappedSlideIndex { index }, Some(count)) => {
                store.set_wrapped_slide_index_within(index, count)
            }
            (action, _) => store.dispatch(action),
        }
        summary.applied += 1;
    }

    Ok(summary)
}
