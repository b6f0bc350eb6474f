//! Client-side application state for the gitted visualization flow.
//!
//! [`AppStore`] owns the single [`AppState`] record. Views hold an `Rc<AppStore>`, read
//! snapshots, request changes through the mutation methods, and get called back
//! synchronously whenever a mutation actually changes the snapshot.

use std::cell::{Cell, RefCell};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

pub mod selectors;

pub use shared::{
    domain::{ProcessingStatus, Step, SubscriptionId},
    error::StoreError,
    protocol::StoreAction,
};

pub const DEFAULT_VOLUME: f64 = 0.7;
const MIN_VOLUME: f64 = 0.0;
const MAX_VOLUME: f64 = 1.0;

/// Complete snapshot of the UI state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub initialized: bool,
    pub current_step: Step,
    pub dark_mode: bool,
    pub muted: bool,
    /// Always within `0.0..=1.0`.
    pub volume: f64,
    pub fullscreen: bool,
    pub error: Option<String>,
    /// Repository keys (`owner/name`) in selection order. Duplicates are kept.
    pub selected_repos: Vec<String>,
    pub processing_status: ProcessingStatus,
    pub wrapped_slide_index: usize,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            initialized: false,
            current_step: Step::Connect,
            dark_mode: true,
            muted: false,
            volume: DEFAULT_VOLUME,
            fullscreen: false,
            error: None,
            selected_repos: Vec::new(),
            processing_status: ProcessingStatus::Idle,
            wrapped_slide_index: 0,
        }
    }
}

type Callback = Box<dyn FnMut(&AppState)>;

struct Subscriber {
    id: SubscriptionId,
    callback: Callback,
}

/// Single-threaded state container with synchronous change notification.
///
/// All methods take `&self`; the store is meant to be shared as `Rc<AppStore>` between
/// the components of one UI thread. Callbacks may read or mutate the store again. A
/// nested mutation is applied at once and announced in a follow-up round, after the
/// current round has reached every subscriber.
pub struct AppStore {
    state: RefCell<AppState>,
    subscribers: RefCell<Vec<Subscriber>>,
    in_flight: RefCell<Vec<SubscriptionId>>,
    cancelled: RefCell<Vec<SubscriptionId>>,
    next_subscription_id: Cell<u64>,
    notifying: Cell<bool>,
    pending_round: Cell<bool>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore {
    pub fn new() -> Self {
        Self {
            state: RefCell::new(AppState::default()),
            subscribers: RefCell::new(Vec::new()),
            in_flight: RefCell::new(Vec::new()),
            cancelled: RefCell::new(Vec::new()),
            next_subscription_id: Cell::new(1),
            notifying: Cell::new(false),
            pending_round: Cell::new(false),
        }
    }

    pub fn snapshot(&self) -> AppState {
        self.state.borrow().clone()
    }

    /// Borrow the current snapshot without cloning it.
    ///
    /// # Panics
    ///
    /// Panics if `read` calls a mutation on this store; use [`AppStore::snapshot`] there.
    pub fn with_state<R>(&self, read: impl FnOnce(&AppState) -> R) -> R {
        read(&self.state.borrow())
    }

    pub fn subscribe(&self, callback: impl FnMut(&AppState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription_id.get());
        self.next_subscription_id.set(id.0 + 1);
        self.subscribers.borrow_mut().push(Subscriber {
            id,
            callback: Box::new(callback),
        });
        debug!(subscription_id = id.0, "store subscriber registered");
        id
    }

    /// Returns `false` when `id` was not (or no longer) registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = {
            let mut subscribers = self.subscribers.borrow_mut();
            match subscribers.iter().position(|sub| sub.id == id) {
                Some(pos) => {
                    subscribers.remove(pos);
                    true
                }
                None => false,
            }
        };
        if removed {
            debug!(subscription_id = id.0, "store subscriber removed");
            return true;
        }

        // The subscriber may be mid-round, detached from `subscribers`.
        if self.in_flight.borrow().contains(&id) && !self.cancelled.borrow().contains(&id) {
            self.cancelled.borrow_mut().push(id);
            debug!(subscription_id = id.0, "store subscriber removed during notification");
            return true;
        }
        false
    }

    pub fn subscriber_count(&self) -> usize {
        let cancelled = self.cancelled.borrow().len();
        self.subscribers.borrow().len() + self.in_flight.borrow().len() - cancelled
    }

    pub fn set_initialized(&self, value: bool) {
        self.update("set_initialized", |state| state.initialized = value);
    }

    pub fn set_current_step(&self, step: Step) {
        self.update("set_current_step", |state| state.current_step = step);
    }

    pub fn set_dark_mode(&self, value: bool) {
        self.update("set_dark_mode", |state| state.dark_mode = value);
    }

    pub fn set_muted(&self, value: bool) {
        self.update("set_muted", |state| state.muted = value);
    }

    /// Stores `value` clamped to `0.0..=1.0`. NaN is ignored.
    pub fn set_volume(&self, value: f64) {
        if value.is_nan() {
            warn!("ignoring NaN volume");
            return;
        }
        // `+ 0.0` turns a clamped `-0.0` into `0.0`.
        let volume = value.clamp(MIN_VOLUME, MAX_VOLUME) + 0.0;
        if volume != value {
            debug!(requested = value, stored = volume, "volume clamped");
        }
        self.update("set_volume", |state| state.volume = volume);
    }

    pub fn set_fullscreen(&self, value: bool) {
        self.update("set_fullscreen", |state| state.fullscreen = value);
    }

    /// `None` clears the active message.
    pub fn set_error(&self, error: Option<String>) {
        self.update("set_error", |state| state.error = error);
    }

    /// Replaces the whole selection.
    pub fn set_selected_repos(&self, repos: Vec<String>) {
        self.update("set_selected_repos", |state| state.selected_repos = repos);
    }

    pub fn set_processing_status(&self, status: ProcessingStatus) {
        self.update("set_processing_status", |state| {
            state.processing_status = status
        });
    }

    /// No upper bound is applied; see [`AppStore::set_wrapped_slide_index_within`].
    pub fn set_wrapped_slide_index(&self, index: usize) {
        self.update("set_wrapped_slide_index", |state| {
            state.wrapped_slide_index = index
        });
    }

    /// Stores `index`, saturated at the last of `slide_count` slides.
    pub fn set_wrapped_slide_index_within(&self, index: usize, slide_count: usize) {
        let bounded = index.min(slide_count.saturating_sub(1));
        if bounded != index {
            debug!(requested = index, stored = bounded, slide_count, "slide index clamped");
        }
        self.set_wrapped_slide_index(bounded);
    }

    pub fn toggle_muted(&self) {
        self.update("toggle_muted", |state| state.muted = !state.muted);
    }

    pub fn toggle_dark_mode(&self) {
        self.update("toggle_dark_mode", |state| state.dark_mode = !state.dark_mode);
    }

    pub fn toggle_fullscreen(&self) {
        self.update("toggle_fullscreen", |state| {
            state.fullscreen = !state.fullscreen
        });
    }

    /// Moves one step forward; stays on [`Step::Wrapped`].
    pub fn advance_step(&self) {
        self.update("advance_step", |state| {
            if let Some(next) = state.current_step.next() {
                state.current_step = next;
            }
        });
    }

    /// Moves one step back; stays on [`Step::Connect`].
    pub fn retreat_step(&self) {
        self.update("retreat_step", |state| {
            if let Some(previous) = state.current_step.previous() {
                state.current_step = previous;
            }
        });
    }

    /// Replaces the whole record with the initial snapshot.
    pub fn reset(&self) {
        self.update("reset", |state| *state = AppState::default());
    }

    pub fn dispatch(&self, action: StoreAction) {
        trace!(action = action.name(), "dispatching store action");
        match action {
            StoreAction::SetInitialized { value } => self.set_initialized(value),
            StoreAction::SetCurrentStep { step } => self.set_current_step(step),
            StoreAction::SetDarkMode { value } => self.set_dark_mode(value),
            StoreAction::SetMuted { value } => self.set_muted(value),
            StoreAction::SetVolume { value } => self.set_volume(value),
            StoreAction::SetFullscreen { value } => self.set_fullscreen(value),
            StoreAction::SetError { error } => self.set_error(error),
            StoreAction::SetSelectedRepos { repos } => self.set_selected_repos(repos),
            StoreAction::SetProcessingStatus { status } => self.set_processing_status(status),
            StoreAction::SetWrappedSlideIndex { index } => self.set_wrapped_slide_index(index),
            StoreAction::ToggleMuted => self.toggle_muted(),
            StoreAction::ToggleDarkMode => self.toggle_dark_mode(),
            StoreAction::ToggleFullscreen => self.toggle_fullscreen(),
            StoreAction::AdvanceStep => self.advance_step(),
            StoreAction::RetreatStep => self.retreat_step(),
            StoreAction::Reset => self.reset(),
        }
    }

    /// Decodes one JSON-encoded [`StoreAction`] and applies it.
    ///
    /// Malformed input is rejected before anything reaches the state.
    pub fn dispatch_json(&self, raw: &str) -> Result<(), StoreError> {
        let action: StoreAction = serde_json::from_str(raw)?;
        self.dispatch(action);
        Ok(())
    }

    fn update(&self, action: &'static str, apply: impl FnOnce(&mut AppState)) {
        let changed = {
            let mut state = self.state.borrow_mut();
            let before = state.clone();
            apply(&mut state);
            *state != before
        };

        if changed {
            debug!(action, "app state updated");
            self.notify();
        } else {
            trace!(action, "app state unchanged");
        }
    }

    fn notify(&self) {
        if self.notifying.get() {
            self.pending_round.set(true);
            return;
        }
        let _notifying = NotifyingGuard::enter(&self.notifying);

        loop {
            self.pending_round.set(false);
            let snapshot = self.snapshot();

            let mut round = NotifyRound::begin(self);
            trace!(subscribers = round.subscribers.len(), "notifying store subscribers");

            for sub in round.subscribers.iter_mut() {
                if self.cancelled.borrow().contains(&sub.id) {
                    continue;
                }
                (sub.callback)(&snapshot);
            }
            drop(round);

            if !self.pending_round.get() {
                break;
            }
        }
    }
}

/// Clears the notifying flag even when a callback unwinds.
struct NotifyingGuard<'a>(&'a Cell<bool>);

impl<'a> NotifyingGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for NotifyingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Subscribers detached for one notification round. Dropping the round hands them back
/// to the store, minus those cancelled mid-round, ahead of any added mid-round.
struct NotifyRound<'a> {
    store: &'a AppStore,
    subscribers: Vec<Subscriber>,
}

impl<'a> NotifyRound<'a> {
    fn begin(store: &'a AppStore) -> Self {
        let subscribers = std::mem::take(&mut *store.subscribers.borrow_mut());
        *store.in_flight.borrow_mut() = subscribers.iter().map(|sub| sub.id).collect();
        Self { store, subscribers }
    }
}

impl Drop for NotifyRound<'_> {
    fn drop(&mut self) {
        let cancelled = std::mem::take(&mut *self.store.cancelled.borrow_mut());
        let mut round = std::mem::take(&mut self.subscribers);
        round.retain(|sub| !cancelled.contains(&sub.id));
        self.store.in_flight.borrow_mut().clear();

        let mut subscribers = self.store.subscribers.borrow_mut();
        let added = std::mem::replace(&mut *subscribers, round);
        subscribers.extend(added);
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
