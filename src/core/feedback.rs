// src/core/feedback.rs

//! Transient spinner/progress status, kept as data.
//!
//! The controller only produces states and pushes them through an injected
//! setter. A terminal front-end draws them; headless mode plugs in
//! [`discard`].

use crate::constants::{
    AUTO_CLEAR_DELAY_MS, DEFAULT_PROGRESS_MESSAGE, DEFAULT_SPINNER_KIND, DEFAULT_SPINNER_MESSAGE,
};
use serde::Serialize;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackStatus {
    Running,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualFeedbackState {
    Spinner {
        kind: String,
        message: String,
        status: FeedbackStatus,
    },
    Progress {
        value: f64,
        total: f64,
        message: String,
        status: FeedbackStatus,
    },
}

impl VisualFeedbackState {
    pub fn status(&self) -> FeedbackStatus {
        match self {
            Self::Spinner { status, .. } | Self::Progress { status, .. } => *status,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Spinner { message, .. } | Self::Progress { message, .. } => message,
        }
    }
}

/// Receives every state change; `None` means "nothing to show".
pub type FeedbackSetter = Arc<dyn Fn(Option<VisualFeedbackState>) + Send + Sync>;

/// A setter that ignores every state.
pub fn discard() -> FeedbackSetter {
    Arc::new(|_: Option<VisualFeedbackState>| {})
}

struct FeedbackInner {
    state: Option<VisualFeedbackState>,
    /// Bumped on every transition; a pending auto-clear only fires if the
    /// generation it captured is still current.
    generation: u64,
}

/// Drives the single visual feedback slot of one run.
#[derive(Clone)]
pub struct FeedbackController {
    inner: Arc<Mutex<FeedbackInner>>,
    setter: FeedbackSetter,
    clear_delay: Duration,
}

impl fmt::Debug for FeedbackController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeedbackController")
            .field("state", &self.state())
            .field("clear_delay", &self.clear_delay)
            .finish()
    }
}

impl FeedbackController {
    pub fn new(setter: FeedbackSetter) -> Self {
        Self::with_clear_delay(setter, Duration::from_millis(AUTO_CLEAR_DELAY_MS))
    }

    pub fn with_clear_delay(setter: FeedbackSetter, clear_delay: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(FeedbackInner {
                state: None,
                generation: 0,
            })),
            setter,
            clear_delay,
        }
    }

    /// The current state, as last pushed to the setter.
    pub fn state(&self) -> Option<VisualFeedbackState> {
        self.lock().state.clone()
    }

    pub fn spinner(&self) -> Spinner {
        Spinner {
            controller: self.clone(),
            kind: DEFAULT_SPINNER_KIND.to_string(),
        }
    }

    pub fn progress(&self, total: f64) -> Progress {
        Progress {
            controller: self.clone(),
            total: if total.is_finite() { total.max(0.0) } else { 0.0 },
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedbackInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replaces the state and cancels any pending auto-clear.
    fn set(&self, state: Option<VisualFeedbackState>) -> u64 {
        let generation = {
            let mut inner = self.lock();
            inner.generation = inner.generation.wrapping_add(1);
            inner.state = state.clone();
            inner.generation
        };
        // The setter may read the controller back, so it runs unlocked.
        (self.setter)(state);
        generation
    }

    /// Changes the current state in place, if there is one.
    fn modify(&self, f: impl FnOnce(&mut VisualFeedbackState)) -> Option<u64> {
        let (generation, state) = {
            let mut inner = self.lock();
            let mut state = inner.state.clone()?;
            f(&mut state);
            inner.generation = inner.generation.wrapping_add(1);
            inner.state = Some(state.clone());
            (inner.generation, state)
        };
        (self.setter)(Some(state));
        Some(generation)
    }

    /// Clears the slot after the delay unless another transition happens first.
    fn schedule_clear(&self, generation: u64) {
        let inner = Arc::clone(&self.inner);
        let setter = Arc::clone(&self.setter);
        let delay = self.clear_delay;

        thread::spawn(move || {
            thread::sleep(delay);
            let cleared = {
                let mut inner = inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
                let current = inner.generation == generation;
                if current {
                    inner.state = None;
                }
                current
            };
            if cleared {
                setter(None);
            }
        });
    }

    fn finish(&self, f: impl FnOnce(&mut VisualFeedbackState)) {
        if let Some(generation) = self.modify(f) {
            self.schedule_clear(generation);
        }
    }
}

// --- Spinner ---

#[derive(Debug, Clone)]
pub struct Spinner {
    controller: FeedbackController,
    kind: String,
}

impl Spinner {
    pub fn kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn start(&self, message: Option<&str>) {
        self.controller.set(Some(VisualFeedbackState::Spinner {
            kind: self.kind.clone(),
            message: message.unwrap_or(DEFAULT_SPINNER_MESSAGE).to_string(),
            status: FeedbackStatus::Running,
        }));
    }

    pub fn stop(&self) {
        self.controller.set(None);
    }

    pub fn succeed(&self, message: Option<&str>) {
        self.finish(FeedbackStatus::Success, message);
    }

    pub fn fail(&self, message: Option<&str>) {
        self.finish(FeedbackStatus::Error, message);
    }

    fn finish(&self, new_status: FeedbackStatus, new_message: Option<&str>) {
        if self.controller.state().is_none() {
            self.start(new_message);
        }
        self.controller.finish(|state| {
            let (VisualFeedbackState::Spinner { message, status, .. }
            | VisualFeedbackState::Progress { message, status, .. }) = state;
            *status = new_status;
            if let Some(text) = new_message {
                *message = text.to_string();
            }
        });
    }
}

// --- Progress ---

#[derive(Debug, Clone)]
pub struct Progress {
    controller: FeedbackController,
    total: f64,
}

impl Progress {
    pub fn start(&self, message: Option<&str>) {
        self.controller.set(Some(VisualFeedbackState::Progress {
            value: 0.0,
            total: self.total,
            message: message.unwrap_or(DEFAULT_PROGRESS_MESSAGE).to_string(),
            status: FeedbackStatus::Running,
        }));
    }

    /// Sets the value, clamped to `[0, total]`, keeping the message.
    pub fn update(&self, value: f64) {
        self.apply(|_| value);
    }

    pub fn increment(&self, delta: f64) {
        self.apply(|current| current + delta);
    }

    pub fn stop(&self) {
        self.controller.set(None);
    }

    /// Marks success and fills the bar.
    pub fn succeed(&self, message: Option<&str>) {
        self.finish(FeedbackStatus::Success, message);
    }

    /// Marks failure, leaving the value where it stopped.
    pub fn fail(&self, message: Option<&str>) {
        self.finish(FeedbackStatus::Error, message);
    }

    fn apply(&self, next: impl FnOnce(f64) -> f64) {
        if !matches!(self.controller.state(), Some(VisualFeedbackState::Progress { .. })) {
            self.start(None);
        }
        let total = self.total;
        self.controller.modify(|state| {
            if let VisualFeedbackState::Progress { value, status, .. } = state {
                *value = clamp(next(*value), total);
                *status = FeedbackStatus::Running;
            }
        });
    }

    fn finish(&self, new_status: FeedbackStatus, new_message: Option<&str>) {
        if !matches!(self.controller.state(), Some(VisualFeedbackState::Progress { .. })) {
            self.start(new_message);
        }
        let total = self.total;
        self.controller.finish(|state| {
            if let VisualFeedbackState::Progress { value, message, status, .. } = state {
                *status = new_status;
                if new_status == FeedbackStatus::Success {
                    *value = total;
                }
                if let Some(text) = new_message {
                    *message = text.to_string();
                }
            }
        });
    }
}

fn clamp(value: f64, total: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, total)
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::OnceLock;

    fn recording() -> (FeedbackSetter, Arc<Mutex<Vec<Option<VisualFeedbackState>>>>) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        let setter: FeedbackSetter = Arc::new(move |state: Option<VisualFeedbackState>| {
            sink.lock().unwrap().push(state);
        });
        (setter, log)
    }

    fn progress_value(controller: &FeedbackController) -> Option<f64> {
        match controller.state() {
            Some(VisualFeedbackState::Progress { value, .. }) => Some(value),
            _ => None,
        }
    }

    #[test]
    fn test_progress_clamps_to_total() {
        let controller = FeedbackController::new(discard());
        let progress = controller.progress(10.0);
        progress.start(None);
        progress.update(25.0);
        assert_eq!(progress_value(&controller), Some(10.0));

        progress.update(-3.0);
        assert_eq!(progress_value(&controller), Some(0.0));

        for _ in 0..15 {
            progress.increment(1.0);
        }
        assert_eq!(progress_value(&controller), Some(10.0));
        assert_eq!(controller.state().unwrap().message(), DEFAULT_PROGRESS_MESSAGE);
    }

    #[test]
    fn test_progress_succeed_fills_and_fail_keeps_value() {
        let controller = FeedbackController::with_clear_delay(discard(), Duration::from_secs(60));
        let progress = controller.progress(4.0);
        progress.start(Some("Copying"));
        progress.update(1.0);
        progress.fail(None);
        let state = controller.state().unwrap();
        assert_eq!(state.status(), FeedbackStatus::Error);
        assert_eq!(state.message(), "Copying");
        assert_eq!(progress_value(&controller), Some(1.0));

        progress.start(None);
        progress.succeed(Some("Copied"));
        assert_eq!(progress_value(&controller), Some(4.0));
        assert_eq!(controller.state().unwrap().message(), "Copied");
    }

    #[test]
    fn test_succeed_auto_clears_after_delay() {
        let (setter, log) = recording();
        let controller = FeedbackController::with_clear_delay(setter, Duration::from_millis(20));
        let spinner = controller.spinner();
        spinner.start(Some("Working"));
        spinner.succeed(None);
        assert_eq!(controller.state().unwrap().status(), FeedbackStatus::Success);

        thread::sleep(Duration::from_millis(300));
        assert!(controller.state().is_none());
        assert_eq!(log.lock().unwrap().last(), Some(&None));
    }

    #[test]
    fn test_new_start_cancels_pending_clear() {
        let controller = FeedbackController::with_clear_delay(discard(), Duration::from_millis(50));
        let spinner = controller.spinner();
        spinner.start(Some("First"));
        spinner.fail(None);
        spinner.start(Some("Second"));

        thread::sleep(Duration::from_millis(300));
        let state = controller.state().unwrap();
        assert_eq!(state.message(), "Second");
        assert_eq!(state.status(), FeedbackStatus::Running);
    }

    #[test]
    fn test_setter_can_read_controller_back() {
        let slot: Arc<OnceLock<FeedbackController>> = Arc::new(OnceLock::new());
        let seen = Arc::new(Mutex::new(Vec::new()));

        let (reader, sink) = (Arc::clone(&slot), Arc::clone(&seen));
        let setter: FeedbackSetter = Arc::new(move |pushed: Option<VisualFeedbackState>| {
            if let Some(controller) = reader.get() {
                sink.lock().unwrap().push(controller.state() == pushed);
            }
        });
        let controller = FeedbackController::with_clear_delay(setter, Duration::from_millis(20));
        slot.set(controller.clone()).unwrap();

        let spinner = controller.spinner();
        spinner.start(Some("Working"));
        spinner.succeed(Some("Done"));
        thread::sleep(Duration::from_millis(300));

        // start, succeed and the auto-clear all observed their own state.
        assert_eq!(*seen.lock().unwrap(), vec![true, true, true]);
        assert!(controller.state().is_none());
    }

    #[test]
    fn test_stop_clears_immediately() {
        let (setter, log) = recording();
        let controller = FeedbackController::new(setter);
        let spinner = controller.spinner().kind("line");
        spinner.start(None);
        assert!(matches!(
            controller.state(),
            Some(VisualFeedbackState::Spinner { ref kind, ref message, .. })
                if kind == "line" && message == DEFAULT_SPINNER_MESSAGE
        ));
        spinner.stop();
        assert!(controller.state().is_none());
        assert_eq!(log.lock().unwrap().len(), 2);
    }
}
