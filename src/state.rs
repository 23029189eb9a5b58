// src/state.rs

use crate::core::prompt::PromptError;
use crate::core::request::Request;
use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

/// Resolves a request into a value by whatever means the active mode provides.
///
/// Implementations may block for as long as they need (render a screen, read a
/// line, wait for a key). The caller that issued the request does not return
/// until `respond` does.
pub trait Responder: Send + Sync {
    /// Answers one request. Errors propagate to the prompt call that issued it.
    fn respond(&self, request: &Request) -> Result<Value, PromptError>;
}

impl<F> Responder for F
where
    F: Fn(&Request) -> Result<Value, PromptError> + Send + Sync,
{
    fn respond(&self, request: &Request) -> Result<Value, PromptError> {
        self(request)
    }
}

/// The process-wide slot holding the single active responder.
struct ResponderSlot {
    responder: Option<Arc<dyn Responder>>,
    /// Number of resolutions currently waiting on `responder`.
    in_flight: usize,
}

static RESPONDER_SLOT: OnceLock<Mutex<ResponderSlot>> = OnceLock::new();

fn lock_slot() -> MutexGuard<'static, ResponderSlot> {
    let slot = RESPONDER_SLOT.get_or_init(|| {
        Mutex::new(ResponderSlot {
            responder: None,
            in_flight: 0,
        })
    });
    // A panic inside a responder never happens while the lock is held, so a
    // poisoned slot still holds consistent data.
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Installs `responder` as the active one, replacing any previous responder.
///
/// Fails with `ResponderBusy` while a request is still being resolved; the
/// pending request keeps the responder it started with.
pub fn set_responder(responder: impl Responder + 'static) -> Result<(), PromptError> {
    let mut slot = lock_slot();
    if slot.in_flight > 0 {
        return Err(PromptError::ResponderBusy);
    }
    if slot.responder.is_some() {
        log::debug!("Replacing the active responder.");
    } else {
        log::debug!("Installing responder.");
    }
    slot.responder = Some(Arc::new(responder));
    Ok(())
}

/// Removes the active responder. Clearing an empty slot is a no-op.
pub fn clear_responder() -> Result<(), PromptError> {
    let mut slot = lock_slot();
    if slot.in_flight > 0 {
        return Err(PromptError::ResponderBusy);
    }
    if slot.responder.take().is_some() {
        log::debug!("Responder cleared.");
    }
    Ok(())
}

/// Whether a responder is installed.
pub fn has_responder() -> bool {
    lock_slot().responder.is_some()
}

/// Hands `request` to the active responder and blocks until it answers.
///
/// The slot lock is released before the responder runs, so a responder may
/// take as long as it needs without holding anything else up.
pub(crate) fn resolve(request: &Request) -> Result<Value, PromptError> {
    let responder = {
        let mut slot = lock_slot();
        let responder = slot
            .responder
            .clone()
            .ok_or(PromptError::NoResponderConfigured)?;
        slot.in_flight += 1;
        responder
    };
    let _in_flight = scopeguard::guard((), |()| {
        let mut slot = lock_slot();
        slot.in_flight = slot.in_flight.saturating_sub(1);
    });

    log::debug!("Resolving '{}' request.", request.kind().as_str());
    responder.respond(request)
}

/// Keeps a responder installed for the lifetime of one mode invocation.
///
/// Dropping the guard clears the slot, whether the invocation finished
/// normally, returned an error or unwound.
#[derive(Debug)]
pub struct ResponderGuard {
    _private: (),
}

impl ResponderGuard {
    pub fn install(responder: impl Responder + 'static) -> Result<Self, PromptError> {
        set_responder(responder)?;
        Ok(Self { _private: () })
    }
}

impl Drop for ResponderGuard {
    fn drop(&mut self) {
        if let Err(e) = clear_responder() {
            log::warn!("Could not clear responder on teardown: {}", e);
        }
    }
}

/// Runs `f` with `responder` installed, clearing the slot afterwards.
pub fn with_responder<R>(
    responder: impl Responder + 'static,
    f: impl FnOnce() -> R,
) -> Result<R, PromptError> {
    let _guard = ResponderGuard::install(responder)?;
    Ok(f())
}

/// Serialises tests that touch the process-wide slot.
#[cfg(test)]
pub(crate) fn test_lock() -> MutexGuard<'static, ()> {
    static TEST_LOCK: Mutex<()> = Mutex::new(());
    TEST_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

// MARK: --- UNIT TESTS ---
