//=========================================================================
// Instance Guard
//=========================================================================
//
// Process-wide "one live controller" rule.
//
// `SessionController::new` acquires the guard; dropping the controller
// releases it. A second acquisition while one is live fails fast.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::sync::atomic::{AtomicBool, Ordering};

use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::error::SessionError;

static CONTROLLER_LIVE: AtomicBool = AtomicBool::new(false);

//=== InstanceGuard =======================================================

/// Held by the single live controller.
#[derive(Debug)]
pub(crate) struct InstanceGuard {
    _private: (),
}

impl InstanceGuard {
    pub(crate) fn acquire() -> Result<Self, SessionError> {
        if CONTROLLER_LIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            warn!(target: "session", "More than one session controller requested; refusing");
            return Err(SessionError::AlreadyRunning);
        }
        Ok(Self { _private: () })
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        CONTROLLER_LIVE.store(false, Ordering::Release);
    }
}

//=== Test Support ========================================================

/// Serializes unit tests that hold a controller.
#[cfg(test)]
pub(crate) fn serial() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::Mutex;
    static LOCK: Mutex<()> = Mutex::new(());
    LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_guard_is_refused_until_first_drops() {
        let _serial = serial();

        let first = InstanceGuard::acquire().expect("first guard");
        assert!(matches!(
            InstanceGuard::acquire(),
            Err(SessionError::AlreadyRunning)
        ));

        drop(first);
        let again = InstanceGuard::acquire();
        assert!(again.is_ok(), "guard should be free after drop");
    }
}
