//! Secret-access guard for VisualStash.
//!
//! Two states, `Locked` and `Unlocked`, gating visibility of the secret
//! category. Leaving the secret view while unlocked arms a 15-second
//! relock countdown; returning in time cancels it. The guard owns only the
//! unlocked flag and the countdown deadline; the password and category
//! name live in the store.
//!
//! Time is passed in explicitly by the `_at` variants so the countdown can
//! be tested deterministically; the plain variants use the real clock.

use std::time::{Duration, Instant};

use crate::types::errors::GuardError;

/// Inactivity window before the secret category relocks.
pub const AUTO_LOCK: Duration = Duration::from_secs(15);

/// Minimum length of a new secret password.
pub const MIN_PASSWORD_LEN: usize = 4;

/// Password gate over the secret category.
pub struct SecretGuard {
    unlocked: bool,
    relock_at: Option<Instant>,
}

impl SecretGuard {
    /// Starts locked.
    pub fn new() -> Self {
        Self {
            unlocked: false,
            relock_at: None,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }

    /// Submits a password attempt. A wrong password leaves the state
    /// unchanged; the surface decides whether to clear its input field.
    pub fn unlock(&mut self, input: &str, expected: &str) -> Result<(), GuardError> {
        if input != expected {
            return Err(GuardError::IncorrectPassword);
        }
        self.unlocked = true;
        self.relock_at = None;
        Ok(())
    }

    /// Locks immediately and cancels any pending countdown.
    pub fn lock(&mut self) {
        self.unlocked = false;
        self.relock_at = None;
    }

    /// Validates a replacement password (length only; this is a visibility
    /// gate, not a security boundary).
    pub fn validate_new_password(input: &str) -> Result<(), GuardError> {
        if input.chars().count() < MIN_PASSWORD_LEN {
            return Err(GuardError::PasswordTooShort);
        }
        Ok(())
    }

    /// Reports a change of the active view.
    ///
    /// Any existing countdown is cancelled first, so at most one countdown
    /// exists at a time. A new one is armed only when unlocked and viewing
    /// something other than the secret category.
    pub fn view_changed(&mut self, viewing_secret: bool) {
        self.view_changed_at(viewing_secret, Instant::now());
    }

    pub fn view_changed_at(&mut self, viewing_secret: bool, now: Instant) {
        self.relock_at = None;
        if self.unlocked && !viewing_secret {
            self.relock_at = Some(now + AUTO_LOCK);
        }
    }

    /// Applies an expired countdown, if any. Returns true when the guard
    /// transitioned to locked.
    pub fn poll(&mut self) -> bool {
        self.poll_at(Instant::now())
    }

    pub fn poll_at(&mut self, now: Instant) -> bool {
        match self.relock_at {
            Some(deadline) if now >= deadline => {
                self.unlocked = false;
                self.relock_at = None;
                true
            }
            _ => false,
        }
    }
}

impl Default for SecretGuard {
    fn default() -> Self {
        Self::new()
    }
}
