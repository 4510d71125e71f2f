//! Scope guard around an open secure channel

use std::ops::{Deref, DerefMut};

use tracing::warn;

use super::Session;
use crate::error::TropicResult;
use crate::model::{HostKeyPair, SessionStatus};
use crate::ports::{ChipEngine, Transport};

/// Borrow of a session whose secure channel is closed when the guard goes away
///
/// Derefs to the [`Session`], so every dispatcher operation is available on
/// the guard. Prefer [`SecureSessionGuard::close`] to learn whether the abort
/// succeeded; on drop a failure can only be logged.
pub struct SecureSessionGuard<'a, T: Transport, E: ChipEngine<T>> {
    session: &'a mut Session<T, E>,
    closed: bool,
}

impl<'a, T: Transport, E: ChipEngine<T>> SecureSessionGuard<'a, T, E> {
    /// Close the channel now and report the outcome
    ///
    /// Closing a channel that was already ended through the guard is a no-op.
    pub fn close(mut self) -> TropicResult<()> {
        self.closed = true;
        if self.session.status() == SessionStatus::Open {
            self.session.secure_session_end()
        } else {
            Ok(())
        }
    }
}

impl<T: Transport, E: ChipEngine<T>> Deref for SecureSessionGuard<'_, T, E> {
    type Target = Session<T, E>;

    fn deref(&self) -> &Self::Target {
        &*self.session
    }
}

impl<T: Transport, E: ChipEngine<T>> DerefMut for SecureSessionGuard<'_, T, E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.session
    }
}

impl<T: Transport, E: ChipEngine<T>> Drop for SecureSessionGuard<'_, T, E> {
    fn drop(&mut self) {
        if self.closed || self.session.status() != SessionStatus::Open {
            return;
        }
        if let Err(err) = self.session.secure_session_end() {
            warn!("Closing secure session on drop failed: {}", err);
        }
    }
}

impl<T: Transport, E: ChipEngine<T>> Session<T, E> {
    /// Open a secure channel that is closed again when the guard is dropped
    pub fn secure_session(
        &mut self,
        keys: &HostKeyPair,
        pairing_index: u16,
    ) -> TropicResult<SecureSessionGuard<'_, T, E>> {
        self.secure_session_start(keys, pairing_index)?;
        Ok(SecureSessionGuard {
            session: self,
            closed: false,
        })
    }
}
