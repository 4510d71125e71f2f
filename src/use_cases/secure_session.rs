//! Run a unit of work inside one secure session
//!
//! Opens the channel, hands the session to the caller's closure and closes the
//! channel again whatever the closure returned, unless the closure already
//! closed it.

use tracing::warn;

use crate::error::TropicResult;
use crate::model::{HostKeyPair, SessionStatus};
use crate::ports::{ChipEngine, Transport};
use crate::session::Session;

/// Open a secure session, run `work`, then close the session
///
/// # Arguments
///
/// * `session` - Initialized session with no channel open
/// * `keys` - Host pairing key pair
/// * `pairing_index` - Pairing key slot (0-3) holding `keys.public`
/// * `work` - Operations to run while the channel is open
///
/// # Returns
///
/// Whatever `work` returned, provided the channel was closed cleanly
///
/// # Errors
///
/// Returns errors if:
/// - The channel cannot be opened (`work` is not run)
/// - Closing the channel fails; this outranks an error from `work`, which is
///   only logged, since the chip may still consider the channel open
/// - `work` fails
pub fn run_in_secure_session<T, E, R, F>(
    session: &mut Session<T, E>,
    keys: &HostKeyPair,
    pairing_index: u16,
    work: F,
) -> TropicResult<R>
where
    T: Transport,
    E: ChipEngine<T>,
    F: FnOnce(&mut Session<T, E>) -> TropicResult<R>,
{
    session.secure_session_start(keys, pairing_index)?;

    let result = work(session);
    if session.status() != SessionStatus::Open {
        return result;
    }

    match (result, session.secure_session_end()) {
        (Err(work_err), Err(end_err)) => {
            warn!("Work failed inside secure session: {}", work_err);
            Err(end_err)
        }
        (Ok(_), Err(end_err)) => Err(end_err),
        (result, Ok(())) => result,
    }
}
