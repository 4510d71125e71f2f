//! Session handle, scope guard and command dispatcher

mod dispatch;
mod guard;
mod handle;

pub use dispatch::{
    EccKeyInfo, MCOUNTER_VALUE_MAX, PING_LEN_MAX, RANDOM_VALUE_LEN_MAX, SIGN_MSG_LEN_MAX,
};
pub use guard::SecureSessionGuard;
pub use handle::Session;
