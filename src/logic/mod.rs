//! Pure logic (no I/O)

mod validate;

pub(crate) use validate::{ensure_at_least, ensure_exact, ensure_within};
