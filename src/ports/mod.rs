//! Ports (traits) for the collaborators the session drives
//!
//! The session layer sequences and gates calls; it never encodes a command
//! itself. The cryptographic engine (handshake, frame encryption, command
//! encoding) and the physical transport are reached only through these traits,
//! so they can be swapped for other implementations or fakes.


mod channel;
mod counters;
mod ecc;
mod mac_and_destroy;
mod memory;
mod pairing_keys;
mod ping;
mod random;
mod setup;
mod transport;

pub use channel::SecureChannel;
pub use counters::MonotonicCounters;
pub use ecc::{EccKeys, Signing};
pub use mac_and_destroy::{MacAndDestroy, MAC_AND_DESTROY_DATA_LEN};
pub use memory::ProtectedMemory;
pub use pairing_keys::PairingKeys;
pub use ping::Ping;
pub use random::RandomSource;
pub use setup::EngineSetup;
pub use transport::{Link, Transport};

/// Combined trait for a complete cryptographic engine
///
/// A session is generic over one type implementing every capability.
pub trait ChipEngine<T: Transport>:
    EngineSetup<T>
    + SecureChannel<T>
    + Ping<T>
    + EccKeys<T>
    + Signing<T>
    + ProtectedMemory<T>
    + MacAndDestroy<T>
    + RandomSource<T>
    + MonotonicCounters<T>
    + PairingKeys<T>
{
}

// Blanket implementation for types that implement all capability traits
impl<T, E> ChipEngine<T> for E
where
    T: Transport,
    E: EngineSetup<T>
        + SecureChannel<T>
        + Ping<T>
        + EccKeys<T>
        + Signing<T>
        + ProtectedMemory<T>
        + MacAndDestroy<T>
        + RandomSource<T>
        + MonotonicCounters<T>
        + PairingKeys<T>,
{
}
