mod binding;
mod curve;
mod firmware;
mod host_keys;
mod slot;

pub use binding::{
    BitOrder, BusTiming, DeviceBinding, DeviceBindingBuilder, PinId, DEFAULT_CLOCK_HZ,
    FRAME_BUFFER_LEN,
};
pub use curve::{EccCurve, EccPublicKey, KeyOrigin, SIGNATURE_LEN};
pub use firmware::{FirmwareVersion, MEM_SLOT_SIZE_MIN};
pub use host_keys::{HostKeyPair, HostPrivateKey, HostPublicKey, KeyMaterialError, X25519_KEY_LEN};
pub use slot::{CounterSlot, EccSlot, MacSlot, MemSlot, PairingSlot, SlotError, SlotKind};

/// Whether a secure channel is currently owned by the session handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionStatus {
    #[default]
    Closed,
    Open,
}
