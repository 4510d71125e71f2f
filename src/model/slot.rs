//! Addressable chip resources
//!
//! Each kind of slot has its own index range. The newtypes below can only be
//! built through `new`, so holding one means the index was checked.

use std::fmt;
use thiserror::Error;

/// Kind of chip-side resource a slot index refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// ECC key slot (P-256 or Ed25519)
    EccKey,
    /// User-data slot in protected memory
    UserData,
    /// MAC-and-destroy slot
    MacAndDestroy,
    /// Host pairing key slot
    PairingKey,
    /// Monotonic counter
    MonotonicCounter,
}

impl SlotKind {
    /// Highest valid index for this kind
    pub const fn max_index(self) -> u16 {
        match self {
            SlotKind::EccKey => 31,
            SlotKind::UserData => 511,
            SlotKind::MacAndDestroy => 127,
            SlotKind::PairingKey => 3,
            SlotKind::MonotonicCounter => 15,
        }
    }

    pub fn check(self, index: u16) -> Result<(), SlotError> {
        if index > self.max_index() {
            return Err(SlotError::OutOfRange {
                kind: self,
                index,
                max: self.max_index(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SlotKind::EccKey => "ECC key slot",
            SlotKind::UserData => "user-data slot",
            SlotKind::MacAndDestroy => "MAC-and-destroy slot",
            SlotKind::PairingKey => "pairing key slot",
            SlotKind::MonotonicCounter => "monotonic counter",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("{kind} index {index} out of range (max {max})")]
    OutOfRange { kind: SlotKind, index: u16, max: u16 },
}

macro_rules! bounded_slot {
    ($(#[$meta:meta])* $name:ident, $kind:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u16);

        impl $name {
            pub const KIND: SlotKind = $kind;

            pub fn new(index: u16) -> Result<Self, SlotError> {
                Self::KIND.check(index)?;
                Ok(Self(index))
            }

            pub fn index(self) -> u16 {
                self.0
            }
        }

        impl TryFrom<u16> for $name {
            type Error = SlotError;

            fn try_from(index: u16) -> Result<Self, Self::Error> {
                Self::new(index)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{} {}", Self::KIND, self.0)
            }
        }
    };
}

bounded_slot!(
    /// ECC key slot, 0-31
    EccSlot,
    SlotKind::EccKey
);

bounded_slot!(
    /// Protected-memory user-data slot, 0-511
    MemSlot,
    SlotKind::UserData
);

bounded_slot!(
    /// MAC-and-destroy slot, 0-127
    MacSlot,
    SlotKind::MacAndDestroy
);

bounded_slot!(
    /// Pairing key slot used to authenticate the host, 0-3
    PairingSlot,
    SlotKind::PairingKey
);

bounded_slot!(CounterSlot, SlotKind::MonotonicCounter);
