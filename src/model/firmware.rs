use std::fmt;

/// Version of the chip's RISC-V application firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FirmwareVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl FirmwareVersion {
    /// First firmware with the enlarged user-data slots
    pub const LARGE_SLOTS: FirmwareVersion = FirmwareVersion::new(2, 0, 0);

    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Largest payload a single user-data slot accepts on this firmware
    pub fn mem_slot_size_max(self) -> usize {
        if self >= Self::LARGE_SLOTS {
            475
        } else {
            444
        }
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Smallest payload a user-data slot accepts
pub const MEM_SLOT_SIZE_MIN: usize = 1;
