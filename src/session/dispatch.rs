//! Command dispatcher
//!
//! Every channel-scoped operation runs the same three steps: reject unless the
//! session is open, validate slot indices and buffer sizes, then hand the call
//! to the engine. Nothing is retried; destructive commands (erase,
//! MAC-and-destroy, pairing key invalidation) must not be repeated behind the
//! caller's back.

use tracing::debug;

use super::Session;
use crate::error::{PreconditionError, TropicResult};
use crate::logic::{ensure_at_least, ensure_exact, ensure_within};
use crate::model::{
    CounterSlot, EccCurve, EccSlot, FirmwareVersion, HostPublicKey, KeyOrigin, MacSlot, MemSlot,
    PairingSlot, MEM_SLOT_SIZE_MIN, SIGNATURE_LEN, X25519_KEY_LEN,
};
use crate::ports::{ChipEngine, Transport, MAC_AND_DESTROY_DATA_LEN};

/// Largest ping payload
pub const PING_LEN_MAX: usize = 4096;

/// Largest message accepted by either signature scheme
pub const SIGN_MSG_LEN_MAX: usize = 4096;

/// Largest single request to the chip's TRNG
pub const RANDOM_VALUE_LEN_MAX: usize = 255;

/// Largest initial value of a monotonic counter
pub const MCOUNTER_VALUE_MAX: u32 = 0xFFFF_FFFE;

/// Curve and origin of a key read back from an ECC slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EccKeyInfo {
    pub curve: EccCurve,
    pub origin: KeyOrigin,
    /// Bytes of public key written to the caller's buffer
    pub len: usize,
}

impl<T: Transport, E: ChipEngine<T>> Session<T, E> {
    /// Echo `msg_out` through the secure channel into `msg_in`
    pub fn ping(&mut self, msg_out: &[u8], msg_in: &mut [u8]) -> TropicResult<()> {
        self.require_open("ping")?;
        ensure_exact(msg_out.len(), msg_in.len())?;
        ensure_within(0, PING_LEN_MAX, msg_out.len())?;

        debug!("ping, {} bytes", msg_out.len());
        self.dispatch("ping", |engine, link| engine.ping(link, msg_out, msg_in))
    }

    pub fn ecc_key_generate(&mut self, slot: u16, curve: EccCurve) -> TropicResult<()> {
        self.require_open("ecc_key_generate")?;
        let slot = EccSlot::new(slot)?;

        debug!("Generating {} key in {}", curve, slot);
        self.dispatch("ecc_key_generate", |engine, link| {
            engine.ecc_key_generate(link, slot, curve)
        })
    }

    /// Import a private key; `key` must be exactly the curve's private key length
    pub fn ecc_key_store(&mut self, slot: u16, curve: EccCurve, key: &[u8]) -> TropicResult<()> {
        self.require_open("ecc_key_store")?;
        let slot = EccSlot::new(slot)?;
        ensure_exact(curve.private_key_len(), key.len())?;

        debug!("Storing {} key in {}", curve, slot);
        self.dispatch("ecc_key_store", |engine, link| {
            engine.ecc_key_store(link, slot, curve, key)
        })
    }

    /// Read the public key in `slot` into `out`
    ///
    /// `out` must hold at least 32 bytes before anything is sent. The curve
    /// is only known from the answer; a P-256 key needs 64 bytes and a shorter
    /// buffer is reported as [`PreconditionError::BufferTooSmall`]. That one
    /// rejection happens after the exchange, so the chip has already been
    /// asked for the key.
    pub fn ecc_key_read(&mut self, slot: u16, out: &mut [u8]) -> TropicResult<EccKeyInfo> {
        self.require_open("ecc_key_read")?;
        let slot = EccSlot::new(slot)?;
        ensure_at_least(EccCurve::MIN_PUBLIC_KEY_LEN, out.len())?;

        debug!("Reading key in {}", slot);
        let key = self.dispatch("ecc_key_read", |engine, link| engine.ecc_key_read(link, slot))?;

        let bytes = key.as_bytes();
        ensure_at_least(bytes.len(), out.len())?;
        out[..bytes.len()].copy_from_slice(bytes);

        Ok(EccKeyInfo {
            curve: key.curve,
            origin: key.origin,
            len: bytes.len(),
        })
    }

    pub fn ecc_key_erase(&mut self, slot: u16) -> TropicResult<()> {
        self.require_open("ecc_key_erase")?;
        let slot = EccSlot::new(slot)?;

        debug!("Erasing {}", slot);
        self.dispatch("ecc_key_erase", |engine, link| engine.ecc_key_erase(link, slot))
    }

    /// ECDSA P-256 signature; `signature` must be exactly 64 bytes
    pub fn ecdsa_sign(&mut self, slot: u16, msg: &[u8], signature: &mut [u8]) -> TropicResult<()> {
        self.require_open("ecdsa_sign")?;
        let slot = EccSlot::new(slot)?;
        ensure_within(0, SIGN_MSG_LEN_MAX, msg.len())?;
        ensure_exact(SIGNATURE_LEN, signature.len())?;

        debug!("ECDSA sign with {}, {} bytes", slot, msg.len());
        let rs = self.dispatch("ecdsa_sign", |engine, link| engine.ecdsa_sign(link, slot, msg))?;
        signature.copy_from_slice(&rs);
        Ok(())
    }

    /// EdDSA Ed25519 signature; `signature` must be exactly 64 bytes
    pub fn eddsa_sign(&mut self, slot: u16, msg: &[u8], signature: &mut [u8]) -> TropicResult<()> {
        self.require_open("eddsa_sign")?;
        let slot = EccSlot::new(slot)?;
        ensure_within(0, SIGN_MSG_LEN_MAX, msg.len())?;
        ensure_exact(SIGNATURE_LEN, signature.len())?;

        debug!("EdDSA sign with {}, {} bytes", slot, msg.len());
        let rs = self.dispatch("eddsa_sign", |engine, link| engine.eddsa_sign(link, slot, msg))?;
        signature.copy_from_slice(&rs);
        Ok(())
    }

    /// Largest user-data payload on the connected chip's firmware
    pub fn mem_slot_size_max(&self) -> usize {
        self.firmware_version()
            .unwrap_or(FirmwareVersion::new(0, 0, 0))
            .mem_slot_size_max()
    }

    pub fn mem_write(&mut self, slot: u16, data: &[u8]) -> TropicResult<()> {
        self.require_open("mem_write")?;
        let slot = MemSlot::new(slot)?;
        ensure_within(MEM_SLOT_SIZE_MIN, self.mem_slot_size_max(), data.len())?;

        debug!("Writing {} bytes to {}", data.len(), slot);
        self.dispatch("mem_write", |engine, link| engine.mem_write(link, slot, data))
    }

    /// Read a user-data slot
    ///
    /// `out` must be able to hold a full slot. Returns the number of bytes
    /// actually stored in the slot.
    pub fn mem_read(&mut self, slot: u16, out: &mut [u8]) -> TropicResult<usize> {
        self.require_open("mem_read")?;
        let slot = MemSlot::new(slot)?;
        ensure_at_least(self.mem_slot_size_max(), out.len())?;

        debug!("Reading {}", slot);
        self.dispatch("mem_read", |engine, link| engine.mem_read(link, slot, out))
    }

    pub fn mem_erase(&mut self, slot: u16) -> TropicResult<()> {
        self.require_open("mem_erase")?;
        let slot = MemSlot::new(slot)?;

        debug!("Erasing {}", slot);
        self.dispatch("mem_erase", |engine, link| engine.mem_erase(link, slot))
    }

    /// One MAC-and-destroy round on `slot`
    ///
    /// `input` and `output` are both 32 bytes. A successful round consumes the
    /// slot; a failed one is returned as is and must not be repeated blindly.
    pub fn mac_and_destroy(&mut self, slot: u16, input: &[u8], output: &mut [u8]) -> TropicResult<()> {
        self.require_open("mac_and_destroy")?;
        let slot = MacSlot::new(slot)?;
        ensure_exact(MAC_AND_DESTROY_DATA_LEN, input.len())?;
        ensure_exact(MAC_AND_DESTROY_DATA_LEN, output.len())?;

        let mut data = [0u8; MAC_AND_DESTROY_DATA_LEN];
        data.copy_from_slice(input);

        debug!("MAC-and-destroy on {}", slot);
        let mac = self.dispatch("mac_and_destroy", |engine, link| {
            engine.mac_and_destroy(link, slot, &data)
        })?;
        output.copy_from_slice(&mac);
        Ok(())
    }

    /// Fill `out` (1 to 255 bytes) from the chip's TRNG
    pub fn random_value_get(&mut self, out: &mut [u8]) -> TropicResult<()> {
        self.require_open("random_value_get")?;
        ensure_within(1, RANDOM_VALUE_LEN_MAX, out.len())?;

        self.dispatch("random_value_get", |engine, link| engine.random_value_get(link, out))
    }

    pub fn mcounter_init(&mut self, index: u16, value: u32) -> TropicResult<()> {
        self.require_open("mcounter_init")?;
        let slot = CounterSlot::new(index)?;
        if value > MCOUNTER_VALUE_MAX {
            return Err(PreconditionError::CounterValueOutOfRange {
                value,
                max: MCOUNTER_VALUE_MAX,
            }
            .into());
        }

        debug!("Initializing {} to {}", slot, value);
        self.dispatch("mcounter_init", |engine, link| engine.mcounter_init(link, slot, value))
    }

    pub fn mcounter_update(&mut self, index: u16) -> TropicResult<()> {
        self.require_open("mcounter_update")?;
        let slot = CounterSlot::new(index)?;

        self.dispatch("mcounter_update", |engine, link| engine.mcounter_update(link, slot))
    }

    pub fn mcounter_get(&mut self, index: u16) -> TropicResult<u32> {
        self.require_open("mcounter_get")?;
        let slot = CounterSlot::new(index)?;

        self.dispatch("mcounter_get", |engine, link| engine.mcounter_get(link, slot))
    }

    pub fn pairing_key_write(&mut self, index: u16, key: &HostPublicKey) -> TropicResult<()> {
        self.require_open("pairing_key_write")?;
        let slot = PairingSlot::new(index)?;

        debug!("Writing {:?} to {}", key, slot);
        self.dispatch("pairing_key_write", |engine, link| {
            engine.pairing_key_write(link, slot, key)
        })
    }

    /// Read the pairing public key in `index` into the first 32 bytes of `out`
    pub fn pairing_key_read(&mut self, index: u16, out: &mut [u8]) -> TropicResult<()> {
        self.require_open("pairing_key_read")?;
        let slot = PairingSlot::new(index)?;
        ensure_at_least(X25519_KEY_LEN, out.len())?;

        let key = self.dispatch("pairing_key_read", |engine, link| {
            engine.pairing_key_read(link, slot)
        })?;
        out[..X25519_KEY_LEN].copy_from_slice(key.as_bytes());
        Ok(())
    }

    pub fn pairing_key_invalidate(&mut self, index: u16) -> TropicResult<()> {
        self.require_open("pairing_key_invalidate")?;
        let slot = PairingSlot::new(index)?;

        debug!("Invalidating {}", slot);
        self.dispatch("pairing_key_invalidate", |engine, link| {
            engine.pairing_key_invalidate(link, slot)
        })
    }
}
