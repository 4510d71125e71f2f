//! In-memory fake chip for exercising the session layer
//!
//! `MockTransport` echoes every frame back and counts traffic. `MockEngine`
//! keeps the chip's state (keys, memory, counters) itself, but still pushes
//! one frame through the link per command so tests can observe bus usage.
//! Only available in test scope.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;

use ed25519_dalek::Signer as _;
use rand::RngCore;

use crate::error::{ChipStatus, TransportError, TropicError, TropicResult};
use crate::model::{
    CounterSlot, DeviceBinding, EccCurve, EccPublicKey, EccSlot, FirmwareVersion, HostKeyPair,
    HostPublicKey, KeyOrigin, MacSlot, MemSlot, PairingSlot, PinId,
    SIGNATURE_LEN,
};
use crate::ports::{
    EccKeys, EngineSetup, Link, MacAndDestroy, MonotonicCounters, PairingKeys, Ping,
    ProtectedMemory, RandomSource, SecureChannel, Signing, Transport, MAC_AND_DESTROY_DATA_LEN,
};
use crate::ports::contract_tests::engine_contract;
use crate::session::Session;

/// Binding used by every session test
pub fn test_binding() -> DeviceBinding {
    DeviceBinding::builder(PinId(5))
        .prng_seed(0x1234_5678)
        .scratch_buffer(vec![0u8; 1024].into_boxed_slice())
        .build()
}

/// Host pairing keys the fake chip accepts in pairing slot 0
pub fn test_keys() -> HostKeyPair {
    engine_contract::paired_keys()
}

/// Initialized session with a secure channel on pairing slot 0
pub fn open_session() -> Session<MockTransport, MockEngine> {
    open_session_with(MockEngine::new())
}

pub fn open_session_with(engine: MockEngine) -> Session<MockTransport, MockEngine> {
    let mut session = Session::new(test_binding(), MockTransport::new(), engine);
    session.begin().unwrap();
    session.secure_session_start(&test_keys(), 0).unwrap();
    session
}

#[derive(Debug, Default)]
pub struct MockTransport {
    pub initialized: bool,
    pub fail_init: bool,
    pub fail_deinit: bool,
    /// Fail every exchange after this many
    pub fail_after: Option<usize>,
    pub init_calls: usize,
    pub deinit_calls: usize,
    pub exchanges: usize,
    /// Mirrors `deinit_calls` so it can be read after the session is dropped
    pub deinit_log: Rc<Cell<usize>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Transport for MockTransport {
    fn init(&mut self, _binding: &DeviceBinding) -> Result<(), TransportError> {
        self.init_calls += 1;
        if self.fail_init {
            return Err(TransportError::UnsupportedMode);
        }
        self.initialized = true;
        Ok(())
    }

    fn deinit(&mut self) -> Result<(), TransportError> {
        self.deinit_calls += 1;
        self.deinit_log.set(self.deinit_log.get() + 1);
        self.initialized = false;
        if self.fail_deinit {
            return Err(TransportError::Bus(embedded_hal::spi::ErrorKind::Other));
        }
        Ok(())
    }

    fn send_receive(&mut self, _buffer: &mut [u8], request_len: usize) -> Result<usize, TransportError> {
        if !self.initialized {
            return Err(TransportError::NotInitialized);
        }
        self.exchanges += 1;
        if matches!(self.fail_after, Some(n) if self.exchanges > n) {
            return Err(TransportError::Timeout { attempts: 1 });
        }
        Ok(request_len)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairingEntry {
    Empty,
    Written(HostPublicKey),
    Invalidated,
}

#[derive(Debug, Clone)]
struct StoredKey {
    curve: EccCurve,
    origin: KeyOrigin,
    secret: [u8; 32],
}

impl StoredKey {
    fn public_key(&self) -> EccPublicKey {
        let bytes = match self.curve {
            EccCurve::P256 => {
                let key = p256::ecdsa::SigningKey::from_slice(&self.secret).unwrap();
                key.verifying_key().to_encoded_point(false).as_bytes()[1..].to_vec()
            }
            EccCurve::Ed25519 => ed25519_dalek::SigningKey::from_bytes(&self.secret)
                .verifying_key()
                .to_bytes()
                .to_vec(),
        };
        EccPublicKey::new(self.curve, self.origin, bytes).unwrap()
    }
}

/// Fake chip and engine context in one
#[derive(Debug)]
pub struct MockEngine {
    pub firmware: FirmwareVersion,
    pub pairing: [PairingEntry; 4],
    pub channel_open: bool,
    pub seed: Option<u32>,
    keys: HashMap<u16, StoredKey>,
    memory: HashMap<u16, Vec<u8>>,
    mac_secrets: HashMap<u16, [u8; MAC_AND_DESTROY_DATA_LEN]>,
    counters: HashMap<u16, u32>,

    pub fail_init: bool,
    pub fail_abort: bool,
    pub fail_mac: bool,

    pub open_calls: usize,
    pub abort_calls: usize,
    /// Mirrors `abort_calls` so it can be read after the session is dropped
    pub abort_log: Rc<Cell<usize>>,
    pub reset_calls: usize,
    pub ping_calls: usize,
    pub key_reads: usize,
    pub mac_calls: usize,
    pub last_ping: Vec<u8>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            firmware: FirmwareVersion::new(2, 0, 0),
            pairing: [
                PairingEntry::Written(test_keys().public),
                PairingEntry::Empty,
                PairingEntry::Empty,
                PairingEntry::Empty,
            ],
            channel_open: false,
            seed: None,
            keys: HashMap::new(),
            memory: HashMap::new(),
            mac_secrets: HashMap::new(),
            counters: HashMap::new(),
            fail_init: false,
            fail_abort: false,
            fail_mac: false,
            open_calls: 0,
            abort_calls: 0,
            abort_log: Rc::new(Cell::new(0)),
            reset_calls: 0,
            ping_calls: 0,
            key_reads: 0,
            mac_calls: 0,
            last_ping: Vec::new(),
        }
    }

    fn require_channel(&self) -> TropicResult<()> {
        if !self.channel_open {
            return Err(TropicError::chip(ChipStatus::Unauthorized));
        }
        Ok(())
    }

    fn key(&self, slot: EccSlot, curve: EccCurve) -> TropicResult<&StoredKey> {
        match self.keys.get(&slot.index()) {
            Some(key) if key.curve == curve => Ok(key),
            _ => Err(TropicError::chip(ChipStatus::EccInvalidKey)),
        }
    }
}

/// Push `[cmd, payload..]` through the link and return the echoed payload
fn request<T: Transport>(link: &mut Link<'_, T>, cmd: u8, payload: &[u8]) -> TropicResult<Vec<u8>> {
    let mut frame = Vec::with_capacity(payload.len() + 1);
    frame.push(cmd);
    frame.extend_from_slice(payload);

    let response = link.exchange(&frame)?;
    if response.first() != Some(&cmd) {
        return Err(TropicError::chip(ChipStatus::InvalidCmd));
    }
    Ok(response[1..].to_vec())
}

impl<T: Transport> EngineSetup<T> for MockEngine {
    fn init(&mut self, link: &mut Link<'_, T>, prng_seed: u32) -> TropicResult<FirmwareVersion> {
        request(link, 0x01, &[])?;
        if self.fail_init {
            return Err(TropicError::chip(ChipStatus::Fail));
        }
        self.seed = Some(prng_seed);
        Ok(self.firmware)
    }

    fn reset(&mut self) {
        self.reset_calls += 1;
        self.channel_open = false;
        self.seed = None;
    }
}

impl<T: Transport> SecureChannel<T> for MockEngine {
    fn open(&mut self, link: &mut Link<'_, T>, keys: &HostKeyPair, slot: PairingSlot) -> TropicResult<()> {
        self.open_calls += 1;
        request(link, 0x02, keys.public.as_bytes())?;
        match self.pairing[usize::from(slot.index())] {
            PairingEntry::Written(public) if public == keys.public => {
                self.channel_open = true;
                Ok(())
            }
            _ => Err(TropicError::chip(ChipStatus::HandshakeFailed)),
        }
    }

    fn abort(&mut self, link: &mut Link<'_, T>) -> TropicResult<()> {
        self.abort_calls += 1;
        self.abort_log.set(self.abort_log.get() + 1);
        let result = request(link, 0x08, &[]);
        self.channel_open = false;
        result?;
        if self.fail_abort {
            return Err(TropicError::chip(ChipStatus::Fail));
        }
        Ok(())
    }
}

impl<T: Transport> Ping<T> for MockEngine {
    fn ping(&mut self, link: &mut Link<'_, T>, msg_out: &[u8], msg_in: &mut [u8]) -> TropicResult<()> {
        self.ping_calls += 1;
        self.require_channel()?;
        self.last_ping = msg_out.to_vec();
        let echo = request(link, 0x01, msg_out)?;
        msg_in.copy_from_slice(&echo);
        Ok(())
    }
}

impl<T: Transport> EccKeys<T> for MockEngine {
    fn ecc_key_generate(&mut self, link: &mut Link<'_, T>, slot: EccSlot, curve: EccCurve) -> TropicResult<()> {
        self.require_channel()?;
        request(link, 0x60, &slot.index().to_le_bytes())?;
        if self.keys.contains_key(&slot.index()) {
            return Err(TropicError::chip(ChipStatus::Fail));
        }
        let mut secret = [0u8; 32];
        rand::rng().fill_bytes(&mut secret);
        // keep the scalar below the P-256 group order
        secret[0] &= 0x7f;
        secret[31] |= 0x01;
        self.keys.insert(
            slot.index(),
            StoredKey {
                curve,
                origin: KeyOrigin::Generated,
                secret,
            },
        );
        Ok(())
    }

    fn ecc_key_store(
        &mut self,
        link: &mut Link<'_, T>,
        slot: EccSlot,
        curve: EccCurve,
        key: &[u8],
    ) -> TropicResult<()> {
        self.require_channel()?;
        request(link, 0x61, key)?;
        if self.keys.contains_key(&slot.index()) {
            return Err(TropicError::chip(ChipStatus::Fail));
        }
        let mut secret = [0u8; 32];
        secret.copy_from_slice(key);
        self.keys.insert(
            slot.index(),
            StoredKey {
                curve,
                origin: KeyOrigin::Stored,
                secret,
            },
        );
        Ok(())
    }

    fn ecc_key_read(&mut self, link: &mut Link<'_, T>, slot: EccSlot) -> TropicResult<EccPublicKey> {
        self.key_reads += 1;
        self.require_channel()?;
        request(link, 0x62, &slot.index().to_le_bytes())?;
        self.keys
            .get(&slot.index())
            .map(StoredKey::public_key)
            .ok_or(TropicError::chip(ChipStatus::EccInvalidKey))
    }

    fn ecc_key_erase(&mut self, link: &mut Link<'_, T>, slot: EccSlot) -> TropicResult<()> {
        self.require_channel()?;
        request(link, 0x63, &slot.index().to_le_bytes())?;
        self.keys.remove(&slot.index());
        Ok(())
    }
}

impl<T: Transport> Signing<T> for MockEngine {
    fn ecdsa_sign(&mut self, link: &mut Link<'_, T>, slot: EccSlot, msg: &[u8]) -> TropicResult<[u8; SIGNATURE_LEN]> {
        use p256::ecdsa::signature::Signer;

        self.require_channel()?;
        request(link, 0x70, msg)?;
        let key = self.key(slot, EccCurve::P256)?;
        let signing_key = p256::ecdsa::SigningKey::from_slice(&key.secret).unwrap();
        let signature: p256::ecdsa::Signature = signing_key.sign(msg);

        let mut rs = [0u8; SIGNATURE_LEN];
        rs.copy_from_slice(&signature.to_bytes());
        Ok(rs)
    }

    fn eddsa_sign(&mut self, link: &mut Link<'_, T>, slot: EccSlot, msg: &[u8]) -> TropicResult<[u8; SIGNATURE_LEN]> {
        self.require_channel()?;
        request(link, 0x71, msg)?;
        let key = self.key(slot, EccCurve::Ed25519)?;
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&key.secret);
        Ok(signing_key.sign(msg).to_bytes())
    }
}

impl<T: Transport> ProtectedMemory<T> for MockEngine {
    fn mem_write(&mut self, link: &mut Link<'_, T>, slot: MemSlot, data: &[u8]) -> TropicResult<()> {
        self.require_channel()?;
        request(link, 0x50, data)?;
        if self.memory.contains_key(&slot.index()) {
            return Err(TropicError::chip(ChipStatus::MemWriteFail));
        }
        self.memory.insert(slot.index(), data.to_vec());
        Ok(())
    }

    fn mem_read(&mut self, link: &mut Link<'_, T>, slot: MemSlot, out: &mut [u8]) -> TropicResult<usize> {
        self.require_channel()?;
        request(link, 0x51, &slot.index().to_le_bytes())?;
        let data = self.memory.get(&slot.index()).map(Vec::as_slice).unwrap_or_default();
        out[..data.len()].copy_from_slice(data);
        Ok(data.len())
    }

    fn mem_erase(&mut self, link: &mut Link<'_, T>, slot: MemSlot) -> TropicResult<()> {
        self.require_channel()?;
        request(link, 0x52, &slot.index().to_le_bytes())?;
        self.memory.remove(&slot.index());
        Ok(())
    }
}

impl<T: Transport> MacAndDestroy<T> for MockEngine {
    fn mac_and_destroy(
        &mut self,
        link: &mut Link<'_, T>,
        slot: MacSlot,
        input: &[u8; MAC_AND_DESTROY_DATA_LEN],
    ) -> TropicResult<[u8; MAC_AND_DESTROY_DATA_LEN]> {
        self.mac_calls += 1;
        self.require_channel()?;
        if self.fail_mac {
            return Err(TropicError::Transport(TransportError::Timeout { attempts: 1 }));
        }
        request(link, 0x90, input)?;

        let secret = self
            .mac_secrets
            .entry(slot.index())
            .or_insert([slot.index() as u8; MAC_AND_DESTROY_DATA_LEN]);
        let mut mac = [0u8; MAC_AND_DESTROY_DATA_LEN];
        for (i, byte) in mac.iter_mut().enumerate() {
            *byte = input[i] ^ secret[i];
            secret[i] = secret[i].wrapping_add(1);
        }
        Ok(mac)
    }
}

impl<T: Transport> RandomSource<T> for MockEngine {
    fn random_value_get(&mut self, link: &mut Link<'_, T>, out: &mut [u8]) -> TropicResult<()> {
        self.require_channel()?;
        request(link, 0x02, &[out.len() as u8])?;
        rand::rng().fill_bytes(out);
        Ok(())
    }
}

impl<T: Transport> MonotonicCounters<T> for MockEngine {
    fn mcounter_init(&mut self, link: &mut Link<'_, T>, slot: CounterSlot, value: u32) -> TropicResult<()> {
        self.require_channel()?;
        request(link, 0x80, &value.to_le_bytes())?;
        self.counters.insert(slot.index(), value);
        Ok(())
    }

    fn mcounter_update(&mut self, link: &mut Link<'_, T>, slot: CounterSlot) -> TropicResult<()> {
        self.require_channel()?;
        request(link, 0x81, &slot.index().to_le_bytes())?;
        match self.counters.get_mut(&slot.index()) {
            None => Err(TropicError::chip(ChipStatus::CounterInvalid)),
            Some(0) => Err(TropicError::chip(ChipStatus::CounterUpdateErr)),
            Some(value) => {
                *value -= 1;
                Ok(())
            }
        }
    }

    fn mcounter_get(&mut self, link: &mut Link<'_, T>, slot: CounterSlot) -> TropicResult<u32> {
        self.require_channel()?;
        request(link, 0x82, &slot.index().to_le_bytes())?;
        self.counters
            .get(&slot.index())
            .copied()
            .ok_or(TropicError::chip(ChipStatus::CounterInvalid))
    }
}

impl<T: Transport> PairingKeys<T> for MockEngine {
    fn pairing_key_write(&mut self, link: &mut Link<'_, T>, slot: PairingSlot, key: &HostPublicKey) -> TropicResult<()> {
        self.require_channel()?;
        request(link, 0x10, key.as_bytes())?;
        let entry = &mut self.pairing[usize::from(slot.index())];
        if *entry != PairingEntry::Empty {
            return Err(TropicError::chip(ChipStatus::Fail));
        }
        *entry = PairingEntry::Written(*key);
        Ok(())
    }

    fn pairing_key_read(&mut self, link: &mut Link<'_, T>, slot: PairingSlot) -> TropicResult<HostPublicKey> {
        self.require_channel()?;
        request(link, 0x11, &slot.index().to_le_bytes())?;
        match self.pairing[usize::from(slot.index())] {
            PairingEntry::Written(key) => Ok(key),
            PairingEntry::Empty => Err(TropicError::chip(ChipStatus::PairingKeyEmpty)),
            PairingEntry::Invalidated => Err(TropicError::chip(ChipStatus::PairingKeyInvalid)),
        }
    }

    fn pairing_key_invalidate(&mut self, link: &mut Link<'_, T>, slot: PairingSlot) -> TropicResult<()> {
        self.require_channel()?;
        request(link, 0x12, &slot.index().to_le_bytes())?;
        self.pairing[usize::from(slot.index())] = PairingEntry::Invalidated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract_tests_for;

    contract_tests_for!(
        mock_chip_contract,
        make = || (MockTransport::new(), MockEngine::new()),
        tests = {
            test_init_reports_firmware => engine_contract::test_init_reports_firmware,
            test_open_with_paired_keys => engine_contract::test_open_with_paired_keys,
            test_open_with_unknown_keys => engine_contract::test_open_with_unknown_keys,
            test_commands_need_open_channel => engine_contract::test_commands_need_open_channel,
            test_abort_closes_channel => engine_contract::test_abort_closes_channel,
            test_ping_echoes => engine_contract::test_ping_echoes,
        }
    );

    #[test]
    fn test_transport_requires_init() {
        let mut transport = MockTransport::new();
        let mut buffer = [0u8; 8];
        let mut link = Link::new(&mut transport, &mut buffer);
        assert_eq!(link.exchange(b"x").unwrap_err(), TransportError::NotInitialized);
    }
}
