//! An SMC that lives in memory.
//!
//! [`MemoryDriver`] answers the same commands as the `AppleSMC` user client
//! from a key table, so everything above [`SmcDriver`] can run without the
//! hardware.

use std::{
    collections::BTreeMap,
    sync::{Mutex, PoisonError},
};

use crate::{
    driver::SmcDriver,
    error::KernReturn,
    structs::{
        KERNEL_INDEX_SMC, PowerLimits, SMC_BYTES_LEN, SMC_CMD_READ_BYTES, SMC_CMD_READ_INDEX,
        SMC_CMD_READ_KEYINFO, SMC_CMD_READ_PLIMIT, SMC_CMD_READ_VERS, SMC_CMD_WRITE_BYTES,
        SMC_RESULT_KEY_NOT_FOUND, SMCBytes, SMCKeyData, SMCKeyData_keyInfo, SMCKeyData_plimitData,
        SMCKeyData_vers, SmcVersion,
    },
    types::DATATYPE_UINT32,
};

/// `kIOReturnBadArgument`
pub const IO_RETURN_BAD_ARGUMENT: KernReturn = 0xe000_02c2_u32 as KernReturn;
/// `kIOReturnUnsupported`
pub const IO_RETURN_UNSUPPORTED: KernReturn = 0xe000_02c7_u32 as KernReturn;
/// SMC result for a write whose size does not match the key.
pub const SMC_RESULT_BAD_ARGUMENT: u8 = 0x89;

#[derive(Debug, Clone, Copy)]
struct Entry {
    data_type: [u8; 4],
    data_size: u32,
    bytes: SMCBytes,
}

#[derive(Debug, Default)]
struct State {
    keys: BTreeMap<[u8; 4], Entry>,
    failing: BTreeMap<[u8; 4], KernReturn>,
    version: SMCKeyData_vers,
    plimit: SMCKeyData_plimitData,
}

/// In-memory [`SmcDriver`].
///
/// Keys are enumerated in byte order. `#KEY` is answered from the size of
/// the table and is not itself enumerated.
///
/// ```
/// use smcwrap_lib::{memory::MemoryDriver, wrapper::SMCWrapper};
///
/// let driver = MemoryDriver::new()
///     .with_key(*b"F0Ac", *b"fpe2", &[0x1f, 0x40])
///     .with_key(*b"RPlt", *b"ch8*", b"j314\0\0\0\0");
/// let mut smc = SMCWrapper::new(driver);
///
/// assert_eq!(smc.key_count().unwrap(), 2);
/// assert_eq!(smc.read_key_as_string(b"RPlt").unwrap(), "j314");
/// ```
#[derive(Debug, Default)]
pub struct MemoryDriver {
    state: Mutex<State>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a key. The size of the key is `data.len()`, at
    /// most 32 bytes; longer data is cut.
    pub fn with_key(self, key: [u8; 4], data_type: [u8; 4], data: &[u8]) -> Self {
        let len = data.len().min(SMC_BYTES_LEN);
        let mut bytes = SMCBytes::default();
        bytes[..len].copy_from_slice(&data[..len]);
        self.lock().keys.insert(
            key,
            Entry {
                data_type,
                data_size: len as u32,
                bytes,
            },
        );
        self
    }

    /// Makes every call addressed to `key` fail with `code`.
    pub fn with_failing_key(self, key: [u8; 4], code: KernReturn) -> Self {
        self.lock().failing.insert(key, code);
        self
    }

    pub fn with_version(self, version: SmcVersion) -> Self {
        self.lock().version = SMCKeyData_vers {
            major: version.major,
            minor: version.minor,
            build: version.build,
            reserved: [0],
            release: version.release,
        };
        self
    }

    pub fn with_power_limits(self, limits: PowerLimits) -> Self {
        self.lock().plimit = SMCKeyData_plimitData {
            version: limits.version,
            length: limits.length,
            cpu_plimit: limits.cpu,
            gpu_plimit: limits.gpu,
            mem_plimit: limits.mem,
        };
        self
    }

    /// Current raw bytes of `key`, if it exists.
    pub fn bytes(&self, key: &[u8; 4]) -> Option<Vec<u8>> {
        self.lock()
            .keys
            .get(key)
            .map(|entry| entry.bytes[..entry.data_size as usize].to_vec())
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl State {
    fn entry(&self, key: &[u8; 4]) -> Option<Entry> {
        if key == b"#KEY" {
            let mut bytes = SMCBytes::default();
            bytes[..4].copy_from_slice(&(self.keys.len() as u32).to_be_bytes());
            return Some(Entry {
                data_type: DATATYPE_UINT32,
                data_size: 4,
                bytes,
            });
        }
        self.keys.get(key).copied()
    }
}

impl SmcDriver for MemoryDriver {
    fn call(
        &self,
        selector: u32,
        input: &SMCKeyData,
        output: &mut SMCKeyData,
    ) -> Result<(), KernReturn> {
        if selector != KERNEL_INDEX_SMC {
            return Err(IO_RETURN_BAD_ARGUMENT);
        }
        let key = input.key.to_be_bytes();
        let mut state = self.lock();
        if let Some(code) = state.failing.get(&key) {
            return Err(*code);
        }

        *output = SMCKeyData {
            key: input.key,
            ..Default::default()
        };
        match input.data8 {
            SMC_CMD_READ_KEYINFO => match state.entry(&key) {
                Some(entry) => {
                    output.key_info = SMCKeyData_keyInfo {
                        data_size: entry.data_size,
                        data_type: u32::from_be_bytes(entry.data_type),
                        data_attributes: 0,
                    };
                }
                None => output.result = SMC_RESULT_KEY_NOT_FOUND,
            },
            SMC_CMD_READ_BYTES => match state.entry(&key) {
                Some(entry) => output.bytes = entry.bytes,
                None => output.result = SMC_RESULT_KEY_NOT_FOUND,
            },
            SMC_CMD_WRITE_BYTES => match state.keys.get_mut(&key) {
                Some(entry) if entry.data_size == input.key_info.data_size => {
                    entry.bytes = input.bytes;
                }
                Some(_) => output.result = SMC_RESULT_BAD_ARGUMENT,
                None => output.result = SMC_RESULT_KEY_NOT_FOUND,
            },
            SMC_CMD_READ_INDEX => match state.keys.keys().nth(input.data32 as usize) {
                Some(found) => output.key = u32::from_be_bytes(*found),
                None => output.result = SMC_RESULT_KEY_NOT_FOUND,
            },
            SMC_CMD_READ_PLIMIT => output.plimit_data = state.plimit,
            SMC_CMD_READ_VERS => output.vers = state.version,
            _ => return Err(IO_RETURN_UNSUPPORTED),
        }
        Ok(())
    }
}
