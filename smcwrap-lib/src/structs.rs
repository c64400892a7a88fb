//! Wire layout of the SMC user client.
//!
//! Every struct here is passed by pointer to `IOConnectCallStructMethod`, so
//! the field order, widths and padding must stay exactly as the driver
//! expects them.

use serde::Serialize;

/// Selector of the SMC user client method that handles every command below.
pub const KERNEL_INDEX_SMC: u32 = 2;
pub const SMC_CMD_READ_BYTES: u8 = 5;
pub const SMC_CMD_WRITE_BYTES: u8 = 6;
pub const SMC_CMD_READ_INDEX: u8 = 8;
pub const SMC_CMD_READ_KEYINFO: u8 = 9;
pub const SMC_CMD_READ_PLIMIT: u8 = 11;
pub const SMC_CMD_READ_VERS: u8 = 12;

/// `result` byte the SMC puts in the reply when the key does not exist.
pub const SMC_RESULT_KEY_NOT_FOUND: u8 = 132;

/// Byte array type for SMC data.
///
/// SMC values are stored as byte arrays with a maximum length of [`SMC_BYTES_LEN`].
pub type SMCBytes = [u8; SMC_BYTES_LEN];

/// Maximum size in bytes for SMC data.
pub const SMC_BYTES_LEN: usize = 32;

#[allow(non_camel_case_types)]
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SMCKeyData_vers {
    pub major: u8,
    pub minor: u8,
    pub build: u8,
    pub reserved: [u8; 1],
    pub release: u16,
}

#[allow(non_camel_case_types)]
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SMCKeyData_plimitData {
    pub version: u16,
    pub length: u16,
    pub cpu_plimit: u32,
    pub gpu_plimit: u32,
    pub mem_plimit: u32,
}

/// Metadata about a SMC key.
///
/// Contains information about the data type, size, and attributes
/// of a SMC key without including the actual value.
#[allow(non_camel_case_types)]
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SMCKeyData_keyInfo {
    pub data_size: u32,
    /// the data type
    ///
    /// convert it to human readable str by
    /// `String::from_utf8_lossy(&data_type.to_be_bytes())`
    pub data_type: u32,
    pub data_attributes: u8,
}

/// The request and reply of a single SMC command.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SMCKeyData {
    pub key: u32,
    pub vers: SMCKeyData_vers,
    pub plimit_data: SMCKeyData_plimitData,
    pub key_info: SMCKeyData_keyInfo,
    pub result: u8,
    pub status: u8,
    /// command byte, one of the `SMC_CMD_*` constants
    pub data8: u8,
    /// key index for [`SMC_CMD_READ_INDEX`]
    pub data32: u32,
    pub bytes: SMCBytes,
}

impl SMCKeyData {
    /// A request for `command` addressed to `key`.
    pub fn command(key: &[u8; 4], command: u8) -> Self {
        Self {
            key: u32::from_be_bytes(*key),
            data8: command,
            ..Default::default()
        }
    }
}

/// Represents a SMC key-value pair.
///
/// This structure contains the key name, data type, size, and raw byte data
/// for a SMC value. Use [`SMCVal::decode`] to parse the raw bytes into a
/// typed value.
///
/// # Example
///
/// ```
/// use smcwrap_lib::{memory::MemoryDriver, wrapper::SMCWrapper};
///
/// let mut smc = SMCWrapper::new(MemoryDriver::new().with_key(*b"TC0P", *b"sp78", &[0x2d, 0x80]));
/// let val = smc.read_key(b"TC0P").unwrap();
///
/// assert_eq!(val.key_str(), "TC0P");
/// assert_eq!(val.data_type_str(), "sp78");
/// assert_eq!(val.data_size, 2);
/// assert_eq!(val.decode().unwrap().to_string(), "45.50");
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SMCVal {
    pub key: [u8; 4],
    pub data_size: u32,
    pub data_type: [u8; 4],
    pub bytes: SMCBytes,
}

/// SMC firmware version, as answered by [`SMC_CMD_READ_VERS`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SmcVersion {
    pub major: u8,
    pub minor: u8,
    pub build: u8,
    pub release: u16,
}

impl From<SMCKeyData_vers> for SmcVersion {
    fn from(vers: SMCKeyData_vers) -> Self {
        Self {
            major: vers.major,
            minor: vers.minor,
            build: vers.build,
            release: vers.release,
        }
    }
}

impl std::fmt::Display for SmcVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}.{}f{} (release {})",
            self.major, self.minor, self.build, self.release
        )
    }
}

/// Power limits, as answered by [`SMC_CMD_READ_PLIMIT`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PowerLimits {
    pub version: u16,
    pub length: u16,
    pub cpu: u32,
    pub gpu: u32,
    pub mem: u32,
}

impl From<SMCKeyData_plimitData> for PowerLimits {
    fn from(data: SMCKeyData_plimitData) -> Self {
        Self {
            version: data.version,
            length: data.length,
            cpu: data.cpu_plimit,
            gpu: data.gpu_plimit,
            mem: data.mem_plimit,
        }
    }
}
