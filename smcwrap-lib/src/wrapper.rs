//! Typed reads and writes over one SMC connection.

use tracing::{debug, info, warn};

use crate::{
    driver::SmcDriver,
    error::{IO_RETURN_NOT_PRIVILEGED, Result, SmcError},
    structs::{
        KERNEL_INDEX_SMC, PowerLimits, SMC_CMD_READ_BYTES, SMC_CMD_READ_INDEX,
        SMC_CMD_READ_KEYINFO, SMC_CMD_READ_PLIMIT, SMC_CMD_READ_VERS, SMC_CMD_WRITE_BYTES,
        SMC_RESULT_KEY_NOT_FOUND, SMCBytes, SMCKeyData, SMCKeyData_keyInfo, SMCVal, SmcVersion,
    },
    types::DATATYPE_UINT32,
    value::{SmcNumber, code_str, encode, encode_str},
};

/// Key holding the number of keys the SMC knows.
pub const KEY_COUNT: [u8; 4] = *b"#KEY";

type Opener<D> = Box<dyn FnOnce() -> Result<D> + Send>;

enum Connection<D> {
    Unopened(Opener<D>),
    Open(D),
    Closed,
}

/// Lifecycle of the connection held by a [`SMCWrapper`].
///
/// `Unopened` moves to `Open` on first use, or to `Closed` if opening fails.
/// `Closed` is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Unopened,
    Open,
    Closed,
}

/// Typed access to the SMC through a driver connection.
///
/// Every operation is a synchronous call on the driver; there is no caching
/// and no retry. Operations take `&mut self`, so sharing a wrapper between
/// threads needs a lock (see `io::shared` on macOS).
pub struct SMCWrapper<D> {
    conn: Connection<D>,
}

impl<D> std::fmt::Debug for SMCWrapper<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SMCWrapper")
            .field("state", &self.state())
            .finish()
    }
}

impl<D> SMCWrapper<D> {
    pub fn state(&self) -> ConnectionState {
        match self.conn {
            Connection::Unopened(_) => ConnectionState::Unopened,
            Connection::Open(_) => ConnectionState::Open,
            Connection::Closed => ConnectionState::Closed,
        }
    }

    /// Drops the connection. Every later operation fails with
    /// [`SmcError::Closed`].
    pub fn close(&mut self) {
        if let Connection::Open(_) = std::mem::replace(&mut self.conn, Connection::Closed) {
            info!("SMC connection closed");
        }
    }
}

impl<D: SmcDriver> SMCWrapper<D> {
    /// Wraps an already open driver.
    pub fn new(driver: D) -> Self {
        Self {
            conn: Connection::Open(driver),
        }
    }

    /// A wrapper that calls `open` on first use.
    pub fn lazy<F>(open: F) -> Self
    where
        F: FnOnce() -> Result<D> + Send + 'static,
    {
        Self {
            conn: Connection::Unopened(Box::new(open)),
        }
    }

    fn driver(&mut self) -> Result<&D> {
        if let Connection::Unopened(_) = self.conn {
            let Connection::Unopened(open) = std::mem::replace(&mut self.conn, Connection::Closed)
            else {
                return Err(SmcError::Closed);
            };
            match open() {
                Ok(driver) => {
                    info!("SMC connection opened");
                    self.conn = Connection::Open(driver);
                }
                Err(err) => {
                    warn!(error = %err, "failed to open SMC connection");
                    return Err(err);
                }
            }
        }
        match &self.conn {
            Connection::Open(driver) => Ok(driver),
            _ => Err(SmcError::Closed),
        }
    }

    fn call(&mut self, input: &SMCKeyData) -> Result<SMCKeyData> {
        let driver = self.driver()?;
        let key = code_str(&input.key.to_be_bytes());
        let mut output = SMCKeyData::default();
        if let Err(code) = driver.call(KERNEL_INDEX_SMC, input, &mut output) {
            debug!(key = %key, command = input.data8, code, "SMC call failed");
            return Err(if code == IO_RETURN_NOT_PRIVILEGED {
                SmcError::NotPrivileged
            } else {
                SmcError::Call(code)
            });
        }
        match output.result {
            0 => Ok(output),
            SMC_RESULT_KEY_NOT_FOUND => Err(SmcError::KeyNotFound(key)),
            result => {
                debug!(key = %key, command = input.data8, result, "SMC rejected command");
                Err(SmcError::SmcResult { key, result })
            }
        }
    }

    /// Size and data type of `key`.
    pub fn key_info(&mut self, key: &[u8; 4]) -> Result<SMCKeyData_keyInfo> {
        let output = self.call(&SMCKeyData::command(key, SMC_CMD_READ_KEYINFO))?;
        Ok(output.key_info)
    }

    pub(crate) fn read_key_with_info(
        &mut self,
        key: &[u8; 4],
        info: SMCKeyData_keyInfo,
    ) -> Result<SMCVal> {
        let mut input = SMCKeyData::command(key, SMC_CMD_READ_BYTES);
        input.key_info.data_size = info.data_size;
        input.key_info.data_type = info.data_type;
        let output = self.call(&input)?;
        Ok(SMCVal {
            key: *key,
            data_size: info.data_size,
            data_type: info.data_type.to_be_bytes(),
            bytes: output.bytes,
        })
    }

    /// Reads the raw value of `key`.
    pub fn read_key(&mut self, key: &[u8; 4]) -> Result<SMCVal> {
        let info = self.key_info(key)?;
        self.read_key_with_info(key, info)
    }

    /// Reads `key` and renders it as text with the decode table.
    pub fn read_key_as_string(&mut self, key: &[u8; 4]) -> Result<String> {
        Ok(self.read_key(key)?.decode()?.to_string())
    }

    /// Reads `key` as a number. Text and opaque types fail with
    /// [`SmcError::NotNumeric`].
    pub fn read_key_as_number(&mut self, key: &[u8; 4]) -> Result<SmcNumber> {
        let val = self.read_key(key)?;
        val.decode()?
            .to_number()
            .ok_or_else(|| SmcError::NotNumeric(val.data_type_str().into_owned()))
    }

    fn write_bytes(&mut self, key: &[u8; 4], data_size: u32, bytes: SMCBytes) -> Result<()> {
        let mut input = SMCKeyData::command(key, SMC_CMD_WRITE_BYTES);
        input.key_info.data_size = data_size;
        input.bytes = bytes;
        self.call(&input)?;
        Ok(())
    }

    /// Writes raw bytes to `key`. `value.len()` must equal the size of the key.
    pub fn write_key(&mut self, key: &[u8; 4], value: &[u8]) -> Result<()> {
        let info = self.key_info(key)?;
        if value.len() != info.data_size as usize {
            return Err(SmcError::SizeMismatch {
                data_type: code_str(&info.data_type.to_be_bytes()),
                expected: info.data_size.to_string(),
                actual: value.len() as u32,
            });
        }
        let mut bytes = SMCBytes::default();
        bytes[..value.len()].copy_from_slice(value);
        self.write_bytes(key, info.data_size, bytes)
    }

    /// Encodes `value` with the data type of `key` and writes it.
    pub fn write_number(&mut self, key: &[u8; 4], value: f64) -> Result<()> {
        let info = self.key_info(key)?;
        let bytes = encode(&info.data_type.to_be_bytes(), info.data_size, value)?;
        self.write_bytes(key, info.data_size, bytes)
    }

    /// Parses `text` for the data type of `key` and writes it.
    pub fn write_str(&mut self, key: &[u8; 4], text: &str) -> Result<()> {
        let info = self.key_info(key)?;
        let bytes = encode_str(&info.data_type.to_be_bytes(), info.data_size, text)?;
        self.write_bytes(key, info.data_size, bytes)
    }

    pub fn read_version(&mut self) -> Result<SmcVersion> {
        let output = self.call(&SMCKeyData {
            data8: SMC_CMD_READ_VERS,
            ..Default::default()
        })?;
        Ok(output.vers.into())
    }

    pub fn read_plimit(&mut self) -> Result<PowerLimits> {
        let output = self.call(&SMCKeyData {
            data8: SMC_CMD_READ_PLIMIT,
            ..Default::default()
        })?;
        Ok(output.plimit_data.into())
    }

    /// Number of keys, from [`KEY_COUNT`].
    pub fn key_count(&mut self) -> Result<u32> {
        let val = self.read_key(&KEY_COUNT)?;
        if val.data_type != DATATYPE_UINT32 || val.data_size != 4 {
            return Err(SmcError::SizeMismatch {
                data_type: val.data_type_str().into_owned(),
                expected: "4".into(),
                actual: val.data_size,
            });
        }
        let mut bytes = [0; 4];
        bytes.copy_from_slice(&val.bytes[..4]);
        Ok(u32::from_be_bytes(bytes))
    }

    /// Name of the key at `index`, in the SMC's own order.
    pub fn key_at_index(&mut self, index: u32) -> Result<[u8; 4]> {
        let output = self.call(&SMCKeyData {
            data8: SMC_CMD_READ_INDEX,
            data32: index,
            ..Default::default()
        })?;
        Ok(output.key.to_be_bytes())
    }
}
