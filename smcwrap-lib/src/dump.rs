//! Enumerating every key of the SMC.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::{
    driver::SmcDriver,
    error::{Result, SmcError},
    structs::SMCVal,
    value::{SmcValue, code_str},
    wrapper::SMCWrapper,
};

/// Failure to read the key at one index during enumeration.
#[derive(Debug, Clone, PartialEq)]
pub struct ValError {
    pub index: u32,
    pub key: Option<[u8; 4]>,
    pub data_size: Option<u32>,
    pub data_type: Option<[u8; 4]>,
    pub source: SmcError,
}

impl std::fmt::Display for ValError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(key) = self.key {
            write!(f, "{} ", String::from_utf8_lossy(&key))?;
        }
        if let Some(data_type) = self.data_type {
            write!(f, "{} ", String::from_utf8_lossy(&data_type))?;
        }
        if let Some(size) = self.data_size {
            write!(f, "size: {} ", size)?;
        }
        write!(f, "index: {}, error: {}", self.index, self.source)
    }
}

impl std::error::Error for ValError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Iterator over the values of all keys, one `Result` per index.
///
/// Errors that concern a single key are yielded and the iteration goes on;
/// any other error (connection closed, missing privileges) is yielded once
/// and ends the iteration.
pub struct ValIter<'a, D> {
    wrapper: &'a mut SMCWrapper<D>,
    total_count: u32,
    current: u32,
}

impl<D: SmcDriver> ValIter<'_, D> {
    fn read_at(&mut self, index: u32) -> std::result::Result<SMCVal, ValError> {
        let mut err = ValError {
            index,
            key: None,
            data_size: None,
            data_type: None,
            source: SmcError::Closed,
        };
        let key = match self.wrapper.key_at_index(index) {
            Ok(key) => key,
            Err(source) => return Err(ValError { source, ..err }),
        };
        err.key = Some(key);
        let info = match self.wrapper.key_info(&key) {
            Ok(info) => info,
            Err(source) => return Err(ValError { source, ..err }),
        };
        err.data_size = Some(info.data_size);
        err.data_type = Some(info.data_type.to_be_bytes());
        self.wrapper
            .read_key_with_info(&key, info)
            .map_err(|source| ValError { source, ..err })
    }
}

impl<D: SmcDriver> Iterator for ValIter<'_, D> {
    type Item = std::result::Result<SMCVal, ValError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.total_count {
            return None;
        }
        let index = self.current;
        self.current += 1;
        let res = self.read_at(index);
        if let Err(err) = &res {
            if !err.source.is_per_key() {
                self.current = self.total_count;
            }
        }
        Some(res)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = (self.total_count - self.current) as usize;
        (0, Some(len))
    }
}

/// Every decodable key of the SMC as two maps keyed by key name: the value
/// rendered as text, and the 4-character data type.
///
/// Both maps always hold the same set of keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SmcDump {
    values: BTreeMap<String, String>,
    types: BTreeMap<String, String>,
}

impl SmcDump {
    fn insert(&mut self, val: &SMCVal, value: &SmcValue) {
        let key = code_str(&val.key);
        self.values.insert(key.clone(), value.to_string());
        self.types.insert(key, code_str(&val.data_type));
    }

    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    pub fn types(&self) -> &BTreeMap<String, String> {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(key, type, value)` in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.values.iter().zip(self.types.values()).map(|((key, value), data_type)| {
            (key.as_str(), data_type.as_str(), value.as_str())
        })
    }

    /// The value map and the type map.
    pub fn into_parts(self) -> (BTreeMap<String, String>, BTreeMap<String, String>) {
        (self.values, self.types)
    }
}

impl<D: SmcDriver> SMCWrapper<D> {
    /// Iterates over the values of all keys.
    pub fn values(&mut self) -> Result<ValIter<'_, D>> {
        let total_count = self.key_count()?;
        Ok(ValIter {
            wrapper: self,
            total_count,
            current: 0,
        })
    }

    /// Reads and decodes every key. Keys that cannot be read or decoded are
    /// left out of both maps.
    pub fn dump(&mut self) -> Result<SmcDump> {
        let mut dump = SmcDump::default();
        for item in self.values()? {
            let val = match item {
                Ok(val) => val,
                Err(err) if err.source.is_per_key() => {
                    debug!(error = %err, "skipping unreadable key");
                    continue;
                }
                Err(err) => return Err(err.source),
            };
            match val.decode() {
                Ok(value) => dump.insert(&val, &value),
                Err(err) => debug!(key = %val.key_str(), error = %err, "skipping undecodable key"),
            }
        }
        Ok(dump)
    }
}
