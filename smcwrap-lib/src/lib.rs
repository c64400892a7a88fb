//! A library for reading and writing the Apple System Management Controller (SMC).
//!
//! The SMC holds sensor, fan and power-limit telemetry behind an undocumented
//! IOKit user client. This crate mirrors its wire format ([`structs`]),
//! decodes the known data types ([`value`], [`types`]) and offers typed
//! accessors and a dump of every key through [`wrapper::SMCWrapper`].
//!
//! The kernel call is reached through the [`driver::SmcDriver`] trait:
//! [`io::IOService`] on macOS, or [`memory::MemoryDriver`] anywhere.
//!

#![deny(clippy::unwrap_used)]

pub mod driver;
pub mod dump;
pub mod error;
#[cfg(target_os = "macos")]
pub mod io;
pub mod memory;
pub mod structs;
pub mod types;
pub mod value;
pub mod wrapper;

pub use error::{Result, SmcError, SmcStatus};
pub use wrapper::{ConnectionState, SMCWrapper};
