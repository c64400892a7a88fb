//! The kernel side of an SMC connection.

use crate::{error::KernReturn, structs::SMCKeyData};

/// An open connection to the SMC user client.
///
/// [`crate::io::IOService`] talks to the real `AppleSMC` service;
/// [`crate::memory::MemoryDriver`] answers from an in-memory key table.
#[cfg_attr(test, mockall::automock)]
pub trait SmcDriver {
    /// Performs one struct method call. `output` receives the reply only
    /// when the call returns `Ok`.
    fn call(
        &self,
        selector: u32,
        input: &SMCKeyData,
        output: &mut SMCKeyData,
    ) -> Result<(), KernReturn>;
}

impl<D: SmcDriver + ?Sized> SmcDriver for Box<D> {
    fn call(
        &self,
        selector: u32,
        input: &SMCKeyData,
        output: &mut SMCKeyData,
    ) -> Result<(), KernReturn> {
        (**self).call(selector, input, output)
    }
}
