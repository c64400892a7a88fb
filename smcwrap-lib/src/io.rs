//! The `AppleSMC` IOKit user client.

use crate::{
    driver::SmcDriver,
    error::{KernReturn, Result, SmcError},
    structs::SMCKeyData,
    wrapper::SMCWrapper,
};
use lazy_static::lazy_static;
use libc::{KERN_SUCCESS, mach_error_string};
use mach2::traps::mach_task_self;
use objc2_io_kit::{
    IOConnectCallStructMethod, IOIteratorNext, IOMainPort, IOObjectRelease, IOServiceClose,
    IOServiceGetMatchingServices, IOServiceMatching, IOServiceOpen, io_connect_t,
};
use std::{
    borrow::Cow,
    ffi::{CStr, c_void},
    sync::Mutex,
};
use tracing::debug;

/// An open connection to the `AppleSMC` service, closed on drop.
pub struct IOService {
    conn: io_connect_t,
}

pub fn err_str(error_value: libc::kern_return_t) -> Cow<'static, str> {
    unsafe { CStr::from_ptr(mach_error_string(error_value)).to_string_lossy() }
}

lazy_static! {
    static ref SHARED: Mutex<SMCWrapper<IOService>> = Mutex::new(SMCWrapper::lazy(IOService::init));
}

/// The process-wide wrapper. The connection is opened by the first operation
/// and stays open until the process exits or someone calls
/// [`SMCWrapper::close`].
///
/// ```no_run
/// let mut smc = smcwrap_lib::io::shared().lock().unwrap();
/// println!("{}", smc.read_key_as_string(b"TC0P").unwrap());
/// ```
pub fn shared() -> &'static Mutex<SMCWrapper<IOService>> {
    &SHARED
}

impl IOService {
    pub fn init() -> Result<Self> {
        unsafe {
            let mut main_port = 0;
            let res = IOMainPort(0, &raw mut main_port);
            if res != KERN_SUCCESS {
                return Err(SmcError::MatchingServices(res));
            }
            let matching_dict =
                IOServiceMatching(c"AppleSMC".as_ptr()).and_then(|d| d.downcast().ok());
            let mut iterator = 0;
            let res = IOServiceGetMatchingServices(main_port, matching_dict, &raw mut iterator);
            if res != KERN_SUCCESS {
                return Err(SmcError::MatchingServices(res));
            }
            let device = IOIteratorNext(iterator);
            IOObjectRelease(iterator);
            if device == 0 {
                return Err(SmcError::NoSmcFound);
            }
            let mut conn = 0;
            let res = IOServiceOpen(device, mach_task_self(), 0, &raw mut conn);
            IOObjectRelease(device);
            if res != KERN_SUCCESS {
                return Err(SmcError::Open(res));
            }
            debug!(conn, "opened AppleSMC user client");
            Ok(Self { conn })
        }
    }
}

impl SmcDriver for IOService {
    fn call(
        &self,
        selector: u32,
        input: &SMCKeyData,
        output: &mut SMCKeyData,
    ) -> std::result::Result<(), KernReturn> {
        unsafe {
            let mut output_struct_cnt = size_of::<SMCKeyData>();
            let res = IOConnectCallStructMethod(
                self.conn,
                selector,
                input as *const _ as *const c_void,
                size_of::<SMCKeyData>(),
                output as *mut _ as *mut c_void,
                &raw mut output_struct_cnt,
            );
            if res == KERN_SUCCESS { Ok(()) } else { Err(res) }
        }
    }
}

impl Drop for IOService {
    fn drop(&mut self) {
        IOServiceClose(self.conn);
    }
}

#[test]
#[ignore = "needs SMC hardware and the key may not exist"]
fn basic_example() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let mut smc = SMCWrapper::new(IOService::init()?);

    // battery temperature
    let key = b"TB0T";
    let value = smc.read_key(key)?;
    println!("{}", value);

    let key_info = smc.key_info(key)?;
    println!(
        "data type: {}, size: {}",
        String::from_utf8_lossy(&key_info.data_type.to_be_bytes()).trim(),
        key_info.data_size
    );

    println!("{} keys", smc.key_count()?);
    Ok(())
}
