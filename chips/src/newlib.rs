//! C library system-call shims.

use core::ffi::c_void;

use cortex_boot::startup::Halt;
use cortex_boot::sys::stubs::{self, StatHead};

use crate::cortex_m4::park;

#[no_mangle]
pub extern "C" fn _exit(status: i32) -> ! {
    park(Halt::Exit(status))
}

#[no_mangle]
pub extern "C" fn _sbrk(increment: isize) -> *mut c_void {
    stubs::sbrk(increment) as *mut c_void
}

#[no_mangle]
pub extern "C" fn _write(file: i32, _ptr: *const u8, len: i32) -> i32 {
    stubs::write(file, len)
}

#[no_mangle]
pub extern "C" fn _close(file: i32) -> i32 {
    stubs::close(file)
}

#[no_mangle]
pub unsafe extern "C" fn _fstat(file: i32, stat: *mut StatHead) -> i32 {
    match stat.as_mut() {
        Some(stat) => stubs::fstat(file, stat),
        None => -1,
    }
}

#[no_mangle]
pub extern "C" fn _isatty(file: i32) -> i32 {
    stubs::isatty(file)
}

#[no_mangle]
pub extern "C" fn _lseek(file: i32, offset: i32, whence: i32) -> i32 {
    stubs::lseek(file, offset, whence)
}

#[no_mangle]
pub extern "C" fn _read(file: i32, _ptr: *mut u8, len: i32) -> i32 {
    stubs::read(file, len)
}

#[no_mangle]
pub extern "C" fn _getpid() -> i32 {
    stubs::getpid()
}

#[no_mangle]
pub extern "C" fn _kill(pid: i32, signal: i32) -> i32 {
    stubs::kill(pid, signal)
}
