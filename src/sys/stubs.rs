//! Return values of the minimal C library system-call layer.
//!
//! Nothing here performs I/O or keeps state between calls. The `extern "C"`
//! symbols live in the chip crate and forward here.

pub type Fd = i32;

/// `S_IFCHR`, character device.
pub const S_IFCHR: u32 = 0o020000;

/// Leading fields of newlib's `struct stat` on arm-none-eabi. Only `st_mode`
/// is ever written.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StatHead {
    pub st_dev: i16,
    pub st_ino: u16,
    pub st_mode: u32,
}

/// `(void *)-1`, the heap cannot grow.
pub fn sbrk(_increment: isize) -> usize {
    usize::MAX
}

/// Claims the whole buffer was written.
pub fn write(_fd: Fd, len: i32) -> i32 {
    len
}

pub fn close(_fd: Fd) -> i32 {
    -1
}

pub fn fstat(_fd: Fd, stat: &mut StatHead) -> i32 {
    stat.st_mode = S_IFCHR;
    0
}

pub fn isatty(_fd: Fd) -> i32 {
    1
}

pub fn lseek(_fd: Fd, _offset: i32, _whence: i32) -> i32 {
    0
}

/// End of input, nothing is ever read.
pub fn read(_fd: Fd, _len: i32) -> i32 {
    0
}

pub fn getpid() -> i32 {
    1
}

pub fn kill(_pid: i32, _signal: i32) -> i32 {
    -1
}

mod test {
    #[test]
    fn test_fixed_returns() {
        use super::*;

        assert_eq!(sbrk(4096) as isize, -1);
        assert_eq!(write(1, 12), 12);
        assert_eq!(read(0, 64), 0);
        assert_eq!(close(3), -1);
        assert_eq!(isatty(1), 1);
        assert_eq!(lseek(1, 100, 0), 0);
        assert_eq!(getpid(), 1);
        assert_eq!(kill(1, 9), -1);
    }

    #[test]
    fn test_fstat_reports_character_device() {
        use super::{fstat, StatHead, S_IFCHR};

        let mut stat = StatHead { st_dev: 7, st_ino: 9, st_mode: 0o100644 };
        assert_eq!(fstat(1, &mut stat), 0);
        assert_eq!(stat, StatHead { st_dev: 7, st_ino: 9, st_mode: S_IFCHR });
        assert_eq!(core::mem::size_of::<StatHead>(), 8);
    }
}
