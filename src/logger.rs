use core::{
    fmt::{self, Display, Formatter, Write},
    ptr::addr_of_mut,
    str::from_utf8,
    sync::atomic::{AtomicUsize, Ordering},
};

use log::{Log, Metadata, Record};

/// Byte ring that keeps the most recent log output.
#[derive(Default)]
pub struct LogBuffer {
    buffer: &'static mut [u8],
    index: AtomicUsize,
    writer_count: AtomicUsize,
}

impl LogBuffer {
    pub fn new(buffer: &'static mut [u8]) -> Self {
        Self { buffer, ..Default::default() }
    }
}

impl Write for LogBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let size = self.buffer.len();
        if size == 0 {
            return Ok(());
        }
        self.writer_count.fetch_add(1, Ordering::Relaxed);
        let mut bytes = s.as_bytes();
        if size < bytes.len() {
            let mut cut = bytes.len() - size;
            while !s.is_char_boundary(cut) {
                cut += 1;
            }
            bytes = &bytes[cut..];
        }
        let index = self.index.fetch_add(bytes.len(), Ordering::Relaxed) % size;

        if size - index > bytes.len() {
            self.buffer[index..index + bytes.len()].copy_from_slice(bytes);
            self.writer_count.fetch_sub(1, Ordering::Release);
            return Ok(());
        }

        let partial_size = size - index;
        self.buffer[index..size].copy_from_slice(&bytes[..partial_size]);
        self.buffer[..bytes.len() - partial_size].copy_from_slice(&bytes[partial_size..]);
        self.writer_count.fetch_sub(1, Ordering::Release);
        Ok(())
    }
}

fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Drops the remains of a character whose leading byte was overwritten.
fn skip_partial(bytes: &[u8]) -> &[u8] {
    &bytes[bytes.iter().take_while(|&&b| is_continuation(b)).count()..]
}

/// Writes the valid UTF-8 prefix of `bytes`, returning what is left.
fn write_utf8<'a>(f: &mut Formatter, bytes: &'a [u8]) -> Result<&'a [u8], fmt::Error> {
    let valid = match from_utf8(bytes) {
        Ok(_) => bytes.len(),
        Err(e) => e.valid_up_to(),
    };
    f.write_str(from_utf8(&bytes[..valid]).unwrap_or_default())?;
    Ok(&bytes[valid..])
}

impl Display for LogBuffer {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        while self.writer_count.load(Ordering::Relaxed) > 0 {}
        core::sync::atomic::fence(Ordering::Acquire);
        let index = self.index.load(Ordering::Relaxed);
        if index <= self.buffer.len() {
            write_utf8(f, &self.buffer[..index])?;
            return Ok(());
        }
        let index = index % self.buffer.len();
        let (mut head, mut tail) = (skip_partial(&self.buffer[index..]), &self.buffer[..index]);
        if head.is_empty() {
            tail = skip_partial(tail);
        }
        head = write_utf8(f, head)?;
        if !head.is_empty() {
            // A character straddles the end of the ring
            let mut char_bytes = [0u8; 4];
            let size = head.len().min(char_bytes.len());
            char_bytes[..size].copy_from_slice(&head[..size]);
            let more = tail.iter().take(4 - size).take_while(|&&b| is_continuation(b)).count();
            char_bytes[size..size + more].copy_from_slice(&tail[..more]);
            f.write_str(from_utf8(&char_bytes[..size + more]).unwrap_or_default())?;
            tail = &tail[more..];
        }
        write_utf8(f, tail)?;
        Ok(())
    }
}

static mut LOG_BUFFER: LogBuffer =
    LogBuffer { buffer: &mut [], index: AtomicUsize::new(0), writer_count: AtomicUsize::new(0) };
static SEQUENCE: AtomicUsize = AtomicUsize::new(0);

pub struct Logger;

impl Log for Logger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let sequence = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        let log_buffer = unsafe { &mut *addr_of_mut!(LOG_BUFFER) };
        writeln!(log_buffer, "[{:5}] {:5} {}", sequence, record.level(), record.args()).ok();
    }

    fn flush(&self) {}
}

pub fn get() -> &'static LogBuffer {
    unsafe { &*addr_of_mut!(LOG_BUFFER) }
}

/// Installs the ring-buffer logger. Must run after `.bss` and `.data` are
/// initialized.
pub fn init(buffer: &'static mut [u8]) {
    unsafe { LOG_BUFFER = LogBuffer::new(buffer) }
    log::set_max_level(log::LevelFilter::Trace);
    log::set_logger(&Logger).ok();
}

mod test {
    #[cfg(test)]
    use serial_test::serial;

    #[test]
    fn test_wrap_around() {
        use core::fmt::Write;

        use super::LogBuffer;

        let mut log_buffer = LogBuffer::new(std::boxed::Box::leak(std::boxed::Box::new([0u8; 8])));
        write!(log_buffer, "abcdef").ok();
        assert_eq!(std::format!("{}", log_buffer), "abcdef");
        write!(log_buffer, "ghij").ok();
        assert_eq!(std::format!("{}", log_buffer), "cdefghij");
        write!(log_buffer, "0123456789").ok();
        assert_eq!(std::format!("{}", log_buffer), "23456789");
    }

    #[test]
    fn test_multibyte_characters() {
        use core::fmt::Write;

        use super::LogBuffer;

        let mut log_buffer = LogBuffer::new(std::boxed::Box::leak(std::boxed::Box::new([0u8; 2])));
        write!(log_buffer, "éa").ok();
        assert_eq!(std::format!("{}", log_buffer), "a");
        write!(log_buffer, "é").ok();
        assert_eq!(std::format!("{}", log_buffer), "é");
        write!(log_buffer, "aé").ok();
        assert_eq!(std::format!("{}", log_buffer), "é");

        let mut log_buffer = LogBuffer::new(std::boxed::Box::leak(std::boxed::Box::new([0u8; 4])));
        write!(log_buffer, "éé").ok();
        write!(log_buffer, "x").ok();
        assert_eq!(std::format!("{}", log_buffer), "éx");
    }

    #[test]
    #[serial]
    fn test_install_logger() {
        super::init(std::boxed::Box::leak(std::vec![0u8; 1024].into_boxed_slice()));
        info!("Relocated {} words", 100);
        warn!("Entry point returned");
        let output = std::format!("{}", super::get());
        assert!(output.contains("INFO  Relocated 100 words\n"));
        assert!(output.contains("WARN  Entry point returned\n"));
    }
}
