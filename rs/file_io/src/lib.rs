//! Input abstraction for reading immutable data files.
//!
//! This crate defines a trait-based abstraction for random-access and
//! sequential reads over data files, allowing different storage backends to
//! be used interchangeably and composed with cross-cutting decorators such
//! as per-read metrics.

use std::time::SystemTime;

mod error;

pub mod local;
pub mod memory;
pub mod monitored;

pub use error::{InputError, Result};
pub use local::LocalInputFile;
pub use memory::MemoryInputFile;
pub use monitored::{MonitoredInput, MonitoredInputFile, ReadStats};

/// A handle to a data file that can produce readers on demand.
///
/// Metadata queries hit the backend on every call; nothing is cached, so
/// `length` reflects the size visible at call time.
pub trait InputFile: Send + Sync {
    /// Opaque location string identifying the file (path or URI).
    ///
    /// Stable for the lifetime of the handle and never performs I/O.
    fn location(&self) -> &str;

    /// Returns the current length of the file in bytes.
    fn length(&self) -> Result<u64>;

    /// Returns the last modification time of the file.
    fn modification_time(&self) -> Result<SystemTime>;

    /// Probes whether the file currently exists.
    fn exists(&self) -> Result<bool>;

    /// Opens a fresh reader against the file.
    ///
    /// Each call opens its own descriptor or backend session, so inputs
    /// returned by separate calls are safe to use from separate threads.
    ///
    /// # Errors
    /// Fails with [`InputError::NotFound`], [`InputError::AccessDenied`] or
    /// [`InputError::Unavailable`] if the file cannot be opened.
    fn open(&self) -> Result<Box<dyn RandomAccessInput>>;
}

/// Positional reader over a single open file.
///
/// An input owns exactly one underlying descriptor or backend session for
/// its lifetime and releases it on drop. Instances are single-owner; all
/// cursor-affecting operations take `&mut self`, so the compiler rules out
/// concurrent use of one instance.
pub trait RandomAccessInput: Send {
    /// Fills the whole buffer with the bytes starting at `position`.
    ///
    /// # Errors
    /// Fails with [`InputError::ShortRead`] if fewer than `buf.len()` bytes
    /// are available at `position`, and with [`InputError::InvalidArgument`]
    /// if `position + buf.len()` overflows. The buffer contents are
    /// unspecified after a failure.
    fn read_fully(&mut self, position: u64, buf: &mut [u8]) -> Result<()>;

    /// Fills the front of the buffer with the last bytes of the file.
    ///
    /// Computes `actual = min(current_file_length, buf.len())`, fills
    /// `buf[..actual]` with the final `actual` bytes and returns `actual`.
    /// The file length is re-queried on every call, so two calls may observe
    /// different tail sizes if the file is concurrently truncated or
    /// extended.
    fn read_tail(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Returns a sequential cursor view over the same underlying resource.
    ///
    /// The stream mutably borrows this input, so positional reads cannot be
    /// interleaved with stream use while the stream is alive.
    fn stream(&mut self) -> Result<Box<dyn SeekableStream + '_>>;

    /// Allocating variant of [`read_fully`](Self::read_fully).
    fn read_fully_vec(&mut self, position: u64, length: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; length];
        self.read_fully(position, &mut buf)?;
        Ok(buf)
    }

    /// Allocating variant of [`read_tail`](Self::read_tail). The returned
    /// vector is truncated to the actual tail size.
    fn read_tail_vec(&mut self, length: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; length];
        let actual = self.read_tail(&mut buf)?;
        buf.truncate(actual);
        Ok(buf)
    }
}

/// Sequential reader with an explicit, seekable cursor.
pub trait SeekableStream {
    /// Current 0-based cursor position.
    fn position(&mut self) -> Result<u64>;

    /// Moves the cursor to an absolute position.
    fn seek(&mut self, position: u64) -> Result<()>;

    /// Reads a single byte, or `None` at end of stream.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Reads up to `buf.len()` bytes at the cursor, advancing it by the
    /// returned count. Returns `Ok(0)` at end of stream for a non-empty
    /// buffer.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Advances the cursor by up to `n` bytes.
    ///
    /// Returns the number of bytes actually skipped, which is short of `n`
    /// only at end of file and is never negative or more than requested.
    fn skip(&mut self, n: u64) -> Result<u64>;
}
