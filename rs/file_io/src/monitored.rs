use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use crate::error::Result;
use crate::{InputFile, RandomAccessInput, SeekableStream};

/// Recording interface for per-read throughput metrics.
///
/// One sink is typically shared by many monitored inputs across threads, so
/// implementations must accumulate with internal synchronization (atomic
/// counters) and must never block indefinitely or panic. Accumulation must
/// be a plain sum of bytes and elapsed time so concurrent report ordering
/// cannot affect the result.
pub trait ReadStats: Send + Sync {
    fn record_read(&self, bytes: u64, elapsed: Duration);
}

/// [`InputFile`] decorator that meters every read issued through it.
///
/// Metadata calls are forwarded unchanged; inputs opened through this handle
/// report `(bytes_transferred, elapsed)` to the sink once per successful
/// read, using the delegate's returned byte count so short reads and skips
/// are metered accurately. Failed calls report nothing and their errors pass
/// through untranslated.
///
/// Nesting one monitored file inside another is valid and double-reports:
/// each layer meters independently, which is how multi-tier totals (e.g.
/// per-connector and per-format) are collected.
pub struct MonitoredInputFile {
    delegate: Box<dyn InputFile>,
    stats: Arc<dyn ReadStats>,
}

impl MonitoredInputFile {
    pub fn new(delegate: Box<dyn InputFile>, stats: Arc<dyn ReadStats>) -> Self {
        Self { delegate, stats }
    }
}

impl InputFile for MonitoredInputFile {
    fn location(&self) -> &str {
        self.delegate.location()
    }

    fn length(&self) -> Result<u64> {
        self.delegate.length()
    }

    fn modification_time(&self) -> Result<SystemTime> {
        self.delegate.modification_time()
    }

    fn exists(&self) -> Result<bool> {
        self.delegate.exists()
    }

    fn open(&self) -> Result<Box<dyn RandomAccessInput>> {
        let input = self.delegate.open()?;
        Ok(Box::new(MonitoredInput::new(input, self.stats.clone())))
    }
}

/// [`RandomAccessInput`] decorator metering each call against the sink.
pub struct MonitoredInput {
    delegate: Box<dyn RandomAccessInput>,
    stats: Arc<dyn ReadStats>,
}

impl MonitoredInput {
    pub fn new(delegate: Box<dyn RandomAccessInput>, stats: Arc<dyn ReadStats>) -> Self {
        Self { delegate, stats }
    }
}

impl RandomAccessInput for MonitoredInput {
    fn read_fully(&mut self, position: u64, buf: &mut [u8]) -> Result<()> {
        let start = Instant::now();
        self.delegate.read_fully(position, buf)?;
        self.stats.record_read(buf.len() as u64, start.elapsed());
        Ok(())
    }

    fn read_tail(&mut self, buf: &mut [u8]) -> Result<usize> {
        let start = Instant::now();
        let actual = self.delegate.read_tail(buf)?;
        self.stats.record_read(actual as u64, start.elapsed());
        Ok(actual)
    }

    fn stream(&mut self) -> Result<Box<dyn SeekableStream + '_>> {
        let stats = self.stats.clone();
        let delegate = self.delegate.stream()?;
        Ok(Box::new(MonitoredStream { delegate, stats }))
    }
}

struct MonitoredStream<'a> {
    delegate: Box<dyn SeekableStream + 'a>,
    stats: Arc<dyn ReadStats>,
}

impl SeekableStream for MonitoredStream<'_> {
    fn position(&mut self) -> Result<u64> {
        self.delegate.position()
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        self.delegate.seek(position)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let start = Instant::now();
        let value = self.delegate.read_byte()?;
        // End of stream transfers nothing; meter it as zero bytes.
        let bytes = if value.is_some() { 1 } else { 0 };
        self.stats.record_read(bytes, start.elapsed());
        Ok(value)
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        let start = Instant::now();
        let count = self.delegate.read(buf)?;
        self.stats.record_read(count as u64, start.elapsed());
        Ok(count)
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        let start = Instant::now();
        let skipped = self.delegate.skip(n)?;
        self.stats.record_read(skipped, start.elapsed());
        Ok(skipped)
    }
}
