use std::sync::Arc;
use std::time::SystemTime;

use crate::error::{InputError, Result};
use crate::{InputFile, RandomAccessInput, SeekableStream};

/// [`InputFile`] implementation backed by an in-memory byte buffer.
///
/// Used as a cheap backend for tests and for data that is already resident.
/// The content is immutable once constructed, so the file always exists and
/// its length never changes.
pub struct MemoryInputFile {
    location: String,
    data: Arc<[u8]>,
    modified: SystemTime,
}

impl MemoryInputFile {
    pub fn new(location: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            location: location.into(),
            data: data.into().into(),
            modified: SystemTime::now(),
        }
    }
}

impl InputFile for MemoryInputFile {
    fn location(&self) -> &str {
        &self.location
    }

    fn length(&self) -> Result<u64> {
        Ok(self.data.len() as u64)
    }

    fn modification_time(&self) -> Result<SystemTime> {
        Ok(self.modified)
    }

    fn exists(&self) -> Result<bool> {
        Ok(true)
    }

    fn open(&self) -> Result<Box<dyn RandomAccessInput>> {
        Ok(Box::new(MemoryInput {
            location: self.location.clone(),
            data: self.data.clone(),
        }))
    }
}

pub struct MemoryInput {
    location: String,
    data: Arc<[u8]>,
}

impl RandomAccessInput for MemoryInput {
    fn read_fully(&mut self, position: u64, buf: &mut [u8]) -> Result<()> {
        let end = position.checked_add(buf.len() as u64).ok_or_else(|| {
            InputError::InvalidArgument(format!(
                "position {} plus length {} overflows",
                position,
                buf.len()
            ))
        })?;
        if end > self.data.len() as u64 {
            return Err(InputError::ShortRead {
                location: self.location.clone(),
                position,
                requested: buf.len(),
            });
        }
        buf.copy_from_slice(&self.data[position as usize..end as usize]);
        Ok(())
    }

    fn read_tail(&mut self, buf: &mut [u8]) -> Result<usize> {
        let actual = self.data.len().min(buf.len());
        buf[..actual].copy_from_slice(&self.data[self.data.len() - actual..]);
        Ok(actual)
    }

    fn stream(&mut self) -> Result<Box<dyn SeekableStream + '_>> {
        Ok(Box::new(MemoryInputStream {
            data: &self.data,
            position: 0,
        }))
    }
}

struct MemoryInputStream<'a> {
    data: &'a [u8],
    position: u64,
}

impl SeekableStream for MemoryInputStream<'_> {
    fn position(&mut self) -> Result<u64> {
        Ok(self.position)
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        self.position = position;
        Ok(())
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        if self.position >= self.data.len() as u64 {
            return Ok(None);
        }
        let byte = self.data[self.position as usize];
        self.position += 1;
        Ok(Some(byte))
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if self.position >= self.data.len() as u64 {
            return Ok(0);
        }
        let remaining = &self.data[self.position as usize..];
        let count = remaining.len().min(buf.len());
        buf[..count].copy_from_slice(&remaining[..count]);
        self.position += count as u64;
        Ok(count)
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        let file_length = self.data.len() as u64;
        if self.position >= file_length {
            return Ok(0);
        }
        let target = self.position.saturating_add(n).min(file_length);
        let skipped = target - self.position;
        self.position = target;
        Ok(skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_metadata() -> anyhow::Result<()> {
        let file = MemoryInputFile::new("memory://footer.bin", b"0123456789".to_vec());
        assert_eq!(file.location(), "memory://footer.bin");
        assert!(file.exists()?);
        assert_eq!(file.length()?, 10);
        Ok(())
    }

    #[test]
    fn test_memory_reads() -> anyhow::Result<()> {
        let file = MemoryInputFile::new("memory://footer.bin", b"0123456789".to_vec());
        let mut input = file.open()?;

        assert_eq!(input.read_fully_vec(2, 3)?, b"234");
        assert_eq!(input.read_tail_vec(4)?, b"6789");

        let mut buf = [0u8; 5];
        assert!(matches!(
            input.read_fully(8, &mut buf),
            Err(InputError::ShortRead { .. })
        ));

        Ok(())
    }

    #[test]
    fn test_memory_stream() -> anyhow::Result<()> {
        let file = MemoryInputFile::new("memory://footer.bin", b"0123456789".to_vec());
        let mut input = file.open()?;
        let mut stream = input.stream()?;

        assert_eq!(stream.read_byte()?, Some(b'0'));
        assert_eq!(stream.skip(7)?, 7);
        let mut buf = [0u8; 8];
        assert_eq!(stream.read(&mut buf)?, 2);
        assert_eq!(&buf[..2], b"89");
        assert_eq!(stream.read(&mut buf)?, 0);
        assert_eq!(stream.skip(1)?, 0);

        Ok(())
    }
}
