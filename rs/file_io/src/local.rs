use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::PathBuf;
use std::time::SystemTime;

use log::debug;

use crate::error::{InputError, Result};
use crate::{InputFile, RandomAccessInput, SeekableStream};

/// [`InputFile`] implementation over the local filesystem.
///
/// Metadata calls stat the path on every invocation, so the reported length
/// and modification time track the live file.
pub struct LocalInputFile {
    path: PathBuf,
    location: String,
}

impl LocalInputFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let location = path.to_string_lossy().into_owned();
        Self { path, location }
    }
}

impl InputFile for LocalInputFile {
    fn location(&self) -> &str {
        &self.location
    }

    fn length(&self) -> Result<u64> {
        let metadata = fs::metadata(&self.path).map_err(|e| InputError::io(&self.location, e))?;
        Ok(metadata.len())
    }

    fn modification_time(&self) -> Result<SystemTime> {
        let metadata = fs::metadata(&self.path).map_err(|e| InputError::io(&self.location, e))?;
        metadata
            .modified()
            .map_err(|e| InputError::io(&self.location, e))
    }

    fn exists(&self) -> Result<bool> {
        match fs::metadata(&self.path) {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(InputError::io(&self.location, e)),
        }
    }

    fn open(&self) -> Result<Box<dyn RandomAccessInput>> {
        let file = File::open(&self.path).map_err(|e| InputError::io(&self.location, e))?;
        debug!("opened {}", self.location);
        Ok(Box::new(LocalInput {
            file,
            location: self.location.clone(),
        }))
    }
}

/// [`RandomAccessInput`] over a single local descriptor.
///
/// `read_fully` issues exactly one seek and one blocking full read per call;
/// there is no internal buffering. The descriptor is released on drop.
pub struct LocalInput {
    file: File,
    location: String,
}

impl RandomAccessInput for LocalInput {
    fn read_fully(&mut self, position: u64, buf: &mut [u8]) -> Result<()> {
        position.checked_add(buf.len() as u64).ok_or_else(|| {
            InputError::InvalidArgument(format!(
                "position {} plus length {} overflows",
                position,
                buf.len()
            ))
        })?;

        self.file
            .seek(SeekFrom::Start(position))
            .map_err(|e| InputError::io(&self.location, e))?;
        self.file.read_exact(buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => InputError::ShortRead {
                location: self.location.clone(),
                position,
                requested: buf.len(),
            },
            _ => InputError::io(&self.location, e),
        })
    }

    fn read_tail(&mut self, buf: &mut [u8]) -> Result<usize> {
        // Length is re-queried every call so the tail tracks the live file,
        // not a size captured at open time.
        let file_length = self
            .file
            .metadata()
            .map_err(|e| InputError::io(&self.location, e))?
            .len();
        let actual = file_length.min(buf.len() as u64) as usize;
        self.read_fully(file_length - actual as u64, &mut buf[..actual])?;
        Ok(actual)
    }

    fn stream(&mut self) -> Result<Box<dyn SeekableStream + '_>> {
        Ok(Box::new(LocalInputStream {
            file: &mut self.file,
            location: &self.location,
        }))
    }
}

/// Thin cursor over the parent input's descriptor. The mutable borrow keeps
/// the parent's positional reads off the shared cursor for the stream's
/// lifetime.
struct LocalInputStream<'a> {
    file: &'a mut File,
    location: &'a str,
}

impl SeekableStream for LocalInputStream<'_> {
    fn position(&mut self) -> Result<u64> {
        self.file
            .stream_position()
            .map_err(|e| InputError::io(self.location, e))
    }

    fn seek(&mut self, position: u64) -> Result<()> {
        self.file
            .seek(SeekFrom::Start(position))
            .map_err(|e| InputError::io(self.location, e))?;
        Ok(())
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match self.file.read(&mut byte) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(byte[0])),
            Err(e) => Err(InputError::io(self.location, e)),
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        self.file
            .read(buf)
            .map_err(|e| InputError::io(self.location, e))
    }

    fn skip(&mut self, n: u64) -> Result<u64> {
        let current = self
            .file
            .stream_position()
            .map_err(|e| InputError::io(self.location, e))?;
        let file_length = self
            .file
            .metadata()
            .map_err(|e| InputError::io(self.location, e))?
            .len();
        if current >= file_length {
            return Ok(0);
        }
        let target = current.saturating_add(n).min(file_length);
        self.file
            .seek(SeekFrom::Start(target))
            .map_err(|e| InputError::io(self.location, e))?;
        Ok(target - current)
    }
}
