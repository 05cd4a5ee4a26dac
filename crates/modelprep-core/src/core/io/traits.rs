use crate::core::models::structure::Structure;
use std::error::Error;
use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// A skipped or suspicious line. Readers collect these instead of failing
/// when the rest of the file is still usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// 1-based.
    pub line: usize,
    pub message: String,
}

impl ParseWarning {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// A coordinate format that round-trips a [`Structure`] plus whatever the
/// format keeps outside the record stream.
///
/// Implementors provide [`read_from`](Self::read_from) and
/// [`write_to`](Self::write_to); string and path variants are derived.
pub trait StructureFile {
    type Options: Default;
    type Metadata;
    type Error: Error + From<io::Error>;

    fn read_from(
        reader: &mut impl BufRead,
        options: &Self::Options,
    ) -> Result<(Structure, Self::Metadata), Self::Error>;

    fn write_to(
        structure: &Structure,
        metadata: &Self::Metadata,
        writer: &mut impl Write,
    ) -> Result<(), Self::Error>;

    fn read_from_str(
        text: &str,
        options: &Self::Options,
    ) -> Result<(Structure, Self::Metadata), Self::Error> {
        Self::read_from(&mut text.as_bytes(), options)
    }

    fn read_from_path<P: AsRef<Path>>(
        path: P,
        options: &Self::Options,
    ) -> Result<(Structure, Self::Metadata), Self::Error> {
        let mut reader = BufReader::new(File::open(path)?);
        Self::read_from(&mut reader, options)
    }

    /// Creates or truncates `path`; the buffer is flushed before returning.
    fn write_to_path<P: AsRef<Path>>(
        structure: &Structure,
        metadata: &Self::Metadata,
        path: P,
    ) -> Result<(), Self::Error> {
        let mut writer = BufWriter::new(File::create(path)?);
        Self::write_to(structure, metadata, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}
