//! Error types for the container and payload formats.

use std::fmt;
use std::io;

/// The field or step that was being processed when an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Writing the `u32` header length
    WriteHeaderLength,
    /// Encoding or writing the header body
    WriteHeader,
    /// Writing the concatenated entry data
    WriteData,
    /// Reading the `u32` header length
    ReadHeaderLength,
    /// Reading the header body
    ReadHeader,
    /// Decoding an entry's `u16` id length
    ReadIdLength,
    /// Decoding an entry's id bytes
    ReadId,
    /// Decoding an entry's `u64` data length
    ReadDataLength,
    /// Reading the concatenated entry data
    ReadData,
    /// Querying the current position of a stream
    StreamPosition,
    /// Locating the running executable
    LocateExecutable,
    /// Opening a file
    OpenFile,
    /// Seeking to the payload trailer
    SeekTrailer,
    /// Reading the payload trailer
    ReadTrailer,
    /// Validating the trailer's data start offset
    DataStart,
    /// Seeking to the start of the payload
    SeekPayload,
    /// Reading the payload data
    ReadPayload,
    /// Reading an input file
    ReadInput,
    /// Walking an input directory
    WalkDirectory,
    /// Writing an output file
    WriteOutput,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Stage::WriteHeaderLength => "writing header length",
            Stage::WriteHeader => "writing header",
            Stage::WriteData => "writing data",
            Stage::ReadHeaderLength => "reading header length",
            Stage::ReadHeader => "reading header",
            Stage::ReadIdLength => "reading id length",
            Stage::ReadId => "reading id",
            Stage::ReadDataLength => "reading data length",
            Stage::ReadData => "reading data",
            Stage::StreamPosition => "querying stream position",
            Stage::LocateExecutable => "locating executable",
            Stage::OpenFile => "opening file",
            Stage::SeekTrailer => "seeking to trailer",
            Stage::ReadTrailer => "reading trailer",
            Stage::DataStart => "validating payload start",
            Stage::SeekPayload => "seeking to payload",
            Stage::ReadPayload => "reading payload",
            Stage::ReadInput => "reading input",
            Stage::WalkDirectory => "walking directory",
            Stage::WriteOutput => "writing output",
        };
        f.write_str(text)
    }
}

/// Errors produced while encoding, decoding or reading packed data.
#[derive(Debug, thiserror::Error)]
pub enum PackError {
    /// Malformed header or trailer, or an id that cannot be encoded
    #[error("Format error while {stage}: {detail}")]
    Format { stage: Stage, detail: String },

    /// Underlying read, write or seek failure
    #[error("I/O error while {stage}")]
    Io {
        stage: Stage,
        #[source]
        source: io::Error,
    },

    /// Seek target before the start of a window
    #[error("Seek to {target} is before the start of the window")]
    Range { target: i128 },
}

impl PackError {
    pub fn format(stage: Stage, detail: impl Into<String>) -> Self {
        PackError::Format {
            stage,
            detail: detail.into(),
        }
    }

    /// Wrap an I/O error with the stage it happened in.
    ///
    /// Meant for `map_err`: `writer.write_all(..).map_err(PackError::io(Stage::WriteData))`.
    pub fn io(stage: Stage) -> impl FnOnce(io::Error) -> PackError {
        move |source| PackError::Io { stage, source }
    }

    /// Like [`PackError::io`], but a premature end of stream is reported as a
    /// format error since the data declared more bytes than it holds.
    pub fn read(stage: Stage) -> impl FnOnce(io::Error) -> PackError {
        move |source| {
            if source.kind() == io::ErrorKind::UnexpectedEof {
                PackError::format(stage, "unexpected end of stream")
            } else {
                PackError::Io { stage, source }
            }
        }
    }

    /// The stage this error was raised in, if it carries one.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            PackError::Format { stage, .. } | PackError::Io { stage, .. } => Some(*stage),
            PackError::Range { .. } => None,
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, PackError::Format { .. })
    }

    pub fn is_range(&self) -> bool {
        matches!(self, PackError::Range { .. })
    }

    /// Recover a `PackError` that crossed a `Read`/`Seek` boundary.
    pub fn from_io(err: &io::Error) -> Option<&PackError> {
        err.get_ref().and_then(|inner| inner.downcast_ref::<PackError>())
    }
}

impl From<PackError> for io::Error {
    fn from(err: PackError) -> Self {
        let kind = match &err {
            PackError::Format { .. } => io::ErrorKind::InvalidData,
            PackError::Io { source, .. } => source.kind(),
            PackError::Range { .. } => io::ErrorKind::InvalidInput,
        };
        io::Error::new(kind, err)
    }
}
