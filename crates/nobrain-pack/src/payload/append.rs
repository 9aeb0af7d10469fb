//! Append a payload to a host file

use std::fs;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use super::format::Trailer;
use crate::error::{PackError, Stage};
use crate::fsutil;

/// Where the payload landed in a combined file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppendSummary {
    /// Offset of the first payload byte (the host file's original size)
    pub data_start: u64,
    /// Payload length in bytes
    pub data_len: u64,
    /// Size of the combined file, trailer included
    pub total_len: u64,
}

/// Write `host ++ data ++ trailer` to `output`.
///
/// The output keeps the host file's permission bits, so an executable stays
/// executable. `output` may be the host path itself; it is replaced
/// atomically. Running this on an already combined file appends a second
/// payload behind the first one, and only the last one can be located.
pub fn append_payload(host: &Path, data: &Path, output: &Path) -> Result<AppendSummary, PackError> {
    let permissions = fs::metadata(host)
        .map_err(PackError::io(Stage::ReadInput))?
        .permissions();
    let host_bytes = fs::read(host).map_err(PackError::io(Stage::ReadInput))?;
    let data_bytes = fs::read(data).map_err(PackError::io(Stage::ReadInput))?;

    let summary = append_bytes(&host_bytes, &data_bytes, output, Some(permissions))?;
    debug!(
        host = %host.display(),
        output = %output.display(),
        data_start = summary.data_start,
        data_len = summary.data_len,
        "appended payload"
    );
    Ok(summary)
}

/// Like [`append_payload`] with the inputs already in memory.
pub fn append_bytes(
    host: &[u8],
    data: &[u8],
    output: &Path,
    permissions: Option<fs::Permissions>,
) -> Result<AppendSummary, PackError> {
    let trailer = Trailer::new(host.len() as u64);
    fsutil::write_atomic(output, permissions, |writer| {
        writer
            .write_all(host)
            .map_err(PackError::io(Stage::WriteOutput))?;
        writer
            .write_all(data)
            .map_err(PackError::io(Stage::WriteOutput))?;
        trailer
            .write_to(writer)
            .map_err(PackError::io(Stage::WriteOutput))
    })?;

    Ok(AppendSummary {
        data_start: trailer.data_start,
        data_len: data.len() as u64,
        total_len: (host.len() + data.len()) as u64 + super::TRAILER_SIZE as u64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::TRAILER_SIZE;

    #[test]
    fn test_append_layout() {
        let dir = tempfile::tempdir().unwrap();
        let host = dir.path().join("game");
        let data = dir.path().join("assets.blob");
        let output = dir.path().join("game.out");
        fs::write(&host, b"ELF!").unwrap();
        fs::write(&data, b"DATA").unwrap();

        let summary = append_payload(&host, &data, &output).unwrap();
        assert_eq!(summary.data_start, 4);
        assert_eq!(summary.data_len, 4);
        assert_eq!(summary.total_len, 8 + TRAILER_SIZE as u64);

        let combined = fs::read(&output).unwrap();
        assert_eq!(&combined[..8], b"ELF!DATA");
        assert_eq!(&combined[8..16], b"payload ");
        assert_eq!(&combined[16..], &[4, 0, 0, 0, 0, 0, 0, 0]);
        // host untouched
        assert_eq!(fs::read(&host).unwrap(), b"ELF!");
    }

    #[test]
    fn test_append_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let host = dir.path().join("game");
        let data = dir.path().join("assets.blob");
        fs::write(&host, b"exe").unwrap();
        fs::write(&data, b"").unwrap();

        append_payload(&host, &data, &host).unwrap();
        let combined = fs::read(&host).unwrap();
        assert_eq!(combined.len(), 3 + TRAILER_SIZE);
        assert_eq!(&combined[3..11], b"payload ");
    }

    #[cfg(unix)]
    #[test]
    fn test_append_preserves_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let host = dir.path().join("game");
        let data = dir.path().join("assets.blob");
        let output = dir.path().join("bundled");
        fs::write(&host, b"exe").unwrap();
        fs::write(&data, b"data").unwrap();
        fs::set_permissions(&host, fs::Permissions::from_mode(0o751)).unwrap();

        append_payload(&host, &data, &output).unwrap();
        let mode = fs::metadata(&output).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o751);
    }

    #[test]
    fn test_append_missing_data_file() {
        let dir = tempfile::tempdir().unwrap();
        let host = dir.path().join("game");
        fs::write(&host, b"exe").unwrap();

        let err = append_payload(&host, &dir.path().join("missing"), &host).unwrap_err();
        assert_eq!(err.stage(), Some(Stage::ReadInput));
        assert_eq!(fs::read(&host).unwrap(), b"exe");
    }
}
