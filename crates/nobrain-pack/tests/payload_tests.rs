//! Integration tests for payload appending and discovery
//!
//! Builds combined files in a temp directory and opens them the way a bundled
//! executable opens itself.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use nobrain_pack::blob::{pack_path, BlobReader};
use nobrain_pack::payload::{self, Trailer, TRAILER_SIZE};
use nobrain_pack::{PackError, Stage};

fn write(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, bytes).unwrap();
    path
}

#[test]
fn test_plain_file_has_no_payload() {
    let dir = tempfile::tempdir().unwrap();
    let exe = write(dir.path(), "game", b"\x7fELF not bundled at all");

    assert!(payload::open_at(&exe).unwrap().is_none());
    assert!(payload::read_all_at(&exe).unwrap().is_none());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = payload::open_at(&dir.path().join("missing")).unwrap_err();
    assert_eq!(err.stage(), Some(Stage::OpenFile));
}

#[test]
fn test_appended_payload_matches_data_file() {
    let dir = tempfile::tempdir().unwrap();
    let exe = write(dir.path(), "game", &vec![0xAB; 4096]);
    let data_bytes: Vec<u8> = (0..3000u32).map(|i| (i % 251) as u8).collect();
    let data = write(dir.path(), "assets.blob", &data_bytes);
    let output = dir.path().join("game-bundled");

    let summary = payload::append_payload(&exe, &data, &output).unwrap();
    assert_eq!(summary.data_start, 4096);
    assert_eq!(fs::metadata(&output).unwrap().len(), summary.total_len);

    let read = payload::read_all_at(&output).unwrap().unwrap();
    assert_eq!(read, data_bytes);

    let mut reader = payload::open_at(&output).unwrap().unwrap();
    assert_eq!(reader.len(), 3000);
    assert_eq!(reader.data_range(), 4096..7096);
    reader.seek(SeekFrom::Start(2990)).unwrap();
    let mut tail = Vec::new();
    reader.read_to_end(&mut tail).unwrap();
    assert_eq!(tail, &data_bytes[2990..]);
    reader.close();
}

#[test]
fn test_corrupt_data_start_is_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let exe = write(dir.path(), "game", b"host");
    let data = write(dir.path(), "data", b"payload bytes");
    payload::append_payload(&exe, &data, &exe).unwrap();

    let mut bytes = fs::read(&exe).unwrap();
    let len = bytes.len();
    let bad = Trailer::new(len as u64).to_bytes();
    bytes[len - TRAILER_SIZE..].copy_from_slice(&bad);
    fs::write(&exe, &bytes).unwrap();

    let err = payload::open_at(&exe).unwrap_err();
    assert!(matches!(
        err,
        PackError::Format {
            stage: Stage::DataStart,
            ..
        }
    ));
}

#[test]
fn test_blob_inside_payload() {
    let dir = tempfile::tempdir().unwrap();
    let rsc = dir.path().join("rsc");
    fs::create_dir_all(rsc.join("sprites")).unwrap();
    fs::write(rsc.join("music.wav"), b"RIFF....WAVE").unwrap();
    fs::write(rsc.join("sprites/zombie.png"), b"\x89PNG zombie").unwrap();
    fs::write(rsc.join("sprites/player.png"), b"\x89PNG player").unwrap();

    let blob_path = dir.path().join("assets.blob");
    pack_path(&rsc).unwrap().write_to_path(&blob_path).unwrap();

    let exe = write(dir.path(), "game", b"\x7fELF host program bytes");
    payload::append_payload(&exe, &blob_path, &exe).unwrap();

    let reader = payload::open_at(&exe).unwrap().unwrap();
    let assets = BlobReader::open(reader).unwrap();
    assert_eq!(assets.item_count(), 3);
    assert_eq!(assets.id_at(0), "music.wav");

    let mut zombie = assets.get_by_id("sprites/zombie.png").unwrap();
    let mut player = assets.get_by_id("sprites/player.png").unwrap();
    let mut a = [0u8; 6];
    let mut b = [0u8; 6];
    zombie.read_exact(&mut a[..3]).unwrap();
    player.read_exact(&mut b[..3]).unwrap();
    zombie.read_exact(&mut a[3..]).unwrap();
    player.read_exact(&mut b[3..]).unwrap();
    assert_eq!(&a, b"\x89PNG z");
    assert_eq!(&b, b"\x89PNG p");

    // seeking a section never exposes the offset inside the executable
    assert_eq!(zombie.seek(SeekFrom::End(0)).unwrap(), 11);
}
