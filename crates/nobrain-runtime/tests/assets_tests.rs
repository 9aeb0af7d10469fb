//! Integration tests for asset resolution
//!
//! Bundles a small asset folder into a fake executable and resolves names
//! from it, then checks the fallback to the development folder.

use std::fs;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use nobrain_pack::blob::{pack_path, Blob};
use nobrain_pack::payload::{self, Trailer, TRAILER_SIZE};
use nobrain_runtime::{AssetError, Assets, AssetsConfig};

struct Fixture {
    _temp: tempfile::TempDir,
    rsc: PathBuf,
    exe: PathBuf,
}

fn fixture() -> Fixture {
    let temp = tempfile::tempdir().unwrap();
    let rsc = temp.path().join("rsc");
    fs::create_dir_all(rsc.join("sprites")).unwrap();
    fs::write(rsc.join("music.wav"), b"RIFF music").unwrap();
    fs::write(rsc.join("sprites/zombie.png"), b"zombie pixels").unwrap();
    fs::write(rsc.join("highscores.txt"), b"").unwrap();

    let blob_path = temp.path().join("rsc.blob");
    pack_path(&rsc).unwrap().write_to_path(&blob_path).unwrap();

    let exe = temp.path().join("game");
    fs::write(&exe, b"\x7fELF the game itself").unwrap();
    payload::append_payload(&exe, &blob_path, &exe).unwrap();

    Fixture {
        _temp: temp,
        rsc,
        exe,
    }
}

fn config_for(dev_dir: &Path) -> AssetsConfig {
    AssetsConfig {
        dev_dir: dev_dir.to_path_buf(),
        ..AssetsConfig::default()
    }
}

#[test]
fn test_detect_embedded_assets() {
    let fx = fixture();
    let assets = Assets::detect_at(&fx.exe, &config_for(Path::new("unused"))).unwrap();
    assert!(assets.is_embedded());

    assert_eq!(assets.read("music.wav").unwrap().unwrap(), b"RIFF music");
    assert_eq!(
        assets.read_text("./sprites/zombie.png").unwrap().unwrap(),
        "zombie pixels"
    );
    assert_eq!(assets.read("highscores.txt").unwrap().unwrap(), b"");
    assert!(assets.read("missing.png").unwrap().is_none());
    assert!(assets.contains("sprites\\zombie.png"));
    assert_eq!(
        assets.names().unwrap(),
        vec!["highscores.txt", "music.wav", "sprites/zombie.png"]
    );
}

#[test]
fn test_embedded_readers_interleave() {
    let fx = fixture();
    let assets = Assets::detect_at(&fx.exe, &AssetsConfig::default()).unwrap();

    let mut music = assets.open("music.wav").unwrap().unwrap();
    let mut zombie = assets.open("sprites/zombie.png").unwrap().unwrap();
    let mut a = [0u8; 4];
    let mut b = [0u8; 6];
    music.read_exact(&mut a).unwrap();
    zombie.read_exact(&mut b).unwrap();
    assert_eq!(&a, b"RIFF");
    assert_eq!(&b, b"zombie");

    assert_eq!(music.seek(SeekFrom::Current(1)).unwrap(), 5);
    let mut rest = String::new();
    music.read_to_string(&mut rest).unwrap();
    assert_eq!(rest, "music");
}

#[test]
fn test_extract_all_to_temp_dir() {
    let fx = fixture();
    let assets = Assets::detect_at(&fx.exe, &AssetsConfig::default()).unwrap();

    let extracted = assets.extract_all("nobrain_test_").unwrap();
    assert!(extracted.is_temporary());
    let root = extracted.root().to_path_buf();
    assert!(root
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("nobrain_test_"));
    assert_eq!(
        fs::read(extracted.path("sprites/zombie.png")).unwrap(),
        b"zombie pixels"
    );
    assert_eq!(fs::read(extracted.path("music.wav")).unwrap(), b"RIFF music");

    drop(extracted);
    assert!(!root.exists(), "temporary folder is removed on drop");
}

#[test]
fn test_extract_keeps_first_duplicate() {
    let temp = tempfile::tempdir().unwrap();
    let mut blob = Blob::new();
    blob.append("dup.txt", b"first");
    blob.append("dup.txt", b"second");
    let blob_path = temp.path().join("dup.blob");
    blob.write_to_path(&blob_path).unwrap();
    let exe = temp.path().join("game");
    fs::write(&exe, b"exe").unwrap();
    payload::append_payload(&exe, &blob_path, &exe).unwrap();

    let assets = Assets::detect_at(&exe, &AssetsConfig::default()).unwrap();
    let extracted = assets.extract_all("nobrain_dup_").unwrap();
    assert_eq!(fs::read(extracted.path("dup.txt")).unwrap(), b"first");
    assert_eq!(assets.names().unwrap(), vec!["dup.txt"]);
}

#[test]
fn test_extract_rejects_escaping_ids() {
    let temp = tempfile::tempdir().unwrap();
    let mut blob = Blob::new();
    blob.append("../evil", b"nope");
    let blob_path = temp.path().join("evil.blob");
    blob.write_to_path(&blob_path).unwrap();
    let exe = temp.path().join("game");
    fs::write(&exe, b"exe").unwrap();
    payload::append_payload(&exe, &blob_path, &exe).unwrap();

    let assets = Assets::detect_at(&exe, &AssetsConfig::default()).unwrap();
    assert!(matches!(
        assets.extract_all("nobrain_evil_"),
        Err(AssetError::InvalidId(_))
    ));
}

/// A fake executable carrying a blob with `entries`.
fn bundled(entries: &[(&str, &[u8])]) -> (tempfile::TempDir, PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let mut blob = Blob::new();
    for (id, data) in entries {
        blob.append(*id, data);
    }
    let blob_path = temp.path().join("assets.blob");
    blob.write_to_path(&blob_path).unwrap();
    let exe = temp.path().join("game");
    fs::write(&exe, b"exe").unwrap();
    payload::append_payload(&exe, &blob_path, &exe).unwrap();
    (temp, exe)
}

#[test]
fn test_read_text_rejects_binary_asset() {
    let (_temp, exe) = bundled(&[("bin", &[0xffu8, 0xfe][..]), ("note.txt", &b"hi"[..])]);
    let assets = Assets::detect_at(&exe, &AssetsConfig::default()).unwrap();

    assert!(assets.contains("bin"));
    assert!(matches!(assets.read_text("bin"), Err(AssetError::Utf8(_))));
    assert_eq!(assets.read_text("note.txt").unwrap().as_deref(), Some("hi"));
    assert!(assets.read_text("missing").unwrap().is_none());
}

#[test]
fn test_extract_rejects_file_folder_clash() {
    for entries in [
        [("a", &b"file"[..]), ("a/b", &b"nested"[..])],
        [("a/b", &b"nested"[..]), ("a", &b"file"[..])],
    ] {
        let (_temp, exe) = bundled(&entries);
        let assets = Assets::detect_at(&exe, &AssetsConfig::default()).unwrap();
        match assets.extract_all("nobrain_clash_") {
            Err(AssetError::InvalidId(id)) => assert_eq!(id, entries[1].0),
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }
}

#[test]
fn test_extract_shared_folder_is_fine() {
    let (_temp, exe) = bundled(&[
        ("a/b", &b"one"[..]),
        ("a/c", &b"two"[..]),
        ("a/b", &b"dup"[..]),
    ]);
    let assets = Assets::detect_at(&exe, &AssetsConfig::default()).unwrap();
    let extracted = assets.extract_all("nobrain_shared_").unwrap();
    assert_eq!(fs::read(extracted.path("a/b")).unwrap(), b"one");
    assert_eq!(fs::read(extracted.path("a/c")).unwrap(), b"two");
}

#[test]
fn test_plain_executable_falls_back_to_disk() {
    let fx = fixture();
    let plain = fx.exe.with_file_name("plain");
    fs::write(&plain, b"\x7fELF without payload").unwrap();

    let assets = Assets::detect_at(&plain, &config_for(&fx.rsc)).unwrap();
    assert!(!assets.is_embedded());
    assert_eq!(assets.read("music.wav").unwrap().unwrap(), b"RIFF music");
}

#[test]
fn test_payload_disabled_in_config() {
    let fx = fixture();
    let config = AssetsConfig {
        payload: false,
        ..config_for(&fx.rsc)
    };
    let assets = Assets::detect_at(&fx.exe, &config).unwrap();
    assert!(!assets.is_embedded());
}

#[test]
fn test_malformed_payload_is_fatal() {
    let fx = fixture();
    let mut bytes = fs::read(&fx.exe).unwrap();
    let len = bytes.len();
    bytes[len - TRAILER_SIZE..].copy_from_slice(&Trailer::new(u64::MAX).to_bytes());
    fs::write(&fx.exe, &bytes).unwrap();

    let err = Assets::detect_at(&fx.exe, &config_for(&fx.rsc)).unwrap_err();
    assert!(matches!(err, AssetError::Pack(ref e) if e.is_format()));
}
