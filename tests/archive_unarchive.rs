use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use distkit::archive::{ArchiveError, unarchive};

fn build_zip(path: &Path, entries: &[(&str, &str)]) {
    let mut writer = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default();
    for (name, data) in entries {
        writer.start_file(*name, options).unwrap();
        writer.write_all(data.as_bytes()).unwrap();
    }
    writer.finish().unwrap();
}

fn build_tar_gz(path: &Path, entries: &[(&str, &str)]) {
    let encoder = GzEncoder::new(File::create(path).unwrap(), Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, data.as_bytes()).unwrap();
    }
    builder.into_inner().unwrap().finish().unwrap();
}

#[test]
fn extracts_a_zip_archive() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("bundle.zip");
    build_zip(&archive, &[("pkg/data.txt", "hello"), ("top.txt", "top")]);

    let dest = dir.path().join("out");
    unarchive(&archive, &dest).unwrap();
    assert_eq!(fs::read_to_string(dest.join("pkg/data.txt")).unwrap(), "hello");
    assert_eq!(fs::read_to_string(dest.join("top.txt")).unwrap(), "top");
}

#[test]
fn extracts_a_tar_gz_archive() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("bundle.tar.gz");
    build_tar_gz(&archive, &[("pkg/data.txt", "hello"), ("top.txt", "top")]);

    let dest = dir.path().join("out");
    unarchive(&archive, &dest).unwrap();
    assert_eq!(fs::read_to_string(dest.join("pkg/data.txt")).unwrap(), "hello");
    assert_eq!(fs::read_to_string(dest.join("top.txt")).unwrap(), "top");
}

#[test]
fn extracts_a_plain_tar_archive() {
    let dir = TempDir::new().unwrap();
    let tar_path = dir.path().join("bundle.tar");
    let mut builder = tar::Builder::new(File::create(&tar_path).unwrap());
    let mut header = tar::Header::new_gnu();
    header.set_size(5);
    header.set_mode(0o644);
    header.set_cksum();
    builder
        .append_data(&mut header, "data.txt", "hello".as_bytes())
        .unwrap();
    builder.into_inner().unwrap();

    let dest = dir.path().join("out");
    unarchive(&tar_path, &dest).unwrap();
    assert_eq!(fs::read_to_string(dest.join("data.txt")).unwrap(), "hello");
}

#[test]
fn refuses_unknown_suffixes() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("bundle.7z");
    fs::write(&archive, b"not really an archive").unwrap();

    let dest = dir.path().join("out");
    assert!(matches!(
        unarchive(&archive, &dest),
        Err(ArchiveError::UnknownFormat(_))
    ));
}

#[test]
fn refuses_zip_entries_that_escape_the_destination() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("evil.zip");
    build_zip(&archive, &[("../evil.txt", "gotcha")]);

    let dest = dir.path().join("out");
    assert!(matches!(
        unarchive(&archive, &dest),
        Err(ArchiveError::UnsafePath(_))
    ));
    assert!(!dir.path().join("evil.txt").exists());
}

#[test]
fn creates_the_destination_directory() {
    let dir = TempDir::new().unwrap();
    let archive = dir.path().join("bundle.zip");
    build_zip(&archive, &[("data.txt", "hello")]);

    let dest = dir.path().join("deeply/nested/out");
    unarchive(&archive, &dest).unwrap();
    assert!(dest.join("data.txt").exists());
}
