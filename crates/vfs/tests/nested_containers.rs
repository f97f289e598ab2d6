//! Resolution across containers stored inside other containers.

use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::path::Path;

use vfs::VirtualStorage;

fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    for (name, bytes) in entries {
        writer.start_file(*name, options).expect("start entry");
        writer.write_all(bytes).expect("write entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let bytes = zip_bytes(entries);
    let mut file = File::create(path).expect("create zip fixture");
    file.write_all(&bytes).expect("write zip fixture");
}

/// Builds `tree/outer.zip` containing `note.txt` and `pack/inner.zip`, the
/// inner zip itself containing `deep/leaf.txt`.
fn nested_fixture() -> (tempfile::TempDir, String) {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().join("tree");
    fs::create_dir(&dir).expect("create tree");

    let inner = zip_bytes(&[("deep/leaf.txt", b"leaf bytes"), ("root.txt", b"inner root")]);
    write_zip(
        &dir.join("outer.zip"),
        &[("note.txt", b"outer note"), ("pack/inner.zip", &inner)],
    );

    let root = format!("{}/", dir.display());
    (temp, root)
}

fn read_to_string(storage: &VirtualStorage, path: &str) -> String {
    let mut text = String::new();
    storage
        .open_read(path)
        .expect("open")
        .read_to_string(&mut text)
        .expect("read");
    text
}

#[test]
fn open_read_crosses_two_container_boundaries() {
    let (_temp, root) = nested_fixture();
    let storage = VirtualStorage::new();

    assert_eq!(
        read_to_string(
            &storage,
            &format!("{root}outer.zip/pack/inner.zip/deep/leaf.txt")
        ),
        "leaf bytes"
    );
    assert_eq!(
        read_to_string(&storage, &format!("{root}outer.zip/pack/inner.zip/root.txt")),
        "inner root"
    );
    // The outer container still serves its own entries.
    assert_eq!(
        read_to_string(&storage, &format!("{root}outer.zip/note.txt")),
        "outer note"
    );
}

#[test]
fn enumerating_the_nested_container_chains_path_prefixes() {
    let (_temp, root) = nested_fixture();
    let storage = VirtualStorage::new();

    let files: Vec<String> = storage
        .enumerate_files(&format!("{root}outer.zip/pack/inner.zip/"))
        .expect("enumerate")
        .collect::<Result<_, _>>()
        .expect("no errors");

    assert_eq!(
        files,
        [
            format!("{root}outer.zip/pack/inner.zip/deep/leaf.txt"),
            format!("{root}outer.zip/pack/inner.zip/root.txt"),
        ]
    );
}

#[test]
fn enumerating_a_directory_inside_the_nested_container() {
    let (_temp, root) = nested_fixture();
    let storage = VirtualStorage::new();

    let files: Vec<String> = storage
        .enumerate_files(&format!("{root}outer.zip/pack/inner.zip/deep/"))
        .expect("enumerate")
        .collect::<Result<_, _>>()
        .expect("no errors");

    assert_eq!(
        files,
        [format!("{root}outer.zip/pack/inner.zip/deep/leaf.txt")]
    );
}

#[test]
fn physical_enumeration_expands_nested_containers_in_place() {
    let (_temp, root) = nested_fixture();
    let storage = VirtualStorage::new();

    let files: Vec<String> = storage
        .enumerate_files(&root)
        .expect("enumerate")
        .collect::<Result<_, _>>()
        .expect("no errors");

    assert_eq!(
        files,
        [
            format!("{root}outer.zip"),
            format!("{root}outer.zip/note.txt"),
            format!("{root}outer.zip/pack/inner.zip"),
            format!("{root}outer.zip/pack/inner.zip/deep/leaf.txt"),
            format!("{root}outer.zip/pack/inner.zip/root.txt"),
        ]
    );
}

#[test]
fn the_same_driver_is_reused_across_requests() {
    let (_temp, root) = nested_fixture();
    let storage = VirtualStorage::new();

    // Exercise the same chain twice with different request shapes; the
    // second pass resolves through the drivers registered by the first.
    let deep = format!("{root}outer.zip/pack/inner.zip/deep/leaf.txt");
    assert_eq!(read_to_string(&storage, &deep), "leaf bytes");
    assert_eq!(read_to_string(&storage, &deep), "leaf bytes");

    let files: Vec<String> = storage
        .enumerate_files(&format!("{root}outer.zip/pack/inner.zip/"))
        .expect("enumerate")
        .collect::<Result<_, _>>()
        .expect("no errors");
    assert_eq!(files.len(), 2);
}
