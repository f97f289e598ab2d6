//! End-to-end packaging: manifest → targets → virtual storage → output zip.

use std::fs::{self, File};
use std::io::{Cursor, Read, Write};
use std::path::Path;

use engine::{EngineError, PackManifest, pack};
use vfs::VirtualStorage;

fn write_zip(path: &Path, entries: &[(&str, &[u8])]) {
    let file = File::create(path).expect("create zip fixture");
    let mut writer = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Deflated);
    for (name, bytes) in entries {
        writer.start_file(*name, options).expect("start entry");
        writer.write_all(bytes).expect("write entry");
    }
    writer.finish().expect("finish zip fixture");
}

/// Tree with plain files and a zip whose entries participate in selection.
fn fixture_root() -> (tempfile::TempDir, String) {
    let temp = tempfile::tempdir().expect("tempdir");
    let dir = temp.path().join("tree");
    fs::create_dir(&dir).expect("create tree");
    let src = dir.join("src");
    fs::create_dir(&src).expect("create src");
    fs::write(src.join("main.rs"), b"fn main() {}").expect("write main");
    fs::write(src.join("notes.tmp"), b"scratch").expect("write notes");
    fs::write(dir.join("readme.md"), b"# readme").expect("write readme");
    write_zip(
        &dir.join("bundle.zip"),
        &[("assets/logo.png", b"png bytes"), ("assets/raw.psd", b"psd")],
    );
    (temp, format!("{}/", dir.display()))
}

fn archive_entries(bytes: Vec<u8>) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("open output");
    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index).expect("entry");
        let mut content = Vec::new();
        entry.read_to_end(&mut content).expect("read entry");
        entries.push((entry.name().to_owned(), content));
    }
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries
}

const MANIFEST: &str = r#"{
    "targets": [{
        "target": "/",
        "filters": [
            {"root": "src", "rules": [
                {"include": false, "pattern": "*.tmp"},
                {"include": true, "pattern": "**"}
            ]},
            {"root": "bundle.zip/assets", "rules": [
                {"include": true, "pattern": "*.png"}
            ]},
            {"rules": [{"include": true, "pattern": "*.md"}]}
        ]
    }]
}"#;

#[test]
fn packing_copies_selected_streams_into_the_output_archive() {
    let (_temp, root) = fixture_root();
    let manifest = PackManifest::from_json(MANIFEST).expect("parse manifest");
    let targets = manifest.build_targets().expect("build targets");
    let storage = VirtualStorage::new();

    let mut out = Cursor::new(Vec::new());
    let summary = pack(&targets, &root, &storage, &mut out).expect("pack");

    assert_eq!(summary.written_count(), 3);
    assert_eq!(summary.skipped_duplicates(), 0);
    assert_eq!(
        summary.written().files(),
        ["logo.png", "main.rs", "readme.md"]
    );

    let entries = archive_entries(out.into_inner());
    let names: Vec<&str> = entries.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(names, ["logo.png", "main.rs", "readme.md"]);

    let logo = entries.iter().find(|(n, _)| n == "logo.png").expect("logo");
    assert_eq!(logo.1, b"png bytes");
    let main = entries.iter().find(|(n, _)| n == "main.rs").expect("main");
    assert_eq!(main.1, b"fn main() {}");
}

#[test]
fn target_roots_prefix_the_output_entry_names() {
    let (_temp, root) = fixture_root();
    let manifest = PackManifest::from_json(
        r#"{
        "targets": [{
            "target": "content",
            "filters": [{"root": "src", "rules": [
                {"include": false, "pattern": "*.tmp"},
                {"include": true, "pattern": "**"}
            ]}]
        }]
    }"#,
    )
    .expect("parse manifest");
    let targets = manifest.build_targets().expect("build targets");
    let storage = VirtualStorage::new();

    let mut out = Cursor::new(Vec::new());
    let summary = pack(&targets, &root, &storage, &mut out).expect("pack");
    assert_eq!(summary.written().files(), ["content/main.rs"]);

    let entries = archive_entries(out.into_inner());
    assert_eq!(entries[0].0, "content/main.rs");
}

#[test]
fn later_targets_lose_duplicate_entry_names() {
    let (_temp, root) = fixture_root();
    let manifest = PackManifest::from_json(
        r#"{
        "targets": [
            {"filters": [{"root": "src", "rules": [{"include": true, "pattern": "main.rs"}]}]},
            {"filters": [{"root": "src", "rules": [{"include": true, "pattern": "main.rs"}]}]}
        ]
    }"#,
    )
    .expect("parse manifest");
    let targets = manifest.build_targets().expect("build targets");
    let storage = VirtualStorage::new();

    let mut out = Cursor::new(Vec::new());
    let summary = pack(&targets, &root, &storage, &mut out).expect("pack");
    assert_eq!(summary.written_count(), 1);
    assert_eq!(summary.skipped_duplicates(), 1);
}

#[test]
fn unmatched_error_policy_aborts_the_run() {
    let (_temp, root) = fixture_root();
    let manifest = PackManifest::from_json(
        r#"{
        "targets": [{
            "match_behavior": "none_is_unmatched_error",
            "filters": [{"root": "src", "rules": [{"include": true, "pattern": "**"}]}]
        }]
    }"#,
    )
    .expect("parse manifest");
    let targets = manifest.build_targets().expect("build targets");
    let storage = VirtualStorage::new();

    let mut out = Cursor::new(Vec::new());
    match pack(&targets, &root, &storage, &mut out) {
        Err(EngineError::Unmatched(unmatched)) => {
            assert!(unmatched.path().ends_with("bundle.zip"));
        }
        other => panic!("expected unmatched failure, got {other:?}"),
    }
}

#[test]
fn missing_root_fails_before_any_output_is_written() {
    let manifest = PackManifest::from_json(r#"{"targets": [{}]}"#).expect("parse manifest");
    let targets = manifest.build_targets().expect("build targets");
    let storage = VirtualStorage::new();

    let mut out = Cursor::new(Vec::new());
    assert!(matches!(
        pack(&targets, "/definitely/missing/root", &storage, &mut out),
        Err(EngineError::Storage(_))
    ));
}
