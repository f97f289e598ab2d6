use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::Path;

use filters::PackTarget;
use flist::FileNameList;
use tracing::{debug, info};
use vfs::{FileStorage, VirtualStorage};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::config::PackManifest;
use crate::error::EngineError;

/// Outcome of a packaging run.
#[derive(Clone, Debug)]
pub struct PackSummary {
    written: FileNameList,
    skipped_duplicates: usize,
}

impl PackSummary {
    /// Sorted names of every entry written to the output archive.
    #[must_use]
    pub fn written(&self) -> &FileNameList {
        &self.written
    }

    /// Number of entries written.
    #[must_use]
    pub fn written_count(&self) -> usize {
        self.written.len()
    }

    /// Number of selections skipped because an earlier target already wrote
    /// an entry with the same name.
    #[must_use]
    pub const fn skipped_duplicates(&self) -> usize {
        self.skipped_duplicates
    }
}

/// Enumerates every target below `root` and copies the selected streams
/// into one output zip archive.
///
/// Entry names combine each target's output root with the selection's
/// scope-relative path. When two selections produce the same entry name the
/// first writer wins and the rest are counted as skipped.
///
/// # Errors
///
/// Propagates selection failures ([`EngineError::Unmatched`],
/// [`EngineError::Storage`]) and output failures immediately; the partially
/// written archive is the caller's to clean up.
pub fn pack<W: Write + Seek>(
    targets: &[PackTarget],
    root: &str,
    storage: &dyn FileStorage,
    out: W,
) -> Result<PackSummary, EngineError> {
    let root = vpath::normalize_dir(root);
    let mut writer = ZipWriter::new(out);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut written = FileNameList::new(false);
    let mut skipped_duplicates = 0usize;

    for target in targets {
        debug!(output_root = target.target_root(), "packing target");
        let mut batch: Vec<String> = Vec::new();
        for item in target.included_files(&root, storage)? {
            let selected = item?;
            let entry_name = entry_name(target.target_root(), selected.final_path());
            if written.contains(&entry_name) || batch.contains(&entry_name) {
                debug!(entry = %entry_name, "skipping duplicate entry name");
                skipped_duplicates += 1;
                continue;
            }

            let source_path = format!("{root}{}", selected.file_path());
            let mut reader = storage.open_read(&source_path)?;
            writer
                .start_file(entry_name.clone(), options)
                .map_err(|source| EngineError::OutputZip { source })?;
            io::copy(&mut reader, &mut writer).map_err(|source| EngineError::OutputIo {
                path: source_path,
                source,
            })?;
            batch.push(entry_name);
        }
        batch.sort();
        written.add(&FileNameList::from_names(batch, None, false));
    }

    writer
        .finish()
        .map_err(|source| EngineError::OutputZip { source })?;

    Ok(PackSummary {
        written,
        skipped_duplicates,
    })
}

/// Loads a manifest, builds its targets, and packs them from `root` into a
/// fresh archive at `output_path` through a new [`VirtualStorage`] session.
pub fn run(
    manifest_path: impl AsRef<Path>,
    root: &str,
    output_path: impl AsRef<Path>,
) -> Result<PackSummary, EngineError> {
    let manifest = PackManifest::load(manifest_path)?;
    let targets = manifest.build_targets()?;
    let storage = VirtualStorage::new();
    let output_path = output_path.as_ref();
    let out = File::create(output_path).map_err(|source| EngineError::OutputIo {
        path: output_path.display().to_string(),
        source,
    })?;
    let summary = pack(&targets, root, &storage, out)?;
    info!(
        written = summary.written_count(),
        skipped = summary.skipped_duplicates(),
        "packaging complete"
    );
    Ok(summary)
}

/// Joins the target's output root with a scope-relative path to form the
/// archive entry name.
fn entry_name(target_root: &str, final_path: &str) -> String {
    let trimmed = target_root.trim_matches('/');
    if trimmed.is_empty() {
        final_path.to_owned()
    } else {
        format!("{trimmed}/{final_path}")
    }
}
