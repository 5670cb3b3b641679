//! Source split discovery and output tree management.

use data_contracts::{CanonicalSplit, MergeSpec, RawSplit};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::types::{NormalizeError, NormalizeResult};

/// Remove `root` and everything under it. A missing root is fine.
pub fn reset_output_dir(root: &Path) -> NormalizeResult<()> {
    match fs::remove_dir_all(root) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(NormalizeError::io(root, e)),
    }
}

/// Absolute form of `path` with symlinks resolved through its deepest existing ancestor.
fn resolved(path: &Path) -> PathBuf {
    let abs = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut existing = abs.as_path();
    let mut rest = Vec::new();
    loop {
        if let Ok(real) = fs::canonicalize(existing) {
            return rest.iter().rev().fold(real, |acc, part| acc.join(part));
        }
        match (existing.parent(), existing.file_name()) {
            (Some(parent), Some(name)) => {
                rest.push(name.to_os_string());
                existing = parent;
            }
            _ => return abs,
        }
    }
}

/// Reject output roots whose reset would delete the working directory or raw sources.
///
/// The root must be a plain path without `.`/`..` segments, must not be a filesystem
/// root, must not contain the current directory, and must not be or contain any source.
pub fn check_output_root(root: &Path, spec: &MergeSpec) -> NormalizeResult<()> {
    let unsafe_root = |reason: String| NormalizeError::UnsafeOutputRoot {
        path: root.to_path_buf(),
        reason,
    };
    if root.as_os_str().is_empty() {
        return Err(unsafe_root("path is empty".to_string()));
    }
    if root
        .components()
        .any(|c| matches!(c, Component::CurDir | Component::ParentDir))
    {
        return Err(unsafe_root("path contains \".\" or \"..\"".to_string()));
    }
    let abs_root = resolved(root);
    if abs_root.parent().is_none() {
        return Err(unsafe_root("path is a filesystem root".to_string()));
    }
    if let Ok(cwd) = std::env::current_dir() {
        if resolved(&cwd).starts_with(&abs_root) {
            return Err(unsafe_root("path contains the working directory".to_string()));
        }
    }
    for (name, source) in &spec.sources {
        if resolved(&source.path).starts_with(&abs_root) {
            return Err(unsafe_root(format!(
                "source {name:?} at {} lies inside it",
                source.path.display()
            )));
        }
    }
    Ok(())
}

/// One raw split of a source that carries a `labels` directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSplit {
    pub raw: RawSplit,
    pub labels_dir: PathBuf,
    pub images_dir: PathBuf,
}

impl SourceSplit {
    pub fn canonical(&self) -> CanonicalSplit {
        self.raw.canonical()
    }
}

/// Raw splits present under `source_root`, in probe order. Splits without `labels` are skipped.
pub fn resolve_splits(source_root: &Path) -> Vec<SourceSplit> {
    RawSplit::ALL
        .iter()
        .filter_map(|raw| {
            let split_root = source_root.join(raw.dir_name());
            let labels_dir = split_root.join("labels");
            if !labels_dir.is_dir() {
                return None;
            }
            Some(SourceSplit {
                raw: *raw,
                labels_dir,
                images_dir: split_root.join("images"),
            })
        })
        .collect()
}

/// Destination directories for one canonical split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutput {
    pub split: CanonicalSplit,
    pub labels_dir: PathBuf,
    pub images_dir: PathBuf,
}

/// Output tree rooted at `root`; split directories are created on first use.
#[derive(Debug)]
pub struct OutputTree {
    root: PathBuf,
    created: BTreeMap<CanonicalSplit, SplitOutput>,
}

impl OutputTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            created: BTreeMap::new(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn ensure(&mut self, split: CanonicalSplit) -> NormalizeResult<SplitOutput> {
        if let Some(out) = self.created.get(&split) {
            return Ok(out.clone());
        }
        let out = SplitOutput {
            split,
            labels_dir: self.root.join("labels").join(split.dir_name()),
            images_dir: self.root.join("images").join(split.dir_name()),
        };
        for dir in [&out.labels_dir, &out.images_dir] {
            fs::create_dir_all(dir).map_err(|e| NormalizeError::io(dir.as_path(), e))?;
        }
        self.created.insert(split, out.clone());
        Ok(out)
    }
}

/// `*.txt` files directly under `labels_dir`, sorted by name.
pub(crate) fn list_label_files(labels_dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(labels_dir)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|p| p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt"))
        .collect();
    files.sort();
    Ok(files)
}
