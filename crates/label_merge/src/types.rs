//! Core types, error definitions, and run options for label_merge.

use data_contracts::{OutcomeCounts, SpecError};
use std::path::PathBuf;
use thiserror::Error;

use crate::images::IMAGE_EXTENSIONS;

pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Fatal errors. Per-file problems are reported through [`FileOutcome`] instead.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("merge spec not found at {path}")]
    ConfigNotFound { path: PathBuf },
    #[error("malformed merge spec at {path}: {source}")]
    MalformedSpec {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid merge spec: {0}")]
    InvalidSpec(#[from] SpecError),
    #[error("refusing to reset output root {path}: {reason}")]
    UnsafeOutputRoot { path: PathBuf, reason: String },
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("yaml write error at {path}: {source}")]
    YamlWrite {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("json write error at {path}: {source}")]
    JsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl NormalizeError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        NormalizeError::Io {
            path: path.into(),
            source,
        }
    }
}

/// What happened to one raw label file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Label rewritten and its image copied.
    Processed,
    /// No line mapped to a retained class; nothing written.
    DroppedNoObjects,
    /// Could not be read or parsed; nothing written.
    Unreadable { reason: String },
    /// Label rewritten but no image under any probed extension. The label stays.
    ImageMissing,
}

impl FileOutcome {
    pub fn tally(&self, counts: &mut OutcomeCounts) {
        match self {
            FileOutcome::Processed => counts.processed += 1,
            FileOutcome::DroppedNoObjects => counts.dropped_no_objects += 1,
            FileOutcome::Unreadable { .. } => counts.unreadable += 1,
            FileOutcome::ImageMissing => counts.image_missing += 1,
        }
    }
}

/// How output file names are derived from raw label stems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputNaming {
    /// Keep the raw stem. Equal stems from different sources collide (last write wins).
    #[default]
    Stem,
    /// `<source>__<stem>`, which keeps sources from overwriting each other.
    SourcePrefixed,
}

#[derive(Debug, Clone)]
pub struct NormalizeOptions {
    pub output_root: PathBuf,
    pub naming: OutputNaming,
    /// Probed in order; first hit wins.
    pub image_extensions: Vec<String>,
    /// Worker threads per split. `None` uses rayon's default.
    pub jobs: Option<usize>,
}

impl NormalizeOptions {
    pub fn new(output_root: impl Into<PathBuf>) -> Self {
        Self {
            output_root: output_root.into(),
            naming: OutputNaming::Stem,
            image_extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            jobs: None,
        }
    }

    pub fn with_naming(mut self, naming: OutputNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }
}
