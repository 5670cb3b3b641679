use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::split::CanonicalSplit;

/// Dataset descriptor handed to the training framework (`data.yaml`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetDescriptor {
    pub path: PathBuf,
    pub train: String,
    pub val: String,
    pub nc: usize,
    /// Index in this list is the class ID used in the label files.
    pub names: Vec<String>,
}

impl DatasetDescriptor {
    pub fn new(dataset_root: PathBuf, names: Vec<String>) -> Self {
        Self {
            path: dataset_root,
            train: format!("images/{}", CanonicalSplit::Train),
            val: format!("images/{}", CanonicalSplit::Val),
            nc: names.len(),
            names,
        }
    }
}
