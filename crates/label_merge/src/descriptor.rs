//! Writers for the training descriptor (`data.yaml`) and the JSON run report.

use data_contracts::{DatasetDescriptor, MergeSpec, NormalizeSummary};
use std::fs;
use std::path::Path;

use crate::types::{NormalizeError, NormalizeResult};

fn ensure_parent(path: &Path) -> NormalizeResult<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(|e| NormalizeError::io(parent, e))
        }
        _ => Ok(()),
    }
}

/// Write the descriptor; `names` follow `target_classes`, matching the remapped IDs.
pub fn write_descriptor(
    path: &Path,
    spec: &MergeSpec,
    dataset_root: &Path,
) -> NormalizeResult<DatasetDescriptor> {
    let root = fs::canonicalize(dataset_root).unwrap_or_else(|_| dataset_root.to_path_buf());
    let descriptor = DatasetDescriptor::new(root, spec.target_classes.clone());
    let yaml = serde_yaml::to_string(&descriptor).map_err(|source| NormalizeError::YamlWrite {
        path: path.to_path_buf(),
        source,
    })?;
    ensure_parent(path)?;
    fs::write(path, yaml).map_err(|e| NormalizeError::io(path, e))?;
    Ok(descriptor)
}

pub fn write_report(path: &Path, summary: &NormalizeSummary) -> NormalizeResult<()> {
    let json = serde_json::to_vec_pretty(summary).map_err(|source| NormalizeError::JsonWrite {
        path: path.to_path_buf(),
        source,
    })?;
    ensure_parent(path)?;
    fs::write(path, json).map_err(|e| NormalizeError::io(path, e))
}
