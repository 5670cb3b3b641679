//! Merge spec loading.

use data_contracts::MergeSpec;
use std::fs;
use std::path::Path;

use crate::types::{NormalizeError, NormalizeResult};

/// Read and validate a YAML merge spec. Touches nothing on disk besides the read.
pub fn load_spec(path: &Path) -> NormalizeResult<MergeSpec> {
    if !path.exists() {
        return Err(NormalizeError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }
    let raw = fs::read_to_string(path).map_err(|e| NormalizeError::io(path, e))?;
    let spec: MergeSpec =
        serde_yaml::from_str(&raw).map_err(|source| NormalizeError::MalformedSpec {
            path: path.to_path_buf(),
            source,
        })?;
    spec.validate()?;
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_contracts::SpecError;

    #[test]
    fn missing_file_is_config_not_found() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let err = load_spec(&tmp.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, NormalizeError::ConfigNotFound { .. }));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("spec.yaml");
        fs::write(&path, "target_classes: Hardhat\nsources: []\n").expect("write spec");
        let err = load_spec(&path).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedSpec { .. }));
    }

    #[test]
    fn unknown_class_is_rejected_at_load() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let path = tmp.path().join("spec.yaml");
        fs::write(
            &path,
            "target_classes: [Hardhat]\nsources:\n  a:\n    path: raw/a\n    mapping:\n      0: Vest\n",
        )
        .expect("write spec");
        let err = load_spec(&path).unwrap_err();
        assert!(matches!(
            err,
            NormalizeError::InvalidSpec(SpecError::ClassNameNotInTargetSchema { .. })
        ));
    }
}
