use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use thiserror::Error;

/// Root of a merge spec file: the unified class schema plus every raw source to fold into it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeSpec {
    /// Position in this list is the canonical class ID written to output labels.
    pub target_classes: Vec<String>,
    /// Processed in file order.
    pub sources: IndexMap<String, SourceSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceSpec {
    /// Raw dataset root containing `<split>/labels` and `<split>/images`.
    pub path: PathBuf,
    /// Source-local class ID to target class name. IDs missing here are dropped.
    pub mapping: BTreeMap<i64, String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SpecError {
    #[error("target_classes is empty")]
    EmptyTargetClasses,
    #[error("target class {0:?} is listed more than once")]
    DuplicateTargetClass(String),
    #[error("source name {source_name:?} {reason}")]
    InvalidSourceName {
        source_name: String,
        reason: &'static str,
    },
    #[error("source {source_name:?} maps id {source_id} to {class:?}, which is not in target_classes")]
    ClassNameNotInTargetSchema {
        source_name: String,
        source_id: i64,
        class: String,
    },
}

impl MergeSpec {
    /// Canonical ID for a target class name.
    pub fn class_id(&self, name: &str) -> Option<usize> {
        self.target_classes.iter().position(|c| c == name)
    }

    /// Check the class schema and that every mapping target resolves.
    pub fn validate(&self) -> Result<(), SpecError> {
        if self.target_classes.is_empty() {
            return Err(SpecError::EmptyTargetClasses);
        }
        let mut seen = HashSet::new();
        for class in &self.target_classes {
            if !seen.insert(class.as_str()) {
                return Err(SpecError::DuplicateTargetClass(class.clone()));
            }
        }
        for (source_name, source) in &self.sources {
            check_source_name(source_name)?;
            for (source_id, class) in &source.mapping {
                if !seen.contains(class.as_str()) {
                    return Err(SpecError::ClassNameNotInTargetSchema {
                        source_name: source_name.clone(),
                        source_id: *source_id,
                        class: class.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Source names can end up in output file names, so they must stay a single path segment.
fn check_source_name(name: &str) -> Result<(), SpecError> {
    let reason = if name.trim().is_empty() {
        Some("is empty")
    } else if name.contains(['/', '\\', '\0']) {
        Some("contains a path separator")
    } else if name.contains("..") {
        Some("contains \"..\"")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(SpecError::InvalidSourceName {
            source_name: name.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(targets: &[&str], mapping: &[(i64, &str)]) -> MergeSpec {
        spec_named("hardhat", targets, mapping)
    }

    fn spec_named(name: &str, targets: &[&str], mapping: &[(i64, &str)]) -> MergeSpec {
        let mut sources = IndexMap::new();
        sources.insert(
            name.to_string(),
            SourceSpec {
                path: PathBuf::from("raw/hardhat"),
                mapping: mapping.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            },
        );
        MergeSpec {
            target_classes: targets.iter().map(|s| s.to_string()).collect(),
            sources,
        }
    }

    #[test]
    fn class_id_follows_list_order() {
        let s = spec(&["Hardhat", "NoHardhat", "Vest"], &[]);
        assert_eq!(s.class_id("Hardhat"), Some(0));
        assert_eq!(s.class_id("Vest"), Some(2));
        assert_eq!(s.class_id("Gloves"), None);
    }

    #[test]
    fn validate_accepts_known_targets() {
        let s = spec(&["Hardhat", "NoHardhat"], &[(0, "Hardhat"), (2, "NoHardhat")]);
        assert_eq!(s.validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_unknown_target_name() {
        let s = spec(&["Hardhat"], &[(0, "Hardhat"), (3, "Helmet")]);
        assert_eq!(
            s.validate(),
            Err(SpecError::ClassNameNotInTargetSchema {
                source_name: "hardhat".into(),
                source_id: 3,
                class: "Helmet".into(),
            })
        );
    }

    #[test]
    fn validate_rejects_duplicates_and_empty_schema() {
        assert_eq!(
            spec(&["Vest", "Vest"], &[]).validate(),
            Err(SpecError::DuplicateTargetClass("Vest".into()))
        );
        assert_eq!(spec(&[], &[]).validate(), Err(SpecError::EmptyTargetClasses));
    }

    #[test]
    fn validate_rejects_names_that_are_not_one_path_segment() {
        for (name, reason) in [
            ("../../escaped", "contains a path separator"),
            ("site/a", "contains a path separator"),
            ("site\\a", "contains a path separator"),
            ("..", "contains \"..\""),
            ("a..b", "contains \"..\""),
            ("", "is empty"),
            ("  ", "is empty"),
        ] {
            assert_eq!(
                spec_named(name, &["Hardhat"], &[(0, "Hardhat")]).validate(),
                Err(SpecError::InvalidSourceName {
                    source_name: name.to_string(),
                    reason,
                }),
                "source name {name:?}"
            );
        }
        assert_eq!(
            spec_named("site_b-2", &["Hardhat"], &[(0, "Hardhat")]).validate(),
            Ok(())
        );
    }
}
