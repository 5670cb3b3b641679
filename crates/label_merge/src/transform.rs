//! Class-ID remapping of YOLO label text.

use data_contracts::{MergeSpec, SourceSpec, SpecError};
use std::collections::BTreeMap;
use std::num::IntErrorKind;
use thiserror::Error;

/// Source-local class ID to canonical class ID, resolved against `target_classes`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassRemap {
    ids: BTreeMap<i64, usize>,
}

impl ClassRemap {
    pub fn for_source(
        spec: &MergeSpec,
        source_name: &str,
        source: &SourceSpec,
    ) -> Result<Self, SpecError> {
        let mut ids = BTreeMap::new();
        for (source_id, class) in &source.mapping {
            let canonical = spec
                .class_id(class)
                .ok_or_else(|| SpecError::ClassNameNotInTargetSchema {
                    source_name: source_name.to_string(),
                    source_id: *source_id,
                    class: class.clone(),
                })?;
            ids.insert(*source_id, canonical);
        }
        Ok(Self { ids })
    }

    pub fn canonical_id(&self, source_id: i64) -> Option<usize> {
        self.ids.get(&source_id).copied()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: class id {token:?} is not an integer")]
pub struct LabelParseError {
    pub line: usize,
    pub token: String,
}

/// Rewrite every retained line of a label file with its canonical class ID.
///
/// Blank lines are skipped. Lines whose class ID has no mapping are dropped. Geometry
/// tokens are copied as text, never re-parsed. Returns `Ok(None)` when no line survives.
pub fn remap_label_text(text: &str, remap: &ClassRemap) -> Result<Option<String>, LabelParseError> {
    let mut out = String::with_capacity(text.len());
    let mut retained = false;
    for (idx, line) in text.lines().enumerate() {
        let mut tokens = line.split_whitespace();
        let Some(first) = tokens.next() else { continue };
        let source_id = match first.parse::<i64>() {
            Ok(id) => id,
            // Out of i64 range can never be a mapping key.
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                continue
            }
            Err(_) => {
                return Err(LabelParseError {
                    line: idx + 1,
                    token: first.to_string(),
                })
            }
        };
        let Some(canonical) = remap.canonical_id(source_id) else {
            continue;
        };
        out.push_str(&canonical.to_string());
        for token in tokens {
            out.push(' ');
            out.push_str(token);
        }
        out.push('\n');
        retained = true;
    }
    Ok(retained.then_some(out))
}
