//! Dataset normalization for multi-source YOLO detection data.
//!
//! This crate provides:
//! - Merge spec loading and up-front validation
//! - Output tree reset and lazy per-split directory creation
//! - Class-ID remapping of label files into the canonical schema
//! - Same-stem image matching and copying
//! - Dataset descriptor and run report writers

pub mod descriptor;
pub mod images;
pub mod layout;
pub mod normalize;
pub mod spec;
pub mod transform;
pub mod types;

pub use descriptor::{write_descriptor, write_report};
pub use images::{copy_image, find_image, IMAGE_EXTENSIONS};
pub use layout::{check_output_root, reset_output_dir, resolve_splits, OutputTree, SplitOutput, SourceSplit};
pub use normalize::{normalize, process_label_file, FileContext, LabelFileResult};
pub use spec::load_spec;
pub use transform::{remap_label_text, ClassRemap, LabelParseError};
pub use types::*;
