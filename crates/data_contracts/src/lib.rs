//! Shared data contracts for merge specs, split layout, dataset descriptors, and run reports.

pub mod descriptor;
pub mod merge_spec;
pub mod report;
pub mod split;

pub use descriptor::DatasetDescriptor;
pub use merge_spec::{MergeSpec, SourceSpec, SpecError};
pub use report::{NormalizeSummary, OutcomeCounts, SplitReport};
pub use split::{CanonicalSplit, RawSplit};
