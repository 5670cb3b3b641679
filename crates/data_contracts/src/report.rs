use serde::{Deserialize, Serialize};

use crate::split::{CanonicalSplit, RawSplit};

/// Per-file outcome tallies for one split (or a whole run).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    /// Label and image both written.
    pub processed: usize,
    pub dropped_no_objects: usize,
    pub unreadable: usize,
    /// Label written, no image under any probed extension.
    pub image_missing: usize,
    /// Output names already written earlier in the same run.
    pub collisions: usize,
}

impl OutcomeCounts {
    pub fn absorb(&mut self, other: &OutcomeCounts) {
        self.processed += other.processed;
        self.dropped_no_objects += other.dropped_no_objects;
        self.unreadable += other.unreadable;
        self.image_missing += other.image_missing;
        self.collisions += other.collisions;
    }

    pub fn labels_written(&self) -> usize {
        self.processed + self.image_missing
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitReport {
    pub source: String,
    pub raw_split: RawSplit,
    pub canonical: CanonicalSplit,
    pub counts: OutcomeCounts,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizeSummary {
    pub splits: Vec<SplitReport>,
    /// Sources whose root directory could not be read.
    pub skipped_sources: Vec<String>,
    pub totals: OutcomeCounts,
}

impl NormalizeSummary {
    pub fn push(&mut self, report: SplitReport) {
        self.totals.absorb(&report.counts);
        self.splits.push(report);
    }

    pub fn for_source<'a>(&'a self, source: &'a str) -> impl Iterator<Item = &'a SplitReport> + 'a {
        self.splits.iter().filter(move |s| s.source == source)
    }
}
