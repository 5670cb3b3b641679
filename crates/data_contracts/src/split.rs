use serde::{Deserialize, Serialize};
use std::fmt;

/// Split folder names a raw dataset may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RawSplit {
    Train,
    Valid,
    Test,
    Val,
}

/// The two splits the unified dataset is written into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalSplit {
    Train,
    Val,
}

impl RawSplit {
    /// Probe order used when walking a source root.
    pub const ALL: [RawSplit; 4] = [
        RawSplit::Train,
        RawSplit::Valid,
        RawSplit::Test,
        RawSplit::Val,
    ];

    pub fn dir_name(self) -> &'static str {
        match self {
            RawSplit::Train => "train",
            RawSplit::Valid => "valid",
            RawSplit::Test => "test",
            RawSplit::Val => "val",
        }
    }

    /// `valid`, `test` and `val` all fold into the canonical `val` split.
    pub fn canonical(self) -> CanonicalSplit {
        match self {
            RawSplit::Train => CanonicalSplit::Train,
            RawSplit::Valid | RawSplit::Test | RawSplit::Val => CanonicalSplit::Val,
        }
    }
}

impl CanonicalSplit {
    pub fn dir_name(self) -> &'static str {
        match self {
            CanonicalSplit::Train => "train",
            CanonicalSplit::Val => "val",
        }
    }
}

impl fmt::Display for RawSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl fmt::Display for CanonicalSplit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_and_test_fold_into_val() {
        assert_eq!(RawSplit::Train.canonical(), CanonicalSplit::Train);
        assert_eq!(RawSplit::Valid.canonical(), CanonicalSplit::Val);
        assert_eq!(RawSplit::Test.canonical(), CanonicalSplit::Val);
        assert_eq!(RawSplit::Val.canonical(), CanonicalSplit::Val);
    }

    #[test]
    fn probe_order_is_stable() {
        let names: Vec<_> = RawSplit::ALL.iter().map(|s| s.dir_name()).collect();
        assert_eq!(names, vec!["train", "valid", "test", "val"]);
    }
}
