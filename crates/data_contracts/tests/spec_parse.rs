use data_contracts::{DatasetDescriptor, MergeSpec, NormalizeSummary, OutcomeCounts, SplitReport};
use data_contracts::{CanonicalSplit, RawSplit};
use std::path::PathBuf;

const SPEC: &str = r#"
target_classes:
  - Hardhat
  - NoHardhat
  - Vest
sources:
  site_b:
    path: raw/site_b
    mapping:
      0: Vest
  hardhat_kaggle:
    path: raw/hardhat
    mapping:
      0: Hardhat
      2: NoHardhat
"#;

#[test]
fn yaml_spec_keeps_source_order_and_int_keys() {
    let spec: MergeSpec = serde_yaml::from_str(SPEC).expect("parse spec");
    let names: Vec<_> = spec.sources.keys().cloned().collect();
    assert_eq!(names, vec!["site_b", "hardhat_kaggle"]);
    let hardhat = &spec.sources["hardhat_kaggle"];
    assert_eq!(hardhat.path, PathBuf::from("raw/hardhat"));
    assert_eq!(hardhat.mapping.get(&2).map(String::as_str), Some("NoHardhat"));
    assert!(hardhat.mapping.get(&1).is_none());
    spec.validate().expect("valid spec");
}

#[test]
fn yaml_spec_without_sources_is_rejected_by_serde() {
    let err = serde_yaml::from_str::<MergeSpec>("target_classes: [Hardhat]\n");
    assert!(err.is_err());
}

#[test]
fn descriptor_lists_names_in_canonical_order() {
    let desc = DatasetDescriptor::new(
        PathBuf::from("datasets/combined_ppe"),
        vec!["Hardhat".into(), "NoHardhat".into()],
    );
    assert_eq!(desc.nc, 2);
    assert_eq!(desc.train, "images/train");
    assert_eq!(desc.val, "images/val");
    let yaml = serde_yaml::to_string(&desc).expect("serialize descriptor");
    let back: DatasetDescriptor = serde_yaml::from_str(&yaml).expect("parse descriptor");
    assert_eq!(back.names, vec!["Hardhat", "NoHardhat"]);
}

#[test]
fn summary_totals_accumulate_per_split() {
    let mut summary = NormalizeSummary::default();
    summary.push(SplitReport {
        source: "a".into(),
        raw_split: RawSplit::Train,
        canonical: CanonicalSplit::Train,
        counts: OutcomeCounts {
            processed: 3,
            image_missing: 1,
            ..Default::default()
        },
    });
    summary.push(SplitReport {
        source: "a".into(),
        raw_split: RawSplit::Test,
        canonical: CanonicalSplit::Val,
        counts: OutcomeCounts {
            processed: 2,
            dropped_no_objects: 4,
            ..Default::default()
        },
    });
    assert_eq!(summary.totals.processed, 5);
    assert_eq!(summary.totals.labels_written(), 6);
    assert_eq!(summary.for_source("a").count(), 2);
    let json = serde_json::to_string(&summary).expect("serialize summary");
    assert!(json.contains("\"raw_split\":\"test\""));
}
