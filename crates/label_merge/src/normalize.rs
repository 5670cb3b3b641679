//! The merge driver: sources, then splits, then label files.

use data_contracts::{CanonicalSplit, MergeSpec, NormalizeSummary, OutcomeCounts, SplitReport};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::images::{copy_image, find_image, remove_stale_images};
use crate::layout::{
    check_output_root, list_label_files, reset_output_dir, resolve_splits, OutputTree, SplitOutput,
};
use crate::transform::{remap_label_text, ClassRemap};
use crate::types::{FileOutcome, NormalizeError, NormalizeOptions, NormalizeResult, OutputNaming};

/// Everything a worker needs to turn one raw label file into output.
#[derive(Debug, Clone, Copy)]
pub struct FileContext<'a> {
    pub source_name: &'a str,
    pub remap: &'a ClassRemap,
    pub images_dir: &'a Path,
    pub output: &'a SplitOutput,
    pub naming: OutputNaming,
    pub image_extensions: &'a [String],
    /// Output stems already written to this canonical split earlier in the run.
    pub claimed: Option<&'a HashSet<String>>,
}

impl FileContext<'_> {
    pub fn output_stem(&self, stem: &str) -> String {
        match self.naming {
            OutputNaming::Stem => stem.to_string(),
            OutputNaming::SourcePrefixed => format!("{}__{stem}", self.source_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelFileResult {
    pub label_path: PathBuf,
    pub outcome: FileOutcome,
    /// Output stem, set whenever a label file was written.
    pub written: Option<String>,
    /// The output stem had already been written this run and was overwritten.
    pub collided: bool,
}

impl LabelFileResult {
    fn skipped(label_path: &Path, outcome: FileOutcome) -> Self {
        Self {
            label_path: label_path.to_path_buf(),
            outcome,
            written: None,
            collided: false,
        }
    }
}

/// Remap one label file, write it if anything survives, then copy its image.
///
/// Unreadable files and missing images are outcomes, not errors. Only a failed write into
/// the output tree is returned as `Err`.
pub fn process_label_file(
    label_path: &Path,
    ctx: &FileContext<'_>,
) -> NormalizeResult<LabelFileResult> {
    let Some(stem) = label_path.file_stem().and_then(|s| s.to_str()) else {
        warn!(path = %label_path.display(), "skipping label file with non UTF-8 name");
        return Ok(LabelFileResult::skipped(
            label_path,
            FileOutcome::Unreadable {
                reason: "file name is not valid UTF-8".to_string(),
            },
        ));
    };

    let text = match fs::read_to_string(label_path) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %label_path.display(), error = %e, "skipping unreadable label file");
            return Ok(LabelFileResult::skipped(
                label_path,
                FileOutcome::Unreadable {
                    reason: e.to_string(),
                },
            ));
        }
    };

    let remapped = match remap_label_text(&text, ctx.remap) {
        Ok(Some(remapped)) => remapped,
        Ok(None) => {
            return Ok(LabelFileResult::skipped(
                label_path,
                FileOutcome::DroppedNoObjects,
            ))
        }
        Err(e) => {
            warn!(path = %label_path.display(), error = %e, "skipping malformed label file");
            return Ok(LabelFileResult::skipped(
                label_path,
                FileOutcome::Unreadable {
                    reason: e.to_string(),
                },
            ));
        }
    };

    let out_stem = ctx.output_stem(stem);
    let collided = ctx.claimed.is_some_and(|c| c.contains(&out_stem));
    if collided {
        warn!(
            source = ctx.source_name,
            split = %ctx.output.split,
            stem = %out_stem,
            "output name already written this run; overwriting"
        );
        remove_stale_images(&ctx.output.images_dir, &out_stem, ctx.image_extensions);
    }

    let dest_label = ctx.output.labels_dir.join(format!("{out_stem}.txt"));
    fs::write(&dest_label, remapped).map_err(|e| NormalizeError::io(&dest_label, e))?;

    let outcome = match find_image(ctx.images_dir, stem, ctx.image_extensions) {
        Some(src) => match copy_image(&src, &ctx.output.images_dir, &out_stem) {
            Ok(_) => FileOutcome::Processed,
            Err(e) => {
                warn!(path = %src.display(), error = %e, "image copy failed; label kept");
                FileOutcome::ImageMissing
            }
        },
        None => {
            debug!(label = %label_path.display(), "no matching image; label kept");
            FileOutcome::ImageMissing
        }
    };

    Ok(LabelFileResult {
        label_path: label_path.to_path_buf(),
        outcome,
        written: Some(out_stem),
        collided,
    })
}

fn build_pool(jobs: Option<usize>) -> NormalizeResult<rayon::ThreadPool> {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = jobs {
        builder = builder.num_threads(n.max(1));
    }
    Ok(builder.build()?)
}

/// Rebuild `opts.output_root` from every source in `spec`.
///
/// The spec and the output root are checked before anything is deleted, so a bad spec
/// leaves the previous output in place.
pub fn normalize(spec: &MergeSpec, opts: &NormalizeOptions) -> NormalizeResult<NormalizeSummary> {
    spec.validate()?;
    let remaps = spec
        .sources
        .iter()
        .map(|(name, source)| {
            ClassRemap::for_source(spec, name, source).map(|remap| (name.as_str(), source, remap))
        })
        .collect::<Result<Vec<_>, _>>()?;
    check_output_root(&opts.output_root, spec)?;
    let pool = build_pool(opts.jobs)?;

    if opts.output_root.exists() {
        info!(root = %opts.output_root.display(), "cleaning previous output");
    }
    reset_output_dir(&opts.output_root)?;

    let mut tree = OutputTree::new(&opts.output_root);
    let mut claimed: HashMap<CanonicalSplit, HashSet<String>> = HashMap::new();
    let mut summary = NormalizeSummary::default();

    for &(source_name, source, ref remap) in &remaps {
        info!(source = %source_name, path = %source.path.display(), "processing source");
        if !source.path.is_dir() {
            warn!(
                source = %source_name,
                path = %source.path.display(),
                "source root missing; skipping"
            );
            summary.skipped_sources.push(source_name.to_string());
            continue;
        }

        for split in resolve_splits(&source.path) {
            let canonical = split.canonical();
            let output = tree.ensure(canonical)?;
            let label_files = match list_label_files(&split.labels_dir) {
                Ok(files) => files,
                Err(e) => {
                    warn!(
                        source = %source_name,
                        path = %split.labels_dir.display(),
                        error = %e,
                        "labels directory unreadable; skipping split"
                    );
                    continue;
                }
            };
            info!(
                source = %source_name,
                from = %split.raw,
                to = %canonical,
                files = label_files.len(),
                "merging split"
            );

            let results: Vec<_> = {
                let ctx = FileContext {
                    source_name,
                    remap,
                    images_dir: &split.images_dir,
                    output: &output,
                    naming: opts.naming,
                    image_extensions: &opts.image_extensions,
                    claimed: claimed.get(&canonical),
                };
                pool.install(|| {
                    label_files
                        .par_iter()
                        .map(|path| process_label_file(path, &ctx))
                        .collect()
                })
            };

            let taken = claimed.entry(canonical).or_default();
            let mut counts = OutcomeCounts::default();
            for result in results {
                let result = result?;
                result.outcome.tally(&mut counts);
                if result.collided {
                    counts.collisions += 1;
                }
                if let Some(stem) = result.written {
                    taken.insert(stem);
                }
            }
            info!(
                source = %source_name,
                from = %split.raw,
                processed = counts.processed,
                dropped = counts.dropped_no_objects,
                unreadable = counts.unreadable,
                image_missing = counts.image_missing,
                "processed {} images/labels",
                counts.processed
            );
            summary.push(SplitReport {
                source: source_name.to_string(),
                raw_split: split.raw,
                canonical,
                counts,
            });
        }
    }

    info!(
        root = %tree.root().display(),
        processed = summary.totals.processed,
        labels = summary.totals.labels_written(),
        collisions = summary.totals.collisions,
        "combined dataset ready"
    );
    Ok(summary)
}
