use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cli_support::common::{NormalizeOutputArgs, NormalizeOutputOpts, SpecArgs};
use label_merge::{load_spec, normalize, write_descriptor, write_report, NormalizeOptions};
use ppe_tools::{logging, ToolConfig};
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(
    name = "normalize_data",
    about = "Merge raw YOLO datasets into one class schema with train/val splits"
)]
struct Args {
    #[command(flatten)]
    spec: SpecArgs,
    #[command(flatten)]
    output: NormalizeOutputArgs,
    /// Log level filter when RUST_LOG is unset (e.g. info, debug).
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    let (cfg, notes) = ToolConfig::load();
    let level = args.log_level.as_deref().unwrap_or(&cfg.log_level);
    if let Err(e) = logging::init(level) {
        eprintln!("{e:#}");
    }
    for note in &notes {
        warn!("{note}");
    }

    match run(&args, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, cfg: &ToolConfig) -> anyhow::Result<()> {
    let spec_path = args
        .spec
        .spec
        .clone()
        .unwrap_or_else(|| cfg.spec_path.clone());
    let out = NormalizeOutputOpts::resolve(
        &args.output,
        cfg.output_root.clone(),
        cfg.descriptor_path.clone(),
        cfg.report_path.clone(),
        cfg.prefix_source,
    );
    let spec = load_spec(&spec_path)
        .with_context(|| format!("loading merge spec {}", spec_path.display()))?;
    info!(
        targets = ?spec.target_classes,
        sources = spec.sources.len(),
        output = %out.output_root.display(),
        "starting data normalization"
    );

    let opts = NormalizeOptions::new(&out.output_root)
        .with_naming(out.naming)
        .with_jobs(out.jobs.or(cfg.jobs));
    let summary = normalize(&spec, &opts)
        .with_context(|| format!("building {}", out.output_root.display()))?;

    for split in &summary.splits {
        println!(
            " - [{}] {} -> {}: processed={} image_missing={} dropped={} unreadable={} collisions={}",
            split.source,
            split.raw_split,
            split.canonical,
            split.counts.processed,
            split.counts.image_missing,
            split.counts.dropped_no_objects,
            split.counts.unreadable,
            split.counts.collisions
        );
    }
    for skipped in &summary.skipped_sources {
        println!(" - [{}] skipped: source root missing", skipped);
    }

    let descriptor = write_descriptor(&out.descriptor, &spec, &out.output_root)
        .context("writing dataset descriptor")?;
    if let Some(report) = &out.report {
        write_report(report, &summary).context("writing normalize report")?;
        info!(path = %report.display(), "wrote report");
    }

    println!(
        "Combined dataset ready at {} ({} image/label pairs, {} labels without image); descriptor {} lists {} classes",
        out.output_root.display(),
        summary.totals.processed,
        summary.totals.image_missing,
        out.descriptor.display(),
        descriptor.nc
    );
    Ok(())
}
