use clap::Args;
use label_merge::OutputNaming;
use std::path::PathBuf;

/// Merge spec location shared across dataset tools.
#[derive(Debug, Clone, Args)]
pub struct SpecArgs {
    /// YAML merge spec (target_classes + sources). Defaults to the tools config value.
    #[arg(long)]
    pub spec: Option<PathBuf>,
}

/// Output options for normalize-style binaries. Unset values fall back to the tools config.
#[derive(Debug, Clone, Args)]
pub struct NormalizeOutputArgs {
    /// Output root for the combined dataset. Deleted and rebuilt on every run.
    #[arg(long)]
    pub output_root: Option<PathBuf>,
    /// Where to write the training descriptor (defaults to "<output_root>/data.yaml").
    #[arg(long)]
    pub descriptor: Option<PathBuf>,
    /// Optional JSON report of per-split counts.
    #[arg(long)]
    pub report: Option<PathBuf>,
    /// Prefix output file names with "<source>__" so equal stems from different sources do not
    /// collide. `--prefix-source=false` overrides a config that enables it.
    #[arg(long, num_args = 0..=1, default_missing_value = "true", require_equals = true)]
    pub prefix_source: Option<bool>,
    /// Worker threads per split (1 = sequential).
    #[arg(long)]
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct NormalizeOutputOpts {
    pub output_root: PathBuf,
    pub descriptor: PathBuf,
    pub report: Option<PathBuf>,
    pub naming: OutputNaming,
    pub jobs: Option<usize>,
}

impl NormalizeOutputOpts {
    /// Resolve against fallbacks, defaulting the descriptor to "<output_root>/data.yaml".
    pub fn resolve(
        args: &NormalizeOutputArgs,
        default_output_root: PathBuf,
        default_descriptor: Option<PathBuf>,
        default_report: Option<PathBuf>,
        default_prefix_source: bool,
    ) -> Self {
        let output_root = args.output_root.clone().unwrap_or(default_output_root);
        let descriptor = args
            .descriptor
            .clone()
            .or(default_descriptor)
            .unwrap_or_else(|| output_root.join("data.yaml"));
        let naming = if args.prefix_source.unwrap_or(default_prefix_source) {
            OutputNaming::SourcePrefixed
        } else {
            OutputNaming::Stem
        };
        Self {
            output_root,
            descriptor,
            report: args.report.clone().or(default_report),
            naming,
            jobs: args.jobs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> NormalizeOutputArgs {
        NormalizeOutputArgs {
            output_root: None,
            descriptor: None,
            report: None,
            prefix_source: None,
            jobs: None,
        }
    }

    #[test]
    fn descriptor_defaults_under_output_root() {
        let opts = NormalizeOutputOpts::resolve(
            &args(),
            PathBuf::from("datasets/combined_ppe"),
            None,
            None,
            false,
        );
        assert_eq!(opts.descriptor, PathBuf::from("datasets/combined_ppe/data.yaml"));
        assert_eq!(opts.naming, OutputNaming::Stem);
    }

    #[test]
    fn cli_values_override_fallbacks() {
        let mut a = args();
        a.output_root = Some(PathBuf::from("out"));
        a.prefix_source = Some(true);
        a.jobs = Some(1);
        let opts = NormalizeOutputOpts::resolve(
            &a,
            PathBuf::from("datasets/combined_ppe"),
            Some(PathBuf::from("data.yaml")),
            Some(PathBuf::from("logs/normalize.json")),
            false,
        );
        assert_eq!(opts.output_root, PathBuf::from("out"));
        assert_eq!(opts.descriptor, PathBuf::from("data.yaml"));
        assert_eq!(opts.report, Some(PathBuf::from("logs/normalize.json")));
        assert_eq!(opts.naming, OutputNaming::SourcePrefixed);
        assert_eq!(opts.jobs, Some(1));
    }

    #[test]
    fn cli_can_disable_prefixing_enabled_in_config() {
        let mut a = args();
        let from_config =
            NormalizeOutputOpts::resolve(&a, PathBuf::from("out"), None, None, true);
        assert_eq!(from_config.naming, OutputNaming::SourcePrefixed);
        a.prefix_source = Some(false);
        let overridden = NormalizeOutputOpts::resolve(&a, PathBuf::from("out"), None, None, true);
        assert_eq!(overridden.naming, OutputNaming::Stem);
    }

    #[derive(Debug, clap::Parser)]
    struct TestCli {
        #[command(flatten)]
        output: NormalizeOutputArgs,
    }

    #[test]
    fn prefix_source_flag_forms() {
        use clap::Parser;
        let parse = |argv: &[&str]| TestCli::try_parse_from(argv).expect("parse").output.prefix_source;
        assert_eq!(parse(&["t"]), None);
        assert_eq!(parse(&["t", "--prefix-source"]), Some(true));
        assert_eq!(parse(&["t", "--prefix-source=false"]), Some(false));
        assert_eq!(parse(&["t", "--prefix-source=true"]), Some(true));
    }
}
