use std::path::{Path, PathBuf};

use serde::Deserialize;

const DEFAULT_CONFIG_NAME: &str = "normalizer-tools.toml";
const CONFIG_ENV: &str = "NORMALIZER_TOOLS_CONFIG";
const DEFAULT_SPEC_PATH: &str = "configs/data_cleaning.yaml";
const DEFAULT_OUTPUT_ROOT: &str = "datasets/combined_ppe";
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfig {
    pub spec_path: PathBuf,
    pub output_root: PathBuf,
    /// `None` means "<output_root>/data.yaml".
    pub descriptor_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub prefix_source: bool,
    pub jobs: Option<usize>,
    pub log_level: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            spec_path: PathBuf::from(DEFAULT_SPEC_PATH),
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            descriptor_path: None,
            report_path: None,
            prefix_source: false,
            jobs: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct ToolConfigFile {
    spec_path: Option<String>,
    output_root: Option<String>,
    descriptor_path: Option<String>,
    report_path: Option<String>,
    normalize: Option<NormalizeSection>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Deserialize, Default)]
struct NormalizeSection {
    prefix_source: Option<bool>,
    jobs: Option<usize>,
}

#[derive(Debug, Deserialize, Default)]
struct LoggingSection {
    level: Option<String>,
}

impl ToolConfig {
    /// Load from `$NORMALIZER_TOOLS_CONFIG` or `normalizer-tools.toml`, falling back to defaults.
    ///
    /// Returns the config plus any problems found, to be logged once logging is up.
    pub fn load() -> (Self, Vec<String>) {
        let path = std::env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_NAME));
        let mut notes = Vec::new();
        let cfg = match Self::read(&path) {
            Ok(Some(cfg)) => cfg,
            Ok(None) => Self::default(),
            Err(msg) => {
                notes.push(msg);
                Self::default()
            }
        };
        notes.extend(cfg.problems());
        (cfg, notes)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        Self::read(path).ok().flatten()
    }

    fn read(path: &Path) -> Result<Option<Self>, String> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(path)
            .map_err(|e| format!("tools config {}: {e}; using defaults", path.display()))?;
        let file: ToolConfigFile = toml::from_str(&raw)
            .map_err(|e| format!("tools config {}: {e}; using defaults", path.display()))?;
        Ok(Some(Self::from_file(file)))
    }

    fn from_file(file: ToolConfigFile) -> Self {
        let normalize = file.normalize.unwrap_or_default();
        ToolConfig {
            spec_path: file
                .spec_path
                .map(|v| expand_path(&v))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SPEC_PATH)),
            output_root: file
                .output_root
                .map(|v| expand_path(&v))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_ROOT)),
            descriptor_path: file.descriptor_path.map(|v| expand_path(&v)),
            report_path: file.report_path.map(|v| expand_path(&v)),
            prefix_source: normalize.prefix_source.unwrap_or(false),
            jobs: normalize.jobs,
            log_level: file
                .logging
                .and_then(|l| l.level)
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }

    pub fn problems(&self) -> Vec<String> {
        let mut out = Vec::new();
        if self.output_root.as_os_str().is_empty() || self.output_root == Path::new("/") {
            out.push(format!(
                "tools config: output_root {:?} is not safe to reset; pass --output-root",
                self.output_root
            ));
        }
        if self.jobs == Some(0) {
            out.push("tools config: normalize.jobs = 0; using a single worker".to_string());
        }
        out
    }
}

fn expand_path(raw: &str) -> PathBuf {
    let mut out = raw.to_string();
    if let Some(stripped) = out.strip_prefix('~') {
        if let Ok(home) = std::env::var("HOME") {
            out = format!("{home}{stripped}");
        }
    }
    PathBuf::from(expand_env(&out))
}

/// Replace `${VAR}` with its value; unknown variables are left as written.
fn expand_env(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match std::env::var(key) {
                    Ok(val) => out.push_str(&val),
                    Err(_) => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_env_keeps_unknown_vars() {
        assert_eq!(
            expand_env("data/${NORMALIZER_SURELY_UNSET_VAR}/x"),
            "data/${NORMALIZER_SURELY_UNSET_VAR}/x"
        );
        assert_eq!(expand_env("plain/${unterminated"), "plain/${unterminated");
    }

    #[test]
    fn expand_env_substitutes_known_vars() {
        std::env::set_var("NORMALIZER_TEST_ROOT", "/srv/data");
        assert_eq!(expand_env("${NORMALIZER_TEST_ROOT}/raw"), "/srv/data/raw");
    }

    #[test]
    fn root_output_is_flagged() {
        let cfg = ToolConfig {
            output_root: PathBuf::from("/"),
            ..Default::default()
        };
        assert_eq!(cfg.problems().len(), 1);
        assert!(ToolConfig::default().problems().is_empty());
    }
}
