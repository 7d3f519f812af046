use crate::utils::error::{TrunkError, TrunkResult};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// A parsed pod specification file
#[derive(Debug, Clone)]
pub struct Podspec {
    pub name: String,
    pub version: String,
    raw: Value,
}

/// Outcome of the local lint pass
#[derive(Debug, Default)]
pub struct LintReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Podspec {
    /// Parse a `.podspec.json` file. Ruby-DSL podspecs cannot be
    /// interpreted by the client and are reported as such.
    pub fn from_file(path: &Path) -> TrunkResult<Self> {
        if path.extension().map_or(false, |ext| ext == "podspec") {
            return Err(TrunkError::Validation(
                "Unable to interpret the specified path as a podspec. \
                 Only JSON podspecs can be pushed; use `<name>.podspec.json`."
                    .to_string(),
            ));
        }

        let contents = fs::read_to_string(path)?;
        let raw: Value = serde_json::from_str(&contents).map_err(|_| {
            TrunkError::Validation(
                "Unable to interpret the specified path as a podspec.".to_string(),
            )
        })?;

        let name = raw
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let version = raw
            .get("version")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self { name, version, raw })
    }

    /// Serialized body submitted to the registry
    pub fn as_json(&self) -> &Value {
        &self.raw
    }

    /// Shallow lint of the attributes the registry requires. The registry
    /// runs the authoritative validation after submission.
    pub fn lint(&self) -> LintReport {
        let mut report = LintReport::default();

        if self.name.is_empty() {
            report
                .errors
                .push("Missing required attribute `name`.".to_string());
        }
        if self.version.is_empty() {
            report
                .errors
                .push("Missing required attribute `version`.".to_string());
        }
        for attr in ["summary", "homepage", "source", "authors", "license"] {
            if self.raw.get(attr).map_or(true, Value::is_null) {
                report
                    .errors
                    .push(format!("Missing required attribute `{}`.", attr));
            }
        }

        if let Some(summary) = self.raw.get("summary").and_then(Value::as_str) {
            if summary.chars().count() > 140 {
                report
                    .warnings
                    .push("The summary should be short (140 characters max).".to_string());
            }
        }
        if self.raw.get("description").map_or(true, Value::is_null) {
            report
                .warnings
                .push("The `description` attribute is empty.".to_string());
        }

        report
    }
}

/// Locate the podspec to push: a file path is used as-is, a directory is
/// searched non-recursively for exactly one `*.podspec{.json,}` file.
pub fn find_podspec(path: &Path) -> TrunkResult<PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    let mut matches: Vec<PathBuf> = fs::read_dir(path)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|candidate| {
            candidate.is_file()
                && candidate.file_name().and_then(|name| name.to_str()).map_or(
                    false,
                    |name| name.ends_with(".podspec") || name.ends_with(".podspec.json"),
                )
        })
        .collect();
    matches.sort();

    match matches.len() {
        0 => Err(TrunkError::Usage(format!(
            "No podspec found in directory `{}`",
            path.display()
        ))),
        1 => Ok(matches.remove(0)),
        _ => Err(TrunkError::Usage(format!(
            "Multiple podspec files in directory `{}`. \
             You need to explicitly specify which one to use.",
            path.display()
        ))),
    }
}
