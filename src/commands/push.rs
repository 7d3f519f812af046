use crate::api::types::PushOutcome;
use crate::commands::{Context, Operation};
use crate::utils::error::{TrunkError, TrunkResult};
use crate::utils::podspec::{find_podspec, Podspec};
use crate::utils::time::format_timestamp;
use colored::*;
use reqwest::Method;
use std::path::PathBuf;

/// Publish a podspec to the registry.
///
/// The spec is linted locally, submitted, and the status location the
/// registry leaves behind is polled until the outcome is known.
pub struct Push {
    pub path: PathBuf,
    pub allow_warnings: bool,
}

impl Push {
    pub fn new(path: Option<String>, allow_warnings: bool) -> Self {
        Self {
            path: PathBuf::from(path.unwrap_or_else(|| ".".to_string())),
            allow_warnings,
        }
    }
}

impl Operation for Push {
    fn validate(&self, ctx: &mut Context) -> TrunkResult<()> {
        ctx.require_session()
    }

    async fn run(self, ctx: &mut Context) -> TrunkResult<()> {
        let path = find_podspec(&self.path)?;
        if path != self.path {
            println!("Found podspec `{}`", path.display());
        }
        if !path.exists() || path.is_dir() {
            return Err(TrunkError::Usage(format!(
                "The specified path `{}` does not point to an existing podspec file.",
                path.display()
            )));
        }

        println!("{}", "Validating podspec".yellow());
        let spec = Podspec::from_file(&path)?;
        let report = spec.lint();
        for warning in &report.warnings {
            println!("{} {}", "Warning:".yellow(), warning);
        }
        for error in &report.errors {
            println!("{} {}", "Error:".red(), error);
        }
        if !report.errors.is_empty() || (!self.allow_warnings && !report.warnings.is_empty()) {
            return Err(TrunkError::Validation(
                "The podspec does not validate.".to_string(),
            ));
        }

        println!("Pushing {} v{}...", spec.name.blue().bold(), spec.version);

        let headers = ctx.gateway.auth_headers()?;
        let response = ctx
            .gateway
            .request(Method::POST, "pods", Some(spec.as_json()), headers)
            .await?;
        let location = response.location()?;

        let outcome = ctx.gateway.follow_status(&location).await?;
        report_outcome(&outcome);
        Ok(())
    }
}

/// Shared report for push/delete/deprecate outcomes
pub fn report_outcome(outcome: &PushOutcome) {
    println!("  - Data URL: {}", outcome.data_url);
    println!("{}", "Log messages:".bold());
    for entry in &outcome.messages {
        if let Some((at, message)) = entry.iter().next() {
            println!("  - {}: {}", format_timestamp(at), message);
        }
    }
}
