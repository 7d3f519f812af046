use crate::commands::push::report_outcome;
use crate::commands::{Context, Operation};
use crate::utils::error::{TrunkError, TrunkResult};
use colored::*;
use reqwest::Method;
use std::io::Write;

/// Delete a version of a pod from the registry.
///
/// Deletion is permanent; the version can never be pushed again, so the
/// operation asks for confirmation unless `--yes` is passed.
pub struct Delete {
    pub name: String,
    pub version: String,
    pub yes: bool,
}

impl Operation for Delete {
    fn validate(&self, ctx: &mut Context) -> TrunkResult<()> {
        ctx.require_session()?;
        if self.name.trim().is_empty() {
            return Err(TrunkError::Usage("Please specify a pod name.".to_string()));
        }
        if self.version.trim().is_empty() {
            return Err(TrunkError::Usage("Please specify a version.".to_string()));
        }
        Ok(())
    }

    async fn run(self, ctx: &mut Context) -> TrunkResult<()> {
        if !self.yes && !confirm(&self.name, &self.version)? {
            println!("Deletion cancelled.");
            return Ok(());
        }

        let headers = ctx.gateway.auth_headers()?;
        let path = format!(
            "pods/{}/{}",
            urlencoding::encode(&self.name),
            urlencoding::encode(&self.version)
        );
        let response = ctx
            .gateway
            .request(Method::DELETE, &path, None, headers)
            .await?;
        let location = response.location()?;

        let outcome = ctx.gateway.follow_status(&location).await?;
        report_outcome(&outcome);
        Ok(())
    }
}

fn confirm(name: &str, version: &str) -> TrunkResult<bool> {
    println!(
        "{} Deleting a pod version is permanent; it can never be pushed again.",
        "WARNING:".yellow().bold()
    );
    print!("Delete {} v{} from the registry? [y/N]: ", name, version);
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    let input = input.trim().to_lowercase();
    Ok(input == "y" || input == "yes")
}
