use crate::api::types::Owner;
use crate::commands::{Context, Operation};
use crate::utils::error::{TrunkError, TrunkResult};
use colored::*;
use reqwest::Method;
use serde_json::json;

/// Add a registered user as an owner of a pod
pub struct AddOwner {
    pub pod: String,
    pub email: String,
}

impl Operation for AddOwner {
    fn validate(&self, ctx: &mut Context) -> TrunkResult<()> {
        ctx.require_session()?;
        if self.pod.trim().is_empty() {
            return Err(TrunkError::Usage(
                "Please specify the pod name.".to_string(),
            ));
        }
        if self.email.trim().is_empty() {
            return Err(TrunkError::Usage(
                "Please specify the new owner's email address.".to_string(),
            ));
        }
        Ok(())
    }

    async fn run(self, ctx: &mut Context) -> TrunkResult<()> {
        let body = json!({ "email": self.email });
        let headers = ctx.gateway.auth_headers()?;
        let path = format!("pods/{}/owners", urlencoding::encode(&self.pod));
        let response = ctx
            .gateway
            .request(Method::PATCH, &path, Some(&body), headers)
            .await?;
        let owners: Vec<Owner> = response.json()?;

        println!("{}", "Owners:".bold());
        for owner in owners {
            println!("  {} <{}>", owner.name, owner.email);
        }
        Ok(())
    }
}
