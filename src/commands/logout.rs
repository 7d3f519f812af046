use crate::commands::{Context, Operation};
use crate::utils::error::TrunkResult;
use colored::*;

/// Remove the local session credential. The server keeps the session; it
/// can be cleaned up with `me clean-sessions`.
pub struct Logout;

impl Operation for Logout {
    fn validate(&self, ctx: &mut Context) -> TrunkResult<()> {
        ctx.require_session()
    }

    async fn run(self, ctx: &mut Context) -> TrunkResult<()> {
        let host = ctx.config.registry_host()?;
        ctx.store.delete(&host)?;
        ctx.store.save()?;

        println!("{}", "Successfully logged out!".green().bold());
        Ok(())
    }
}
