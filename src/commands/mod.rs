use crate::api::Gateway;
use crate::auth::CredentialStore;
use crate::config::Config;
use crate::utils::error::{TrunkError, TrunkResult};

pub mod add_owner;
pub mod delete;
pub mod deprecate;
pub mod logout;
pub mod me;
pub mod push;
pub mod register;

pub use add_owner::AddOwner;
pub use delete::Delete;
pub use deprecate::Deprecate;
pub use logout::Logout;
pub use me::{CleanSessions, Me, Rename};
pub use push::Push;
pub use register::Register;

/// Everything an operation needs: the resolved configuration, an
/// explicitly constructed credential store, and a gateway bound to the
/// stored token (if any).
pub struct Context {
    pub config: Config,
    pub store: CredentialStore,
    pub gateway: Gateway,
}

impl Context {
    /// Usage error unless a session token is available
    pub fn require_session(&self) -> TrunkResult<()> {
        if self.gateway.is_authenticated() {
            Ok(())
        } else {
            Err(TrunkError::Usage(
                "You need to register a session first.".to_string(),
            ))
        }
    }
}

/// A single CLI operation: cheap local validation first, then the request.
#[allow(async_fn_in_trait)]
pub trait Operation {
    /// Check arguments and local session state before any network call
    fn validate(&self, ctx: &mut Context) -> TrunkResult<()>;

    /// Perform the operation
    async fn run(self, ctx: &mut Context) -> TrunkResult<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::api::PollConfig;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Context wired to a mock server and a temp credential file
    pub fn context(server_url: &str, dir: &TempDir, token: Option<&str>) -> Context {
        let config = Config {
            scheme_and_host: server_url.to_string(),
            timeout: 30,
            verify_ssl: true,
        };
        let store = CredentialStore::at(dir.path().join(".netrc"));
        let gateway = Gateway::new(&config, token.map(str::to_string))
            .expect("gateway")
            .with_poll_config(PollConfig {
                interval: Duration::ZERO,
                max_attempts: 10,
            });
        Context {
            config,
            store,
            gateway,
        }
    }
}
