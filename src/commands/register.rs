use crate::api::types::TokenResponse;
use crate::api::Gateway;
use crate::commands::{Context, Operation};
use crate::utils::error::{TrunkError, TrunkResult};
use colored::*;
use reqwest::Method;
use serde_json::json;

/// Register a new account, or create a new session.
///
/// Re-registration is allowed and overwrites the stored token. The name is
/// only required on first registration, which the server enforces.
pub struct Register {
    pub email: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Operation for Register {
    fn validate(&self, _ctx: &mut Context) -> TrunkResult<()> {
        if self.email.trim().is_empty() {
            return Err(TrunkError::Usage(
                "Specify at least your email address.".to_string(),
            ));
        }
        Ok(())
    }

    async fn run(self, ctx: &mut Context) -> TrunkResult<()> {
        let body = json!({
            "email": self.email,
            "name": self.name,
            "description": self.description,
        });
        let response = ctx
            .gateway
            .request(
                Method::POST,
                "sessions",
                Some(&body),
                Gateway::default_headers(),
            )
            .await?;
        let token: TokenResponse = response.json()?;

        // The credential is written only after a fully successful response.
        let host = ctx.config.registry_host()?;
        ctx.store.set(&host, &self.email, &token.token)?;
        ctx.store.save()?;

        println!(
            "{}",
            format!(
                "[!] Please verify the session by clicking the link in the \
                 verification email that has been sent to {}",
                self.email
            )
            .yellow()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;
    use mockito::Server;
    use tempfile::TempDir;

    #[test]
    fn test_validate_requires_an_email() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context("https://trunk.example.org", &dir, None);
        let op = Register {
            email: "  ".to_string(),
            name: None,
            description: None,
        };

        let result = op.validate(&mut ctx);
        assert!(matches!(result, Err(TrunkError::Usage(_))));
    }

    #[tokio::test]
    async fn test_run_stores_the_token_for_the_registry_host() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/sessions")
            .match_header("content-type", "application/json; charset=utf-8")
            .with_status(201)
            .with_body(r#"{"token": "secret"}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let mut ctx = context(&server.url(), &dir, None);
        let op = Register {
            email: "eloy@example.com".to_string(),
            name: Some("Eloy".to_string()),
            description: Some("Personal Laptop".to_string()),
        };

        op.run(&mut ctx).await.unwrap();
        mock.assert_async().await;

        let host = ctx.config.registry_host().unwrap();
        let credential = ctx.store.get(&host).unwrap().unwrap();
        assert_eq!(credential.login, "eloy@example.com");
        assert_eq!(credential.token, "secret");
        assert!(dir.path().join(".netrc").exists());
    }

    #[tokio::test]
    async fn test_run_keeps_the_store_untouched_on_failure() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/api/v1/sessions")
            .with_status(422)
            .with_body(r#"{"error": {"email": ["can't be blank"]}}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let mut ctx = context(&server.url(), &dir, None);
        let op = Register {
            email: "eloy@example.com".to_string(),
            name: None,
            description: None,
        };

        let result = op.run(&mut ctx).await;
        assert!(matches!(result, Err(TrunkError::Api { status: 422, .. })));
        assert!(!dir.path().join(".netrc").exists());
    }
}
