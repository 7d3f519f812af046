use crate::commands::push::report_outcome;
use crate::commands::{Context, Operation};
use crate::utils::error::{TrunkError, TrunkResult};
use reqwest::Method;
use serde_json::{Map, Value};

/// Mark a pod as deprecated, optionally in favor of another pod
pub struct Deprecate {
    pub name: String,
    pub version: Option<String>,
    pub in_favor_of: Option<String>,
}

impl Operation for Deprecate {
    fn validate(&self, ctx: &mut Context) -> TrunkResult<()> {
        ctx.require_session()?;
        if self.name.trim().is_empty() {
            return Err(TrunkError::Usage("Please specify a pod name.".to_string()));
        }
        Ok(())
    }

    async fn run(self, ctx: &mut Context) -> TrunkResult<()> {
        let mut body = Map::new();
        if let Some(version) = &self.version {
            body.insert("version".to_string(), Value::String(version.clone()));
        }
        if let Some(in_favor_of) = &self.in_favor_of {
            body.insert("in_favor_of".to_string(), Value::String(in_favor_of.clone()));
        }
        let body = Value::Object(body);

        let headers = ctx.gateway.auth_headers()?;
        let path = format!("pods/{}/deprecated", urlencoding::encode(&self.name));
        let response = ctx
            .gateway
            .request(Method::PATCH, &path, Some(&body), headers)
            .await?;
        let location = response.location()?;

        let outcome = ctx.gateway.follow_status(&location).await?;
        report_outcome(&outcome);
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
    fn test_validate_requires_a_pod_name() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context("https://trunk.example.org", &dir, Some("secret"));
        let op = Deprecate {
            name: String::new(),
            version: None,
            in_favor_of: None,
        };

        let result = op.validate(&mut ctx);
        assert!(matches!(result, Err(TrunkError::Usage(_))));
    }

    #[tokio::test]
    async fn test_run_patches_the_deprecation_marker() {
        let mut server = Server::new_async().await;
        let submit = server
            .mock("PATCH", "/api/v1/pods/Stencil/deprecated")
            .match_header("authorization", "Token secret")
            .match_body(mockito::Matcher::JsonString(
                r#"{"in_favor_of": "NewStencil"}"#.to_string(),
            ))
            .with_status(202)
            .with_header("location", &format!("{}/status/1", server.url()))
            .with_body("{}")
            .create_async()
            .await;
        let _status = server
            .mock("GET", "/status/1")
            .with_status(200)
            .with_body(r#"{"data_url": "https://raw/x", "messages": []}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let mut ctx = context(&server.url(), &dir, Some("secret"));
        let op = Deprecate {
            name: "Stencil".to_string(),
            version: None,
            in_favor_of: Some("NewStencil".to_string()),
        };

        op.run(&mut ctx).await.unwrap();
        submit.assert_async().await;
    }
}
