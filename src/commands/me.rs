use crate::api::types::{SessionEntry, SessionInfo};
use crate::commands::{Context, Operation};
use crate::utils::error::{TrunkError, TrunkResult};
use crate::utils::time::{format_timestamp, format_timestamp_at, parse_timestamp};
use chrono::{DateTime, Utc};
use colored::*;
use reqwest::Method;
use serde_json::json;

/// Client-side classification of a server session entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Current,
    Valid,
    Unverified,
    Expired,
}

/// Expiry beats missing verification, which beats currency.
pub fn classify_session(entry: &SessionEntry, now: DateTime<Utc>) -> SessionState {
    let expired = parse_timestamp(&entry.valid_until).map_or(false, |t| t <= now);
    if expired {
        SessionState::Expired
    } else if !entry.verified {
        SessionState::Unverified
    } else if entry.current {
        SessionState::Current
    } else {
        SessionState::Valid
    }
}

struct SessionRow {
    created_at: String,
    valid_until: String,
    created_from_ip: String,
    description: Option<String>,
    state: SessionState,
}

fn session_rows(sessions: &[SessionEntry], now: DateTime<Utc>) -> Vec<SessionRow> {
    sessions
        .iter()
        .map(|entry| {
            let state = classify_session(entry, now);
            let valid_until = if state == SessionState::Unverified {
                "Unverified".to_string()
            } else {
                format_timestamp_at(&entry.valid_until, now)
            };
            SessionRow {
                created_at: format_timestamp_at(&entry.created_at, now),
                valid_until,
                created_from_ip: entry.created_from_ip.clone(),
                description: entry.description.clone(),
                state,
            }
        })
        .collect()
}

/// Columnize session rows in server order. Widths are the per-field
/// maxima; start times and IPs are left-justified, the time-until column
/// right-justified.
fn render_sessions(sessions: &[SessionEntry], now: DateTime<Utc>) -> Vec<String> {
    let rows = session_rows(sessions, now);
    let created_w = rows.iter().map(|r| r.created_at.len()).max().unwrap_or(0);
    let until_w = rows.iter().map(|r| r.valid_until.len()).max().unwrap_or(0);
    let ip_w = rows
        .iter()
        .map(|r| r.created_from_ip.len())
        .max()
        .unwrap_or(0);

    rows.iter()
        .map(|row| {
            let mut line = format!(
                "{:<created_w$} - {:>until_w$}. IP: {:<ip_w$}",
                row.created_at, row.valid_until, row.created_from_ip,
            );
            if let Some(description) = &row.description {
                line.push_str(&format!(" Description: {}", description));
            }
            match row.state {
                SessionState::Expired => line.red().to_string(),
                SessionState::Unverified => line.yellow().to_string(),
                SessionState::Current => line.cyan().to_string(),
                SessionState::Valid => line.green().to_string(),
            }
        })
        .collect()
}

fn labeled(label: &str, value: &str) {
    println!("{} {}", format!("{:<9}", format!("{}:", label)).bold(), value);
}

/// Display information about your registration and sessions
pub struct Me;

impl Operation for Me {
    fn validate(&self, ctx: &mut Context) -> TrunkResult<()> {
        ctx.require_session()
    }

    async fn run(self, ctx: &mut Context) -> TrunkResult<()> {
        let headers = ctx.gateway.auth_headers()?;
        let response = ctx
            .gateway
            .request(Method::GET, "sessions", None, headers)
            .await?;
        let info: SessionInfo = response.json()?;

        labeled("Name", &info.name);
        labeled("Email", &info.email);
        labeled("Since", &format_timestamp(&info.created_at));

        let pods: Vec<&str> = info.pods.iter().map(|pod| pod.name.as_str()).collect();
        let pods = if pods.is_empty() {
            "None".to_string()
        } else {
            pods.join(", ")
        };
        labeled("Pods", &pods);

        println!("{}", "Sessions:".bold());
        for line in render_sessions(&info.sessions, Utc::now()) {
            println!("  {}", line);
        }
        Ok(())
    }
}

/// Remove expired and unverified sessions, or all of them with `--all`
pub struct CleanSessions {
    pub remove_all: bool,
}

impl Operation for CleanSessions {
    fn validate(&self, ctx: &mut Context) -> TrunkResult<()> {
        ctx.require_session()
    }

    async fn run(self, ctx: &mut Context) -> TrunkResult<()> {
        let path = if self.remove_all {
            "sessions/all"
        } else {
            "sessions"
        };
        let headers = ctx.gateway.auth_headers()?;
        ctx.gateway
            .request(Method::DELETE, path, None, headers)
            .await?;
        println!("{}", "Sessions cleaned up.".green());
        Ok(())
    }
}

/// Update the display name of the account
pub struct Rename {
    pub name: String,
}

impl Operation for Rename {
    fn validate(&self, ctx: &mut Context) -> TrunkResult<()> {
        if self.name.trim().is_empty() {
            return Err(TrunkError::Usage("Please specify a name.".to_string()));
        }
        ctx.require_session()
    }

    async fn run(self, ctx: &mut Context) -> TrunkResult<()> {
        let host = ctx.config.registry_host()?;
        let email = ctx
            .store
            .get(&host)?
            .map(|credential| credential.login.clone())
            .ok_or_else(|| {
                TrunkError::Usage("You need to register a session first.".to_string())
            })?;

        let body = json!({ "email": email, "name": self.name });
        let headers = ctx.gateway.auth_headers()?;
        ctx.gateway
            .request(Method::POST, "sessions", Some(&body), headers)
            .await?;

        println!(
            "{} Your account has been renamed to `{}`.",
            "✓".green().bold(),
            self.name
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::context;
    use chrono::TimeZone;
    use mockito::Server;
    use tempfile::TempDir;

    fn entry(valid_until: &str, verified: bool, current: bool) -> SessionEntry {
        SessionEntry {
            created_at: "2016-01-01 00:00:00 UTC".to_string(),
            valid_until: valid_until.to_string(),
            created_from_ip: "10.0.0.1".to_string(),
            description: None,
            verified,
            current,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2016, 6, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_expired_beats_verified_and_current() {
        let entry = entry("2016-01-02 00:00:00 UTC", true, true);
        assert_eq!(classify_session(&entry, now()), SessionState::Expired);
    }

    #[test]
    fn test_unverified_beats_current() {
        let entry = entry("2017-01-01 00:00:00 UTC", false, true);
        assert_eq!(classify_session(&entry, now()), SessionState::Unverified);
    }

    #[test]
    fn test_verified_current_session_is_current() {
        let entry = entry("2017-01-01 00:00:00 UTC", true, true);
        assert_eq!(classify_session(&entry, now()), SessionState::Current);
    }

    #[test]
    fn test_verified_other_session_is_valid() {
        let entry = entry("2017-01-01 00:00:00 UTC", true, false);
        assert_eq!(classify_session(&entry, now()), SessionState::Valid);
    }

    #[test]
    fn test_unverified_row_masks_the_valid_until_column() {
        colored::control::set_override(false);
        let sessions = vec![entry("2017-01-01 00:00:00 UTC", false, false)];
        let lines = render_sessions(&sessions, now());
        assert!(lines[0].contains("Unverified."));
    }

    #[test]
    fn test_rows_align_on_the_widest_fields() {
        colored::control::set_override(false);
        let mut short = entry("2017-01-01 00:00:00 UTC", true, false);
        short.created_from_ip = "1.1.1.1".to_string();
        short.description = Some("laptop".to_string());
        let mut long = entry("2017-01-01 00:00:00 UTC", false, false);
        long.created_from_ip = "203.0.113.254".to_string();

        let lines = render_sessions(&[short, long], now());
        // The short IP is padded to the widest before the description.
        let pad = " ".repeat("203.0.113.254".len() - "1.1.1.1".len());
        assert!(lines[0].contains(&format!("IP: 1.1.1.1{} Description: laptop", pad)));
        // The unverified marker is right-justified against the widest
        // valid-until value ("January 1 2017 00:00" on the other row).
        let until = format!("- {:>20}.", "Unverified");
        assert!(lines[1].contains(&until));
    }

    #[test]
    fn test_rendering_is_idempotent() {
        colored::control::set_override(false);
        let sessions = vec![
            entry("2016-01-02 00:00:00 UTC", true, true),
            entry("2017-01-01 00:00:00 UTC", false, false),
            entry("2017-01-01 00:00:00 UTC", true, true),
        ];
        assert_eq!(
            render_sessions(&sessions, now()),
            render_sessions(&sessions, now())
        );
    }

    #[test]
    fn test_me_requires_a_session() {
        let dir = TempDir::new().unwrap();
        let mut ctx = context("https://trunk.example.org", &dir, None);

        let result = Me.validate(&mut ctx);
        assert!(matches!(result, Err(TrunkError::Usage(_))));
    }

    #[tokio::test]
    async fn test_clean_sessions_deletes_the_right_path() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("DELETE", "/api/v1/sessions/all")
            .match_header("authorization", "Token secret")
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let mut ctx = context(&server.url(), &dir, Some("secret"));
        let op = CleanSessions { remove_all: true };

        op.run(&mut ctx).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rename_posts_the_stored_email() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/api/v1/sessions")
            .match_header("authorization", "Token secret")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"email": "eloy@example.com", "name": "Eloy 2"}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"token": "secret"}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let mut ctx = context(&server.url(), &dir, Some("secret"));
        let host = ctx.config.registry_host().unwrap();
        ctx.store.set(&host, "eloy@example.com", "secret").unwrap();

        let op = Rename {
            name: "Eloy 2".to_string(),
        };
        op.run(&mut ctx).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rename_without_stored_credential_is_a_usage_error() {
        let dir = TempDir::new().unwrap();
        // A token can come from the environment while the credential file
        // is empty; rename still needs the stored email.
        let mut ctx = context("https://trunk.example.org", &dir, Some("secret"));

        let op = Rename {
            name: "Eloy 2".to_string(),
        };
        let result = op.run(&mut ctx).await;
        assert!(matches!(result, Err(TrunkError::Usage(_))));
    }
}
