use serde::Deserialize;
use std::collections::BTreeMap;

/// Session token issued by the registry on register/rename
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Account information returned by `GET /sessions`
#[derive(Debug, Deserialize)]
pub struct SessionInfo {
    pub name: String,
    pub email: String,
    pub created_at: String,
    #[serde(default)]
    pub pods: Vec<PodRef>,
    pub sessions: Vec<SessionEntry>,
}

/// A pod the account owns
#[derive(Debug, Deserialize)]
pub struct PodRef {
    pub name: String,
}

/// One server-tracked login session
#[derive(Debug, Clone, Deserialize)]
pub struct SessionEntry {
    pub created_at: String,
    pub valid_until: String,
    pub created_from_ip: String,
    pub description: Option<String>,
    #[serde(default)]
    pub verified: bool,
    #[serde(default)]
    pub current: bool,
}

/// A registered account allowed to manage a pod
#[derive(Debug, Deserialize)]
pub struct Owner {
    pub name: String,
    pub email: String,
}

/// Terminal body of the status URL left behind by push/delete/deprecate.
/// Each message is a single `{timestamp: text}` pair; the server's order
/// is preserved.
#[derive(Debug, Deserialize)]
pub struct PushOutcome {
    pub data_url: String,
    #[serde(default)]
    pub messages: Vec<BTreeMap<String, String>>,
}
