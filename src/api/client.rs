use crate::api::classify::classify;
use crate::api::types::PushOutcome;
use crate::config::Config;
use crate::utils::error::{TrunkError, TrunkResult};
use colored::*;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;

/// How the status URL of an asynchronous registry operation is polled
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 60,
        }
    }
}

/// A fully-read registry response: status, headers, and body text.
///
/// The body is read eagerly so callers can take the `Location` header and
/// the JSON payload independently.
#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    headers: HeaderMap,
    pub body: String,
}

impl ApiResponse {
    /// Value of a response header, if present and readable as text
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// The status location left behind by asynchronous registry operations
    pub fn location(&self) -> TrunkResult<String> {
        self.header("location")
            .map(str::to_string)
            .ok_or_else(|| TrunkError::Api {
                status: self.status,
                message: "The registry did not return a status location.".to_string(),
            })
    }

    /// Parse the body as JSON into a typed value
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> TrunkResult<T> {
        serde_json::from_str(&self.body).map_err(TrunkError::Json)
    }
}

/// HTTP gateway for the trunk registry API
pub struct Gateway {
    client: Client,
    base_url: String,
    token: Option<String>,
    verbose: bool,
    poll: PollConfig,
}

impl Gateway {
    /// Create a gateway bound to the configured registry. Redirects are
    /// never followed; status locations are read from headers instead.
    pub fn new(config: &Config, token: Option<String>) -> TrunkResult<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("trunk-cli/{}", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(!config.verify_ssl)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url(),
            token,
            verbose: false,
            poll: PollConfig::default(),
        })
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_poll_config(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }

    /// Whether a session token is available for auth headers
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Headers sent on every call
    pub fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers
    }

    /// Default headers plus the session token
    pub fn auth_headers(&self) -> TrunkResult<HeaderMap> {
        let token = self.token.as_ref().ok_or_else(|| {
            TrunkError::Usage("You need to register a session first.".to_string())
        })?;
        let mut headers = Self::default_headers();
        let value = HeaderValue::from_str(&format!("Token {}", token)).map_err(|_| {
            TrunkError::Usage("The stored session token is not valid header text.".to_string())
        })?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    fn resolve_url(&self, path_or_url: &str) -> String {
        if path_or_url.starts_with("http://") || path_or_url.starts_with("https://") {
            path_or_url.to_string()
        } else {
            format!("{}/{}", self.base_url, path_or_url)
        }
    }

    /// Issue a request and classify the response.
    ///
    /// A status in [400, 600) fails the call with the classified message;
    /// otherwise the response is returned untouched.
    pub async fn request(
        &self,
        method: Method,
        path_or_url: &str,
        body: Option<&Value>,
        headers: HeaderMap,
    ) -> TrunkResult<ApiResponse> {
        let url = self.resolve_url(path_or_url);

        if self.verbose {
            println!("{} {} {}", ">".dimmed(), method, url);
            if let Some(body) = body {
                println!("{} {}", ">".dimmed(), body);
            }
        }

        let mut request = self.client.request(method, &url).headers(headers);
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if self.verbose {
            println!("{} HTTP {}", "<".dimmed(), status);
            if !body.is_empty() {
                println!("{} {}", "<".dimmed(), body);
            }
        }

        if (400..600).contains(&status) {
            return Err(TrunkError::Api {
                status,
                message: classify(&body),
            });
        }

        Ok(ApiResponse {
            status,
            headers,
            body,
        })
    }

    /// Poll the status URL left behind by push/delete/deprecate until the
    /// registry reports a terminal state.
    ///
    /// HTTP 202 means the registry is still processing; any other success
    /// is terminal, and error statuses (404 included) fail classified.
    pub async fn follow_status(&self, url: &str) -> TrunkResult<PushOutcome> {
        for attempt in 1..=self.poll.max_attempts {
            let response = self
                .request(Method::GET, url, None, Self::default_headers())
                .await?;

            if response.status != 202 {
                return response.json();
            }

            if attempt < self.poll.max_attempts && !self.poll.interval.is_zero() {
                sleep(self.poll.interval).await;
            }
        }

        Err(TrunkError::Other(format!(
            "Timed out waiting for the registry to process the request. \
             Check {} for progress.",
            url
        )))
    }
}
