use super::error::RequestError;
use super::normalize::normalize_response;
use crate::auth::AuthStore;
use crate::config::Settings;
use crate::shared::{append_console_log, LogLevel};
use serde::Serialize;
use serde_json::Value;
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self, RequestError> {
        let body = serde_json::to_value(body).map_err(|_| RequestError::Decode {
            expected: "serializable request body",
        })?;
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            headers: Vec::new(),
        })
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Single choke point for outbound calls: attaches JSON content type and the
/// stored credential, then funnels every response through the normalizer.
#[derive(Debug, Clone)]
pub struct ApiClient {
    api_base: String,
    auth: Arc<AuthStore>,
    agent: ureq::Agent,
    log_root: Option<PathBuf>,
}

impl ApiClient {
    pub fn new(api_base: impl Into<String>, auth: Arc<AuthStore>) -> Self {
        Self {
            api_base: api_base.into(),
            auth,
            agent: ureq::AgentBuilder::new().build(),
            log_root: None,
        }
    }

    pub fn from_settings(settings: &Settings, auth: Arc<AuthStore>) -> Self {
        let mut builder = ureq::AgentBuilder::new();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self {
            api_base: settings.api_base_url.clone(),
            auth,
            agent: builder.build(),
            log_root: None,
        }
    }

    /// Enables request logging into `<root>/logs/console.log`.
    pub fn with_log_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.log_root = Some(root.into());
        self
    }

    pub fn auth(&self) -> &Arc<AuthStore> {
        &self.auth
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request_headers(&self, overrides: &[(String, String)]) -> Vec<(String, String)> {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        if let Some(auth) = self.auth.header() {
            headers.push(("Authorization".to_string(), auth));
        }
        for (name, value) in overrides {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }
        headers
    }

    /// Sends one request. `Ok(None)` is an empty result; there is no retry.
    pub fn send(&self, request: ApiRequest) -> Result<Option<Value>, RequestError> {
        let url = self.endpoint(&request.path);
        let mut call = self.agent.request(request.method.as_str(), &url);
        for (name, value) in self.request_headers(&request.headers) {
            call = call.set(&name, &value);
        }

        let outcome = match &request.body {
            Some(body) => call.send_string(&body.to_string()),
            None => call.call(),
        };

        let response = match outcome {
            Ok(response) => response,
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(transport)) => {
                self.log(
                    LogLevel::Error,
                    &format!(
                        "{} {} transport_failure kind={}",
                        request.method.as_str(),
                        request.path,
                        transport.kind()
                    ),
                );
                return Err(RequestError::Transport);
            }
        };

        let status = response.status();
        let mut body = Vec::new();
        if status != 204 {
            if let Err(err) = response.into_reader().read_to_end(&mut body) {
                self.log(
                    LogLevel::Error,
                    &format!(
                        "{} {} status={status} body_read_failure kind={:?}",
                        request.method.as_str(),
                        request.path,
                        err.kind()
                    ),
                );
                return Err(RequestError::Transport);
            }
        }
        let result = normalize_response(status, &String::from_utf8_lossy(&body));

        let level = match status {
            200..=399 => LogLevel::Info,
            400..=499 => LogLevel::Warn,
            _ => LogLevel::Error,
        };
        self.log(
            level,
            &format!(
                "{} {} status={status}",
                request.method.as_str(),
                request.path
            ),
        );
        result
    }

    fn log(&self, level: LogLevel, message: &str) {
        if let Some(root) = &self.log_root {
            append_console_log(root, level, "api.request", message);
        }
    }
}
