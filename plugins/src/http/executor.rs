use async_trait::async_trait;
use std::{error::Error as StdError, fmt};
use taskrelay_core::api as core_api;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpTransportErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Builder,
    Unknown,
}

impl HttpTransportErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Builder => "builder",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for HttpTransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct HttpTransportError {
    kind: HttpTransportErrorKind,
    method: &'static str,
    url: String,
    message: String,
    source: Option<anyhow::Error>,
}

impl HttpTransportError {
    pub fn kind(&self) -> HttpTransportErrorKind {
        self.kind
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn from_reqwest(err: reqwest::Error, method: &'static str, url: String) -> Self {
        let kind = if err.is_timeout() {
            HttpTransportErrorKind::Timeout
        } else if err.is_connect() {
            HttpTransportErrorKind::Connect
        } else if err.is_builder() {
            HttpTransportErrorKind::Builder
        } else if err.is_request() {
            HttpTransportErrorKind::Request
        } else if err.is_body() || err.is_decode() {
            HttpTransportErrorKind::Body
        } else {
            HttpTransportErrorKind::Unknown
        };
        let message = err.to_string();
        let out = HttpTransportError {
            kind,
            method,
            url,
            message,
            source: Some(anyhow::Error::new(err)),
        };
        tracing::warn!(
            target: "taskrelay.http",
            stage = "http.execute.error",
            kind = %out.kind(),
            method = method,
            url = %out.url()
        );
        out
    }
}

impl fmt::Display for HttpTransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "http transport error kind={} method={} url={}: {}",
            self.kind, self.method, self.url, self.message
        )
    }
}

impl StdError for HttpTransportError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}

/// Shared reqwest client behind [`core_api::HttpExecutor`].
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct ReqwestExecutor {
    http: reqwest::Client,
}

impl ReqwestExecutor {
    pub fn new(timeout_ms: u64) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self { http })
    }

    pub fn from_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl core_api::HttpExecutor for ReqwestExecutor {
    async fn execute(
        &self,
        request: core_api::HttpRequest,
    ) -> anyhow::Result<core_api::HttpResponse> {
        let method = request.method.as_str();
        let url = request.url;
        tracing::debug!(
            target: "taskrelay.http",
            stage = "http.execute.in",
            method = method,
            url = %url,
            body_len = request.body.as_ref().map(Vec::len).unwrap_or(0)
        );

        let mut req = match request.method {
            core_api::HttpMethod::Get => self.http.get(&url),
            core_api::HttpMethod::Post => self.http.post(&url),
        };
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }

        let resp = req
            .send()
            .await
            .map_err(|err| HttpTransportError::from_reqwest(err, method, url.clone()))?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|err| HttpTransportError::from_reqwest(err, method, url.clone()))?;

        tracing::debug!(
            target: "taskrelay.http",
            stage = "http.execute.out",
            status = status,
            body_len = body.len()
        );
        Ok(core_api::HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
