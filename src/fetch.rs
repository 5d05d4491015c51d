//! Purpose: Issue blocking HTTP GET/HEAD requests and enforce the accepted-status policy.
//! Exports: `Fetcher`, `FetcherBuilder`, `DEFAULT_ACCEPTED_STATUSES`, `get`, `get_stream`, `head`.
//! Role: Thin layer over a `ureq::Agent`; no retries, no process-wide state.
//! Invariants: The same accepted-status set applies to GET, streaming GET and HEAD.
//! Invariants: Unaccepted GET responses return their buffered body inside the error.
//! Invariants: Every response body is released exactly once, on every exit path.
#![allow(clippy::result_large_err)]

use crate::body::{Body, BodyReader, Headers};
use crate::error::{Error, ErrorKind, Result};
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// 200 OK and 206 Partial Content.
pub const DEFAULT_ACCEPTED_STATUSES: [u16; 2] = [200, 206];

#[derive(Clone)]
pub struct Fetcher {
    inner: Arc<FetcherInner>,
}

struct FetcherInner {
    agent: ureq::Agent,
    accepted: Vec<u16>,
}

#[derive(Clone, Debug)]
pub struct FetcherBuilder {
    timeout: Option<Duration>,
    redirects: Option<u32>,
    accepted: Vec<u16>,
}

impl Default for FetcherBuilder {
    fn default() -> Self {
        Self {
            timeout: None,
            redirects: None,
            accepted: DEFAULT_ACCEPTED_STATUSES.to_vec(),
        }
    }
}

impl FetcherBuilder {
    /// Overall per-request timeout enforced by the transport.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn redirects(mut self, redirects: u32) -> Self {
        self.redirects = Some(redirects);
        self
    }

    pub fn accept_status(mut self, status: u16) -> Self {
        if !self.accepted.contains(&status) {
            self.accepted.push(status);
        }
        self
    }

    /// Replaces the accepted-status set.
    pub fn accepted_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.accepted.clear();
        for status in statuses {
            self = self.accept_status(status);
        }
        self
    }

    pub fn build(self) -> Fetcher {
        let mut agent = ureq::AgentBuilder::new();
        if let Some(timeout) = self.timeout {
            agent = agent.timeout(timeout);
        }
        if let Some(redirects) = self.redirects {
            agent = agent.redirects(redirects);
        }
        Fetcher {
            inner: Arc::new(FetcherInner {
                agent: agent.build(),
                accepted: self.accepted,
            }),
        }
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetcher")
            .field("accepted", &self.inner.accepted)
            .finish_non_exhaustive()
    }
}

impl Fetcher {
    pub fn new() -> Self {
        FetcherBuilder::default().build()
    }

    pub fn builder() -> FetcherBuilder {
        FetcherBuilder::default()
    }

    pub fn accepts(&self, status: u16) -> bool {
        self.inner.accepted.contains(&status)
    }

    /// GET with the body fully buffered; the connection is released before returning.
    pub fn get(&self, url: &str) -> Result<Body> {
        let (url, response) = self.send("GET", url)?;
        let status = response.status();
        let status_text = response.status_text().to_string();
        let body = read_body(response, &url)?;
        if !self.accepts(status) {
            return Err(unsuccessful(status, &status_text, &url).with_body(body.into_bytes()));
        }
        Ok(body)
    }

    /// GET with the body handed back as a stream the caller closes (or drops).
    pub fn get_stream(&self, url: &str) -> Result<BodyReader> {
        let (url, response) = self.send("GET", url)?;
        let status = response.status();
        if !self.accepts(status) {
            let status_text = response.status_text().to_string();
            let body = read_body(response, &url)?;
            return Err(unsuccessful(status, &status_text, &url).with_body(body.into_bytes()));
        }
        Ok(BodyReader::new(response.into_reader()))
    }

    pub fn head(&self, url: &str) -> Result<Headers> {
        let (url, response) = self.send("HEAD", url)?;
        let status = response.status();
        if !self.accepts(status) {
            return Err(unsuccessful(status, response.status_text(), &url));
        }
        let mut headers = Headers::new();
        for name in response.headers_names() {
            if headers.contains(&name) {
                continue;
            }
            for value in response.all(&name) {
                headers.append(&name, value);
            }
        }
        Ok(headers)
    }

    fn send(&self, method: &str, raw: &str) -> Result<(Url, ureq::Response)> {
        let url = parse_url(raw)?;
        tracing::debug!(method, url = %url, "http request");
        let response = match self.inner.agent.request_url(method, &url).call() {
            Ok(response) => response,
            // status policy is applied by the caller, not by ureq's 4xx/5xx split
            Err(ureq::Error::Status(_, response)) => response,
            Err(ureq::Error::Transport(err)) => {
                tracing::debug!(method, url = %url, error = %err, "http transport error");
                return Err(Error::new(ErrorKind::Transport)
                    .with_message(format!("response error: {err}"))
                    .with_url(url.as_str())
                    .with_source(err));
            }
        };
        tracing::debug!(method, url = %url, status = response.status(), "http response");
        Ok((url, response))
    }
}

/// GET `url` with a default `Fetcher`.
pub fn get(url: &str) -> Result<Body> {
    Fetcher::new().get(url)
}

pub fn get_stream(url: &str) -> Result<BodyReader> {
    Fetcher::new().get_stream(url)
}

pub fn head(url: &str) -> Result<Headers> {
    Fetcher::new().head(url)
}

fn parse_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).map_err(|err| {
        Error::new(ErrorKind::Transport)
            .with_message(format!("invalid url: {err}"))
            .with_url(raw)
            .with_source(err)
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(Error::new(ErrorKind::Transport)
            .with_message(format!("unsupported url scheme: {scheme}"))
            .with_url(raw)),
    }
}

fn read_body(response: ureq::Response, url: &Url) -> Result<Body> {
    let mut out = Vec::new();
    response.into_reader().read_to_end(&mut out).map_err(|err| {
        Error::new(ErrorKind::Read)
            .with_message(format!("error reading body: {err}"))
            .with_url(url.as_str())
            .with_source(err)
    })?;
    Ok(Body::new(out))
}

fn unsuccessful(status: u16, status_text: &str, url: &Url) -> Error {
    Error::new(ErrorKind::Status)
        .with_message(format!("request unsuccessful: {status} {status_text}"))
        .with_url(url.as_str())
        .with_status(status)
}
