use async_trait::async_trait;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::TransportError;
use super::options::{DEFAULT_ENDPOINT, TransportOptions};

/// Media type of DoH JSON responses.
pub const DNS_JSON_CONTENT_TYPE: &str = "application/dns-json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DohRequest {
    pub url: String,
    pub accept: &'static str,
}

impl DohRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            accept: DNS_JSON_CONTENT_TYPE,
        }
    }
}

/// HTTP status plus the parsed JSON body. The body is `Value::Null` when the
/// status is not 200.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

impl TransportResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }
}

/// Network capability injected into the resolver.
#[async_trait]
pub trait DohTransport: Send + Sync {
    async fn get(&self, request: &DohRequest) -> Result<TransportResponse, TransportError>;

    /// Base URL the resolver builds its queries against.
    fn endpoint(&self) -> &str {
        DEFAULT_ENDPOINT
    }
}

/// Production transport backed by `reqwest`. Refuses hosts that are not on
/// the configured allow-list.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    options: TransportOptions,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::with_options(TransportOptions::default())
    }

    pub fn with_options(options: TransportOptions) -> Result<Self, TransportError> {
        // Redirect targets would bypass the allow-list; a 3xx surfaces as non-200.
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .redirect(reqwest::redirect::Policy::none());
        if let Some(timeout) = options.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(TransportError::client_init)?;
        Ok(Self { client, options })
    }

    pub fn options(&self) -> &TransportOptions {
        &self.options
    }

    fn check_allowed(&self, raw: &str) -> Result<url::Url, TransportError> {
        let url = url::Url::parse(raw).map_err(|err| TransportError::invalid_url(raw, err))?;
        let host = url.host_str().unwrap_or_default();
        if !self.options.is_host_allowed(host) {
            warn!(host, "refusing request to host outside the allow-list");
            return Err(TransportError::host_not_allowed(host));
        }
        Ok(url)
    }
}

#[async_trait]
impl DohTransport for HttpTransport {
    async fn get(&self, request: &DohRequest) -> Result<TransportResponse, TransportError> {
        let url = self.check_allowed(&request.url)?;
        debug!(url = %url, "sending DoH query");

        let response = self
            .client
            .get(url)
            .header(ACCEPT, request.accept)
            .header(USER_AGENT, self.options.user_agent.as_str())
            .send()
            .await
            .map_err(TransportError::request)?;

        let status = response.status().as_u16();
        if status != 200 {
            debug!(status, "DoH endpoint answered with non-200 status");
            return Ok(TransportResponse::new(status, Value::Null));
        }

        let body = response
            .json::<Value>()
            .await
            .map_err(TransportError::request)?;
        debug!(status, "DoH response received");
        Ok(TransportResponse::new(status, body))
    }

    fn endpoint(&self) -> &str {
        &self.options.endpoint
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::doh::{DnsQuery, FETCH_FAILURE, resolve};
    use crate::provider::{ClassificationMode, classify};

    #[tokio::test]
    async fn refuses_hosts_outside_allow_list() {
        let transport = HttpTransport::new().expect("client builds");
        let err = transport
            .get(&DohRequest::get("https://evil.example/dns-query?name=x&type=A"))
            .await
            .expect_err("host must be refused");
        match err {
            TransportError::HostNotAllowed { host } => assert_eq!(host, "evil.example"),
            other => panic!("expected HostNotAllowed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejects_unparseable_urls() {
        let transport = HttpTransport::new().expect("client builds");
        let err = transport
            .get(&DohRequest::get("not a url"))
            .await
            .expect_err("url must be rejected");
        assert!(matches!(err, TransportError::InvalidUrl { .. }));
    }

    #[test]
    fn endpoint_follows_options() {
        let options = TransportOptions::new().with_endpoint("https://dns.google/resolve");
        let transport = HttpTransport::with_options(options).expect("client builds");
        assert_eq!(transport.endpoint(), "https://dns.google/resolve");
    }

    async fn bind_local() -> (TcpListener, u16) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        (listener, port)
    }

    fn http_response(status_line: &str, headers: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status_line}\r\n{headers}content-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Serves a single connection with `response`; yields the lower-cased
    /// request head.
    async fn answer_once(listener: TcpListener, response: String) -> String {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut head = Vec::new();
        let mut buf = [0u8; 1024];
        while !head.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.expect("read request");
            if n == 0 {
                break;
            }
            head.extend_from_slice(&buf[..n]);
        }
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write response");
        let _ = socket.shutdown().await;
        String::from_utf8_lossy(&head).to_ascii_lowercase()
    }

    #[tokio::test]
    async fn sends_dns_json_accept_and_parses_body() {
        let (listener, port) = bind_local().await;
        let body = r#"{"Status":0,"Answer":[{"name":"google.es.","type":15,"data":"0 smtp.google.com"}]}"#;
        let server = tokio::spawn(answer_once(
            listener,
            http_response("200 OK", "content-type: application/dns-json\r\n", body),
        ));

        let options =
            TransportOptions::new().with_endpoint(format!("http://127.0.0.1:{port}/dns-query"));
        let transport = HttpTransport::with_options(options).expect("client builds");
        let query = DnsQuery::parse("MX", "google.es").expect("valid query");

        assert_eq!(resolve(&query, &transport).await, "0 smtp.google.com");

        let head = server.await.expect("server task");
        assert!(
            head.starts_with("get /dns-query?name=google.es&type=mx "),
            "{head}"
        );
        assert!(head.contains("accept: application/dns-json"), "{head}");
    }

    #[tokio::test]
    async fn redirects_are_not_followed() {
        let (endpoint, endpoint_port) = bind_local().await;
        let (off_list, off_list_port) = bind_local().await;

        let options = TransportOptions::new()
            .with_endpoint(format!("http://127.0.0.1:{endpoint_port}/dns-query"));
        assert!(!options.is_host_allowed("localhost"));

        let location = format!("location: http://localhost:{off_list_port}/x\r\n");
        let server = tokio::spawn(answer_once(
            endpoint,
            http_response("302 Found", &location, ""),
        ));

        let transport = HttpTransport::with_options(options).expect("client builds");
        let classification = classify("x@gedu.es", ClassificationMode::Workspace, &transport)
            .await
            .expect("valid input");
        assert_eq!(classification.mx, FETCH_FAILURE);
        assert!(!classification.is_provider());
        server.await.expect("server task");

        let followed = tokio::time::timeout(Duration::from_millis(200), off_list.accept()).await;
        assert!(followed.is_err(), "redirect target was contacted");
    }
}
