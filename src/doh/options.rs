use std::time::Duration;

/// Public DoH JSON endpoint queried by default.
pub const DEFAULT_ENDPOINT: &str = "https://cloudflare-dns.com/dns-query";

/// Configuration knobs for [`HttpTransport`](super::HttpTransport).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    pub endpoint: String,
    pub allowed_hosts: Vec<String>,
    pub timeout_ms: u64,
    pub user_agent: String,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            allowed_hosts: vec!["cloudflare-dns.com".to_string()],
            timeout_ms: 10_000,
            user_agent: concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl TransportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Points the transport at another endpoint and allows its host.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        if let Some(host) = host_of(&self.endpoint) {
            self = self.with_allowed_host(host);
        }
        self
    }

    pub fn with_allowed_host(mut self, host: impl Into<String>) -> Self {
        let host = host.into().trim().trim_end_matches('.').to_ascii_lowercase();
        if !host.is_empty() && !self.allowed_hosts.contains(&host) {
            self.allowed_hosts.push(host);
        }
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// A zero timeout disables the request deadline.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }

    pub fn is_host_allowed(&self, host: &str) -> bool {
        let host = host.trim_end_matches('.');
        self.allowed_hosts
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(host))
    }
}

fn host_of(endpoint: &str) -> Option<String> {
    url::Url::parse(endpoint)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_allows_only_cloudflare() {
        let options = TransportOptions::default();
        assert!(options.is_host_allowed("cloudflare-dns.com"));
        assert!(options.is_host_allowed("Cloudflare-DNS.com."));
        assert!(!options.is_host_allowed("dns.google"));
    }

    #[test]
    fn with_endpoint_allows_its_host() {
        let options = TransportOptions::new().with_endpoint("https://dns.google/resolve");
        assert_eq!(options.endpoint, "https://dns.google/resolve");
        assert!(options.is_host_allowed("dns.google"));
        assert!(options.is_host_allowed("cloudflare-dns.com"));
    }

    #[test]
    fn zero_timeout_disables_deadline() {
        assert!(TransportOptions::new().with_timeout_ms(0).timeout().is_none());
        assert_eq!(
            TransportOptions::new().with_timeout_ms(250).timeout(),
            Some(Duration::from_millis(250))
        );
    }
}
