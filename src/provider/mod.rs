//! Detection of Google-hosted mail domains from their MX records.

mod mode;

pub use mode::{ClassificationMode, GMAIL_MX_HOSTS, UnknownMode, WORKSPACE_MX_HOSTS};

use serde::Serialize;
use tracing::debug;

use crate::doh::{self, DnsQuery, DohTransport, Domain, InputError, RecordType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub domain: Domain,
    pub mode: ClassificationMode,
    /// Rendered MX lookup, or the failure string the resolver produced.
    pub mx: String,
    pub matched: Option<&'static str>,
}

impl Classification {
    pub fn is_provider(&self) -> bool {
        self.matched.is_some()
    }
}

/// `true` when the MX records of the address' domain point at a Google mail
/// host. `kind` is one of `gmail`, `workspace` or `google` (the default, also
/// used for unknown values).
pub async fn is_google_email<T>(
    email: &str,
    kind: Option<&str>,
    transport: &T,
) -> Result<bool, InputError>
where
    T: DohTransport + ?Sized,
{
    is_provider_mail(email, ClassificationMode::from_tag(kind), transport).await
}

pub async fn is_provider_mail<T>(
    email_or_domain: &str,
    mode: ClassificationMode,
    transport: &T,
) -> Result<bool, InputError>
where
    T: DohTransport + ?Sized,
{
    classify(email_or_domain, mode, transport)
        .await
        .map(|c| c.is_provider())
}

pub async fn classify<T>(
    email_or_domain: &str,
    mode: ClassificationMode,
    transport: &T,
) -> Result<Classification, InputError>
where
    T: DohTransport + ?Sized,
{
    let domain = mail_domain(email_or_domain)?;
    let query = DnsQuery::new(RecordType::Mx, domain.clone());
    let mx = doh::resolve(&query, transport).await;
    let matched = matching_host(&mx, mode);
    debug!(domain = %domain, mode = %mode, matched = ?matched, "classified mail domain");

    Ok(Classification {
        domain,
        mode,
        mx,
        matched,
    })
}

/// Domain part of an address: the text after the last `@`, or the whole
/// input when there is none.
pub fn mail_domain(email_or_domain: &str) -> Result<Domain, InputError> {
    let normalized = email_or_domain.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(InputError::EmptyEmail);
    }
    match normalized.rsplit_once('@') {
        Some((_, domain)) => Domain::parse(domain),
        None => Domain::parse(&normalized),
    }
}

/// First provider host of `mode` found anywhere in `mx_answer`.
///
/// This is substring containment on the joined answer, not a comparison of
/// exchange names: `aspmx.l.google.com.evil.example` matches too.
pub fn matching_host(mx_answer: &str, mode: ClassificationMode) -> Option<&'static str> {
    mode.hosts()
        .into_iter()
        .find(|host| mx_answer.contains(host))
}
