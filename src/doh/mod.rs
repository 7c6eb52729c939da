//! DNS-over-HTTPS lookups against a JSON endpoint.
//!
//! [`resolve`] never fails: transport problems and upstream error codes are
//! folded into the returned string so that hosts can display the result
//! inline. [`lookup`] exposes the same request with a typed error.

mod error;
mod options;
pub mod status;
mod transport;
mod types;

pub use error::{InputError, LookupError, TransportError};
pub use options::{DEFAULT_ENDPOINT, TransportOptions};
pub use status::ErrorEntry;
pub use transport::{
    DNS_JSON_CONTENT_TYPE, DohRequest, DohTransport, HttpTransport, TransportResponse,
};
pub use types::{DnsAnswer, DnsQuery, Domain, RecordType};

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use tracing::debug;

use types::DohBody;

/// Returned for every failure that is not an upstream status code.
pub const FETCH_FAILURE: &str = "Could not fetch result!";

// Same unreserved set as JavaScript's encodeURIComponent.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Validates `record_type`/`domain` and resolves them.
///
/// Input errors are returned before any request is made; every other outcome
/// is a string.
pub async fn dns_record<T>(
    record_type: &str,
    domain: &str,
    transport: &T,
) -> Result<String, InputError>
where
    T: DohTransport + ?Sized,
{
    let query = DnsQuery::parse(record_type, domain)?;
    Ok(resolve(&query, transport).await)
}

/// Resolves `query` and renders the outcome: the comma-joined answer on
/// success, `"Error: <description>"` for a non-zero status, or
/// [`FETCH_FAILURE`].
pub async fn resolve<T>(query: &DnsQuery, transport: &T) -> String
where
    T: DohTransport + ?Sized,
{
    render(lookup(query, transport).await)
}

pub async fn lookup<T>(query: &DnsQuery, transport: &T) -> Result<DnsAnswer, LookupError>
where
    T: DohTransport + ?Sized,
{
    let request = DohRequest::get(build_url(transport.endpoint(), query));
    debug!(
        domain = %query.domain,
        record_type = %query.record_type,
        "resolving"
    );

    let response = transport
        .get(&request)
        .await
        .map_err(LookupError::transport)?;
    if response.status != 200 {
        return Err(LookupError::HttpStatus {
            status: response.status,
        });
    }

    let body: DohBody = serde_json::from_value(response.body).map_err(LookupError::body)?;
    if body.status != 0 {
        return Err(LookupError::Status { code: body.status });
    }

    let records = body
        .answer
        .unwrap_or_default()
        .into_iter()
        .map(|record| record.data)
        .collect();
    Ok(DnsAnswer::new(records))
}

/// Folds a lookup outcome into the string channel.
pub fn render(outcome: Result<DnsAnswer, LookupError>) -> String {
    match outcome {
        Ok(answer) => answer.joined(),
        Err(LookupError::Status { code }) => {
            debug!(status = code, "upstream reported an error status");
            status::failure_message(code)
        }
        Err(err) => {
            debug!(error = %err, "lookup failed");
            FETCH_FAILURE.to_string()
        }
    }
}

/// Appends `name`/`type` to the endpoint, after any query it already carries.
pub(crate) fn build_url(endpoint: &str, query: &DnsQuery) -> String {
    let params = format!(
        "name={}&type={}",
        utf8_percent_encode(query.domain.as_str(), URI_COMPONENT),
        utf8_percent_encode(query.record_type.as_str(), URI_COMPONENT),
    );
    match url::Url::parse(endpoint) {
        Ok(mut url) => {
            let full = match url.query() {
                Some(existing) if !existing.is_empty() => format!("{existing}&{params}"),
                _ => params,
            };
            url.set_query(Some(&full));
            url.into()
        }
        // left for the transport to reject
        Err(_) => format!("{endpoint}?{params}"),
    }
}
