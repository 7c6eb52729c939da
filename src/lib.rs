#![forbid(unsafe_code)]
//! dohcheck_lib — DNS-over-HTTPS lookups and Google mail detection

pub mod doh;
pub use doh::{
    DnsAnswer, DnsQuery, DohTransport, Domain, FETCH_FAILURE, HttpTransport, InputError,
    LookupError, RecordType, TransportError, TransportOptions, dns_record, lookup, resolve,
};

pub mod provider;
pub use provider::{
    Classification, ClassificationMode, classify, is_google_email, is_provider_mail, mail_domain,
};
