use clap::{Parser, Subcommand};
use dohcheck_lib::TransportOptions;

#[derive(Parser)]
#[command(name = "dohcheck-cli")]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,

    /// format: human|json|ndjson|csv
    #[arg(long, global = true, default_value = "human")]
    pub format: String,

    /// write report to file (JSON/NDJSON/CSV selon --format)
    #[arg(long, global = true)]
    pub out: Option<String>,

    /// endpoint DoH JSON (par défaut cloudflare-dns.com)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// timeout des requêtes HTTP (ms, 0 = aucun)
    #[arg(long = "timeout", global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// logs détaillés sur stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// interroge un enregistrement DNS
    Record {
        /// type: A|AAAA|CAA|CNAME|DS|DNSKEY|MX|NS|NSEC|NSEC3|RRSIG|SOA|TXT
        record_type: String,
        /// domaines à interroger
        domains: Vec<String>,
        /// lit des domaines depuis stdin (un par ligne)
        #[arg(long)]
        stdin: bool,
    },
    /// teste si une adresse (ou un domaine) est servie par Google
    #[command(name = "is-google")]
    IsGoogle {
        /// adresses e-mail ou domaines
        emails: Vec<String>,
        /// type: gmail|workspace|google (google si absent ou inconnu)
        #[arg(long = "type")]
        kind: Option<String>,
        /// lit des adresses depuis stdin (une par ligne)
        #[arg(long)]
        stdin: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn transport_options(&self) -> TransportOptions {
        let options = TransportOptions::new().with_timeout_ms(self.timeout_ms);
        match self.endpoint.as_deref() {
            Some(endpoint) => options.with_endpoint(endpoint),
            None => options,
        }
    }
}
