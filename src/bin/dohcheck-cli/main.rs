mod args;
mod output;

use anyhow::{Context, Result, bail};
use dohcheck_lib::{ClassificationMode, DnsQuery, HttpTransport, classify, doh, mail_domain};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use std::io::{self, BufRead};

use args::{Cli, Commands};
use output::{EmailRow, OutputRow, RecordRow};

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn collect_inputs(args: &[String], stdin: bool) -> Result<Vec<String>> {
    let mut inputs = args.to_vec();
    if stdin {
        for line in io::stdin().lock().lines() {
            let line = line.context("read stdin")?;
            if !line.trim().is_empty() {
                inputs.push(line);
            }
        }
    }
    if inputs.is_empty() {
        bail!("no input given (pass values or use --stdin)");
    }
    Ok(inputs)
}

/// Validates every domain before the first lookup, so a bad line does not
/// discard results already fetched.
fn parse_queries(record_type: &str, domains: &[String]) -> Result<Vec<DnsQuery>> {
    domains
        .iter()
        .map(|domain| {
            DnsQuery::parse(record_type, domain)
                .with_context(|| format!("invalid query '{record_type} {domain}'"))
        })
        .collect()
}

fn check_addresses(emails: &[String]) -> Result<()> {
    for email in emails {
        mail_domain(email).with_context(|| format!("invalid address '{email}'"))?;
    }
    Ok(())
}

async fn run(cli: &Cli, transport: &HttpTransport) -> Result<Vec<OutputRow>> {
    let mut rows = Vec::new();
    match &cli.cmd {
        Commands::Record {
            record_type,
            domains,
            stdin,
        } => {
            let queries = parse_queries(record_type, &collect_inputs(domains, *stdin)?)?;
            for query in queries {
                let outcome = doh::lookup(&query, transport).await;
                let failed = outcome.is_err();
                rows.push(OutputRow::Record(RecordRow::new(
                    &query,
                    doh::render(outcome),
                    failed,
                )));
            }
        }
        Commands::IsGoogle {
            emails,
            kind,
            stdin,
        } => {
            let mode = ClassificationMode::from_tag(kind.as_deref());
            let emails = collect_inputs(emails, *stdin)?;
            check_addresses(&emails)?;
            for email in emails {
                let classification = classify(&email, mode, transport)
                    .await
                    .with_context(|| format!("invalid address '{email}'"))?;
                rows.push(OutputRow::Email(EmailRow::new(email.trim(), classification)));
            }
        }
    }
    Ok(rows)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let transport =
        HttpTransport::with_options(cli.transport_options()).context("build HTTP transport")?;
    let rows = run(&cli, &transport).await?;

    output::write_reports(&rows, &cli)?;

    // codes de sortie : 0 OK, 2 lookup en échec, 1 fatal
    if output::any_failed(&rows) {
        std::process::exit(2);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn batch_with_bad_domain_is_rejected_up_front() {
        let err = parse_queries("A", &inputs(&["uji.es", "  ", "google.es"]))
            .expect_err("empty domain in the middle");
        assert!(err.to_string().contains("invalid query"), "{err:#}");
    }

    #[test]
    fn batch_with_unknown_type_is_rejected() {
        assert!(parse_queries("PTR", &inputs(&["uji.es"])).is_err());
    }

    #[test]
    fn valid_batch_keeps_order() {
        let queries = parse_queries("mx", &inputs(&["Google.ES", "uji.es"])).expect("valid batch");
        let domains: Vec<_> = queries.iter().map(|q| q.domain.as_str()).collect();
        assert_eq!(domains, ["google.es", "uji.es"]);
    }

    #[test]
    fn addresses_are_checked_before_lookup() {
        assert!(check_addresses(&inputs(&["a@gmail.com", "plain.org"])).is_ok());
        assert!(check_addresses(&inputs(&["a@gmail.com", "broken@"])).is_err());
    }
}
