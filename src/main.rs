//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `domain_trace` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - User-facing output formatting
//!
//! All core functionality is implemented in the library crate.

use std::process;

use anyhow::{Context, Result};
use clap::Parser;

use domain_trace::initialization::init_logger_with;
use domain_trace::{run_enrichment, Config, Opt, RootEntry, RunReport};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let config = Config::from(Opt::parse());

    init_logger_with(config.log_level.clone().into(), config.log_format.clone())
        .context("Failed to initialize logger")?;

    let json = config.json;
    match run_enrichment(config).await {
        Ok(report) => {
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report).context("Failed to serialize report")?
                );
            } else {
                print_report(&report);
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("domain_trace error: {:#}", e);
            process::exit(1);
        }
    }
}

fn print_report(report: &RunReport) {
    for entry in &report.entries {
        print_entry(entry);
    }
    println!(
        "{} root{}{}",
        report.entries.len(),
        if report.entries.len() == 1 { "" } else { "s" },
        if report.cancelled { " (interrupted)" } else { "" }
    );
}

fn print_entry(entry: &RootEntry) {
    println!("{}", entry.root());
    for original in &entry.originals {
        println!("    seen as  {original}");
    }
    match (&entry.ip, &entry.ip_error) {
        (Some(ip), _) => println!("    ip       {ip}"),
        (None, Some(e)) => println!("    ip       ({e})"),
        (None, None) => {}
    }
    if let Some(redirect) = &entry.redirect {
        println!("    redirect {}", redirect.chain.join(" -> "));
        if let Some(ip) = redirect.final_ip {
            println!("    final ip {ip}");
        }
    }
    if let Some(crawl) = &entry.crawl {
        match &crawl.error {
            Some(e) => println!("    crawl    {} ({e})", crawl.crawled_url),
            None => {
                println!(
                    "    crawl    {} ({} third part{})",
                    crawl.crawled_url,
                    crawl.third_parties.len(),
                    if crawl.third_parties.len() == 1 { "y" } else { "ies" }
                );
                for third_party in &crawl.third_parties {
                    match third_party.ip {
                        Some(ip) => println!("        {} {ip}", third_party.root()),
                        None => println!("        {}", third_party.root()),
                    }
                }
            }
        }
    }
}
