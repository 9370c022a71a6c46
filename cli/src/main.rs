use anyhow::Context;
use clap::{Parser, Subcommand};
use complyscope_audit::{render_text, Checklist};
use complyscope_collector::{Auditor, BatchAuditor, BatchEntry};
use complyscope_core::{AppConfig, Regulation, TargetUrl};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(
    name = "complyscope",
    version,
    about = "Audit a website's privacy posture against DPDP or GDPR"
)]
struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    json: bool,
    #[arg(long, global = true, help = "Config file (defaults to the user config dir)")]
    config: Option<PathBuf>,
    #[arg(long, global = true, help = "Regulation to audit against (dpdp or gdpr)")]
    regulation: Option<Regulation>,
    #[arg(long, global = true, help = "Custom checklist TOML file")]
    checklist: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Audit one website
    Audit {
        url: String,
        #[arg(long, help = "Privacy policy URL, skipping link discovery")]
        policy_url: Option<String>,
    },
    /// Audit several websites concurrently
    Batch {
        #[arg(required = true)]
        urls: Vec<String>,
        #[arg(long, help = "Maximum audits in flight")]
        concurrency: Option<usize>,
    },
    /// Print a built-in checklist as TOML
    Checklist,
}

fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,complyscope=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    resolve_config(cli, |key| std::env::var(key).ok())
}

/// File (explicit or default), then `COMPLYSCOPE_*` variables, then flags.
fn resolve_config<F>(cli: &Cli, lookup: F) -> anyhow::Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => AppConfig::load().context("failed to load config")?,
    };
    config.apply_env_overrides(lookup);

    // An explicit regulation selects the built-in checklist.
    if let Some(regulation) = cli.regulation {
        config.audit.regulation = regulation;
        config.audit.checklist_path = None;
    }
    if let Some(path) = &cli.checklist {
        config.audit.checklist_path = Some(path.clone());
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    if let Commands::Checklist = cli.command {
        let regulation = cli.regulation.unwrap_or_default();
        print!("{}", Checklist::for_regulation(regulation).to_toml_string()?);
        return Ok(());
    }

    let config = load_config(&cli)?;
    let auditor = Auditor::from_config(&config)
        .await
        .context("failed to start the browser")?;

    match cli.command {
        Commands::Audit { url, policy_url } => {
            let target = TargetUrl::parse(&url)?;
            info!(target = %target, regulation = %config.audit.regulation, "auditing");
            let report = match auditor
                .audit_with_policy(&target, policy_url.as_deref())
                .await
            {
                Ok(report) => report,
                Err(e) => {
                    error!(target = %target, error = %e, "audit failed");
                    return Err(e.into());
                }
            };
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{}", render_text(&report));
            }
        }
        Commands::Batch { urls, concurrency } => {
            let batch = BatchAuditor::new(auditor).with_max_concurrent_audits(
                concurrency.unwrap_or(config.batch.concurrent_audits),
            );
            info!(targets = urls.len(), "starting batch audit");
            let entries = batch.run(urls).await;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                print_batch_table(&entries);
            }
        }
        Commands::Checklist => {}
    }

    Ok(())
}

fn print_batch_table(entries: &[BatchEntry]) {
    println!("TARGET\tLEVEL\tVIOLATIONS\tRISKS\tPASSED");
    for entry in entries {
        match (entry.summary(), &entry.error) {
            (Some(s), _) => println!(
                "{}\t{}\t{}\t{}\t{}",
                entry.target, s.compliance_level, s.violations, s.risks, s.passed
            ),
            (None, Some(e)) => println!("{}\tERROR\t{e}", entry.target),
            (None, None) => println!("{}\tERROR", entry.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_file(contents: &str) -> (TempDir, PathBuf) {
        let tmp = TempDir::new().expect("create temp dir");
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, contents).expect("write config");
        (tmp, path)
    }

    #[test]
    fn test_env_overrides_apply_to_explicit_config() {
        let (_tmp, path) = config_file("[batch]\nconcurrent_audits = 5\n");
        let cli = Cli::try_parse_from([
            "complyscope",
            "--config",
            path.to_str().expect("utf-8 path"),
            "checklist",
        ])
        .expect("parse args");

        let config = resolve_config(&cli, |key| match key {
            "COMPLYSCOPE_REGULATION" => Some("gdpr".to_string()),
            "COMPLYSCOPE_CONCURRENT_AUDITS" => Some("7".to_string()),
            _ => None,
        })
        .expect("resolve config");

        assert_eq!(config.audit.regulation, Regulation::Gdpr);
        assert_eq!(config.batch.concurrent_audits, 7);
    }

    #[test]
    fn test_flags_win_over_env() {
        let (_tmp, path) = config_file("");
        let cli = Cli::try_parse_from([
            "complyscope",
            "--config",
            path.to_str().expect("utf-8 path"),
            "--regulation",
            "dpdp",
            "checklist",
        ])
        .expect("parse args");

        let config = resolve_config(&cli, |key| {
            (key == "COMPLYSCOPE_REGULATION").then(|| "gdpr".to_string())
        })
        .expect("resolve config");
        assert_eq!(config.audit.regulation, Regulation::Dpdp);
    }
}
