use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;

use urlrisk::audit::{DecisionLogger, JsonLinesDecisionLogger, TracingDecisionLogger};
use urlrisk::{config, logging, RiskPipeline, SnapshotStore, UrlRiskConfig};

#[derive(Parser, Debug)]
#[command(name = "urlrisk", version, about = "Classify URLs as safe or phishing", long_about = None)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Classify one or more URLs
    Check {
        #[arg(required = true)]
        urls: Vec<String>,

        /// Output JSON
        #[arg(short, long)]
        json: bool,
    },
    /// Show the feature vector and heuristic score of a URL
    Features {
        url: String,

        /// Output JSON
        #[arg(short, long)]
        json: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    match &cli.log_file {
        Some(path) => {
            if let Err(err) = logging::init_logging(path) {
                logging::init_logging_stderr();
                tracing::warn!("file logging unavailable, using stderr: {:#}", err);
            }
        }
        None => logging::init_logging_stderr(),
    }

    let cfg = match &cli.config {
        Some(path) => config::load(path)?,
        None => UrlRiskConfig::default(),
    };

    let snapshots = cfg.build_snapshots().context("loading snapshots")?;
    let store = Arc::new(SnapshotStore::new(snapshots));
    let logger: Arc<dyn DecisionLogger> = match cfg.audit_path() {
        Some(path) => Arc::new(JsonLinesDecisionLogger::open(&path)?),
        None => Arc::new(TracingDecisionLogger),
    };
    let pipeline =
        RiskPipeline::from_config(&cfg, Arc::new(cfg.model.clone()), store).with_logger(logger);

    match cli.command {
        Command::Check { urls, json } => check(&pipeline, &urls, json),
        Command::Features { url, json } => features(&pipeline, &url, json),
    }
}

fn check(pipeline: &RiskPipeline, urls: &[String], as_json: bool) -> Result<ExitCode> {
    let mut rejected = false;

    for url in urls {
        match pipeline.classify_and_log(url) {
            Ok(decision) => {
                if as_json {
                    let out = json!({
                        "ok": true,
                        "url": url,
                        "verdict": decision.verdict,
                        "reason": decision.reason,
                        "score": decision.rounded_score(),
                        "features": decision.features,
                        "message": decision.message(),
                    });
                    println!("{}", out);
                } else {
                    println!(
                        "{}  {} ({}, score {:.4}) - {}",
                        url,
                        decision.verdict,
                        decision.reason,
                        decision.rounded_score(),
                        decision.message()
                    );
                }
            }
            Err(err) if err.is_invalid_input() => {
                rejected = true;
                if as_json {
                    println!("{}", json!({ "ok": false, "url": url, "message": err.to_string() }));
                } else {
                    println!("{}  rejected: {}", url, err);
                }
            }
            Err(err) => return Err(err).with_context(|| format!("classifying {}", url)),
        }
    }

    Ok(if rejected {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}

fn features(pipeline: &RiskPipeline, url: &str, as_json: bool) -> Result<ExitCode> {
    let assessment = match pipeline.assess(url) {
        Ok(assessment) => assessment,
        Err(err) if err.is_invalid_input() => {
            println!("{}  rejected: {}", url, err);
            return Ok(ExitCode::from(2));
        }
        Err(err) => return Err(err.into()),
    };

    if as_json {
        let out = json!({
            "url": assessment.url.as_str(),
            "domain": assessment.parts,
            "features": assessment.features,
            "heuristic": (assessment.heuristic * 10_000.0).round() / 10_000.0,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("url:        {}", assessment.url);
    println!("subdomains: {}", assessment.parts.subdomains.join("."));
    println!("domain:     {}", assessment.parts.registrable);
    println!("suffix:     {}", assessment.parts.suffix);
    for (name, value) in assessment.features.named() {
        println!("{:<15} {}", name, value);
    }
    println!("heuristic:  {:.4}", assessment.heuristic);
    Ok(ExitCode::SUCCESS)
}
