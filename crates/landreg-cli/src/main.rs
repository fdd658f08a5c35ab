// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// landreg-verify — checks one or more uploaded images against a declared
// document type and reports the plausibility score of each.
//
// Entry point. Initialises logging, loads the classifier configuration, and
// runs the verifier over every image given on the command line.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use landreg_core::{
    ClassifierConfig, DocumentType, UploadStatus, VerificationRecord, VerificationResult,
};
use landreg_document::DocumentVerifier;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Exit code when `--strict` is set and at least one image was rejected.
const EXIT_REJECTED: u8 = 2;

#[derive(Parser, Debug)]
#[command(
    name = "landreg-verify",
    version,
    about = "Check whether images look like the land-registration document they claim to be"
)]
struct Cli {
    /// Declared document type, e.g. titleDeed, idProof, landPhoto.
    #[arg(short = 't', long = "type", env = "LANDREG_DOCUMENT_TYPE")]
    document_type: String,

    /// JSON file overriding classifier thresholds and weights.
    #[arg(long, env = "LANDREG_CONFIG")]
    config: Option<PathBuf>,

    /// Output machine-readable JSON.
    #[arg(long)]
    json: bool,

    /// Exit with status 2 if any image is rejected.
    #[arg(long)]
    strict: bool,

    /// Images to check.
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

/// What the run found, mapped to the process exit status by `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Completed,
    /// `--strict` was given and this many images were rejected.
    Rejected(usize),
}

/// One line of JSON output.
#[derive(Debug, Serialize)]
struct Report<'a> {
    image: &'a Path,
    #[serde(flatten)]
    record: VerificationRecord,
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run(Cli::parse()).await {
        Ok(Outcome::Completed) => ExitCode::SUCCESS,
        Ok(Outcome::Rejected(_)) => ExitCode::from(EXIT_REJECTED),
        Err(error) => {
            tracing::error!(error = %error, "landreg-verify failed");
            eprintln!("Error: {error:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let config = match &cli.config {
        Some(path) => ClassifierConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => ClassifierConfig::default(),
    };
    let verifier = DocumentVerifier::new(config).context("invalid classifier configuration")?;
    let document_type = DocumentType::from(cli.document_type.as_str());

    tracing::info!(
        document_type = %document_type,
        category = ?document_type.category(),
        images = cli.images.len(),
        "Verifying uploads"
    );

    let mut rejected = 0usize;
    for image in &cli.images {
        let result = verifier
            .verify_async(image.clone(), document_type.clone())
            .await;
        if !result.is_document {
            rejected += 1;
        }

        if cli.json {
            let report = Report {
                image,
                record: VerificationRecord::new(document_type.clone(), result),
            };
            println!("{}", serde_json::to_string(&report)?);
        } else {
            print_human(image, &result);
        }
    }

    if cli.strict && rejected > 0 {
        tracing::warn!(rejected, "Some uploads were rejected");
        return Ok(Outcome::Rejected(rejected));
    }
    Ok(Outcome::Completed)
}

fn print_human(image: &Path, result: &VerificationResult) {
    let status = match UploadStatus::from_result(result) {
        UploadStatus::Verified => "ACCEPT",
        _ => "REJECT",
    };
    let detail = result
        .metadata
        .as_ref()
        .map(|meta| {
            format!(
                " {} {:.0}KB {}",
                meta.resolution, meta.file_size_kb, meta.image_classification
            )
        })
        .unwrap_or_default();
    println!("{status} {:.2} {}{detail}", result.confidence, image.display());
    for warning in &result.warnings {
        println!("    - {warning}");
    }
}
