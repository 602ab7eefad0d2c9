//! Voucher splitting CLI.
//!
//! This binary provides a command-line interface for the vouchsplit library:
//! it reads a CSV roster and a voucher PDF, runs the batch, and writes the
//! resulting ZIP archive. An `extract` subcommand dumps the indexed page
//! text for debugging.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use vouchsplit::{archive, BatchConfig, BatchProcessor, DocumentIndex, ProtectionConfig};

/// Environment variable consulted when --owner-password is not given.
const OWNER_PASSWORD_ENV: &str = "VOUCHSPLIT_OWNER_PASSWORD";

/// Voucher Splitting Tool
///
/// Redacts and splits a voucher PDF per roster record: matched pages are
/// highlighted, everything else is blacked out, and each employee gets a
/// PDF with only their pages, bundled into one ZIP with a summary ledger.
#[derive(Parser)]
#[command(name = "vouchsplit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Roster CSV with NOME and MATRICULA columns
    #[arg(short, long, value_name = "FILE")]
    roster: Option<PathBuf>,

    /// Source voucher PDF
    #[arg(short, long, value_name = "FILE")]
    document: Option<PathBuf>,

    /// Output ZIP archive path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Owner password for AES-256 output encryption (falls back to
    /// VOUCHSPLIT_OWNER_PASSWORD; outputs stay unprotected when neither is set)
    #[arg(long, value_name = "PASSWORD")]
    owner_password: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract indexed page text from a PDF (for debugging and verification)
    Extract {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,

        /// Output text file (optional, defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

/// Batch command handler.
struct BatchHandler {
    verbose: bool,
}

impl BatchHandler {
    fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    /// Runs a full batch and writes the archive.
    fn run(
        &self,
        roster_path: &Path,
        document_path: &Path,
        output_path: &Path,
        owner_password: Option<String>,
    ) -> Result<()> {
        if !roster_path.exists() {
            anyhow::bail!("Roster file does not exist: {}", roster_path.display());
        }
        if !document_path.exists() {
            anyhow::bail!("Document file does not exist: {}", document_path.display());
        }

        let records = vouchsplit::domain::roster::load_roster(roster_path)
            .with_context(|| "Failed to read roster")?;
        let source = std::fs::read(document_path)
            .with_context(|| format!("Failed to read {}", document_path.display()))?;

        if self.verbose {
            println!("Roster:   {} ({} records)", roster_path.display(), records.len());
            println!("Document: {}", document_path.display());
            println!("Output:   {}", output_path.display());
        }

        let config = BatchConfig {
            protection: owner_password.map(|owner_password| ProtectionConfig { owner_password }),
            source_name: document_path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned()),
            ..BatchConfig::default()
        };

        let batch = BatchProcessor::new(source, records, config);
        let outcome = batch.run().with_context(|| "Batch processing failed")?;
        let blob = archive::package(&outcome).with_context(|| "Archive packaging failed")?;

        std::fs::write(output_path, blob)
            .with_context(|| format!("Failed to write {}", output_path.display()))?;

        // Report results
        if self.verbose {
            println!("\nBatch Summary:");
            println!("  Outputs produced: {}", outcome.outputs.len());
            println!("  Ledger rows:      {}", outcome.ledger.len());
            println!("  Failures:         {}", outcome.failures.len());
            println!("  Name suffix:      {}", outcome.suffix.as_str());
        }

        for failure in &outcome.failures {
            eprintln!(
                "⚠ Record '{}' ({}) skipped: {}",
                failure.record.identifier, failure.record.display_name, failure.error
            );
        }

        if outcome.outputs.is_empty() {
            println!(
                "⚠ No record matched any page; archive contains only the ledger → {}",
                output_path.display()
            );
        } else {
            println!(
                "✓ Packaged {} output(s) + ledger → {}",
                outcome.outputs.len(),
                output_path.display()
            );
        }

        Ok(())
    }

    /// Extracts indexed text from a PDF.
    fn extract(&self, input: &Path, output: Option<&Path>) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }

        let bytes =
            std::fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
        let index = DocumentIndex::from_bytes(&bytes).with_context(|| "Indexing failed")?;
        let text = index.full_text().with_context(|| "Text extraction failed")?;

        if let Some(output_path) = output {
            std::fs::write(output_path, &text)
                .with_context(|| format!("Failed to write to {}", output_path.display()))?;
            println!(
                "✓ Extracted {} characters → {}",
                text.len(),
                output_path.display()
            );
        } else {
            println!("{}", text);
        }

        Ok(())
    }
}

/// Resolves the owner password from the flag or the environment.
fn resolve_owner_password(flag: Option<String>) -> Option<String> {
    flag.or_else(|| std::env::var(OWNER_PASSWORD_ENV).ok())
        .filter(|password| !password.is_empty())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let handler = BatchHandler::new(cli.verbose);

    match &cli.command {
        Some(Commands::Extract { input, output }) => {
            handler.extract(input, output.as_deref())?;
        }
        None => {
            let roster = cli
                .roster
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--roster is required"))?;
            let document = cli
                .document
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--document is required"))?;
            let output = cli
                .output
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--output is required"))?;

            let owner_password = resolve_owner_password(cli.owner_password.clone());
            handler.run(roster, document, output, owner_password)?;
        }
    }

    Ok(())
}
