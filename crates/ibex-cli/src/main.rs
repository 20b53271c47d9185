#![doc = include_str!("../README.md")]

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing::info;
use tracing_subscriber::EnvFilter;

const LONG_ABOUT: &str = "Compiles the reason catalogue into the checker's dispatch table.\n\n\
    Each catalogue entry pairs a claim shape with the requirements that\n\
    justify it. The generated module matches assertions against claim\n\
    shapes structurally and discharges the requirements through the\n\
    prover. Run this after editing the catalogue; the output is committed\n\
    alongside the checker.";

#[derive(Parser)]
#[command(name = "ibex-gen")]
#[command(about = "Generate the reason dispatch table for the ibex checker")]
#[command(long_about = LONG_ABOUT)]
#[command(version)]
struct Cli {
    /// Destination for the generated module
    #[arg(long, default_value = "src/reasons.rs")]
    out: PathBuf,

    /// Compile the catalogue without writing the artifact
    #[arg(long)]
    check: bool,
}

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let artifact = ibex_codegen::generate(ibex_codegen::CATALOGUE)?;

    if cli.check {
        println!(
            "Catalogue OK: {} reasons compile cleanly",
            ibex_codegen::CATALOGUE.len()
        );
        return Ok(());
    }

    if let Some(parent) = cli.out.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).into_diagnostic()?;
        }
    }
    fs::write(&cli.out, &artifact).into_diagnostic()?;

    info!(out = %cli.out.display(), "reason table written");
    println!("Reason table written to {}", cli.out.display());
    Ok(())
}
