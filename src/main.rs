//! rc2usfm - Reassemble translation-studio projects into USFM books

use std::fs;
use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, info};

use rc2usfm::{AssembleOptions, assemble_book, container, render_usfm};

#[derive(Parser)]
#[command(name = "rc2usfm")]
#[command(version, about = "Reassemble translation-studio projects into USFM", long_about = None)]
#[command(after_help = "EXAMPLES:
    rc2usfm en_exo_text_reg exo.usfm        Assemble a project directory
    rc2usfm en_exo_text_reg.tstudio         Assemble an export to stdout
    rc2usfm -i en_exo_text_reg.tstudio      Show project metadata")]
struct Cli {
    /// Project directory or translation-studio export (.tstudio, .zip)
    #[arg(value_name = "INPUT")]
    input: String,

    /// Output USFM file (stdout when omitted)
    #[arg(value_name = "OUTPUT")]
    output: Option<String>,

    /// Only assemble chunks marked as finished in the manifest
    #[arg(short, long)]
    finished: bool,

    /// Show project metadata without assembling
    #[arg(short, long)]
    info: bool,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Log every chapter and skipped fragment
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli);

    let result = if cli.info {
        show_info(&cli.input)
    } else {
        convert(&cli)
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_env("RC2USFM_LOG")
        .format_timestamp(None)
        .init();
}

fn show_info(path: &str) -> Result<(), String> {
    let container = container::open(path).map_err(|e| e.to_string())?;
    let manifest = container.manifest().map_err(|e| e.to_string())?;
    let fragments = container.fragment_names(false).map_err(|e| e.to_string())?;

    println!("File: {path}");
    println!("Project: {} ({})", manifest.project.name, manifest.project.id);
    if !manifest.target_language.id.is_empty() {
        println!(
            "Language: {} ({})",
            manifest.target_language.name, manifest.target_language.id
        );
    }
    if !manifest.resource.id.is_empty() {
        println!("Resource: {}", manifest.resource.id);
    }
    if !manifest.translators.is_empty() {
        println!("Translators: {}", manifest.translators.join(", "));
    }
    println!("Fragments: {}", fragments.len());
    println!("Finished: {}", manifest.finished_chunks.len());

    Ok(())
}

fn convert(cli: &Cli) -> Result<(), String> {
    let container = container::open(&cli.input).map_err(|e| e.to_string())?;
    let options = AssembleOptions::new().with_only_finished(cli.finished);
    let book = assemble_book(container.as_ref(), &options).map_err(|e| e.to_string())?;
    let usfm = render_usfm(&book);

    match &cli.output {
        Some(output) => {
            fs::write(output, usfm).map_err(|e| format!("{output}: {e}"))?;
            info!("Wrote {} chapters to {output}", book.chapters().len());
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(usfm.as_bytes())
                .map_err(|e| e.to_string())?;
        }
    }

    Ok(())
}
