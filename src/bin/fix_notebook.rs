//! `fix-notebook <notebook-path>`
//!
//! Removes `metadata.widgets` from a Jupyter notebook in place.

use clap::{error::ErrorKind, Parser};
use std::{path::PathBuf, process::ExitCode};

use menstrual_health_qa::application::fix_notebook_use_case::FixNotebookUseCase;

const USAGE: &str = "Usage: fix-notebook Notebook.ipynb";

#[derive(Parser, Debug)]
#[command(
    name = "fix-notebook",
    version,
    about = "Strip widget metadata from a Jupyter notebook so it renders everywhere.",
    override_usage = "fix-notebook Notebook.ipynb"
)]
struct FixNotebookCli {
    /// Notebook to rewrite in place
    notebook: PathBuf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = match FixNotebookCli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return ExitCode::SUCCESS;
        }
        // Missing or extra arguments
        Err(_) => {
            println!("{USAGE}");
            return ExitCode::from(1);
        }
    };

    match FixNotebookUseCase::new(&cli.notebook).execute() {
        Ok(_) => {
            println!("Fixed metadata for {}", cli.notebook.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}
