use std::io::{self, BufRead};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use taskline_core::config::{data_file_path, load_config};
use taskline_core::planner::Planner;
use taskline_core::storage::Storage;

const SEPARATOR: &str = "____________________________________________________________";

#[derive(Parser)]
#[command(name = "taskline", version, about = "Personal task tracker")]
struct Cli {
    /// Override the task storage file path
    #[arg(long)]
    data_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let root = std::env::current_dir().context("resolve working directory")?;
    let path = cli
        .data_file
        .unwrap_or_else(|| data_file_path(&root, load_config(&root).as_ref()));

    let (mut planner, warnings) = Planner::load(Storage::new(path))
        .map_err(|err| anyhow::anyhow!("An error occurred while starting the program: {err}"))?;
    for warning in &warnings {
        eprintln!("Warning: {warning}");
    }

    println!("Hi! I'm Taskline.\nWhat shall we get done today?");

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("read input")?;
        let response = planner.submit(&line);
        println!("{SEPARATOR}");
        println!("{}", response.text);
        println!("{SEPARATOR}");
        if response.exit {
            break;
        }
    }
    Ok(())
}
