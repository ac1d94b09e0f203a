use anyhow::{Context, Result};
use clap::Parser;
use scalesync_core::{ClearCommands, DEFAULT_MAX_ID};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scale-clear",
    version,
    about = "Generate a file containing commands to suppress all the products on the scale system"
)]
struct Cli {
    /// Path of the file to write
    filename: PathBuf,

    /// The scale group id
    scale_group: String,

    /// Highest product id to clear
    #[arg(long, default_value_t = DEFAULT_MAX_ID)]
    max_id: u32,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let count = ClearCommands::new(&cli.scale_group)
        .with_max_id(cli.max_id)
        .write_file(&cli.filename)
        .with_context(|| format!("cannot write {}", cli.filename.display()))?;
    println!("{count} commands written to {}", cli.filename.display());
    Ok(())
}
