//! flex-srec CLI
//!
//! Convert FLEX binary load files to and from Motorola S-records, and
//! create blank FLEX disk images.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use flex_srec::{Converter, Direction, ImageBuilder};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flex-srec")]
#[command(version)]
#[command(about = "FLEX binary load file and Motorola S-record conversion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert a FLEX binary load file to Motorola S-records
    #[command(name = "to-srec")]
    ToSrec {
        /// Input FLEX binary file
        input: PathBuf,

        /// Output S-record file
        output: PathBuf,

        /// Print record counts
        #[arg(short, long)]
        verbose: bool,
    },

    /// Convert a Motorola S-record file to a FLEX binary load file
    #[command(name = "to-flex")]
    ToFlex {
        /// Input S-record file
        input: PathBuf,

        /// Output FLEX binary file
        output: PathBuf,

        /// Print record counts
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create a blank FLEX disk image
    Mkfs {
        /// Output image file
        #[arg(short, long)]
        output: PathBuf,

        /// Number of tracks (min 2)
        #[arg(short, long, default_value_t = 77)]
        tracks: u32,

        /// Sectors per track (min 5)
        #[arg(short, long, default_value_t = 15)]
        sectors: u32,

        /// Volume name (max 11 characters)
        #[arg(short = 'n', long, default_value = "")]
        volume_name: String,

        /// Volume number
        #[arg(short = 'v', long, default_value_t = 0)]
        volume_number: u16,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::ToSrec { input, output, verbose } => {
            convert_file(Direction::FlexToSrec, input, output, verbose)?;
        }
        Commands::ToFlex { input, output, verbose } => {
            convert_file(Direction::SrecToFlex, input, output, verbose)?;
        }
        Commands::Mkfs { output, tracks, sectors, volume_name, volume_number } => {
            make_image(output, tracks, sectors, volume_name, volume_number)?;
        }
    }

    Ok(())
}

fn convert_file(direction: Direction, input: PathBuf, output: PathBuf, verbose: bool) -> Result<()> {
    let reader = fs::File::open(&input)
        .with_context(|| format!("Failed to open {} for input", input.display()))?;
    let writer = fs::File::create(&output)
        .with_context(|| format!("Failed to open {} for output", output.display()))?;

    // The S0 header record carries the input's base file name
    let mut converter = Converter::new();
    if direction == Direction::FlexToSrec {
        if let Some(name) = input.file_name() {
            converter = converter.with_header(name.to_string_lossy());
        }
    }

    let summary = converter
        .convert(direction, reader, writer)
        .with_context(|| format!("Failed converting {}", input.display()))?;

    if verbose {
        println!(
            "Converted {} data and {} transfer address records",
            summary.data_records, summary.transfer_records
        );
    }

    Ok(())
}

fn make_image(
    output: PathBuf,
    tracks: u32,
    sectors: u32,
    volume_name: String,
    volume_number: u16,
) -> Result<()> {
    use chrono::Datelike;

    let today = chrono::Local::now().date_naive();
    let image = ImageBuilder::new()
        .tracks(tracks)
        .sectors(sectors)
        .volume_name(volume_name)
        .volume_number(volume_number)
        .init_date(today.month() as u8, today.day() as u8, (today.year() % 100) as u8)
        .build()
        .context("Invalid image geometry")?;

    fs::write(&output, image)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(())
}
