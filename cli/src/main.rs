use anyhow::Context;
use clap::Parser;
use fatlens_core::ImageReader;
use fatlens_filesystems::{BootSectorGeometry, FsLayout};
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};

mod shell;

#[derive(Parser)]
#[command(name = "fatlens")]
#[command(about = "Read-only inspector for FAT16 disk images", long_about = None)]
struct Cli {
    /// FAT16 image file to inspect
    image: PathBuf,

    /// Increase log verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Print the decoded boot sector geometry as JSON and exit
    #[arg(long)]
    geometry: bool,
}

#[derive(Serialize)]
struct GeometryReport {
    geometry: BootSectorGeometry,
    layout: FsLayout,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn geometry_report(image: &Path) -> anyhow::Result<String> {
    let mut reader = ImageReader::open(image)
        .with_context(|| format!("Failed to open image {}", image.display()))?;
    let boot = reader.read_at(0, 512)?;
    let geometry = BootSectorGeometry::decode(&boot)?;
    let layout = geometry.layout();
    Ok(serde_json::to_string_pretty(&GeometryReport { geometry, layout })?)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if cli.geometry {
        println!("{}", geometry_report(&cli.image)?);
        return Ok(());
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    shell::run(&cli.image, stdin.lock(), stdout.lock())
}
