mod build_dataset;
mod download;
mod error;
mod extract;
mod fuse;
mod game_visitor;
mod generate;
mod jsonl_format;
mod sample;
mod split;
mod train;
mod trainer;

use crate::build_dataset::{build_dataset, BuildDatasetCommand};
use crate::download::{download, DownloadCommand};
use crate::fuse::{fuse, FuseCommand};
use crate::generate::{generate, GenerateCommand};
use crate::split::{split, SplitCommand};
use crate::train::{train, TrainCommand};
use crate::trainer::ProcessRunner;
use clap::{Parser, Subcommand};
use std::error::Error;

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Downloads PGN archives into a local directory
    Download(DownloadCommand),
    /// Converts PGN games into one JSONL training example per position
    BuildDataset(BuildDatasetCommand),
    /// Splits a JSONL dataset into train/valid/test partitions
    Split(SplitCommand),
    /// Runs LoRA fine-tuning over a prepared data directory
    Train(TrainCommand),
    /// Fuses trained adapters into the base model
    Fuse(FuseCommand),
    /// Generates a completion for a position prompt, to smoke-test a model
    Generate(GenerateCommand),
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .target(env_logger::Target::Stdout)
        .init();

    let args = Cli::parse();

    match args.command {
        Commands::Download(cmd) => download(cmd),
        Commands::BuildDataset(cmd) => build_dataset(cmd),
        Commands::Split(cmd) => split(cmd),
        Commands::Train(cmd) => train(cmd, &mut ProcessRunner),
        Commands::Fuse(cmd) => fuse(cmd, &mut ProcessRunner),
        Commands::Generate(cmd) => generate(cmd, &mut ProcessRunner),
    }
}
