use clap::Args;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::error::Error;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

#[derive(Args)]
pub struct DownloadCommand {
    /// URL of a PGN archive to fetch. May be repeated.
    #[arg(long, value_name = "url", required = true)]
    url: Vec<String>,

    /// Directory to store the downloaded archives
    #[arg(long, default_value = "pgn_files")]
    output: PathBuf,

    /// Seconds to wait between downloads
    #[arg(long, default_value = "1")]
    delay: u64,
}

pub fn download(cmd: DownloadCommand) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(&cmd.output)?;

    let mut fetched = 0u64;
    let mut present = 0u64;
    let mut failed = 0u64;

    for url in &cmd.url {
        let name = url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| format!("cannot derive a file name from {}", url))?;
        let target = cmd.output.join(name);

        if target.exists() {
            println!("{}: already downloaded", name);
            present += 1;
            continue;
        }

        match fetch(url, &target) {
            Ok(bytes) => {
                println!("{}: done ({})", name, HumanBytes(bytes));
                fetched += 1;

                thread::sleep(Duration::from_secs(cmd.delay));
            }
            Err(err) => {
                log::warn!("{}: download failed: {}", url, err);
                // a half-written file would be treated as complete next run
                let _ = fs::remove_file(&target);
                failed += 1;
            }
        }
    }

    println!(
        "Done. Downloaded {}, already present {}, failed {}",
        fetched, present, failed
    );

    Ok(())
}

fn fetch(url: &str, target: &Path) -> Result<u64, Box<dyn Error>> {
    let response = reqwest::blocking::get(url)?.error_for_status()?;

    let bar = match response.content_length() {
        Some(length) => ProgressBar::new(length).with_style(
            ProgressStyle::default_bar()
                .template("{bar:40.green} {bytes}/{total_bytes} @ {bytes_per_sec}")
                .unwrap(),
        ),
        None => ProgressBar::new_spinner(),
    };

    let mut source = bar.wrap_read(response);
    let mut file = File::create(target)?;
    let bytes = io::copy(&mut source, &mut file)?;
    bar.finish_and_clear();

    Ok(bytes)
}
