use crate::error::DataError;
use crate::extract::extract_game;
use crate::game_visitor::{GameVisitor, VisitorConfig};
use crate::jsonl_format::JsonlWriter;
use clap::Args;
use indicatif::{HumanCount, ProgressBar, ProgressStyle};
use pgn_reader::BufferedReader;
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use zstd::Encoder;

#[derive(Args)]
pub struct BuildDatasetCommand {
    /// Path or URL of a .pgn or .pgn.zst file to read games from; a
    /// directory expands to the PGN files it contains. May be repeated.
    #[arg(long, value_name = "input", required = true)]
    input: Vec<String>,

    /// Output .jsonl (or .jsonl.zst) file to write the training examples
    #[arg(long, value_name = "output")]
    output: String,

    /// Whether to compress the output with the ZSTD algorithm
    #[arg(long, default_value = "false")]
    compress: bool,

    /// Game visitor configuration
    #[clap(flatten)]
    visitor_config: VisitorConfig,
}

#[derive(Default)]
struct CorpusStats {
    files: u64,
    files_skipped: u64,
    games: u64,
    games_skipped: u64,
    examples: u64,
}

pub fn build_dataset(cmd: BuildDatasetCommand) -> Result<(), Box<dyn Error>> {
    let inputs = expand_inputs(&cmd.input)?;

    let output_file = File::create(&cmd.output).map_err(|source| DataError::OutputWrite {
        path: cmd.output.clone(),
        source,
    })?;
    let sink: Box<dyn Write> = if cmd.compress {
        // the encoder is buffered internally
        Box::new(Encoder::new(output_file, 3)?.auto_finish())
    } else {
        Box::new(BufWriter::new(output_file))
    };
    let mut writer = JsonlWriter::new(sink);

    println!("Inputs: {}", inputs.join(", "));
    println!("Output: {}", cmd.output);
    println!("Write compressed: {}", cmd.compress);

    let mut visitor = GameVisitor::new(cmd.visitor_config);
    let mut stats = CorpusStats::default();

    let bar = ProgressBar::new_spinner()
        .with_style(ProgressStyle::default_spinner()
        .template(
            "{spinner:.green} [Elapsed {elapsed_precise}] [Games {human_pos} @ {per_sec}] {msg}",
        )
        .unwrap());

    for input in &inputs {
        match process_input(input, &cmd.output, &mut visitor, &mut writer, &mut stats, &bar) {
            Ok(()) => stats.files += 1,
            Err(err @ DataError::OutputWrite { .. }) => return Err(err.into()),
            Err(err) => {
                log::warn!("skipping input: {}", err);
                stats.files_skipped += 1;
            }
        }
    }

    writer.finish().map_err(|source| DataError::OutputWrite {
        path: cmd.output.clone(),
        source,
    })?;
    bar.finish();

    println!(
        "Done. Files: {} ({} skipped), games: {} ({} discarded), examples: {}",
        stats.files, stats.files_skipped, stats.games, stats.games_skipped, stats.examples
    );

    Ok(())
}

fn process_input(
    input: &str,
    output: &str,
    visitor: &mut GameVisitor,
    writer: &mut JsonlWriter<Box<dyn Write>>,
    stats: &mut CorpusStats,
    bar: &ProgressBar,
) -> Result<(), DataError> {
    let reader = open_input(input).map_err(|source| DataError::SourceRead {
        path: input.to_string(),
        source,
    })?;
    let mut game_reader = BufferedReader::new(reader);

    loop {
        let record = match game_reader.read_game(visitor) {
            Ok(Some(record)) => record,
            Ok(None) => break,
            Err(source) => {
                return Err(DataError::SourceRead {
                    path: input.to_string(),
                    source,
                })
            }
        };

        bar.inc(1);

        // None: the visitor rejected the game
        let Some(record) = record else { continue };

        match extract_game(&record) {
            Ok(examples) => {
                for example in &examples {
                    writer
                        .write_example(example)
                        .map_err(|source| DataError::OutputWrite {
                            path: output.to_string(),
                            source,
                        })?;
                }

                stats.games += 1;
                stats.examples += examples.len() as u64;
                bar.set_message(format!("[Examples {}]", HumanCount(stats.examples)));
            }
            Err(err) => {
                // discard the whole game, keep going with the corpus
                log::warn!(
                    "discarding game {} - {} ({}): {}",
                    record.white,
                    record.black,
                    record.result,
                    err
                );
                stats.games_skipped += 1;
            }
        }
    }

    Ok(())
}

/// Opens a path or URL as a raw game stream, decompressing if necessary.
fn open_input(input: &str) -> io::Result<Box<dyn io::Read>> {
    let raw: Box<dyn io::Read> = if input.starts_with("http") {
        let response = reqwest::blocking::get(input)
            .and_then(|response| response.error_for_status())
            .map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        Box::new(response)
    } else {
        Box::new(File::open(input)?)
    };

    Ok(if input.ends_with(".zst") {
        Box::new(zstd::Decoder::new(raw)?)
    } else {
        raw
    })
}

/// Expands directory inputs to the PGN files they contain, in sorted order.
fn expand_inputs(inputs: &[String]) -> io::Result<Vec<String>> {
    let mut expanded = Vec::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            let mut files: Vec<_> = fs::read_dir(path)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|path| is_pgn(path))
                .collect();
            files.sort();

            expanded.extend(files.into_iter().map(|p| p.to_string_lossy().into_owned()));
        } else {
            expanded.push(input.clone());
        }
    }

    Ok(expanded)
}

fn is_pgn(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    name.ends_with(".pgn") || name.ends_with(".pgn.zst")
}
