use clap::Args;
use std::error::Error;
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Args)]
pub struct SplitCommand {
    /// Input .jsonl file with the full example corpus
    #[arg(long, required = true)]
    input: String,

    /// Directory to write train.jsonl, valid.jsonl and test.jsonl into
    #[arg(long, default_value = "chess_data")]
    output: PathBuf,

    /// Fraction of examples that goes to the train partition
    #[arg(long, default_value = "0.8")]
    train_ratio: f64,

    /// Fraction of examples that goes to the valid partition
    #[arg(long, default_value = "0.1")]
    valid_ratio: f64,
}

/// Partitions `items` into contiguous train/valid/test prefixes: the first
/// `⌊train_ratio·N⌋` items, the next `⌊valid_ratio·N⌋` items, and the
/// remainder (flooring spill included) as the test set. Order is preserved,
/// nothing is shuffled.
pub fn split_examples<T>(
    mut items: Vec<T>,
    train_ratio: f64,
    valid_ratio: f64,
) -> (Vec<T>, Vec<T>, Vec<T>) {
    let total = items.len();
    let train_size = (train_ratio * total as f64) as usize;
    let valid_size = (valid_ratio * total as f64) as usize;

    let mut valid = items.split_off(train_size.min(total));
    let test = valid.split_off(valid_size.min(valid.len()));

    (items, valid, test)
}

fn validate_ratios(train_ratio: f64, valid_ratio: f64) -> Result<(), String> {
    for ratio in [train_ratio, valid_ratio] {
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(format!("ratio {} must lie in (0, 1)", ratio));
        }
    }

    if train_ratio + valid_ratio > 1.0 {
        return Err(format!(
            "train ratio {} and valid ratio {} sum past 1",
            train_ratio, valid_ratio
        ));
    }

    Ok(())
}

pub fn split(cmd: SplitCommand) -> Result<(), Box<dyn Error>> {
    validate_ratios(cmd.train_ratio, cmd.valid_ratio)?;

    println!("Reading from: {}", cmd.input);

    let reader = BufReader::new(File::open(&cmd.input)?);
    let lines = reader.lines().collect::<io::Result<Vec<_>>>()?;
    println!("Loaded {} examples", lines.len());

    let (train, valid, test) = split_examples(lines, cmd.train_ratio, cmd.valid_ratio);

    println!("Split breakdown:");
    println!("  Train: {} examples ({:.0}%)", train.len(), cmd.train_ratio * 100.0);
    println!("  Valid: {} examples ({:.0}%)", valid.len(), cmd.valid_ratio * 100.0);
    println!("  Test:  {} examples", test.len());

    fs::create_dir_all(&cmd.output)?;

    write_partition(&cmd.output.join("train.jsonl"), &train)?;
    write_partition(&cmd.output.join("valid.jsonl"), &valid)?;
    write_partition(&cmd.output.join("test.jsonl"), &test)?;

    println!("Done. Partitions written to {}", cmd.output.display());

    Ok(())
}

fn write_partition(path: &Path, lines: &[String]) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);

    for line in lines {
        writeln!(writer, "{}", line)?;
    }

    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hundred_examples_at_80_10() {
        let items: Vec<usize> = (0..100).collect();
        let (train, valid, test) = split_examples(items, 0.8, 0.1);

        assert_eq!(train, (0..80).collect::<Vec<_>>());
        assert_eq!(valid, (80..90).collect::<Vec<_>>());
        assert_eq!(test, (90..100).collect::<Vec<_>>());
    }

    #[test]
    fn covers_input_exactly() {
        for total in [0usize, 1, 7, 99, 1000] {
            for (train_ratio, valid_ratio) in [(0.8, 0.1), (0.5, 0.25), (0.9, 0.05)] {
                let items: Vec<usize> = (0..total).collect();
                let (train, valid, test) =
                    split_examples(items.clone(), train_ratio, valid_ratio);

                assert_eq!(train.len() + valid.len() + test.len(), total);

                let rejoined: Vec<usize> =
                    train.into_iter().chain(valid).chain(test).collect();
                assert_eq!(rejoined, items);
            }
        }
    }

    #[test]
    fn is_deterministic() {
        let items: Vec<u32> = (0..37).collect();

        let first = split_examples(items.clone(), 0.6, 0.2);
        let second = split_examples(items, 0.6, 0.2);

        assert_eq!(first, second);
    }

    #[test]
    fn flooring_spill_lands_in_test() {
        // 7 items at (0.8, 0.1): floors to 5 train, 0 valid, 2 test
        let (train, valid, test) = split_examples((0..7).collect::<Vec<_>>(), 0.8, 0.1);

        assert_eq!((train.len(), valid.len(), test.len()), (5, 0, 2));
    }

    #[test]
    fn rejects_bad_ratios() {
        assert!(validate_ratios(0.8, 0.1).is_ok());
        assert!(validate_ratios(0.0, 0.1).is_err());
        assert!(validate_ratios(0.8, 1.0).is_err());
        assert!(validate_ratios(0.7, 0.4).is_err());
    }
}
