use crate::trainer::{run_checked, CommandRunner};
use clap::Args;
use std::error::Error;
use std::path::PathBuf;

pub const LORA_COMMAND: &str = "mlx_lm.lora";

#[derive(Args)]
pub struct TrainCommand {
    /// Base model to fine-tune
    #[arg(long, default_value = "meta-llama/Llama-3.2-3B")]
    model: String,

    /// Directory with train.jsonl / valid.jsonl / test.jsonl
    #[arg(long, default_value = "chess_data")]
    data: PathBuf,

    /// Where to store the trained adapters
    #[arg(long, default_value = "chess_adapters")]
    adapter_path: String,

    /// Number of training iterations
    #[arg(long, default_value = "2000")]
    iters: usize,

    /// Batch size
    #[arg(long, default_value = "4")]
    batch_size: usize,

    /// Number of layers to fine-tune
    #[arg(long, default_value = "16")]
    num_layers: usize,

    /// Learning rate, passed through verbatim
    #[arg(long, default_value = "1e-4")]
    learning_rate: String,

    /// Save a checkpoint every this many iterations
    #[arg(long, default_value = "250")]
    save_every: usize,

    /// Evaluate on the validation set every this many steps
    #[arg(long, default_value = "100")]
    steps_per_eval: usize,

    /// Number of validation batches per evaluation
    #[arg(long, default_value = "25")]
    val_batches: usize,
}

pub fn train(cmd: TrainCommand, runner: &mut dyn CommandRunner) -> Result<(), Box<dyn Error>> {
    if !cmd.data.is_dir() {
        return Err(format!(
            "data directory {} not found, run `split` first",
            cmd.data.display()
        )
        .into());
    }

    println!("Model: {}", cmd.model);
    println!("Data directory: {}", cmd.data.display());
    println!("Adapter path: {}", cmd.adapter_path);

    let output = run_checked(runner, LORA_COMMAND, &build_args(&cmd))?;
    print!("{}", output.stdout);

    println!("Training complete. Adapters saved to {}", cmd.adapter_path);

    Ok(())
}

fn build_args(cmd: &TrainCommand) -> Vec<String> {
    vec![
        "--model".to_string(),
        cmd.model.clone(),
        "--train".to_string(),
        "--data".to_string(),
        cmd.data.display().to_string(),
        "--adapter-path".to_string(),
        cmd.adapter_path.clone(),
        "--iters".to_string(),
        cmd.iters.to_string(),
        "--batch-size".to_string(),
        cmd.batch_size.to_string(),
        "--num-layers".to_string(),
        cmd.num_layers.to_string(),
        "--learning-rate".to_string(),
        cmd.learning_rate.clone(),
        "--save-every".to_string(),
        cmd.save_every.to_string(),
        "--steps-per-eval".to_string(),
        cmd.steps_per_eval.to_string(),
        "--val-batches".to_string(),
        cmd.val_batches.to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trainer::FakeRunner;

    fn command(data: &str) -> TrainCommand {
        TrainCommand {
            model: "base-model".to_string(),
            data: PathBuf::from(data),
            adapter_path: "adapters".to_string(),
            iters: 2000,
            batch_size: 4,
            num_layers: 16,
            learning_rate: "1e-4".to_string(),
            save_every: 250,
            steps_per_eval: 100,
            val_batches: 25,
        }
    }

    #[test]
    fn invokes_the_tuning_tool_with_the_full_argument_set() {
        let mut runner = FakeRunner::succeeding();
        train(command("."), &mut runner).unwrap();

        let (program, args) = &runner.invocations[0];
        assert_eq!(program, LORA_COMMAND);
        assert_eq!(
            args,
            &[
                "--model", "base-model",
                "--train",
                "--data", ".",
                "--adapter-path", "adapters",
                "--iters", "2000",
                "--batch-size", "4",
                "--num-layers", "16",
                "--learning-rate", "1e-4",
                "--save-every", "250",
                "--steps-per-eval", "100",
                "--val-batches", "25",
            ]
        );
    }

    #[test]
    fn missing_data_directory_fails_before_invoking_anything() {
        let mut runner = FakeRunner::succeeding();
        let err = train(command("does-not-exist"), &mut runner).unwrap_err();

        assert!(err.to_string().contains("data directory"));
        assert!(runner.invocations.is_empty());
    }

    #[test]
    fn failed_training_surfaces_the_error() {
        let mut runner = FakeRunner::failing();
        assert!(train(command("."), &mut runner).is_err());
    }
}
