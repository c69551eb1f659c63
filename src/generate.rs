use crate::trainer::{run_checked, CommandRunner};
use clap::Args;
use std::error::Error;

pub const GENERATE_COMMAND: &str = "mlx_lm.generate";

/// Starting position, prompting for the first move.
pub const START_POS_PROMPT: &str =
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 ->";

#[derive(Args)]
pub struct GenerateCommand {
    /// Model (base or fused) to generate with
    #[arg(long, default_value = "meta-llama/Llama-3.2-3B")]
    model: String,

    /// Position prompt to complete
    #[arg(long, default_value = START_POS_PROMPT)]
    prompt: String,

    /// Maximum number of tokens to generate
    #[arg(long, default_value = "10")]
    max_tokens: usize,
}

pub fn generate(cmd: GenerateCommand, runner: &mut dyn CommandRunner) -> Result<(), Box<dyn Error>> {
    println!("Test position: {}", cmd.prompt);

    let args = vec![
        "--model".to_string(),
        cmd.model.clone(),
        "--prompt".to_string(),
        cmd.prompt.clone(),
        "--max-tokens".to_string(),
        cmd.max_tokens.to_string(),
    ];

    let output = run_checked(runner, GENERATE_COMMAND, &args)?;
    print!("{}", output.stdout);

    Ok(())
}
