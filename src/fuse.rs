use crate::trainer::{run_checked, CommandRunner};
use clap::Args;
use std::error::Error;

pub const FUSE_COMMAND: &str = "mlx_lm.fuse";

#[derive(Args)]
pub struct FuseCommand {
    /// Base model the adapters were trained on
    #[arg(long, default_value = "meta-llama/Llama-3.2-3B")]
    model: String,

    /// Adapters to fuse into the base model
    #[arg(long, default_value = "chess_adapters")]
    adapter_path: String,

    /// Where to save the fused, standalone model
    #[arg(long, default_value = "chess_model")]
    save_path: String,
}

pub fn fuse(cmd: FuseCommand, runner: &mut dyn CommandRunner) -> Result<(), Box<dyn Error>> {
    println!("Base model: {}", cmd.model);
    println!("Adapters: {}", cmd.adapter_path);
    println!("Output: {}", cmd.save_path);

    let args = vec![
        "--model".to_string(),
        cmd.model.clone(),
        "--adapter-path".to_string(),
        cmd.adapter_path.clone(),
        "--save-path".to_string(),
        cmd.save_path.clone(),
        "--de-quantize".to_string(),
    ];

    run_checked(runner, FUSE_COMMAND, &args)?;

    println!("Model fusion complete. Standalone model at {}", cmd.save_path);

    Ok(())
}
