use std::error::Error;
use std::io;
use std::process::Command;

/// Result of running an external tool to completion.
#[derive(Debug)]
pub struct RunOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Narrow seam to the external tuning tools: a program plus its arguments,
/// run to completion, inspected only for success and captured output.
pub trait CommandRunner {
    fn run(&mut self, program: &str, args: &[String]) -> io::Result<RunOutput>;
}

/// Runs the program as a child process and captures its output.
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&mut self, program: &str, args: &[String]) -> io::Result<RunOutput> {
        let output = Command::new(program).args(args).output()?;

        Ok(RunOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Runs a tool and fails with its captured stderr on a non-zero exit.
pub fn run_checked(
    runner: &mut dyn CommandRunner,
    program: &str,
    args: &[String],
) -> Result<RunOutput, Box<dyn Error>> {
    println!("Running command:");
    println!("{} {}", program, args.join(" "));

    let output = runner.run(program, args)?;
    if !output.success {
        return Err(format!("{} failed: {}", program, output.stderr.trim()).into());
    }

    Ok(output)
}

/// Records invocations instead of spawning processes.
#[cfg(test)]
pub struct FakeRunner {
    pub invocations: Vec<(String, Vec<String>)>,
    pub success: bool,
    pub stdout: String,
}

#[cfg(test)]
impl FakeRunner {
    pub fn succeeding() -> Self {
        FakeRunner {
            invocations: Vec::new(),
            success: true,
            stdout: String::new(),
        }
    }

    pub fn failing() -> Self {
        FakeRunner {
            invocations: Vec::new(),
            success: false,
            stdout: String::new(),
        }
    }
}

#[cfg(test)]
impl CommandRunner for FakeRunner {
    fn run(&mut self, program: &str, args: &[String]) -> io::Result<RunOutput> {
        self.invocations.push((program.to_string(), args.to_vec()));

        Ok(RunOutput {
            success: self.success,
            stdout: self.stdout.clone(),
            stderr: if self.success {
                String::new()
            } else {
                "exploded".to_string()
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_checked_surfaces_stderr_on_failure() {
        let mut runner = FakeRunner::failing();
        let err = run_checked(&mut runner, "trainer", &["--flag".to_string()]).unwrap_err();

        assert!(err.to_string().contains("exploded"));
        assert_eq!(runner.invocations.len(), 1);
    }

    #[test]
    fn run_checked_passes_program_and_args_through() {
        let mut runner = FakeRunner::succeeding();
        run_checked(&mut runner, "trainer", &["--a".to_string(), "b".to_string()]).unwrap();

        let (program, args) = &runner.invocations[0];
        assert_eq!(program, "trainer");
        assert_eq!(args, &["--a", "b"]);
    }
}
