use std::io::ErrorKind;
use std::process::Command;
use tracing::{info, warn};

use crate::error::RunError;

/// Hands the assembled command line to something that runs it.
pub trait ScriptLauncher {
    fn launch(&mut self, command_line: &str) -> Result<(), RunError>;
}

impl<L: ScriptLauncher + ?Sized> ScriptLauncher for &mut L {
    fn launch(&mut self, command_line: &str) -> Result<(), RunError> {
        (**self).launch(command_line)
    }
}

/// Runs the command line as a child process and waits for it.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessLauncher;

impl ScriptLauncher for ProcessLauncher {
    fn launch(&mut self, command_line: &str) -> Result<(), RunError> {
        let (program, mut command) = build_command(command_line)?;
        info!("Download started");
        match command.status() {
            Ok(status) if status.success() => Ok(()),
            Ok(status) => {
                warn!("{} exited with {}", program, status);
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(RunError::TooManyElements { program }),
            Err(source) => Err(RunError::Launch { program, source }),
        }
    }
}

#[cfg(not(windows))]
fn build_command(command_line: &str) -> Result<(String, Command), RunError> {
    let mut parts = shlex::split(command_line).ok_or(RunError::MalformedCommand)?.into_iter();
    let program = parts.next().ok_or(RunError::MalformedCommand)?;
    let mut command = Command::new(&program);
    command.args(parts);
    Ok((program, command))
}

// Windows paths are full of backslashes, so only the program is split off and the rest is
// passed through untouched, the same way CreateProcess would see it.
#[cfg(windows)]
fn build_command(command_line: &str) -> Result<(String, Command), RunError> {
    use std::os::windows::process::CommandExt;

    let line = command_line.trim_start();
    let (program, rest) = if let Some(quoted) = line.strip_prefix('"') {
        let end = quoted.find('"').ok_or(RunError::MalformedCommand)?;
        (&quoted[..end], &quoted[end + 1..])
    } else {
        line.split_once(char::is_whitespace).unwrap_or((line, ""))
    };
    if program.is_empty() {
        return Err(RunError::MalformedCommand);
    }
    let mut command = Command::new(program);
    let rest = rest.trim_start();
    if !rest.is_empty() {
        command.raw_arg(rest);
    }
    Ok((program.to_string(), command))
}
