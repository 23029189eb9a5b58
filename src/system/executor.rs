// src/system/executor.rs

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command as StdCommand, Output, Stdio};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("Command could not be parsed: {0}")]
    CommandParse(String),
    #[error("No command specified to run.")]
    EmptyCommand,
    #[error("Command '{0}' could not be executed: {1}")]
    SpawnFailed(String, #[source] std::io::Error),
    #[error("Command '{command}' exited with code {exit_code}.")]
    NonZeroExit { command: String, exit_code: i32 },
    #[error("Command '{command}' produced output that was not valid UTF-8")]
    InvalidUtf8Output {
        command: String,
        #[source]
        source: std::string::FromUtf8Error,
    },
}

/// Captured result of one command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShellOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Runs a command line somewhere and reports what happened.
pub trait ShellRunner: Send + Sync {
    fn run(
        &self,
        command_line: &str,
        cwd: &Path,
        env_vars: &HashMap<String, String>,
    ) -> Result<ShellOutput, ShellError>;
}

/// Spawns real processes, capturing stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemShell;

impl ShellRunner for SystemShell {
    fn run(
        &self,
        command_line: &str,
        cwd: &Path,
        env_vars: &HashMap<String, String>,
    ) -> Result<ShellOutput, ShellError> {
        let trimmed_command = command_line.trim();
        if trimmed_command.is_empty() {
            return Err(ShellError::EmptyCommand);
        }

        let parts = shlex::split(trimmed_command)
            .ok_or_else(|| ShellError::CommandParse(trimmed_command.to_string()))?;
        let Some((program, args)) = parts.split_first() else {
            return Err(ShellError::EmptyCommand);
        };
        let clean_cwd = dunce::simplified(cwd);

        let spawn = |program: &str, args: &[String]| {
            StdCommand::new(program)
                .args(args)
                .current_dir(clean_cwd)
                .envs(env_vars)
                .stdin(Stdio::null())
                .output()
        };

        // Windows built-ins like `echo` only exist inside `cmd`, so retry there.
        let output = match spawn(program.as_str(), args) {
            Ok(output) => output,
            Err(e) if e.kind() == ErrorKind::NotFound && cfg!(target_os = "windows") => {
                log::debug!("Command '{}' not found. Retrying with cmd /C.", program);
                spawn("cmd", ["/C".to_string(), trimmed_command.to_string()].as_slice())
                    .map_err(|e| ShellError::SpawnFailed(trimmed_command.to_string(), e))?
            }
            Err(e) => return Err(ShellError::SpawnFailed(trimmed_command.to_string(), e)),
        };

        into_shell_output(trimmed_command, output)
    }
}

fn into_shell_output(command: &str, output: Output) -> Result<ShellOutput, ShellError> {
    let decode = |bytes: Vec<u8>| {
        String::from_utf8(bytes).map_err(|source| ShellError::InvalidUtf8Output {
            command: command.to_string(),
            source,
        })
    };
    Ok(ShellOutput {
        stdout: decode(output.stdout)?,
        stderr: decode(output.stderr)?,
        // Processes killed by a signal have no code.
        exit_code: output.status.code().unwrap_or(-1),
    })
}

/// The shell-command helper exposed to actions as `ctx.shell`.
///
/// Commands run in the run's working directory with its environment layered
/// over the inherited one.
#[derive(Clone)]
pub struct ShellHelper {
    runner: Arc<dyn ShellRunner>,
    cwd: PathBuf,
    env: HashMap<String, String>,
}

impl fmt::Debug for ShellHelper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShellHelper")
            .field("cwd", &self.cwd)
            .field("env", &self.env.len())
            .finish()
    }
}

impl ShellHelper {
    pub fn new(runner: Arc<dyn ShellRunner>, cwd: PathBuf, env: HashMap<String, String>) -> Self {
        Self { runner, cwd, env }
    }

    /// Runs the command and returns its output whatever the exit code.
    pub fn run(&self, command_line: &str) -> Result<ShellOutput, ShellError> {
        log::debug!("Running shell command '{}' in {:?}", command_line, self.cwd);
        self.runner.run(command_line, &self.cwd, &self.env)
    }

    /// Like `run`, but a non-zero exit code is an error carrying that code.
    pub fn run_checked(&self, command_line: &str) -> Result<ShellOutput, ShellError> {
        let output = self.run(command_line)?;
        if output.success() {
            Ok(output)
        } else {
            Err(ShellError::NonZeroExit {
                command: command_line.trim().to_string(),
                exit_code: output.exit_code,
            })
        }
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records commands and replies with a fixed exit code.
    struct ScriptedShell {
        exit_code: i32,
        seen: Mutex<Vec<(String, PathBuf)>>,
    }

    impl ShellRunner for ScriptedShell {
        fn run(
            &self,
            command_line: &str,
            cwd: &Path,
            _env_vars: &HashMap<String, String>,
        ) -> Result<ShellOutput, ShellError> {
            self.seen
                .lock()
                .unwrap()
                .push((command_line.to_string(), cwd.to_path_buf()));
            Ok(ShellOutput {
                stdout: format!("ran {}", command_line),
                stderr: String::new(),
                exit_code: self.exit_code,
            })
        }
    }

    #[test]
    fn test_run_checked_reports_exit_code() {
        let runner = Arc::new(ScriptedShell {
            exit_code: 3,
            seen: Mutex::new(Vec::new()),
        });
        let helper = ShellHelper::new(runner.clone(), PathBuf::from("/work"), HashMap::new());

        let output = helper.run("make test").unwrap();
        assert_eq!(output.exit_code, 3);
        assert!(!output.success());

        let err = helper.run_checked("make test").unwrap_err();
        assert!(matches!(err, ShellError::NonZeroExit { exit_code: 3, .. }));
        assert_eq!(runner.seen.lock().unwrap()[0].1, PathBuf::from("/work"));
    }

    #[test]
    fn test_system_shell_rejects_empty_and_unparsable() {
        let env = HashMap::new();
        let cwd = std::env::current_dir().unwrap();
        assert!(matches!(
            SystemShell.run("   ", &cwd, &env),
            Err(ShellError::EmptyCommand)
        ));
        assert!(matches!(
            SystemShell.run("echo 'unterminated", &cwd, &env),
            Err(ShellError::CommandParse(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_shell_captures_output() {
        let mut env = HashMap::new();
        env.insert("ACTIONKIT_TEST_VALUE".to_string(), "42".to_string());
        let cwd = std::env::current_dir().unwrap();

        let output = SystemShell
            .run("sh -c 'echo $ACTIONKIT_TEST_VALUE; exit 2'", &cwd, &env)
            .unwrap();
        assert_eq!(output.stdout.trim(), "42");
        assert_eq!(output.exit_code, 2);
    }
}
