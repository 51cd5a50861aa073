//! `execute_command`: run a shell command bounded by a deadline
//!
//! The child runs on a current-thread runtime owned by the call, so the
//! serving loop stays single-threaded. When the deadline elapses the child is
//! killed and the call fails with "timed out".

use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::error::Result;
use crate::registry::{
    CapabilityDescriptor, Content, Failure, HandlerOutcome, ParameterSpec, ValidatedArgs,
};

pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CommandRunner {
    shell: String,
    max_timeout: Duration,
}

impl CommandRunner {
    pub fn new(shell: impl Into<String>, max_timeout: Duration) -> Self {
        Self {
            shell: shell.into(),
            max_timeout,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.shell.clone(),
            config.max_command_timeout()?,
        ))
    }

    fn build(&self, command: &str) -> Command {
        let mut cmd = if cfg!(windows) {
            let mut cmd = Command::new(&self.shell);
            cmd.arg("/C").arg(command);
            cmd
        } else {
            // fold stderr into stdout so output keeps its interleaving
            let mut cmd = Command::new(&self.shell);
            cmd.arg("-c").arg(format!("exec 2>&1\n{}", command));
            cmd
        };
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Run `command`, returning combined stdout and stderr
    pub fn run(&self, command: &str, timeout_secs: f64) -> std::result::Result<String, Failure> {
        if !timeout_secs.is_finite() || timeout_secs <= 0.0 {
            return Err(Failure::invalid_params("timeout must be a positive number"));
        }
        // clamp before converting; large values would overflow Duration
        let timeout =
            Duration::from_secs_f64(timeout_secs.min(self.max_timeout.as_secs_f64()));

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| Failure::internal(format!("Failed to start runtime: {}", e)))?;

        debug!("Executing command with {:?} deadline", timeout);
        let mut cmd = self.build(command);

        runtime.block_on(async move {
            let child = cmd
                .spawn()
                .map_err(|e| Failure::internal(format!("Command failed: {}", e)))?;

            let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
                Ok(result) => {
                    result.map_err(|e| Failure::internal(format!("Command failed: {}", e)))?
                }
                Err(_) => {
                    warn!("Command exceeded {:?} deadline, killed", timeout);
                    return Err(Failure::internal("timed out"));
                }
            };

            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));

            if output.status.success() {
                Ok(combined)
            } else {
                Err(Failure::internal(format!(
                    "Command failed: {}\nOutput: {}",
                    output.status, combined
                )))
            }
        })
    }

    pub fn handle(&self, args: &ValidatedArgs) -> HandlerOutcome {
        self.run(args.str("command")?, args.number("timeout")?)
            .map(Content::Text)
    }
}

pub fn descriptor() -> CapabilityDescriptor {
    CapabilityDescriptor::new(
        "execute_command",
        "Execute a shell command and return the output",
    )
    .param(ParameterSpec::string("command", "The command to execute").required())
    .param(
        ParameterSpec::number("timeout", "Timeout in seconds (default: 30)")
            .with_default(DEFAULT_TIMEOUT_SECS),
    )
}

#[cfg(all(test, unix))]
mod tests {
    use std::time::Instant;

    use super::*;
    use crate::registry::FailureKind;

    fn runner() -> CommandRunner {
        CommandRunner::new("/bin/sh", Duration::from_secs(10))
    }

    #[test]
    fn test_echo_completes_quickly() {
        let start = Instant::now();
        let output = runner().run("echo hi", 1.0).unwrap();
        assert!(output.contains("hi"));
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[test]
    fn test_stderr_is_included() {
        let output = runner().run("echo out; echo err 1>&2", 5.0).unwrap();
        assert!(output.contains("out"));
        assert!(output.contains("err"));
    }

    #[test]
    fn test_non_zero_exit_is_internal_error() {
        let failure = runner().run("echo nope; exit 3", 5.0).unwrap_err();
        assert_eq!(failure.kind, FailureKind::InternalError);
        assert!(failure.message.starts_with("Command failed"));
        assert!(failure.message.contains("nope"));
    }

    #[test]
    fn test_deadline_kills_command() {
        let start = Instant::now();
        let failure = runner().run("sleep 5", 0.2).unwrap_err();
        assert_eq!(failure, Failure::internal("timed out"));
        assert!(start.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_timeout_clamped_to_maximum() {
        let short = CommandRunner::new("/bin/sh", Duration::from_millis(200));
        let failure = short.run("sleep 5", 60.0).unwrap_err();
        assert_eq!(failure.message, "timed out");
    }

    #[test]
    fn test_huge_timeout_clamped_not_rejected() {
        let output = runner().run("echo hi", 1e20).unwrap();
        assert!(output.contains("hi"));
    }

    #[test]
    fn test_huge_timeout_through_dispatch() {
        use crate::registry::{Dispatcher, IncomingCall, Namespace, Registry};
        use serde_json::json;

        let mut registry = Registry::new();
        let shared = runner();
        registry
            .register(Namespace::Tools, descriptor(), move |args| shared.handle(args))
            .unwrap();
        let dispatcher = Dispatcher::new(registry);

        let arguments = json!({"command": "echo hi", "timeout": 1e20});
        let call = IncomingCall::from_value(Namespace::Tools, "execute_command", Some(&arguments))
            .unwrap();
        let content = dispatcher.dispatch(&call).unwrap();
        assert!(content.to_text().contains("hi"));
    }

    #[test]
    fn test_from_config_rejects_unrepresentable_maximum() {
        let config = ServerConfig {
            max_command_timeout_secs: 1e20,
            ..ServerConfig::default()
        };
        assert!(CommandRunner::from_config(&config).is_err());
    }

    #[test]
    fn test_non_positive_timeout_rejected() {
        let failure = runner().run("echo hi", 0.0).unwrap_err();
        assert_eq!(failure.kind, FailureKind::InvalidParams);
    }
}
