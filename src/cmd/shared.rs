/*!
shared.rs - state shared by every subcommand.

Focus:
  - Session: the AWS base command + the process runner, built once in main
  - resolve_aws_cli / resolve_timeout: flag > env > default
*/

use std::time::Duration;

use anyhow::{Context, Result};

use crate::aws::AwsCli;
use crate::exec::{ProcessRunner, Runner};

pub const AWS_CLI_ENV: &str = "OPSKIT_AWS_CLI";
pub const TIMEOUT_ENV: &str = "OPSKIT_TIMEOUT";

/// Everything a subcommand needs to talk to the outside world.
pub struct Session {
    pub aws: AwsCli,
    pub runner: Box<dyn Runner>,
}

impl Session {
    pub fn new(aws: AwsCli, runner: Box<dyn Runner>) -> Self {
        Self { aws, runner }
    }

    /// Real processes, with an optional per-invocation timeout.
    pub fn with_processes(aws: AwsCli, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self::new(aws, Box::new(ProcessRunner::new(timeout)?)))
    }

    pub fn runner(&self) -> &dyn Runner {
        self.runner.as_ref()
    }
}

/// Non-empty environment variable.
pub fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

/// `--aws-cli` > OPSKIT_AWS_CLI > "aws".
pub fn resolve_aws_cli(flag: Option<String>, env: Option<String>) -> Result<AwsCli> {
    let raw = flag
        .or(env)
        .unwrap_or_else(|| AwsCli::DEFAULT.to_string());
    AwsCli::parse(&raw).with_context(|| format!("Invalid AWS CLI command: '{raw}'"))
}

/// `--timeout` > OPSKIT_TIMEOUT > none. Zero disables the timeout.
pub fn resolve_timeout(flag: Option<u64>, env: Option<String>) -> Result<Option<Duration>> {
    let secs = match (flag, env) {
        (Some(s), _) => s,
        (None, Some(raw)) => raw
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{TIMEOUT_ENV} must be a whole number of seconds, got '{raw}'"))?,
        (None, None) => return Ok(None),
    };
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aws_cli_flag_beats_env() {
        let cli = resolve_aws_cli(Some("aws --profile a".into()), Some("aws --profile b".into()))
            .unwrap();
        assert_eq!(cli.to_string(), "aws --profile a");
    }

    #[test]
    fn aws_cli_defaults() {
        assert_eq!(resolve_aws_cli(None, None).unwrap(), AwsCli::default());
        assert_eq!(
            resolve_aws_cli(None, Some("aws2".into())).unwrap().to_string(),
            "aws2"
        );
    }

    #[test]
    fn aws_cli_unbalanced_quotes_rejected() {
        assert!(resolve_aws_cli(Some("aws 'oops".into()), None).is_err());
    }

    #[test]
    fn timeout_resolution() {
        assert_eq!(resolve_timeout(None, None).unwrap(), None);
        assert_eq!(
            resolve_timeout(Some(5), Some("9".into())).unwrap(),
            Some(Duration::from_secs(5))
        );
        assert_eq!(
            resolve_timeout(None, Some(" 9 ".into())).unwrap(),
            Some(Duration::from_secs(9))
        );
        assert_eq!(resolve_timeout(Some(0), None).unwrap(), None);
        assert!(resolve_timeout(None, Some("soon".into())).is_err());
    }
}
