//! AWS CLI wrappers.
//!
//! AwsCli (base tokens) + AwsCommand (per-subcommand args) -> Invocation.
//! paginate / grouper / match_arn are the shared building blocks;
//! `ecs` and `ssm` compose them into the actual workflows.

pub mod batch;
pub mod command;
pub mod ecs;
pub mod ssm;

use std::fmt;

use crate::error::{OpsError, OpsResult};
use crate::exec::Invocation;

pub use batch::grouper;
pub use command::{AwsCommand, paginate};

/// Base executable tokens for every AWS call, e.g. `aws` or `aws --profile prod`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsCli {
    program: String,
    prefix: Vec<String>,
}

impl AwsCli {
    pub const DEFAULT: &'static str = "aws";

    /// Parse a shell-style command line (quotes honoured).
    pub fn parse(raw: &str) -> OpsResult<Self> {
        let mut parts = shell_words::split(raw.trim())
            .map_err(|e| OpsError::InvalidInput(format!("invalid AWS CLI command '{raw}': {e}")))?
            .into_iter();
        let program = parts
            .next()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| OpsError::InvalidInput("AWS CLI command is empty".into()))?;
        Ok(Self {
            program,
            prefix: parts.collect(),
        })
    }

    /// Full invocation for `cmd`, with `extra` arguments appended last.
    pub fn invocation(&self, cmd: &AwsCommand, extra: &[String]) -> Invocation {
        let args = self
            .prefix
            .iter()
            .cloned()
            .chain(cmd.args())
            .chain(extra.iter().cloned());
        Invocation::new(self.program.clone(), args)
    }
}

impl Default for AwsCli {
    fn default() -> Self {
        Self {
            program: Self::DEFAULT.to_string(),
            prefix: Vec::new(),
        }
    }
}

impl fmt::Display for AwsCli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let words = std::iter::once(&self.program).chain(self.prefix.iter());
        f.write_str(&shell_words::join(words))
    }
}

/// Return the unique ARN containing `name` (case-sensitive substring).
///
/// Zero matches lists every candidate in the error; several matches list only
/// the matching ones.
pub fn match_arn<'a>(name: &str, arns: &'a [String]) -> OpsResult<&'a str> {
    let matches: Vec<&'a str> = arns
        .iter()
        .map(String::as_str)
        .filter(|arn| arn.contains(name))
        .collect();
    match matches.as_slice() {
        [only] => Ok(*only),
        [] => Err(OpsError::NoResourceFound(format!(
            "No resource matching name {name} found. Available resources:\n{}",
            arns.join("\n")
        ))),
        _ => Err(OpsError::NoResourceFound(format!(
            "More than one resource found for name {name}:\n{}",
            matches.join("\n")
        ))),
    }
}

/// Last `/` segment of an ARN (`arn:aws:ecs:...:cluster/prod` -> `prod`).
pub fn name_from_arn(arn: &str) -> &str {
    arn.rsplit('/').next().unwrap_or(arn)
}
