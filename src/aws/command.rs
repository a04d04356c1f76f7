//! AWS subcommand argument builders and the pagination loop.
//!
//! Each variant of `AwsCommand` is pure data; `args()` turns it into the
//! argument list that follows the base `aws` tokens. Pagination is driven by
//! a `PageKeys` constant naming the results key, the token key and the flag
//! used to pass the token back.

use serde_json::Value;

use super::AwsCli;
use super::ssm::PutParameter;
use crate::error::{OpsError, OpsResult};
use crate::exec::{Invocation, Runner, run_json};

/// Maximum names `ssm get-parameters` accepts per call.
pub const MAX_PARAMETER_NAMES: usize = 10;

/// One AWS CLI subcommand with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AwsCommand {
    ListClusters,
    ListServices { cluster: String },
    /// Always filtered to `RUNNING` tasks.
    ListTasks { cluster: String, service: String },
    DescribeTasks { cluster: String, task: String },
    DescribeContainerInstances { cluster: String, container_instance: String },
    DescribeInstances { instance_id: String },
    DescribeParameters { name_prefix: Option<String> },
    /// Use [`AwsCommand::get_parameters`] to build; it enforces the batch limit.
    GetParameters { names: Vec<String> },
    /// Use [`AwsCommand::put_parameter`] to build; it renders the input JSON
    /// for URL values up front.
    PutParameter {
        put: PutParameter,
        input_json: Option<String>,
    },
}

impl AwsCommand {
    /// Checked constructor: 1..=10 names.
    pub fn get_parameters(names: Vec<String>) -> OpsResult<Self> {
        if names.is_empty() {
            return Err(OpsError::InvalidInput(
                "One or more parameter names must be provided.".into(),
            ));
        }
        if names.len() > MAX_PARAMETER_NAMES {
            return Err(OpsError::InvalidInput(format!(
                "Can't request more than {MAX_PARAMETER_NAMES} parameters at once."
            )));
        }
        Ok(AwsCommand::GetParameters { names })
    }

    /// Checked constructor: URL-like values go through `--cli-input-json`.
    pub fn put_parameter(put: PutParameter) -> OpsResult<Self> {
        let input_json = if put.value_is_url() {
            Some(put.cli_input_json()?)
        } else {
            None
        };
        Ok(AwsCommand::PutParameter { put, input_json })
    }

    /// Arguments following the base executable tokens.
    pub fn args(&self) -> Vec<String> {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        match self {
            AwsCommand::ListClusters => owned(&["ecs", "list-clusters"]),
            AwsCommand::ListServices { cluster } => {
                owned(&["ecs", "list-services", "--cluster", cluster.as_str()])
            }
            AwsCommand::ListTasks { cluster, service } => owned(&[
                "ecs",
                "list-tasks",
                "--cluster",
                cluster.as_str(),
                "--service",
                service.as_str(),
                "--desired-status",
                "RUNNING",
            ]),
            AwsCommand::DescribeTasks { cluster, task } => {
                owned(&["ecs", "describe-tasks", "--cluster", cluster.as_str(), "--tasks", task.as_str()])
            }
            AwsCommand::DescribeContainerInstances {
                cluster,
                container_instance,
            } => owned(&[
                "ecs",
                "describe-container-instances",
                "--cluster",
                cluster.as_str(),
                "--container-instances",
                container_instance.as_str(),
            ]),
            AwsCommand::DescribeInstances { instance_id } => {
                owned(&["ec2", "describe-instances", "--instance-ids", instance_id.as_str()])
            }
            AwsCommand::DescribeParameters { name_prefix } => {
                let mut args = owned(&["ssm", "describe-parameters"]);
                if let Some(prefix) = name_prefix.as_deref().filter(|p| !p.is_empty()) {
                    args.push("--filters".into());
                    args.push(format!("Key=Name,Values={prefix}"));
                }
                args
            }
            AwsCommand::GetParameters { names } => {
                let mut args = owned(&["ssm", "get-parameters", "--names"]);
                args.extend(names.iter().cloned());
                args.push("--with-decryption".into());
                args
            }
            AwsCommand::PutParameter {
                input_json: Some(json),
                ..
            } => owned(&["ssm", "put-parameter", "--cli-input-json", json.as_str()]),
            AwsCommand::PutParameter {
                put,
                input_json: None,
            } => owned(&[
                "ssm",
                "put-parameter",
                "--name",
                put.name.as_str(),
                "--value",
                put.value.as_str(),
                "--type",
                put.kind.as_str(),
                if put.overwrite { "--overwrite" } else { "--no-overwrite" },
            ]),
        }
    }
}

/* ---- Pagination ---- */

/// Where a paged API keeps its results and continuation token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageKeys {
    /// Key of the results array in each page.
    pub results: &'static str,
    /// Key of the continuation token in each page.
    pub token: &'static str,
    /// Flag passing the token back on the next call.
    pub token_flag: &'static str,
}

pub const CLUSTER_PAGES: PageKeys = PageKeys {
    results: "clusterArns",
    token: "nextToken",
    token_flag: "--next-token",
};

pub const SERVICE_PAGES: PageKeys = PageKeys {
    results: "serviceArns",
    token: "nextToken",
    token_flag: "--next-token",
};

pub const PARAMETER_PAGES: PageKeys = PageKeys {
    results: "Parameters",
    token: "NextToken",
    token_flag: "--next-token",
};

/// Run `cmd` repeatedly, following the continuation token until none is returned.
///
/// Results keep page order and within-page order. An empty first page without a
/// token yields an empty vec.
pub fn paginate(
    runner: &dyn Runner,
    aws: &AwsCli,
    cmd: &AwsCommand,
    keys: &PageKeys,
) -> OpsResult<Vec<Value>> {
    paginate_with(runner, keys, |token| {
        let extra = match token {
            Some(t) => vec![keys.token_flag.to_string(), t.to_string()],
            None => Vec::new(),
        };
        aws.invocation(cmd, &extra)
    })
}

/// Pagination over an arbitrary invocation builder (`None` = first page).
pub fn paginate_with<F>(runner: &dyn Runner, keys: &PageKeys, build: F) -> OpsResult<Vec<Value>>
where
    F: Fn(Option<&str>) -> Invocation,
{
    let mut results = Vec::new();
    let mut token: Option<String> = None;
    let mut page_no = 0usize;

    loop {
        let page = run_json(runner, &build(token.as_deref()))?;
        page_no += 1;

        let items = page
            .get(keys.results)
            .and_then(Value::as_array)
            .ok_or_else(|| OpsError::MissingField(keys.results.to_string()))?;
        crate::log_trace!("page {page_no}: {} item(s)", items.len());
        results.extend(items.iter().cloned());

        token = page
            .get(keys.token)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string);
        if token.is_none() {
            return Ok(results);
        }
    }
}

/// Interpret a list of JSON values as strings (ARN listings).
pub fn string_list(values: Vec<Value>, what: &str) -> OpsResult<Vec<String>> {
    values
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Ok(s),
            _ => Err(OpsError::MissingField(format!("{what}[] (expected strings)"))),
        })
        .collect()
}
