//! Parameter Store workflows: fetch by name prefix, and put.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::command::{MAX_PARAMETER_NAMES, PARAMETER_PAGES};
use super::{AwsCli, AwsCommand, grouper, paginate};
use crate::error::{OpsError, OpsResult};
use crate::exec::{Runner, run_checked, run_json};

const PARAMETER_NAME: &str = "Name";

/* ---- Fetch ---- */

/// Names of every parameter whose name matches `prefix`, across all pages.
pub fn parameter_names(runner: &dyn Runner, aws: &AwsCli, prefix: &str) -> OpsResult<Vec<String>> {
    let cmd = AwsCommand::DescribeParameters {
        name_prefix: Some(prefix.to_string()),
    };
    let names = paginate(runner, aws, &cmd, &PARAMETER_PAGES)?
        .iter()
        .map(|p| {
            p.get(PARAMETER_NAME)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    OpsError::MissingField(format!("{}[].{PARAMETER_NAME}", PARAMETER_PAGES.results))
                })
        })
        .collect::<OpsResult<Vec<_>>>()?;

    if names.is_empty() {
        return Err(OpsError::NoParametersFound(format!(
            "No Parameters found for name prefix: {prefix}"
        )));
    }
    Ok(names)
}

/// Decrypted parameter objects for `names`, requested in batches of ten.
pub fn parameter_values(runner: &dyn Runner, aws: &AwsCli, names: Vec<String>) -> OpsResult<Vec<Value>> {
    let mut parameters = Vec::with_capacity(names.len());
    for group in grouper(names.into_iter().map(Some), MAX_PARAMETER_NAMES, None) {
        let batch: Vec<String> = group.into_iter().flatten().collect();
        crate::log_debug!("fetching {} parameter value(s)", batch.len());
        let cmd = AwsCommand::get_parameters(batch)?;
        let page = run_json(runner, &aws.invocation(&cmd, &[]))?;
        let items = page
            .get(PARAMETER_PAGES.results)
            .and_then(Value::as_array)
            .ok_or_else(|| OpsError::MissingField(PARAMETER_PAGES.results.to_string()))?;
        parameters.extend(items.iter().cloned());
    }
    Ok(parameters)
}

/// Names then values: everything under `prefix`.
pub fn fetch_parameters(runner: &dyn Runner, aws: &AwsCli, prefix: &str) -> OpsResult<Vec<Value>> {
    let names = parameter_names(runner, aws, prefix)?;
    crate::log_info!("{} parameter(s) match '{prefix}'", names.len());
    parameter_values(runner, aws, names)
}

/* ---- Put ---- */

/// Parameter Store value types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum ParameterType {
    String,
    StringList,
    #[default]
    SecureString,
}

impl ParameterType {
    pub const fn variants() -> &'static [ParameterType] {
        &[
            ParameterType::String,
            ParameterType::SecureString,
            ParameterType::StringList,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "String",
            ParameterType::StringList => "StringList",
            ParameterType::SecureString => "SecureString",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterType {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterType::variants()
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = ParameterType::variants().iter().map(|t| t.as_str()).collect();
                OpsError::InvalidInput(format!(
                    "Invalid parameter type: {s}. Specify one of: {}",
                    names.join(", ")
                ))
            })
    }
}

/// One `ssm put-parameter` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PutParameter {
    pub name: String,
    pub value: String,
    #[serde(rename = "Type")]
    pub kind: ParameterType,
    pub overwrite: bool,
}

/// Entry of a `set-param` input file (`--cli-input-json` field names).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParameterEntry {
    pub name: Option<String>,
    pub value: Option<String>,
    #[serde(rename = "Type")]
    pub kind: Option<String>,
    pub overwrite: Option<bool>,
}

impl PutParameter {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: ParameterType::default(),
            overwrite: false,
        }
    }

    /// Build from a file entry; absent `Type`/`Overwrite` fall back to the given defaults.
    pub fn from_entry(
        entry: ParameterEntry,
        default_kind: ParameterType,
        default_overwrite: bool,
    ) -> OpsResult<Self> {
        let (Some(name), Some(value)) = (entry.name, entry.value) else {
            return Err(OpsError::InvalidInput(
                "One or more commands missing 'Name' and/or 'Value' keys.".into(),
            ));
        };
        let kind = match entry.kind.as_deref() {
            Some(raw) => raw.parse()?,
            None => default_kind,
        };
        Ok(Self {
            name,
            value,
            kind,
            overwrite: entry.overwrite.unwrap_or(default_overwrite),
        })
    }

    /// The AWS CLI fetches any `--value` starting with `http://` or `https://`
    /// and stores the response body instead; such values must go through
    /// `--cli-input-json`.
    pub fn value_is_url(&self) -> bool {
        self.value.starts_with("http://") || self.value.starts_with("https://")
    }

    pub fn cli_input_json(&self) -> OpsResult<String> {
        serde_json::to_string(self).map_err(OpsError::Encode)
    }
}

/// Run one put; only the exit code matters.
pub fn put_parameter(runner: &dyn Runner, aws: &AwsCli, put: &PutParameter) -> OpsResult<()> {
    let cmd = AwsCommand::put_parameter(put.clone())?;
    run_checked(runner, &aws.invocation(&cmd, &[]))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::ScriptedRunner;
    use serde_json::json;

    fn describe_page(names: &[&str], next: Option<&str>) -> Value {
        let params: Vec<Value> = names.iter().map(|n| json!({"Name": n})).collect();
        match next {
            Some(t) => json!({"Parameters": params, "NextToken": t}),
            None => json!({"Parameters": params}),
        }
    }

    #[test]
    fn no_parameters_found() {
        let runner = ScriptedRunner::new().json(describe_page(&[], None));
        let err = parameter_names(&runner, &AwsCli::default(), "foo").unwrap_err();
        assert!(matches!(err, OpsError::NoParametersFound(_)));
        assert!(err.to_string().contains("No Parameters found for name prefix"));
    }

    #[test]
    fn names_single_page() {
        let runner = ScriptedRunner::new().json(describe_page(&["foo_bar"], None));
        let names = parameter_names(&runner, &AwsCli::default(), "foo").unwrap();
        assert_eq!(names, vec!["foo_bar"]);
        assert_eq!(
            runner.argvs(),
            vec![vec!["aws", "ssm", "describe-parameters", "--filters", "Key=Name,Values=foo"]]
        );
    }

    #[test]
    fn names_multiple_pages() {
        let runner = ScriptedRunner::new()
            .json(describe_page(&["foo_bar"], Some("next")))
            .json(describe_page(&["foo_bang"], None));
        let names = parameter_names(&runner, &AwsCli::default(), "foo").unwrap();
        assert_eq!(names, vec!["foo_bar", "foo_bang"]);
        assert_eq!(
            runner.argvs()[1],
            vec![
                "aws", "ssm", "describe-parameters", "--filters", "Key=Name,Values=foo",
                "--next-token", "next"
            ]
        );
    }

    #[test]
    fn values_single_batch() {
        let runner = ScriptedRunner::new().json(json!({"Parameters":[
            {"Name":"foo_bar","Value":1},
            {"Name":"foo_bang","Value":2}
        ]}));
        let values = parameter_values(
            &runner,
            &AwsCli::default(),
            vec!["foo_bar".into(), "foo_bang".into()],
        )
        .unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0]["Name"], "foo_bar");
        assert_eq!(values[1]["Value"], 2);
        assert_eq!(
            runner.argvs(),
            vec![vec![
                "aws", "ssm", "get-parameters", "--names", "foo_bar", "foo_bang",
                "--with-decryption"
            ]]
        );
    }

    #[test]
    fn values_are_batched_by_ten() {
        let names: Vec<String> = (0..23).map(|i| format!("p{i}")).collect();
        let runner = ScriptedRunner::new()
            .json(json!({"Parameters":[{"Name":"a"}]}))
            .json(json!({"Parameters":[{"Name":"b"}]}))
            .json(json!({"Parameters":[{"Name":"c"}]}));
        let values = parameter_values(&runner, &AwsCli::default(), names).unwrap();
        let got: Vec<&str> = values.iter().filter_map(|v| v["Name"].as_str()).collect();
        assert_eq!(got, vec!["a", "b", "c"]);

        let calls = runner.argvs();
        assert_eq!(calls.len(), 3);
        // 4 fixed tokens + names + --with-decryption
        assert_eq!(calls[0].len(), 4 + 10 + 1);
        assert_eq!(calls[2].len(), 4 + 3 + 1);
        assert_eq!(calls[2][4], "p20");
    }

    #[test]
    fn fetch_runs_names_then_values() {
        let runner = ScriptedRunner::new()
            .json(describe_page(&["foo_a"], None))
            .json(json!({"Parameters":[{"Name":"foo_a","Value":"x"}]}));
        let values = fetch_parameters(&runner, &AwsCli::default(), "foo").unwrap();
        assert_eq!(values, vec![json!({"Name":"foo_a","Value":"x"})]);
    }

    #[test]
    fn invalid_type_rejected() {
        let err = "BAD".parse::<ParameterType>().unwrap_err();
        assert!(err.to_string().contains("Invalid parameter type"));
        assert_eq!("StringList".parse::<ParameterType>().unwrap(), ParameterType::StringList);
    }

    #[test]
    fn cli_input_json_format() {
        let put = PutParameter::new("foo", "bar");
        assert_eq!(
            put.cli_input_json().unwrap(),
            r#"{"Name":"foo","Value":"bar","Type":"SecureString","Overwrite":false}"#
        );
    }

    #[test]
    fn url_detection() {
        assert!(PutParameter::new("p", "http://example.com").value_is_url());
        assert!(PutParameter::new("p", "https://example.com/path").value_is_url());
        assert!(!PutParameter::new("p", "example.com").value_is_url());
        assert!(!PutParameter::new("p", "foo").value_is_url());
        assert!(!PutParameter::new("p", "ftp://example.com").value_is_url());
        assert!(!PutParameter::new("p", " http://example.com").value_is_url());
    }

    #[test]
    fn unparseable_http_values_still_avoid_value_flag() {
        for value in ["http://", "https://", "https://exa mple.com", "http://[::1"] {
            let put = PutParameter::new("n", value);
            assert!(put.value_is_url(), "{value}");
            let args = AwsCommand::put_parameter(put).unwrap().args();
            assert_eq!(args[2], "--cli-input-json", "{value}");
            assert!(!args.iter().any(|a| a == "--value"), "{value}");
        }
    }

    #[test]
    fn put_args_plain_value() {
        let put = PutParameter::new("foo", "bar");
        assert_eq!(
            AwsCommand::put_parameter(put).unwrap().args(),
            vec![
                "ssm", "put-parameter", "--name", "foo", "--value", "bar", "--type",
                "SecureString", "--no-overwrite"
            ]
        );
        let put = PutParameter {
            overwrite: true,
            ..PutParameter::new("foo", "bar")
        };
        let args = AwsCommand::put_parameter(put).unwrap().args();
        assert_eq!(args.last().map(String::as_str), Some("--overwrite"));
    }

    #[test]
    fn put_args_url_value_uses_cli_input_json() {
        let put = PutParameter::new("foo", "http://example.com");
        let input = put.cli_input_json().unwrap();
        assert_eq!(
            AwsCommand::put_parameter(put).unwrap().args(),
            vec!["ssm".to_string(), "put-parameter".into(), "--cli-input-json".into(), input]
        );
    }

    #[test]
    fn from_entry_uses_explicit_fields() {
        let entry: ParameterEntry = serde_json::from_value(json!({
            "Name":"foo","Value":"bar","Type":"StringList","Overwrite":true
        }))
        .unwrap();
        let put = PutParameter::from_entry(entry, ParameterType::String, false).unwrap();
        assert_eq!(put.name, "foo");
        assert_eq!(put.value, "bar");
        assert_eq!(put.kind, ParameterType::StringList);
        assert!(put.overwrite);
    }

    #[test]
    fn from_entry_falls_back_to_defaults() {
        let entry: ParameterEntry =
            serde_json::from_value(json!({"Name":"foo","Value":"bar"})).unwrap();
        let put = PutParameter::from_entry(entry, ParameterType::SecureString, false).unwrap();
        assert_eq!(put.kind, ParameterType::SecureString);
        assert!(!put.overwrite);
    }

    #[test]
    fn from_entry_requires_name_and_value() {
        let entry: ParameterEntry = serde_json::from_value(json!({"this":"that"})).unwrap();
        let err = PutParameter::from_entry(entry, ParameterType::String, false).unwrap_err();
        assert!(err.to_string().contains("missing 'Name' and/or 'Value'"));
    }

    #[test]
    fn put_parameter_failure_is_non_zero_exit() {
        let runner = ScriptedRunner::new().exit(255);
        let err = put_parameter(&runner, &AwsCli::default(), &PutParameter::new("a", "b"))
            .unwrap_err();
        assert!(matches!(err, OpsError::NonZeroExitCode(255)));
    }
}
