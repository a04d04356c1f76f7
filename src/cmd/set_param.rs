/*!
`set_param.rs`

Implements `opskit set-param`, creating or updating Parameter Store parameters.

Either a single parameter:
    opskit set-param -p NAME -v VALUE [-t TYPE] [-o]

or many, from a JSON/YAML file shaped like `put-parameter --cli-input-json`:
    opskit set-param -j params.json [-t TYPE] [-o]

    [
      { "Name": "a", "Value": "1" },
      { "Name": "b", "Value": "2", "Type": "String", "Overwrite": true }
    ]

Entries without "Type" / "Overwrite" take the `-t` / `-o` values. TYPE is one of
String, StringList, SecureString (default). Parameters are written in order and
the first failure stops the run.
*/

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::aws::ssm::{ParameterEntry, ParameterType, PutParameter, put_parameter};
use crate::cmd::shared::Session;
use crate::utils::load_structured_file;
use crate::utils::output::{Color, color};

/// CLI arguments for `opskit set-param`
#[derive(Args, Debug)]
pub struct SetParamArgs {
    /// Parameter name
    #[arg(short = 'p', long = "parameter", value_name = "NAME")]
    pub parameter: Option<String>,

    /// Parameter value
    #[arg(short = 'v', long, value_name = "VALUE")]
    pub value: Option<String>,

    /// Value type (String | StringList | SecureString)
    #[arg(short = 't', long = "type", value_name = "TYPE", default_value_t = ParameterType::SecureString)]
    pub kind: ParameterType,

    /// Overwrite an existing parameter
    #[arg(short = 'o', long)]
    pub overwrite: bool,

    /// Read parameters from a JSON or YAML file instead
    #[arg(short = 'j', long = "json", value_name = "FILE", conflicts_with_all = ["parameter", "value"])]
    pub input: Option<PathBuf>,
}

/// Turn the arguments into the list of puts to perform.
pub fn collect_puts(args: &SetParamArgs) -> Result<Vec<PutParameter>> {
    if let Some(path) = &args.input {
        let entries: Vec<ParameterEntry> = load_structured_file(path)
            .with_context(|| format!("invalid parameter file: {}", path.display()))?;
        return entries
            .into_iter()
            .map(|e| PutParameter::from_entry(e, args.kind, args.overwrite).map_err(Into::into))
            .collect();
    }

    let (Some(name), Some(value)) = (&args.parameter, &args.value) else {
        bail!("provide -p/--parameter and -v/--value, or -j/--json FILE");
    };
    Ok(vec![PutParameter {
        kind: args.kind,
        overwrite: args.overwrite,
        ..PutParameter::new(name.as_str(), value.as_str())
    }])
}

pub fn execute_set_param(session: &Session, args: SetParamArgs) -> Result<()> {
    for put in collect_puts(&args)? {
        put_parameter(session.runner(), &session.aws, &put)
            .with_context(|| format!("Failed to set parameter '{}'", put.name))?;
        println!(
            "{}",
            color(Color::Green, format!("Success! {} = {}", put.name, put.value))
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws::AwsCli;
    use crate::exec::testing::ScriptedRunner;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct TestCli {
        #[command(flatten)]
        args: SetParamArgs,
    }

    fn parse(argv: &[&str]) -> SetParamArgs {
        TestCli::try_parse_from(std::iter::once("t").chain(argv.iter().copied()))
            .unwrap()
            .args
    }

    fn temp_file(name: &str, body: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("opskit-{}-{name}", std::process::id()));
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn single_parameter_defaults() {
        let args = parse(&["-p", "foo", "--value", "bar"]);
        let puts = collect_puts(&args).unwrap();
        assert_eq!(puts, vec![PutParameter::new("foo", "bar")]);
    }

    #[test]
    fn type_and_overwrite_flags() {
        let args = parse(&["-p", "foo", "-v", "bar", "-t", "StringList", "-o"]);
        let puts = collect_puts(&args).unwrap();
        assert_eq!(puts[0].kind, ParameterType::StringList);
        assert!(puts[0].overwrite);
    }

    #[test]
    fn invalid_type_is_usage_error() {
        let err = TestCli::try_parse_from(["t", "-p", "a", "--value", "b", "-t", "BAD"]).unwrap_err();
        assert!(err.to_string().contains("Invalid parameter type"));
    }

    #[test]
    fn json_file_conflicts_with_single_parameter() {
        assert!(TestCli::try_parse_from(["t", "-j", "x.json", "-p", "a"]).is_err());
    }

    #[test]
    fn missing_value_rejected() {
        let args = parse(&["-p", "foo"]);
        assert!(collect_puts(&args).is_err());
    }

    #[test]
    fn json_file_entries_take_flag_defaults() {
        let path = temp_file(
            "multi.json",
            r#"[{"Name":"A","Value":"1"},{"Name":"B","Value":"2","Type":"String","Overwrite":false}]"#,
        );
        let args = parse(&["-j", path.to_str().unwrap(), "-t", "StringList", "-o"]);
        let puts = collect_puts(&args).unwrap();
        assert_eq!(puts.len(), 2);
        assert_eq!((puts[0].kind, puts[0].overwrite), (ParameterType::StringList, true));
        assert_eq!((puts[1].kind, puts[1].overwrite), (ParameterType::String, false));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn yaml_file_supported() {
        let path = temp_file("multi.yaml", "- Name: A\n  Value: \"1\"\n");
        let args = parse(&["-j", path.to_str().unwrap()]);
        let puts = collect_puts(&args).unwrap();
        assert_eq!(puts, vec![PutParameter::new("A", "1")]);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn json_entry_missing_keys_rejected() {
        let path = temp_file("bad.json", r#"[{"this":"that"}]"#);
        let args = parse(&["-j", path.to_str().unwrap()]);
        let err = collect_puts(&args).unwrap_err();
        assert!(err.to_string().contains("missing 'Name' and/or 'Value'"));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn puts_run_in_order_and_stop_on_failure() {
        let path = temp_file(
            "order.json",
            r#"[{"Name":"A","Value":"1"},{"Name":"B","Value":"2"},{"Name":"C","Value":"3"}]"#,
        );
        let runner = ScriptedRunner::new().exit(0).exit(255).exit(0);
        let session = Session::new(AwsCli::default(), Box::new(runner));
        let args = parse(&["-j", path.to_str().unwrap()]);
        let err = execute_set_param(&session, args).unwrap_err();
        assert!(err.to_string().contains("Failed to set parameter 'B'"));
        let _ = std::fs::remove_file(&path);
    }
}
