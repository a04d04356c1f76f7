/*!
`fetch_params.rs`

Implements `opskit fetch-params <prefix> [-o FILE]`.

Collects name, type and (decrypted) value of every Parameter Store parameter
whose name matches `prefix`, and prints them as a pretty JSON array (stdout, or
FILE with `-o`).

Flow: describe-parameters (paginated) -> names -> get-parameters in batches of 10.
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::aws::ssm::fetch_parameters;
use crate::cmd::shared::Session;

/// CLI arguments for `opskit fetch-params`
#[derive(Args, Debug)]
pub struct FetchParamsArgs {
    /// Parameter name prefix to filter by
    pub prefix: String,

    /// Write the JSON array to this file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,
}

pub fn execute_fetch_params(session: &Session, args: FetchParamsArgs) -> Result<()> {
    let parameters = fetch_parameters(session.runner(), &session.aws, &args.prefix)
        .with_context(|| format!("Failed to fetch parameters for prefix '{}'", args.prefix))?;
    let rendered = serde_json::to_string_pretty(&parameters)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, format!("{rendered}\n"))
                .with_context(|| format!("failed to write {}", path.display()))?;
            crate::log_info!("wrote {} parameter(s) to {}", parameters.len(), path.display());
        }
        None => println!("{rendered}"),
    }
    Ok(())
}
