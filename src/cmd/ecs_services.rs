/*!
`ecs_services.rs`

Implements `opskit ecs-services [--arn] [--json]`.

Default output, one service per line:

    cluster_a service_a
    cluster_a service_b
    cluster_b service_c

`--arn` prints the full ARNs instead of the last path segment. `--json` prints
`[{"cluster": "...", "service": "..."}]` (short or full names, per `--arn`).
*/

use anyhow::{Context, Result};
use clap::Args;

use crate::aws::ecs::{ServiceEntry, list_services};
use crate::cmd::shared::Session;

/// CLI arguments for `opskit ecs-services`
#[derive(Args, Debug)]
pub struct EcsServicesArgs {
    /// Print full ARNs instead of just names
    #[arg(long)]
    pub arn: bool,

    /// Output JSON instead of plain lines
    #[arg(long)]
    pub json: bool,
}

pub fn execute_ecs_services(session: &Session, args: EcsServicesArgs) -> Result<()> {
    let entries = list_services(session.runner(), &session.aws)
        .context("Failed to list ECS services")?;
    let rows: Vec<ServiceEntry> = if args.arn {
        entries
    } else {
        entries.iter().map(ServiceEntry::short).collect()
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }
    for row in &rows {
        println!("{} {}", row.cluster, row.service);
    }
    Ok(())
}
