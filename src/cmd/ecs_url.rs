/*!
`ecs_url.rs`

Implements `opskit ecs-url <cluster> <service>`.

Prints the private DNS name of the EC2 instance running the first RUNNING task of
the service identified by the two (substring) names. Handy for ssh access when
any instance of the service will do.

Errors (exit 1):
  - no / ambiguous cluster or service match
  - no running tasks
  - any AWS CLI failure
*/

use anyhow::{Context, Result};
use clap::Args;

use crate::aws::ecs::resolve_private_dns;
use crate::cmd::shared::Session;

/// CLI arguments for `opskit ecs-url`
#[derive(Args, Debug)]
pub struct EcsUrlArgs {
    /// Cluster name (any unique substring of the cluster ARN)
    pub cluster: String,

    /// Service name (any unique substring of the service ARN)
    pub service: String,
}

pub fn execute_ecs_url(session: &Session, args: EcsUrlArgs) -> Result<()> {
    let dns = resolve_private_dns(session.runner(), &session.aws, &args.cluster, &args.service)
        .with_context(|| format!("Failed to resolve {}/{}", args.cluster, args.service))?;
    println!("{dns}");
    Ok(())
}
