use anyhow::Result;
use clap::{Parser, Subcommand};

mod aws;
mod cmd;
mod error;
mod exec;
mod git;
mod utils;

use cmd::shared::{AWS_CLI_ENV, Session, TIMEOUT_ENV, env_value, resolve_aws_cli, resolve_timeout};
use cmd::{BootstrapArgs, EcsServicesArgs, EcsUrlArgs, FetchParamsArgs, SetParamArgs, UpdateArgs};
use utils::output::{Color, color};

/// opskit - small operational helpers wrapping the AWS CLI and git
///
/// Command layout:
///   opskit ecs-url <cluster> <service>
///   opskit ecs-services [--arn] [--json]
///   opskit fetch-params <prefix> [-o FILE]
///   opskit set-param (-p NAME -v VALUE | -j FILE) [-t TYPE] [-o]
///   opskit bootstrap <settings>
///   opskit update <settings> [--branch NAME]
///
/// Global flags / env:
///   -v / -vv / -vvv   Log info / debug (every external command) / trace to stderr
///                     (before the subcommand; set-param's -v is the value)
///   -q / --quiet      Errors only
///   --aws-cli CMD     Base AWS command (or OPSKIT_AWS_CLI), e.g. "aws --profile prod"
///   --timeout SECS    Kill external commands running longer than SECS (or OPSKIT_TIMEOUT)
///
/// Exit code: 0 on success, 1 on any handled error.
#[derive(Parser, Debug)]
#[command(
    name = "opskit",
    version,
    author,
    about = "opskit - small operational helpers wrapping the AWS CLI and git",
    propagate_version = true,
    disable_help_subcommand = true
)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv); goes before the subcommand
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Silence all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Base AWS CLI command (shell-style words)
    #[arg(long = "aws-cli", global = true, value_name = "CMD")]
    aws_cli: Option<String>,

    /// Per-command timeout in seconds (0 = none)
    #[arg(long, global = true, value_name = "SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the private DNS name of an EC2 instance running an ECS service
    EcsUrl(EcsUrlArgs),

    /// List ECS services for all available clusters
    EcsServices(EcsServicesArgs),

    /// Fetch Parameter Store parameters by name prefix
    FetchParams(FetchParamsArgs),

    /// Create or update Parameter Store parameters
    SetParam(SetParamArgs),

    /// Clone the repositories listed in a settings file
    Bootstrap(BootstrapArgs),

    /// Update the default branch of every clean repository in a settings file
    Update(UpdateArgs),
}

fn run(cli: Cli) -> Result<()> {
    let aws = resolve_aws_cli(cli.aws_cli, env_value(AWS_CLI_ENV))?;
    let timeout = resolve_timeout(cli.timeout, env_value(TIMEOUT_ENV))?;
    let session = Session::with_processes(aws, timeout)?;

    match cli.command {
        Commands::EcsUrl(args) => cmd::execute_ecs_url(&session, args),
        Commands::EcsServices(args) => cmd::execute_ecs_services(&session, args),
        Commands::FetchParams(args) => cmd::execute_fetch_params(&session, args),
        Commands::SetParam(args) => cmd::execute_set_param(&session, args),
        Commands::Bootstrap(args) => cmd::execute_bootstrap(&session, args),
        Commands::Update(args) => cmd::execute_update(&session, args),
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let level = utils::derive_level(cli.verbose, cli.quiet);
    utils::init_logging(level);

    if let Err(e) = run(cli) {
        log_debug!("{e:?}");
        eprintln!("{}", color(Color::Red, format!("{e:#}")));
        std::process::exit(1);
    }
}
