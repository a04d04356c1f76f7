/*!
Subcommand dispatcher module.

Layout:
  src/cmd/
    mod.rs            (this file: declarations + re-exports)
    shared.rs         (Session, flag/env resolution)
    ecs_url.rs        (EcsUrlArgs      + execute_ecs_url)
    ecs_services.rs   (EcsServicesArgs + execute_ecs_services)
    fetch_params.rs   (FetchParamsArgs + execute_fetch_params)
    set_param.rs      (SetParamArgs    + execute_set_param)
    repos.rs          (BootstrapArgs / UpdateArgs + execute_bootstrap / execute_update)

Conventions:
  - Each subcommand module exposes one public `execute_*` function per
    subcommand, taking the shared `Session` and returning `anyhow::Result<()>`.
  - Argument structs derive `clap::Args` and are kept minimal.
  - Workflow logic lives in `aws/` and `git/`; these files only parse, call, print.
*/

pub mod ecs_services;
pub mod ecs_url;
pub mod fetch_params;
pub mod repos;
pub mod set_param;
pub mod shared;

pub use ecs_services::{EcsServicesArgs, execute_ecs_services};
pub use ecs_url::{EcsUrlArgs, execute_ecs_url};
pub use fetch_params::{FetchParamsArgs, execute_fetch_params};
pub use repos::{BootstrapArgs, UpdateArgs, execute_bootstrap, execute_update};
pub use set_param::{SetParamArgs, execute_set_param};
