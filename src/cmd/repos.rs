/*!
`repos.rs`

Implements the repository-set subcommands, both driven by one settings file
(JSON, or YAML for .yaml/.yml):

    {
      "install_directory": "/home/me/src",
      "repos": [
        { "directory_name": "api", "url": "git@github.com:org/api.git" },
        { "directory_name": "web", "url": "git@github.com:org/web.git" }
      ]
    }

  bootstrap SETTINGS          clone every repo missing from install_directory
  update SETTINGS [--branch]  fetch + checkout + pull in every clean repo
*/

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use crate::cmd::shared::Session;
use crate::git::{self, DEFAULT_BRANCH, RepoOutcome, Settings};
use crate::utils::output::{Color, color};

/// CLI arguments for `opskit bootstrap`
#[derive(Args, Debug)]
pub struct BootstrapArgs {
    /// Path to settings file (JSON or YAML)
    pub settings: PathBuf,
}

/// CLI arguments for `opskit update`
#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Path to settings file (JSON or YAML)
    pub settings: PathBuf,

    /// Branch to check out and pull in clean repositories
    #[arg(long, default_value = DEFAULT_BRANCH)]
    pub branch: String,
}

pub fn execute_bootstrap(session: &Session, args: BootstrapArgs) -> Result<()> {
    let settings = Settings::load(&args.settings)?;
    let outcomes = git::bootstrap(session.runner(), &settings).context("Bootstrap failed")?;
    let cloned = outcomes.iter().filter(|o| **o == RepoOutcome::Cloned).count();
    crate::log_info!("cloned {cloned} of {} repo(s)", outcomes.len());
    println!("{}", color(Color::Green, "All done!"));
    Ok(())
}

pub fn execute_update(session: &Session, args: UpdateArgs) -> Result<()> {
    let settings = Settings::load(&args.settings)?;
    let outcomes =
        git::update(session.runner(), &settings, &args.branch).context("Update failed")?;
    let dirty = outcomes.iter().filter(|o| **o == RepoOutcome::Dirty).count();
    if dirty > 0 {
        println!("{}", color(Color::Yellow, format!("{dirty} dirty repo(s) skipped")));
    }
    println!("{}", color(Color::Green, "All done!"));
    Ok(())
}
