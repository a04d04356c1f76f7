//! Local repository set: settings file, bootstrap (clone) and update (fast-forward clean repos).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::{OpsError, OpsResult};
use crate::exec::{Invocation, Runner, exit_code, run_checked};
use crate::utils::load_structured_file;

pub const DEFAULT_BRANCH: &str = "master";

/// Settings file shared by `bootstrap` and `update`. Unknown keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub install_directory: PathBuf,
    #[serde(default)]
    pub repos: Vec<RepoSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RepoSettings {
    pub directory_name: String,
    /// Only needed when the repository has to be cloned.
    #[serde(default)]
    pub url: Option<String>,
}

impl Settings {
    /// Load from JSON or YAML (by extension).
    pub fn load(path: &Path) -> Result<Self> {
        load_structured_file(path)
            .with_context(|| format!("invalid settings file: {}", path.display()))
    }

    pub fn repo_path(&self, repo: &RepoSettings) -> PathBuf {
        self.install_directory.join(&repo.directory_name)
    }
}

/// What happened to one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoOutcome {
    Cloned,
    AlreadyPresent,
    Updated,
    Dirty,
}

/// Clone every repository not yet present under `install_directory`.
pub fn bootstrap(runner: &dyn Runner, settings: &Settings) -> OpsResult<Vec<RepoOutcome>> {
    let root = &settings.install_directory;
    if !root.exists() {
        crate::log_info!("creating install directory {}", root.display());
        std::fs::create_dir_all(root).map_err(|e| {
            OpsError::InvalidInput(format!("cannot create {}: {e}", root.display()))
        })?;
    }

    let mut outcomes = Vec::with_capacity(settings.repos.len());
    for repo in &settings.repos {
        let target = settings.repo_path(repo);
        if target.exists() {
            println!("Skipping cloning {}...", repo.directory_name);
            outcomes.push(RepoOutcome::AlreadyPresent);
            continue;
        }
        let url = repo.url.as_deref().ok_or_else(|| {
            OpsError::InvalidInput(format!("no url configured for {}", repo.directory_name))
        })?;
        println!("Cloning {}...", repo.directory_name);
        let clone = Invocation::new(
            "git",
            ["clone".to_string(), url.to_string(), target.display().to_string()],
        );
        run_checked(runner, &clone)?;
        outcomes.push(RepoOutcome::Cloned);
    }
    Ok(outcomes)
}

/// `git diff-index --quiet HEAD` exits 0 when there are no uncommitted changes.
pub fn repo_is_clean(runner: &dyn Runner, dir: &Path) -> OpsResult<bool> {
    let inv = Invocation::new("git", ["diff-index", "--quiet", "HEAD"]).in_dir(dir);
    Ok(exit_code(runner, &inv)? == 0)
}

/// Fetch, check out `branch` and pull inside `dir`.
pub fn update_branch(runner: &dyn Runner, dir: &Path, branch: &str) -> OpsResult<()> {
    for args in [vec!["fetch"], vec!["checkout", branch], vec!["pull"]] {
        run_checked(runner, &Invocation::new("git", args).in_dir(dir))?;
    }
    Ok(())
}

/// Update `branch` in every clean repository; dirty ones are skipped.
pub fn update(runner: &dyn Runner, settings: &Settings, branch: &str) -> OpsResult<Vec<RepoOutcome>> {
    let mut outcomes = Vec::with_capacity(settings.repos.len());
    for repo in &settings.repos {
        let dir = settings.repo_path(repo);
        if repo_is_clean(runner, &dir)? {
            println!("{} is clean. Updating {branch}...", repo.directory_name);
            update_branch(runner, &dir, branch)?;
            outcomes.push(RepoOutcome::Updated);
        } else {
            println!("{} is dirty. Skipping...", repo.directory_name);
            outcomes.push(RepoOutcome::Dirty);
        }
    }
    Ok(outcomes)
}
