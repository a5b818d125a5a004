use std::fs;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;

use crate::error::Error;

/// Repository, architecture and vm type recorded by the last `osc build`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BuildRoot {
    pub repo: String,
    pub arch: String,
    pub vm_type: String,
}

/// Reader for the osc working copy state kept under `.osc/`.
#[derive(Debug)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    /// Open the store of the working copy at `dir`.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Store> {
        let root = dir.as_ref().join(".osc");
        if !root.is_dir() {
            let path = dir.as_ref().display().to_string();
            return Err(Error::store_not_found(path).into());
        }
        Ok(Store { root })
    }

    /// Project the working copy belongs to.
    pub fn project(&self) -> Result<String> {
        let path = self.root.join("_project");
        let project = fs::read_to_string(&path)
            .with_context(|| format!("could not read the project from {}", path.display()))?;
        Ok(project.trim().to_string())
    }

    /// Package checked out here, if any.
    pub fn package(&self) -> Result<Option<String>> {
        let path = self.root.join("_package");
        if !path.exists() {
            return Ok(None);
        }
        let package = fs::read_to_string(&path)
            .with_context(|| format!("could not read the package from {}", path.display()))?;
        let package = package.trim();
        if package.is_empty() {
            return Ok(None);
        }
        Ok(Some(package.to_string()))
    }

    /// Build configuration of the last local build, if one ever ran.
    pub fn last_buildroot(&self) -> Result<Option<BuildRoot>> {
        let path = self.root.join("_last_buildroot");
        if !path.exists() {
            return Ok(None);
        }
        let record = fs::read_to_string(&path)
            .with_context(|| format!("could not read the build root record {}", path.display()))?;
        let mut lines = record.lines().map(str::trim);
        let buildroot = match (lines.next(), lines.next()) {
            (Some(repo), Some(arch)) if !repo.is_empty() && !arch.is_empty() => BuildRoot {
                repo: repo.to_string(),
                arch: arch.to_string(),
                vm_type: lines.next().unwrap_or("").to_string(),
            },
            _ => anyhow::bail!("corrupt build root record in {}", path.display()),
        };
        Ok(Some(buildroot))
    }
}
