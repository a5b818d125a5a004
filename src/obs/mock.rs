use std::path::Path;

use anyhow::Result;

use super::Binary;
use super::BuildService;

/// A canned-data `BuildService` for tests.
pub struct MockBuildService {
    /// Binaries returned by `list_binaries`.
    pub binaries: Vec<Binary>,

    /// Make `fetch_binary` fail for this file name.
    pub fail_fetch: Option<String>,
}

impl MockBuildService {
    /// A mock listing the given file names.
    pub fn with_names(names: &[&str]) -> MockBuildService {
        let binaries = names
            .iter()
            .map(|name| Binary {
                filename: name.to_string(),
                size: 4,
                mtime: 0,
            })
            .collect();
        MockBuildService {
            binaries,
            fail_fetch: None,
        }
    }
}

#[async_trait::async_trait]
impl BuildService for MockBuildService {
    async fn list_binaries(
        &self,
        _: &str,
        _: &str,
        _: &str,
        _: &str,
    ) -> Result<Vec<Binary>> {
        Ok(self.binaries.clone())
    }

    async fn fetch_binary(
        &self,
        _: &str,
        _: &str,
        _: &str,
        _: &str,
        name: &str,
        target: &Path,
    ) -> Result<()> {
        if self.fail_fetch.as_deref() == Some(name) {
            anyhow::bail!("fetch of {} failed", name);
        }
        tokio::fs::write(target, b"rpm\n").await?;
        Ok(())
    }
}
