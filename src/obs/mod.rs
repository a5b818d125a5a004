use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

mod http;

#[cfg(test)]
pub mod mock;

pub use self::http::HttpClient;

/// Interface to the build service binary API.
///
/// Users should use the [`HttpClient`].
/// The `mock` module is useful for tests.
#[async_trait::async_trait]
pub trait BuildService {
    /// List the binaries built for a package in a repository and architecture.
    async fn list_binaries(
        &self,
        project: &str,
        repo: &str,
        arch: &str,
        package: &str,
    ) -> Result<Vec<Binary>>;

    /// Download one binary to `target`, blocking until fully written.
    async fn fetch_binary(
        &self,
        project: &str,
        repo: &str,
        arch: &str,
        package: &str,
        name: &str,
        target: &Path,
    ) -> Result<()>;
}

/// One entry of a build service `binarylist` document.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct Binary {
    /// File name of the binary, unique within the list.
    #[serde(rename = "@filename")]
    pub filename: String,

    /// Size of the file in bytes.
    #[serde(rename = "@size")]
    pub size: u64,

    /// Modification time, seconds since the epoch.
    #[serde(rename = "@mtime")]
    pub mtime: u64,
}
