/// Exhaustive list of errors emitted while assembling a container run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("could not find a build root for this package, run `osc build` first")]
    BuildRootNotFound,

    #[error("no image known for repository {0}, pass an IMAGE argument")]
    // (repo,)
    ImageNotMapped(String),

    #[error("a package working copy is required to download binaries")]
    PackageRequired,

    #[error("no container platform known for architecture {0}, pass --platform")]
    // (arch,)
    PlatformNotMapped(String),

    #[error("unable to decode response from {0}")]
    // (url,)
    ResponseDecode(String),

    #[error("{0} returned status {1}")]
    // (url, status)
    ResponseStatus(String, u16),

    #[error("not an osc working copy: {0}")]
    // (path,)
    StoreNotFound(String),
}

impl Error {
    /// No image mapped to the build repository.
    pub fn image_not_mapped<R: Into<String>>(repo: R) -> Self {
        Self::ImageNotMapped(repo.into())
    }

    /// No container platform mapped to the build architecture.
    pub fn platform_not_mapped<A: Into<String>>(arch: A) -> Self {
        Self::PlatformNotMapped(arch.into())
    }

    /// Unable to decode a build service response.
    pub fn response_decode<U: Into<String>>(url: U) -> Self {
        Self::ResponseDecode(url.into())
    }

    /// Build service request completed with an error status.
    pub fn response_status<U: Into<String>>(url: U, status: u16) -> Self {
        Self::ResponseStatus(url.into(), status)
    }

    /// The directory is not an osc working copy.
    pub fn store_not_found<P: Into<String>>(path: P) -> Self {
        Self::StoreNotFound(path.into())
    }
}
