use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use clap::Args;
use slog::debug;
use slog::info;
use slog::warn;
use slog::Logger;
use tempfile::TempDir;

use crate::buildroot;
use crate::conf::Conf;
use crate::error::Error;
use crate::obs::BuildService;
use crate::obs::HttpClient;
use crate::podman;
use crate::podman::RunSpec;
use crate::progress;
use crate::store::Store;

/// Run a container with the RPMs of the last build.
#[derive(Args, Debug)]
pub struct Opt {
    /// Container image to run (guessed from the build repository by default).
    #[arg(value_name = "IMAGE")]
    pub image: Option<String>,

    /// Download the package binaries from the build service instead of
    /// mounting the local build root.
    #[arg(short = 'b', long = "get-binaries")]
    pub get_binaries: bool,

    /// Platform to request from the runtime, overriding the guess.
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Repository to target, overriding the last build's.
    #[arg(long)]
    pub repo: Option<String>,

    /// Container runtime to launch.
    #[arg(short, long)]
    pub runner: Option<String>,

    /// Mount point for the RPMs inside the container.
    #[arg(short, long, default_value = "/root/rpms")]
    pub volume: String,

    /// Start the container in the RPMs directory.
    #[arg(short, long)]
    pub workdir: bool,
}

/// Resolve the last build into a container invocation and run it.
pub async fn run(args: Opt, conf: Conf, logger: Logger) -> Result<i32> {
    let store = Store::discover(".")?;
    let project = store.project()?;
    let package = store.package()?;
    let last = store.last_buildroot()?.ok_or(Error::BuildRootNotFound)?;
    let repo = args.repo.as_deref().unwrap_or(&last.repo);

    let image = resolve_image(args.image.as_deref(), repo, &conf.images)?;
    let platform = resolve_platform(
        args.platform.as_deref(),
        &last.arch,
        std::env::consts::ARCH,
        &conf.platforms,
    )?;
    let runner = args.runner.clone().unwrap_or_else(|| conf.runner.clone());

    // The guard must outlive the container so downloaded binaries survive
    // until it exits; dropping it removes the directory.
    let mut downloads: Option<TempDir> = None;
    let volume_source = if args.get_binaries {
        let package = package.as_deref().ok_or(Error::PackageRequired)?;
        let service = HttpClient::with(&conf)?;
        let dir = download_binaries(
            &service,
            &project,
            repo,
            &last.arch,
            package,
            &std::env::temp_dir(),
            &logger,
        )
        .await?;
        let source = dir.path().to_path_buf();
        downloads = Some(dir);
        source
    } else {
        let apihost = conf.apihost();
        let user = buildroot::invoking_user(&last.vm_type);
        let vars = buildroot::RootVars {
            apihost: &apihost,
            arch: &last.arch,
            package: package.as_deref().unwrap_or(""),
            project: &project,
            repo,
            user: &user,
        };
        let root = buildroot::root(&conf.build_root, &vars, &last.vm_type)?;
        let rpms = buildroot::rpms(&root, &last.arch);
        if !rpms.is_dir() {
            warn!(
                logger, "build root has no RPMs directory";
                "path" => rpms.display().to_string()
            );
        }
        rpms
    };

    let spec = RunSpec {
        image,
        platform,
        runner,
        selinux_relabel: true,
        volume_source,
        volume_target: args.volume.clone(),
        workdir: args.workdir.then(|| args.volume.clone()),
    };
    info!(
        logger, "running container over build RPMs";
        "runner" => spec.runner.as_str(),
        "image" => spec.image.as_str(),
        "package" => package.as_deref().unwrap_or("<none>"),
        "volume" => spec.volume_target.as_str()
    );
    debug!(logger, "{}", spec.render());
    let code = podman::run(&spec).await?;
    drop(downloads);
    Ok(code)
}

/// Image to run: an explicit choice wins over the repository map.
fn resolve_image(
    explicit: Option<&str>,
    repo: &str,
    images: &BTreeMap<String, String>,
) -> Result<String> {
    if let Some(image) = explicit {
        return Ok(image.to_string());
    }
    images
        .get(repo)
        .cloned()
        .ok_or_else(|| Error::image_not_mapped(repo).into())
}

/// Platform flag for the runtime, when targeting a foreign architecture.
fn resolve_platform(
    explicit: Option<&str>,
    build_arch: &str,
    local_arch: &str,
    platforms: &BTreeMap<String, String>,
) -> Result<Option<String>> {
    if let Some(platform) = explicit {
        return Ok(Some(platform.to_string()));
    }
    if build_arch == local_arch {
        return Ok(None);
    }
    let arch = platforms
        .get(build_arch)
        .ok_or_else(|| Error::platform_not_mapped(build_arch))?;
    Ok(Some(format!("linux/{}", arch)))
}

/// Fetch all package binaries into a fresh temporary directory.
///
/// The directory is created under `parent` and removed when the returned
/// guard drops, on the error path included.
async fn download_binaries(
    service: &dyn BuildService,
    project: &str,
    repo: &str,
    arch: &str,
    package: &str,
    parent: &Path,
    logger: &Logger,
) -> Result<TempDir> {
    let binaries = service.list_binaries(project, repo, arch, package).await?;
    let target = tempfile::Builder::new()
        .prefix("osc-pod-")
        .tempdir_in(parent)
        .context("could not create a directory for downloaded binaries")?;
    if binaries.is_empty() {
        warn!(
            logger, "no binaries found for this build";
            "package" => package,
            "repo" => repo,
            "arch" => arch
        );
    }
    let mut progress = progress::reporter(binaries.len());
    for binary in &binaries {
        progress.step(&binary.filename);
        let path = target.path().join(&binary.filename);
        service
            .fetch_binary(project, repo, arch, package, &binary.filename, &path)
            .await?;
    }
    progress.finish();
    Ok(target)
}
