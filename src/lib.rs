use anyhow::Result;
use clap::Parser;

mod buildroot;
mod command;
mod conf;
mod error;
mod logging;
mod obs;
mod podman;
mod progress;
mod store;

use self::conf::Conf;

pub use self::error::Error;

/// Run a container with the RPMs from the last `osc build`.
#[derive(Debug, Parser)]
#[command(
    name = "osc-pod",
    version,
    about = "Run a container with the RPMs from the last osc build"
)]
struct CliOpt {
    /// Print Debug-level diagnostics, including the raw runtime command.
    #[arg(long)]
    debug: bool,

    /// Print Info-level diagnostics.
    #[arg(long)]
    verbose: bool,

    #[command(flatten)]
    pod: command::pod::Opt,
}

/// Parse the command line and launch the container.
pub async fn run() -> Result<i32> {
    let args = CliOpt::parse();
    let logger = logging::configure(args.verbose, args.debug);
    let conf = Conf::from_file()?;
    command::pod::run(args.pod, conf, logger).await
}
