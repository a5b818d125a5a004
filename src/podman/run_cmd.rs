use anyhow::Context;
use anyhow::Result;
use tokio::process::Command;

use super::RunSpec;

/// Run a container with the given spec, returning the runtime's exit code.
pub async fn run(spec: &RunSpec) -> Result<i32> {
    let mut runtime = Command::new(&spec.runner);
    runtime.args(spec.command_args());
    let status = runtime
        .status()
        .await
        .with_context(|| format!("failed to run {}", spec.runner))?;
    Ok(status.code().unwrap_or(127))
}
