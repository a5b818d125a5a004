use std::path::PathBuf;

mod run_cmd;

pub use self::run_cmd::run;

/// Fully resolved container invocation.
#[derive(Debug)]
pub struct RunSpec {
    /// Container image to run.
    pub image: String,

    /// Platform passed to the runtime when targeting a foreign architecture.
    pub platform: Option<String>,

    /// Command to execute the container runtime.
    pub runner: String,

    /// Relabel the volume for SELinux hosts.
    pub selinux_relabel: bool,

    /// Directory with the RPMs to mount into the container.
    pub volume_source: PathBuf,

    /// Mount point of the RPMs inside the container.
    pub volume_target: String,

    /// Working directory for the container, when requested.
    pub workdir: Option<String>,
}

impl RunSpec {
    /// Arguments to pass to the runtime binary.
    pub fn command_args(&self) -> Vec<String> {
        let volume = format!(
            "-v={}:{}{}",
            self.volume_source.display(),
            self.volume_target,
            if self.selinux_relabel { ":z" } else { "" },
        );
        let mut args = vec![
            "run".to_string(),
            "--rm".to_string(),
            "-it".to_string(),
            volume,
        ];
        if let Some(platform) = &self.platform {
            args.push("--platform".to_string());
            args.push(platform.clone());
        }
        if let Some(workdir) = &self.workdir {
            args.push("--workdir".to_string());
            args.push(workdir.clone());
        }
        args.push(self.image.clone());
        args
    }

    /// The full command line, for diagnostics only.
    pub fn render(&self) -> String {
        let mut line = self.runner.clone();
        for arg in self.command_args() {
            line.push(' ');
            line.push_str(&arg);
        }
        line
    }
}
