use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use serde::Deserialize;
use serde_yaml::Mapping;
use serde_yaml::Value;

const CONF_FILE: &str = "oscpod.yaml";
const CONF_LOAD_ERROR: &str = "could not load the oscpod configuration";

/// Tool configuration, every key optional.
///
/// The base file lives in `$HOME/.config/oscpod.yaml` and can be overridden
/// key by key with an `oscpod.yaml` in the working copy.
#[derive(Clone, Debug, Deserialize)]
pub struct Conf {
    /// Base URL of the build service API server.
    #[serde(default = "Conf::default_apiurl")]
    pub apiurl: String,

    /// Credentials for the build service API, needed to download binaries.
    #[serde(default)]
    pub auth: Option<ObsAuth>,

    /// Template for the directory `osc build` keeps its build roots in.
    #[serde(default = "Conf::default_build_root")]
    pub build_root: String,

    /// Map of build repository to container image.
    #[serde(default = "Conf::default_images")]
    pub images: BTreeMap<String, String>,

    /// Map of build architecture to container platform architecture.
    #[serde(default = "Conf::default_platforms")]
    pub platforms: BTreeMap<String, String>,

    /// Command to execute the container runtime.
    #[serde(default = "Conf::default_runner")]
    pub runner: String,
}

impl Conf {
    /// Load the configuration, tolerating missing files.
    pub fn from_file() -> Result<Conf> {
        let base = match std::env::var_os("HOME") {
            Some(home) => {
                let path = PathBuf::from(home).join(".config").join(CONF_FILE);
                Conf::load_file(&path)?
            }
            None => Mapping::new(),
        };
        let local = Conf::load_file(Path::new(CONF_FILE))?;

        // Merge the config options and decode the result.
        let conf = Conf::merge(base, local);
        let conf = serde_yaml::from_value(conf).context(CONF_LOAD_ERROR)?;
        Ok(conf)
    }

    /// Host part of the API server URL, as used in build root paths.
    pub fn apihost(&self) -> String {
        let host = self.apiurl.trim_end_matches('/');
        let host = host
            .strip_prefix("https://")
            .or_else(|| host.strip_prefix("http://"))
            .unwrap_or(host);
        host.to_string()
    }
}

impl Conf {
    fn default_apiurl() -> String {
        "https://api.opensuse.org".into()
    }

    fn default_build_root() -> String {
        "/var/tmp/build-root/{{ repo }}-{{ arch }}".into()
    }

    fn default_images() -> BTreeMap<String, String> {
        let mut images = BTreeMap::new();
        images.insert("openSUSE_Factory".into(), "opensuse/tumbleweed".into());
        images.insert("openSUSE_Tumbleweed".into(), "opensuse/tumbleweed".into());
        images
    }

    fn default_platforms() -> BTreeMap<String, String> {
        let platforms = [
            ("aarch64", "arm64"),
            ("armv7l", "arm"),
            ("i586", "386"),
            ("i686", "386"),
            ("ppc64le", "ppc64le"),
            ("riscv64", "riscv64"),
            ("s390x", "s390x"),
            ("x86_64", "amd64"),
        ];
        platforms
            .iter()
            .map(|(arch, platform)| (arch.to_string(), platform.to_string()))
            .collect()
    }

    fn default_runner() -> String {
        "podman".into()
    }

    fn load_file(file: &Path) -> Result<Mapping> {
        if !file.exists() {
            return Ok(Mapping::new());
        }
        let conf = File::open(file).with_context(|| format!("could not read {}", file.display()))?;
        let conf = serde_yaml::from_reader(conf)
            .with_context(|| format!("could not parse {}", file.display()))?;
        Ok(conf)
    }

    fn merge(mut base: Mapping, local: Mapping) -> Value {
        for (key, value) in local {
            base.insert(key, value);
        }
        Value::Mapping(base)
    }
}

/// Credentials for the build service API.
#[derive(Clone, Debug, Deserialize)]
pub struct ObsAuth {
    pub user: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::Conf;

    fn defaults() -> Conf {
        serde_yaml::from_str("{}").expect("default configuration must decode")
    }

    #[test]
    fn defaults_cover_every_key() {
        let conf = defaults();
        assert_eq!(conf.apiurl, "https://api.opensuse.org");
        assert_eq!(conf.runner, "podman");
        assert_eq!(
            conf.images.get("openSUSE_Factory").map(String::as_str),
            Some("opensuse/tumbleweed"),
        );
        assert_eq!(
            conf.platforms.get("x86_64").map(String::as_str),
            Some("amd64"),
        );
        assert!(conf.auth.is_none());
    }

    #[test]
    fn apihost_strips_scheme_and_slash() {
        let mut conf = defaults();
        conf.apiurl = "https://api.opensuse.org/".to_string();
        assert_eq!(conf.apihost(), "api.opensuse.org");
        conf.apiurl = "http://obs.example.com".to_string();
        assert_eq!(conf.apihost(), "obs.example.com");
    }

    #[test]
    fn file_overrides_replace_defaults() {
        let conf: Conf = serde_yaml::from_str(
            r#"
            runner: docker
            images:
              MyDistro_Current: registry.example.com/mydistro
            auth:
              user: geeko
              password: opensuse
            "#,
        )
        .expect("configuration must decode");
        assert_eq!(conf.runner, "docker");
        assert!(conf.images.get("openSUSE_Factory").is_none());
        assert_eq!(
            conf.images.get("MyDistro_Current").map(String::as_str),
            Some("registry.example.com/mydistro"),
        );
        assert_eq!(conf.auth.expect("auth must be set").user, "geeko");
    }
}
