use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use handlebars::Handlebars;
use serde_json::json;

/// Runners that keep their build roots under a per-user directory.
const USER_RUNNERS: &[&str] = &["podman", "docker", "nspawn", "lxc"];

/// Container-less virtualization modes: their build roots hold a disk
/// image, not a mounted tree.
const VM_RUNNERS: &[&str] = &["kvm", "qemu"];

/// Fields available to the build root path template.
#[derive(Debug)]
pub struct RootVars<'a> {
    pub apihost: &'a str,
    pub arch: &'a str,
    pub package: &'a str,
    pub project: &'a str,
    pub repo: &'a str,
    pub user: &'a str,
}

/// Interpolate the build root template for the given build.
///
/// Supported template variables: `{{ apihost }}`, `{{ project }}`,
/// `{{ package }}`, `{{ repo }}`, `{{ arch }}`, `{{ user }}` and
/// `{{ dash_user }}` (the user prefixed with a dash, or empty).
pub fn root(template: &str, vars: &RootVars, vm_type: &str) -> Result<PathBuf> {
    let dash_user = if vars.user.is_empty() {
        String::new()
    } else {
        format!("-{}", vars.user)
    };
    let values = json!({
        "apihost": vars.apihost,
        "arch": vars.arch,
        "dash_user": dash_user,
        "package": vars.package,
        "project": vars.project,
        "repo": vars.repo,
        "user": vars.user,
    });
    let engine = Handlebars::new();
    let root = engine
        .render_template(template, &values)
        .context("could not render the build root template")?;
    let mut root = PathBuf::from(root);
    if !VM_RUNNERS.contains(&vm_type) {
        root.push(".mount");
    }
    Ok(root)
}

/// Directory the build left its RPMs in, under the build root.
///
/// `osc build` links `.build.packages` to the rpmbuild tree inside the
/// root; follow one level of indirection when the link is present.
pub fn rpms(root: &Path, arch: &str) -> PathBuf {
    let packages = root.join(".build.packages");
    let packages = match std::fs::read_link(&packages) {
        Ok(target) => root.join(target),
        Err(_) if packages.is_dir() => packages,
        Err(_) => root.join("home/abuild/rpmbuild"),
    };
    packages.join("RPMS").join(arch)
}

/// Name of the invoking user, for runners with per-user build roots.
pub fn invoking_user(vm_type: &str) -> String {
    if USER_RUNNERS.contains(&vm_type) {
        std::env::var("USER").unwrap_or_default()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::path::PathBuf;

    use super::root;
    use super::rpms;
    use super::RootVars;

    fn vars<'a>(user: &'a str) -> RootVars<'a> {
        RootVars {
            apihost: "api.opensuse.org",
            arch: "x86_64",
            package: "osc",
            project: "devel:tools",
            repo: "openSUSE_Factory",
            user,
        }
    }

    #[test]
    fn template_interpolates_repo_and_arch() {
        let path = root(
            "/var/tmp/build-root/{{ repo }}-{{ arch }}",
            &vars(""),
            "podman",
        )
        .expect("template must render");
        assert_eq!(
            path,
            PathBuf::from("/var/tmp/build-root/openSUSE_Factory-x86_64/.mount"),
        );
    }

    #[test]
    fn vm_roots_have_no_mounted_tree() {
        let path = root(
            "/var/tmp/build-root/{{ repo }}-{{ arch }}",
            &vars(""),
            "kvm",
        )
        .expect("template must render");
        assert_eq!(
            path,
            PathBuf::from("/var/tmp/build-root/openSUSE_Factory-x86_64"),
        );
    }

    #[test]
    fn dash_user_prefixes_only_when_set() {
        let path = root("/b/{{ arch }}{{ dash_user }}", &vars("geeko"), "kvm")
            .expect("template must render");
        assert_eq!(path, PathBuf::from("/b/x86_64-geeko"));
        let path = root("/b/{{ arch }}{{ dash_user }}", &vars(""), "kvm")
            .expect("template must render");
        assert_eq!(path, PathBuf::from("/b/x86_64"));
    }

    #[test]
    fn rpms_falls_back_to_the_rpmbuild_tree() {
        let path = rpms(Path::new("/build/root"), "x86_64");
        assert_eq!(
            path,
            PathBuf::from("/build/root/home/abuild/rpmbuild/RPMS/x86_64"),
        );
    }

    #[cfg(unix)]
    #[test]
    fn rpms_follows_one_level_of_symlink() {
        let dir = tempfile::tempdir().expect("fixture dir must be created");
        std::os::unix::fs::symlink("usr/src/packages", dir.path().join(".build.packages"))
            .expect("fixture link must be created");
        let path = rpms(dir.path(), "aarch64");
        assert_eq!(
            path,
            dir.path().join("usr/src/packages/RPMS/aarch64"),
        );
    }

    #[cfg(unix)]
    #[test]
    fn rpms_uses_a_real_packages_directory() {
        let dir = tempfile::tempdir().expect("fixture dir must be created");
        std::fs::create_dir(dir.path().join(".build.packages"))
            .expect("fixture dir must be created");
        let path = rpms(dir.path(), "x86_64");
        assert_eq!(path, dir.path().join(".build.packages/RPMS/x86_64"));
    }
}
