use std::fmt;
use std::path::Path;

/// The environment variable that selects the deployment target.
pub const TARGET_VAR: &str = "TARGET";

/// The deployment target, resolved once at startup from [`TARGET_VAR`].
///
/// Anything other than the literal `production` (compared
/// case-insensitively) resolves to `Staging`, including an absent or empty
/// variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Production,
    Staging,
}

impl Target {
    pub fn resolve() -> Target {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Target
        where F: Fn(&str) -> Option<String>
    {
        match lookup(TARGET_VAR) {
            Some(value) if value.eq_ignore_ascii_case("production") => Target::Production,
            _ => Target::Staging,
        }
    }

    /// The environment variable group carrying this target's transfer
    /// parameters: `{group}_HOST`, `{group}_USER`, `{group}_PATH`.
    pub fn var_group(self) -> &'static str {
        match self {
            Target::Production => "PRODUCTION",
            Target::Staging => "STAGING",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Production => "production".fmt(f),
            Target::Staging => "staging".fmt(f),
        }
    }
}

/// The file-transfer method. Only sync-over-ssh is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Rsync,
}

/// Everything needed to mirror a built site to a remote host.
///
/// Constructed once at startup and immutable thereafter. Missing variables
/// resolve to empty strings rather than failing; the transfer tool reports
/// the resulting bad address. `clean` is `true` for every target: files no
/// longer present locally are deleted from the remote path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentProfile {
    pub method: Method,
    pub target: Target,
    pub host: String,
    pub user: String,
    pub path: String,
    pub clean: bool,
}

impl DeploymentProfile {
    pub fn resolve() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
        where F: Fn(&str) -> Option<String>
    {
        let target = Target::from_lookup(&lookup);
        let group = target.var_group();
        let var = |suffix: &str| lookup(&format!("{group}_{suffix}")).unwrap_or_default();

        DeploymentProfile {
            method: Method::Rsync,
            target,
            host: var("HOST"),
            user: var("USER"),
            path: var("PATH"),
            clean: true,
        }
    }

    /// The remote address in rsync's `[user@]host:path` grammar.
    pub fn remote_spec(&self) -> String {
        match self.user.is_empty() {
            true => format!("{}:{}", self.host, self.path),
            false => format!("{}@{}:{}", self.user, self.host, self.path),
        }
    }

    /// The argument vector for the transfer of `build_dir`. The source
    /// carries a trailing slash so the directory's contents, not the
    /// directory itself, are mirrored into the remote path.
    pub fn rsync_args(&self, build_dir: &Path) -> Vec<String> {
        let mut source = build_dir.to_string_lossy().into_owned();
        if !source.ends_with('/') {
            source.push('/');
        }

        let mut args = vec!["-az".to_string()];
        if self.clean {
            args.push("--delete".to_string());
        }

        args.push(source);
        args.push(self.remote_spec());
        args
    }
}

#[cfg(test)]
mod resolve_tests {
    use std::path::Path;
    use rustc_hash::FxHashMap;

    use super::{DeploymentProfile, Method, Target};

    fn env(pairs: &[(&str, &str)]) -> FxHashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    fn resolve(pairs: &[(&str, &str)]) -> DeploymentProfile {
        let vars = env(pairs);
        DeploymentProfile::from_lookup(|key| vars.get(key).cloned())
    }

    const BOTH_GROUPS: &[(&str, &str)] = &[
        ("PRODUCTION_HOST", "www.example.com"),
        ("PRODUCTION_USER", "deploy"),
        ("PRODUCTION_PATH", "/var/www/site"),
        ("STAGING_HOST", "staging.example.com"),
        ("STAGING_USER", "stage"),
        ("STAGING_PATH", "/var/www/staging"),
    ];

    fn resolve_with_target(target: &str) -> DeploymentProfile {
        let mut vars = env(BOTH_GROUPS);
        vars.insert("TARGET".into(), target.into());
        DeploymentProfile::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn production_target_any_casing() {
        for casing in ["production", "PRODUCTION", "Production", "pRoDuCtIoN"] {
            let profile = resolve_with_target(casing);
            assert_eq!(profile.target, Target::Production);
            assert_eq!(profile.host, "www.example.com");
            assert_eq!(profile.user, "deploy");
            assert_eq!(profile.path, "/var/www/site");
        }
    }

    #[test]
    fn anything_else_is_staging() {
        for target in ["staging", "qa", "prod", ""] {
            let profile = resolve_with_target(target);
            assert_eq!(profile.target, Target::Staging);
            assert_eq!(profile.host, "staging.example.com");
            assert_eq!(profile.user, "stage");
            assert_eq!(profile.path, "/var/www/staging");
        }

        let profile = resolve(BOTH_GROUPS);
        assert_eq!(profile.target, Target::Staging);
        assert_eq!(profile.host, "staging.example.com");
    }

    #[test]
    fn clean_is_set_for_every_target() {
        assert!(resolve_with_target("production").clean);
        assert!(resolve_with_target("qa").clean);
    }

    #[test]
    fn missing_variables_resolve_to_empty_strings() {
        let profile = resolve(&[("TARGET", "production")]);
        assert_eq!(profile.method, Method::Rsync);
        assert_eq!(profile.host, "");
        assert_eq!(profile.user, "");
        assert_eq!(profile.path, "");
        assert!(profile.clean);
    }

    #[test]
    fn rsync_args_mirror_with_delete() {
        let profile = resolve_with_target("production");
        let args = profile.rsync_args(Path::new("build"));
        assert_eq!(args, vec![
            "-az".to_string(),
            "--delete".to_string(),
            "build/".to_string(),
            "deploy@www.example.com:/var/www/site".to_string(),
        ]);
    }

    #[test]
    fn remote_spec_without_user() {
        let vars = env(&[("STAGING_HOST", "h"), ("STAGING_PATH", "/p")]);
        let profile = DeploymentProfile::from_lookup(|key| vars.get(key).cloned());
        assert_eq!(profile.remote_spec(), "h:/p");
    }

    #[test]
    fn profile_is_shareable() {
        static_assertions::assert_impl_all!(DeploymentProfile: Send, Sync);
    }
}
