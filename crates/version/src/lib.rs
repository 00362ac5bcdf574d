//! Build identification for the `safesign` binary.

use std::fmt;

use git_version::git_version;
use target_info::Target;

/// Abbreviated commit of the build tree with a trailing `+` when dirty. Empty outside a git
/// checkout, e.g. when built from a published crate.
const COMMIT: &str = git_version!(
    args = ["--always", "--dirty=+", "--abbrev=7", "--exclude=*"],
    fallback = ""
);

lazy_static::lazy_static! {
    /// Version without the client name, as shown by `safesign --version`.
    pub static ref SHORT_VERSION: String = BuildInfo::current().short();
}

/// Package version and source commit of this build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildInfo {
    pub version: &'static str,
    pub commit: Option<&'static str>,
}

impl BuildInfo {
    pub const fn current() -> Self {
        let commit = if COMMIT.is_empty() { None } else { Some(COMMIT) };
        Self { version: env!("CARGO_PKG_VERSION"), commit }
    }

    /// `v0.1.0-67da032+`, or `v0.1.0` without git information.
    pub fn short(&self) -> String {
        match self.commit {
            Some(commit) => format!("v{}-{commit}", self.version),
            None => format!("v{}", self.version),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SafeSign/{}", self.short())
    }
}

/// `SafeSign/v0.1.0-67da032+/x86_64-linux`
pub fn version_with_platform() -> String {
    format!("{}/{}-{}", BuildInfo::current(), Target::arch(), Target::os())
}
