//! Build information embedded by `build.rs`

use std::fmt;

/// What the binary knows about its own build
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub version: &'static str,
    pub name: &'static str,
    /// Short git commit hash, or "unknown" outside a checkout
    pub git_hash: &'static str,
    git_dirty_str: &'static str,
    pub build_timestamp: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc_version: &'static str,
}

impl BuildInfo {
    pub const fn current() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION"),
            name: env!("CARGO_PKG_NAME"),
            git_hash: env!("TASKMILL_GIT_HASH"),
            git_dirty_str: env!("TASKMILL_GIT_DIRTY"),
            build_timestamp: env!("TASKMILL_BUILD_TIMESTAMP"),
            target: env!("TASKMILL_TARGET"),
            profile: env!("TASKMILL_PROFILE"),
            rustc_version: env!("TASKMILL_RUSTC_VERSION"),
        }
    }

    /// Whether the checkout had uncommitted changes at build time
    pub fn git_dirty(&self) -> bool {
        self.git_dirty_str == "true"
    }

    /// Version plus commit, e.g. "0.1.0-abc1234" or "0.1.0-abc1234-dirty"
    pub fn full_version(&self) -> String {
        let mut v = format!("{}-{}", self.version, self.git_hash);
        if self.git_dirty() {
            v.push_str("-dirty");
        }
        v
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dirty = if self.git_dirty() { " (dirty)" } else { "" };
        writeln!(f, "{} {}", self.name, self.full_version())?;
        writeln!(f)?;
        writeln!(f, "Build Information:")?;
        writeln!(f, "  Version:    {}", self.version)?;
        writeln!(f, "  Git Hash:   {}{}", self.git_hash, dirty)?;
        writeln!(f, "  Built:      {}", self.build_timestamp)?;
        writeln!(f, "  Profile:    {}", self.profile)?;
        writeln!(f, "  Target:     {}", self.target)?;
        writeln!(f)?;
        writeln!(f, "Compiler:")?;
        writeln!(f, "  {}", self.rustc_version)?;
        Ok(())
    }
}

/// Build info for this binary
pub fn build_info() -> BuildInfo {
    BuildInfo::current()
}

/// Print the full version block to stdout
pub fn print_version() {
    print!("{}", build_info());
}
