//! Runtime identifiers (RIDs).
//!
//! A [`Rid`] names the operating system, CPU architecture and libc flavor
//! of a machine. Its canonical string form (`linux-x64`, `osx-arm64`,
//! `linux-x64-musl`, ...) is used to pick the matching SDK archive, so the
//! rendering here must stay stable.

use thiserror::Error;

/// Raised when the running machine has no SDK artifacts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UnsupportedPlatform {
    /// The operating system is not Windows, Linux or macOS.
    #[error("Current OS is not supported: {0}")]
    Os(String),
    /// The process architecture has no published SDK build.
    #[error("Current architecture is not supported: {0}")]
    Arch(String),
}

/// Operating systems dnvm can install SDKs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Os {
    /// Microsoft Windows
    Windows,
    /// Linux (glibc or musl)
    Linux,
    /// macOS
    MacOs,
}

impl Os {
    /// Get the operating system this binary was compiled for.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedPlatform::Os`] on any other target OS.
    pub fn current() -> Result<Self, UnsupportedPlatform> {
        std::env::consts::OS.parse()
    }

    /// RID component (`win`, `linux`, `osx`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "win",
            Self::Linux => "linux",
            Self::MacOs => "osx",
        }
    }
}

impl std::fmt::Display for Os {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Os {
    type Err = UnsupportedPlatform;

    /// Accepts both Rust target names (`std::env::consts::OS`) and RID names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "windows" | "win" => Ok(Self::Windows),
            "linux" => Ok(Self::Linux),
            "macos" | "osx" => Ok(Self::MacOs),
            _ => Err(UnsupportedPlatform::Os(s.to_string())),
        }
    }
}

/// Process architectures with published SDK builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// `x86_64`
    X64,
    /// ARM64 (`aarch64`)
    Arm64,
}

impl Arch {
    /// Get the architecture of the running process.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedPlatform::Arch`] for 32-bit or exotic targets.
    pub fn current() -> Result<Self, UnsupportedPlatform> {
        std::env::consts::ARCH.parse()
    }

    /// RID component (`x64`, `arm64`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X64 => "x64",
            Self::Arm64 => "arm64",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Arch {
    type Err = UnsupportedPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "x86_64" | "x64" | "amd64" => Ok(Self::X64),
            "aarch64" | "arm64" => Ok(Self::Arm64),
            _ => Err(UnsupportedPlatform::Arch(s.to_string())),
        }
    }
}

/// C runtime flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Libc {
    /// Not a real libc: whatever the platform normally ships.
    #[default]
    Default,
    /// musl (Alpine and friends)
    Musl,
}

impl Libc {
    /// Detect musl from a runtime identifier string such as
    /// `x86_64-linux-musl`.
    pub fn from_runtime_identifier(runtime_id: &str) -> Self {
        if runtime_id.contains("musl") {
            Self::Musl
        } else {
            Self::Default
        }
    }
}

/// Platform identifier used to select install artifacts.
///
/// Instances can only be built from a supported OS and architecture, so
/// [`Display`](std::fmt::Display) is total.
///
/// # Example
///
/// ```
/// use dnvm_schema::{Arch, Libc, Os, Rid};
///
/// let rid = Rid::new(Os::Linux, Arch::X64, Libc::Musl);
/// assert_eq!(rid.to_string(), "linux-x64-musl");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rid {
    /// Operating system
    pub os: Os,
    /// Process architecture
    pub arch: Arch,
    /// C runtime flavor
    pub libc: Libc,
}

impl Rid {
    /// Build a RID from already-validated parts.
    pub fn new(os: Os, arch: Arch, libc: Libc) -> Self {
        Self { os, arch, libc }
    }

    /// Resolve a RID from raw platform names.
    ///
    /// `os` and `arch` take the spellings of `std::env::consts`; `runtime_id`
    /// is the runtime's own identifier string, probed for `musl`.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedPlatform`] if either the OS or the architecture
    /// is outside the supported set.
    pub fn resolve(os: &str, arch: &str, runtime_id: &str) -> Result<Self, UnsupportedPlatform> {
        Ok(Self {
            os: os.parse()?,
            arch: arch.parse()?,
            libc: Libc::from_runtime_identifier(runtime_id),
        })
    }

    /// Resolve the RID of the running process.
    ///
    /// # Errors
    ///
    /// Returns [`UnsupportedPlatform`] when dnvm is running somewhere no SDK
    /// is published for.
    pub fn current() -> Result<Self, UnsupportedPlatform> {
        Self::resolve(
            std::env::consts::OS,
            std::env::consts::ARCH,
            &runtime_identifier(),
        )
    }
}

impl std::fmt::Display for Rid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.libc {
            Libc::Default => write!(f, "{}-{}", self.os, self.arch),
            Libc::Musl => write!(f, "{}-{}-musl", self.os, self.arch),
        }
    }
}

/// Target triple-like identifier of this build, e.g. `x86_64-linux-gnu`.
pub fn runtime_identifier() -> String {
    let env = if cfg!(target_env = "musl") {
        "musl"
    } else if cfg!(target_env = "msvc") {
        "msvc"
    } else if cfg!(target_env = "gnu") {
        "gnu"
    } else {
        "none"
    };
    format!(
        "{}-{}-{env}",
        std::env::consts::ARCH,
        std::env::consts::OS
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_strings_for_supported_platforms() {
        let cases = [
            ("windows", "x86_64", "win-x64"),
            ("linux", "x86_64", "linux-x64"),
            ("macos", "x86_64", "osx-x64"),
            ("windows", "aarch64", "win-arm64"),
            ("linux", "aarch64", "linux-arm64"),
            ("macos", "aarch64", "osx-arm64"),
        ];
        for (os, arch, expected) in cases {
            let rid = Rid::resolve(os, arch, "x86_64-unknown-gnu").unwrap();
            assert_eq!(rid.to_string(), expected);
        }
    }

    #[test]
    fn musl_gets_suffix() {
        let rid = Rid::resolve("linux", "x86_64", "x86_64-linux-musl").unwrap();
        assert_eq!(rid.libc, Libc::Musl);
        assert_eq!(rid.to_string(), "linux-x64-musl");

        let rid = Rid::resolve("linux", "aarch64", "linux-musl-arm64").unwrap();
        assert_eq!(rid.to_string(), "linux-arm64-musl");
    }

    #[test]
    fn unsupported_os_fails() {
        let err = Rid::resolve("freebsd", "x86_64", "").unwrap_err();
        assert_eq!(err, UnsupportedPlatform::Os("freebsd".into()));
    }

    #[test]
    fn unsupported_arch_fails() {
        for arch in ["x86", "riscv64", "powerpc64", "s390x"] {
            let err = Rid::resolve("linux", arch, "").unwrap_err();
            assert_eq!(err, UnsupportedPlatform::Arch(arch.into()));
        }
    }

    #[test]
    fn current_matches_build_target() {
        // CI only runs on supported hosts.
        let rid = Rid::current().unwrap();
        assert_eq!(rid.libc == Libc::Musl, cfg!(target_env = "musl"));
    }
}
