//! Install locations and platform-specific file names.

use crate::vfs::VfsPath;
use dirs::home_dir;
use dnvm_schema::Os;
use std::path::PathBuf;

/// Default dnvm home (`~/.dnvm`), or `None` if the user's home cannot be
/// resolved. `DNVM_HOME` overrides this at the CLI layer.
pub fn default_dnvm_home() -> Option<PathBuf> {
    home_dir().map(|h| h.join(".dnvm"))
}

/// `.exe` on Windows, empty elsewhere.
pub fn exe_suffix(os: Os) -> &'static str {
    match os {
        Os::Windows => ".exe",
        Os::Linux | Os::MacOs => "",
    }
}

/// Extension of SDK archives published for `os`.
pub fn archive_suffix(os: Os) -> &'static str {
    match os {
        Os::Windows => "zip",
        Os::Linux | Os::MacOs => "tar.gz",
    }
}

/// File name of the dnvm executable on `os`.
pub fn dnvm_exe_name(os: Os) -> String {
    format!("dnvm{}", exe_suffix(os))
}

/// Shell script exporting `PATH` and `DOTNET_ROOT`: `/env`
pub fn env_script_path() -> VfsPath {
    VfsPath::root().join("env")
}

/// Installed copy of dnvm itself: `/dnvm` or `/dnvm.exe`
pub fn dnvm_exe_path(os: Os) -> VfsPath {
    VfsPath::root().join(dnvm_exe_name(os))
}

/// Drop characters that are not allowed in file names on any supported OS.
pub fn escape_filename(name: &str) -> String {
    const INVALID: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];
    name.chars()
        .filter(|c| !c.is_control() && !INVALID.contains(c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exe_names() {
        assert_eq!(dnvm_exe_name(Os::Windows), "dnvm.exe");
        assert_eq!(dnvm_exe_name(Os::Linux), "dnvm");
        assert_eq!(dnvm_exe_path(Os::MacOs).as_str(), "/dnvm");
        assert_eq!(env_script_path().as_str(), "/env");
    }

    #[test]
    fn archives() {
        assert_eq!(archive_suffix(Os::Windows), "zip");
        assert_eq!(archive_suffix(Os::Linux), "tar.gz");
        assert_eq!(archive_suffix(Os::MacOs), "tar.gz");
    }

    #[test]
    fn escape_strips_invalid_chars() {
        assert_eq!(escape_filename("dotnet-sdk-8.0.100"), "dotnet-sdk-8.0.100");
        assert_eq!(escape_filename("a/b\\c:d*e?\"f\"<g>|\n"), "abcdefg");
    }
}
