//! User-scope environment variables of the real machine.
//!
//! On Windows these live in the registry under `HKCU\Environment` and are
//! distinct from the process environment, which also merges in the machine
//! scope. Other platforms have no persistent user scope: reads fall back to
//! the process environment and writes are skipped.

use std::io;

#[cfg(windows)]
use winreg::{
    RegKey,
    enums::{HKEY_CURRENT_USER, KEY_READ, KEY_WRITE, RegType},
};

#[cfg(windows)]
const ENVIRONMENT_KEY: &str = "Environment";

#[cfg(windows)]
fn environment_key(flags: u32) -> io::Result<RegKey> {
    RegKey::predef(HKEY_CURRENT_USER).open_subkey_with_flags(ENVIRONMENT_KEY, flags)
}

/// Read `name` from `HKCU\Environment`, unexpanded.
#[cfg(windows)]
pub(crate) fn get(name: &str) -> Option<String> {
    environment_key(KEY_READ).ok()?.get_value(name).ok()
}

/// Write `name` to `HKCU\Environment`.
///
/// An existing `REG_EXPAND_SZ` value keeps its type, so entries such as
/// `%USERPROFILE%\bin` still expand after the write.
#[cfg(windows)]
pub(crate) fn set(name: &str, value: &str) -> io::Result<()> {
    let key = environment_key(KEY_READ | KEY_WRITE)?;
    match key.get_raw_value(name) {
        Ok(mut raw) if matches!(raw.vtype, RegType::REG_EXPAND_SZ) => {
            raw.bytes = wide_bytes(value).into();
            key.set_raw_value(name, &raw)?;
        }
        _ => key.set_value(name, &value.to_owned())?,
    }
    tracing::debug!(var = name, "Updated HKCU\\Environment");
    Ok(())
}

/// NUL-terminated UTF-16LE, the registry's string encoding.
#[cfg(windows)]
fn wide_bytes(value: &str) -> Vec<u8> {
    value
        .encode_utf16()
        .chain(std::iter::once(0))
        .flat_map(u16::to_le_bytes)
        .collect()
}

/// Read `name` from the process environment.
#[cfg(not(windows))]
pub(crate) fn get(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

/// No persistent user scope exists here; the write is skipped.
#[cfg(not(windows))]
#[allow(clippy::unnecessary_wraps)]
pub(crate) fn set(name: &str, _value: &str) -> io::Result<()> {
    tracing::warn!(
        var = name,
        "User-scope environment variables only exist on Windows, skipping"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(not(windows))]
    #[test]
    fn writes_are_skipped_without_user_scope() {
        let name = "DNVM_USER_ENV_TEST_UNSET";
        set(name, "value").unwrap();
        assert_eq!(get(name), None);
        assert_eq!(get("PATH"), std::env::var("PATH").ok());
    }

    #[cfg(windows)]
    struct Cleanup(&'static str);

    #[cfg(windows)]
    impl Drop for Cleanup {
        fn drop(&mut self) {
            if let Ok(key) = environment_key(KEY_READ | KEY_WRITE) {
                let _ = key.delete_value(self.0);
            }
        }
    }

    #[cfg(windows)]
    #[test]
    fn user_scope_is_not_the_process_environment() {
        let name = "DNVM_USER_ENV_TEST_SCOPE";
        let _cleanup = Cleanup(name);

        set(name, r"C:\dnvm").unwrap();
        assert_eq!(get(name).as_deref(), Some(r"C:\dnvm"));
        assert!(std::env::var(name).is_err());
    }

    #[cfg(windows)]
    #[test]
    fn expandable_values_keep_their_type() {
        let name = "DNVM_USER_ENV_TEST_EXPAND";
        let _cleanup = Cleanup(name);
        let key = environment_key(KEY_READ | KEY_WRITE).unwrap();
        let raw = winreg::RegValue {
            bytes: wide_bytes(r"%USERPROFILE%\tools").into(),
            vtype: RegType::REG_EXPAND_SZ,
        };
        key.set_raw_value(name, &raw).unwrap();

        set(name, r"C:\dnvm;%USERPROFILE%\tools").unwrap();

        let stored = key.get_raw_value(name).unwrap();
        assert!(matches!(stored.vtype, RegType::REG_EXPAND_SZ));
        assert_eq!(
            get(name).as_deref(),
            Some(r"C:\dnvm;%USERPROFILE%\tools")
        );
    }
}
