//! Backend selection
//!
//! Precedence, highest first:
//! 1. `HEADJACK_KEYRING_BACKEND`, even when the caller asked for a specific backend
//! 2. the backend requested in [`StoreConfig`](crate::StoreConfig)
//! 3. platform auto-detection
//!
//! An override of `auto` means "detect", same as not asking for a backend;
//! it does not pin anything.

use std::path::Path;

use tracing::debug;

use crate::config::{Backend, ENV_KEYRING_BACKEND};
use crate::error::{KeychainError, Result};
use crate::host::Host;

/// Resolve the backend to open for `requested`.
///
/// An override naming an unknown backend is reported as an open failure for
/// that literal name.
pub fn resolve_backend(requested: Backend, host: &dyn Host) -> Result<Backend> {
    let mut backend = requested;
    if backend == Backend::Auto {
        backend = detect_backend(host);
    }

    if let Some(name) = host.var(ENV_KEYRING_BACKEND).filter(|v| !v.is_empty()) {
        debug!("{} overrides backend {} with {}", ENV_KEYRING_BACKEND, backend, name);
        backend = match name.parse::<Backend>() {
            Ok(Backend::Auto) => detect_backend(host),
            Ok(parsed) => parsed,
            Err(reason) => return Err(KeychainError::Open { backend: name, reason }),
        };
    }

    Ok(backend)
}

/// Best available backend for the host platform
pub fn detect_backend(host: &dyn Host) -> Backend {
    match host.os() {
        "macos" | "ios" => Backend::Keychain,
        "windows" => Backend::WinCred,
        "linux" => {
            if secret_service_reachable(host) {
                Backend::SecretService
            } else if keyctl_available(host) {
                Backend::Keyctl
            } else {
                Backend::File
            }
        }
        _ => Backend::File,
    }
}

/// A session bus looks reachable when its address is exported or the
/// runtime directory holds the default `bus` socket.
fn secret_service_reachable(host: &dyn Host) -> bool {
    if host.var("DBUS_SESSION_BUS_ADDRESS").is_some_and(|v| !v.is_empty()) {
        return true;
    }
    match host.var("XDG_RUNTIME_DIR").filter(|v| !v.is_empty()) {
        Some(runtime_dir) => host.path_exists(&Path::new(&runtime_dir).join("bus")),
        None => false,
    }
}

/// Every Linux kernel we run on ships keyctl
fn keyctl_available(host: &dyn Host) -> bool {
    host.os() == "linux"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::fake::FakeHost;

    #[test]
    fn test_detect_macos() {
        assert_eq!(detect_backend(&FakeHost::new("macos")), Backend::Keychain);
    }

    #[test]
    fn test_detect_windows() {
        assert_eq!(detect_backend(&FakeHost::new("windows")), Backend::WinCred);
    }

    #[test]
    fn test_detect_linux_with_bus_address() {
        let host = FakeHost::new("linux")
            .with_var("DBUS_SESSION_BUS_ADDRESS", "unix:path=/run/user/1000/bus");
        assert_eq!(detect_backend(&host), Backend::SecretService);
    }

    #[test]
    fn test_detect_linux_with_runtime_dir_socket() {
        let host = FakeHost::new("linux")
            .with_var("XDG_RUNTIME_DIR", "/run/user/1000")
            .with_path("/run/user/1000/bus");
        assert_eq!(detect_backend(&host), Backend::SecretService);
    }

    #[test]
    fn test_detect_linux_runtime_dir_without_socket() {
        let host = FakeHost::new("linux").with_var("XDG_RUNTIME_DIR", "/run/user/1000");
        assert_eq!(detect_backend(&host), Backend::Keyctl);
    }

    #[test]
    fn test_detect_headless_linux() {
        assert_eq!(detect_backend(&FakeHost::new("linux")), Backend::Keyctl);
    }

    #[test]
    fn test_detect_other_platforms_use_file() {
        assert_eq!(detect_backend(&FakeHost::new("freebsd")), Backend::File);
        assert_eq!(detect_backend(&FakeHost::new("openbsd")), Backend::File);
    }

    #[test]
    fn test_explicit_backend_kept_without_override() {
        let host = FakeHost::new("macos");
        assert_eq!(resolve_backend(Backend::File, &host).unwrap(), Backend::File);
    }

    #[test]
    fn test_env_override_beats_auto_detection() {
        let host = FakeHost::new("macos").with_var(ENV_KEYRING_BACKEND, "file");
        assert_eq!(resolve_backend(Backend::Auto, &host).unwrap(), Backend::File);
    }

    #[test]
    fn test_env_override_beats_explicit_choice() {
        // The override wins even over a backend chosen in code.
        let host = FakeHost::new("linux").with_var(ENV_KEYRING_BACKEND, "keyctl");
        assert_eq!(resolve_backend(Backend::File, &host).unwrap(), Backend::Keyctl);
    }

    #[test]
    fn test_auto_override_detects_instead_of_pinning() {
        let host = FakeHost::new("macos").with_var(ENV_KEYRING_BACKEND, "auto");
        assert_eq!(resolve_backend(Backend::File, &host).unwrap(), Backend::Keychain);
        assert_eq!(resolve_backend(Backend::Auto, &host).unwrap(), Backend::Keychain);
    }

    #[test]
    fn test_empty_env_override_ignored() {
        let host = FakeHost::new("windows").with_var(ENV_KEYRING_BACKEND, "");
        assert_eq!(resolve_backend(Backend::Auto, &host).unwrap(), Backend::WinCred);
    }

    #[test]
    fn test_unknown_env_override_fails_open() {
        let host = FakeHost::new("linux").with_var(ENV_KEYRING_BACKEND, "pass");
        match resolve_backend(Backend::Auto, &host) {
            Err(KeychainError::Open { backend, .. }) => assert_eq!(backend, "pass"),
            other => panic!("expected open failure, got {:?}", other),
        }
    }
}
