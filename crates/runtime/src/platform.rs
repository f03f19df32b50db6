//! Host nativeness check for game platform strings.

/// Returns whether a game targeting `platform` runs directly on this host.
///
/// A custom library entry without a platform field is assumed to target
/// windows, the overwhelmingly common case for sideloaded installers.
pub fn is_native(platform: Option<&str>) -> bool {
    is_native_on(platform, std::env::consts::OS)
}

/// [`is_native`] against an explicit host OS string (testable).
pub fn is_native_on(platform: Option<&str>, host_os: &str) -> bool {
    let platform = platform.unwrap_or("windows").to_ascii_lowercase();
    match platform.as_str() {
        "linux" => host_os == "linux",
        "windows" | "win32" | "win64" => host_os == "windows",
        "mac" | "macos" | "osx" | "darwin" => host_os == "macos",
        _ => false,
    }
}
