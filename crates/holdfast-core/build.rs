//! Build script for holdfast-core
//!
//! Checks system requirements before compilation:
//! - Minimum Rust version (C-string literals require 1.77.0+)
//! - Target sanity (the crate only makes sense on POSIX targets)

fn main()
{
    // Check minimum Rust version.
    // c"..." literals (used for dlsym symbol names) require Rust 1.77.0.
    if let Ok(rustc_version) = rustc_version::version() {
        let min_rust_version = rustc_version::Version::parse("1.77.0").unwrap();

        if rustc_version < min_rust_version {
            panic!(
                "holdfast-core requires Rust {} or newer, found {}",
                min_rust_version, rustc_version
            );
        }
    } else {
        // If we can't get the version (e.g. in some build environments), just warn
        println!("cargo:warning=could not verify Rust version");
    }

    // The facility interposes POSIX signal configuration; anything else is
    // uncharted territory.
    let target_os = std::env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    if !matches!(target_os.as_str(), "linux" | "macos" | "freebsd") {
        println!("cargo:warning=holdfast-core targets POSIX systems; building for `{target_os}` is untested");
    }
}
