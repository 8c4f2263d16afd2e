//! Build-time checks for system dependencies.
//!
//! Verifies that the X11 libraries (including the XTEST extension) are
//! discoverable so injection failures surface at build time instead of at
//! first run. Missing libraries produce warnings, not hard errors, since the
//! dry-run path works without a display server.

use std::process::Command;

fn pkg_config_exists(package: &str) -> bool {
    Command::new("pkg-config")
        .args(["--exists", package])
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    if !pkg_config_exists("x11") {
        println!("cargo:warning=X11 development libraries not found via pkg-config");
        println!("cargo:warning=Install with: sudo apt install libx11-dev (Debian/Ubuntu)");
    }

    if !pkg_config_exists("xtst") {
        println!("cargo:warning=XTEST extension library not found via pkg-config");
        println!("cargo:warning=Install with: sudo apt install libxtst-dev (Debian/Ubuntu)");
    }
}
