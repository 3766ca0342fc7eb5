//! Proxy script generation for hosts where symlinks are unavailable.
//!
//! Both generators are pure: the same `(bin_path, link_path)` pair always
//! produces the same script text. The target is referenced through the
//! shortest relative path from the proxy's own location, the same
//! computation used for symlink targets.

use std::path::{Path, PathBuf};

use crate::runtime::path::relative_bin_path;

/// Whether a binary is a native Windows batch script.
/// File names are compared case-insensitively, as Windows does.
pub(crate) fn is_batch_script(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("bat"))
}

/// Generate a POSIX sh proxy that invokes the phar through the `php`
/// interpreter, forwarding all arguments. `exec` propagates the exit code.
pub fn generate_unix_proxy(bin_path: &Path, link_path: &Path) -> String {
    let target = proxy_target(bin_path, link_path);
    if target.is_absolute() {
        return format!(
            "#!/usr/bin/env sh\n\nexec php \"{}\" \"$@\"\n",
            slash_separated(&target)
        );
    }

    format!(
        "#!/usr/bin/env sh\n\
         \n\
         dir=$(CDPATH= cd -- \"$(dirname -- \"$0\")\" && pwd -P)\n\
         \n\
         exec php \"$dir/{}\" \"$@\"\n",
        slash_separated(&target)
    )
}

/// Generate a Windows batch proxy with argument forwarding. Batch targets
/// are chained with `call` so control returns and the exit code survives;
/// anything else goes through the `php` interpreter.
pub fn generate_windows_proxy(bin_path: &Path, link_path: &Path) -> String {
    let caller = if is_batch_script(bin_path) {
        "call"
    } else {
        "php"
    };
    let target = proxy_target(bin_path, link_path);
    let bin_target = if target.is_absolute() {
        slash_separated(&target)
    } else {
        // %~dp0 expands to the proxy's own directory, trailing separator included
        format!("%~dp0{}", slash_separated(&target))
    };

    format!(
        "@ECHO OFF\r\n\
         setlocal DISABLEDELAYEDEXPANSION\r\n\
         SET BIN_TARGET={bin_target}\r\n\
         {caller} \"%BIN_TARGET%\" %*\r\n"
    )
}

/// Shortest relative path from the proxy location to the binary, falling
/// back to the absolute binary path when none exists (cross-drive links).
fn proxy_target(bin_path: &Path, link_path: &Path) -> PathBuf {
    relative_bin_path(link_path, bin_path).unwrap_or_else(|| bin_path.to_path_buf())
}

/// Render a path with forward slashes so generated scripts are identical
/// across hosts. Both sh and cmd.exe accept forward separators here.
fn slash_separated(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}
