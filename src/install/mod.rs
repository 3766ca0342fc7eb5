//! Linking of packaged phar executables into the shared binary directory.

use anyhow::{Context, Result};
use log::debug;
use std::path::{Path, PathBuf};

use crate::package::Package;
use crate::runtime::{Runtime, relative_bin_path};

mod proxy;

pub use proxy::{generate_unix_proxy, generate_windows_proxy};

use proxy::is_batch_script;

/// File name pattern of packaged executables.
const PHAR_PATTERN: &str = "*.phar";

/// A package's packaged executable, resolved against the shared binary
/// directory. Recomputed on every install/remove call; the filesystem
/// entries themselves are the only persistent state.
#[derive(Debug, Clone, PartialEq)]
pub struct PharBinary {
    /// Canonical path of the phar file inside the package.
    pub path: PathBuf,
    /// Name under which the binary is exposed: the `bin-name` extra value
    /// when declared, otherwise the phar's file stem.
    pub name: String,
    /// Target path of the link inside the shared binary directory.
    pub link: PathBuf,
}

/// Generic package install/remove behavior supplied by the host package
/// manager. The linker runs this step before its own linking logic.
#[cfg_attr(test, mockall::automock)]
pub trait PackageInstaller {
    fn install(&mut self, package: &Package) -> Result<()>;
    fn remove(&mut self, package: &Package) -> Result<()>;
}

/// `PackageInstaller` for hosts that place and remove package files
/// themselves before invoking the linker.
pub struct NoopInstaller;

impl PackageInstaller for NoopInstaller {
    fn install(&mut self, _package: &Package) -> Result<()> {
        Ok(())
    }

    fn remove(&mut self, _package: &Package) -> Result<()> {
        Ok(())
    }
}

/// Sink for human-readable progress and skip notices.
pub trait InstallerIo {
    fn write(&mut self, message: &str);
}

/// Writes notices to standard output.
pub struct ConsoleIo;

impl InstallerIo for ConsoleIo {
    fn write(&mut self, message: &str) {
        println!("{message}");
    }
}

/// Installer for the "toolphar" package type: exposes a package's phar in
/// the shared binary directory under its binary name, as a symlink where
/// the filesystem supports one and as generated proxy scripts elsewhere.
pub struct PharInstaller<R: Runtime, B: PackageInstaller, O: InstallerIo> {
    runtime: R,
    base: B,
    io: O,
    bin_dir: PathBuf,
    bin_dir_ready: bool,
}

impl<R: Runtime, B: PackageInstaller, O: InstallerIo> PharInstaller<R, B, O> {
    pub fn new(runtime: R, base: B, io: O, bin_dir: PathBuf) -> Self {
        PharInstaller {
            runtime,
            base,
            io,
            bin_dir,
            bin_dir_ready: false,
        }
    }

    /// Locate the package's phar and compute where it should be linked.
    ///
    /// Returns `Ok(None)` when the package contains no phar; that is a
    /// valid state, not an error. When several phars are present, matches are
    /// sorted lexicographically and the first is taken. The shared binary
    /// directory is created only when `for_link_creation` is set.
    #[tracing::instrument(skip(self, package))]
    pub fn resolve_phar_binary(
        &mut self,
        package: &Package,
        for_link_creation: bool,
    ) -> Result<Option<PharBinary>> {
        let Some(phar) = self.find_first_phar(&package.install_path)? else {
            return Ok(None);
        };

        if for_link_creation {
            self.ensure_bin_dir()?;
        }

        let path = self
            .runtime
            .canonicalize(&phar)
            .with_context(|| format!("Failed to resolve phar {:?}", phar))?;
        let name = match package.bin_name() {
            Some(name) => name.to_string(),
            None => path
                .file_stem()
                .context("Phar path has no file name")?
                .to_string_lossy()
                .into_owned(),
        };
        let link = self.bin_dir.join(&name);

        Ok(Some(PharBinary { path, name, link }))
    }

    /// Expose the package's phar in the shared binary directory.
    ///
    /// An existing entry at the link path is never overwritten: a leftover
    /// symlink gets its permissions refreshed and a skip notice is emitted
    /// either way.
    #[tracing::instrument(skip(self, package))]
    pub fn install_binaries(&mut self, package: &Package) -> Result<()> {
        self.base.install(package)?;

        let Some(bin) = self.resolve_phar_binary(package, true)? else {
            debug!("No phar in {:?}, nothing to link", package.install_path);
            return Ok(());
        };

        let link_is_symlink = self.runtime.is_symlink(&bin.link);
        if link_is_symlink || self.runtime.exists(&bin.link) {
            if link_is_symlink {
                // Leftover from a previous install whose target may have
                // changed; keep the entry executable.
                let _ = self
                    .runtime
                    .set_permissions(&bin.link, self.executable_mode());
            }
            self.io.write(&format!(
                "    Skipped installation of bin {} for package {}: name conflicts with an existing file",
                bin.name, package.name
            ));
            return Ok(());
        }

        if self.runtime.is_windows() {
            self.install_windows_proxies(package, &bin)
        } else {
            self.install_symlink(&bin)
        }
    }

    /// Remove the package's entries from the shared binary directory.
    ///
    /// Idempotent: removing twice, or removing when nothing was ever
    /// linked, is a no-op. The `.bat` proxy is cleaned up on every host so
    /// switching OS between install and removal leaves no orphans.
    #[tracing::instrument(skip(self, package))]
    pub fn remove_binaries(&mut self, package: &Package) -> Result<()> {
        self.base.remove(package)?;

        let Some(bin) = self.resolve_phar_binary(package, false)? else {
            return Ok(());
        };

        if self.runtime.is_symlink(&bin.link) {
            self.runtime.remove_symlink(&bin.link)?;
        } else if self.runtime.exists(&bin.link) {
            self.runtime.remove_file(&bin.link)?;
        }

        let bat = bat_path(&bin.link);
        if self.runtime.exists(&bat) {
            self.runtime.remove_file(&bat)?;
        }

        Ok(())
    }

    /// Symlink the phar under its binary name, falling back to a shell
    /// proxy script when the filesystem does not support symlinks.
    fn install_symlink(&mut self, bin: &PharBinary) -> Result<()> {
        let relative =
            relative_bin_path(&bin.link, &bin.path).unwrap_or_else(|| bin.path.clone());

        if let Err(err) = self.runtime.symlink(&relative, &bin.link) {
            // Symlinks are not supported everywhere, e.g. on smbfs mounts.
            debug!(
                "Symlink creation at {:?} failed ({:#}), writing a shell proxy instead",
                bin.link, err
            );
            self.runtime
                .write(&bin.link, generate_unix_proxy(&bin.path, &bin.link).as_bytes())?;
        }

        let _ = self
            .runtime
            .set_permissions(&bin.link, self.executable_mode());
        Ok(())
    }

    /// Windows hosts get no symlink: a shell proxy (so Cygwin-like
    /// environments can invoke the phar by name) plus a `.bat` proxy for
    /// the native command shell.
    fn install_windows_proxies(&mut self, package: &Package, bin: &PharBinary) -> Result<()> {
        let mode = self.executable_mode();
        let mut link = bin.link.clone();

        if !is_batch_script(&bin.path) {
            self.runtime
                .write(&link, generate_unix_proxy(&bin.path, &link).as_bytes())?;
            let _ = self.runtime.set_permissions(&link, mode);

            link = bat_path(&link);
            if self.runtime.exists(&link) {
                self.io.write(&format!(
                    "    Skipped installation of bin {}.bat proxy for package {}: a .bat proxy was already installed",
                    bin.name, package.name
                ));
                return Ok(());
            }
        }

        self.runtime
            .write(&link, generate_windows_proxy(&bin.path, &link).as_bytes())?;
        let _ = self.runtime.set_permissions(&link, mode);
        Ok(())
    }

    /// First `*.phar` file directly inside the install directory, in
    /// lexicographic order. A missing directory counts as "no phar".
    fn find_first_phar(&self, install_path: &Path) -> Result<Option<PathBuf>> {
        if !self.runtime.exists(install_path) {
            return Ok(None);
        }

        let pattern = glob::Pattern::new(PHAR_PATTERN).context("Invalid phar pattern")?;
        let mut phars: Vec<PathBuf> = self
            .runtime
            .read_dir(install_path)?
            .into_iter()
            .filter(|entry| {
                entry
                    .file_name()
                    .map(|name| pattern.matches(&name.to_string_lossy()))
                    .unwrap_or(false)
                    && !self.runtime.is_dir(entry)
            })
            .collect();

        phars.sort();
        Ok(phars.into_iter().next())
    }

    /// Create the shared binary directory the first time a link needs it.
    fn ensure_bin_dir(&mut self) -> Result<()> {
        if self.bin_dir_ready {
            return Ok(());
        }
        self.runtime
            .create_dir_all(&self.bin_dir)
            .with_context(|| format!("Failed to create bin directory {:?}", self.bin_dir))?;
        self.bin_dir_ready = true;
        Ok(())
    }

    /// Executable permission bits, intersected with the process mask.
    fn executable_mode(&self) -> u32 {
        0o777 & !self.runtime.umask()
    }
}

/// The `.bat` sibling of a link path (`tool` -> `tool.bat`).
fn bat_path(link: &Path) -> PathBuf {
    let mut os = link.as_os_str().to_owned();
    os.push(".bat");
    PathBuf::from(os)
}
