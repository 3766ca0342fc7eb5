use anyhow::{Context, Result, bail};
use clap::Parser;
use pharlink::install::{ConsoleIo, NoopInstaller, PharInstaller};
use pharlink::package::Package;
use pharlink::runtime::{RealRuntime, Runtime};
use std::path::{Path, PathBuf};

/// pharlink - phar tool installer
///
/// Links the packaged phar executable of an installed "toolphar" package
/// into a shared binary directory so it can be invoked by name, and removes
/// those links on uninstall.
///
/// Examples:
///   pharlink install vendor/acme/tool     # link vendor/acme/tool/*.phar into vendor/bin
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Shared binary directory (defaults to <vendor root>/bin; also via PHARLINK_BIN_DIR)
    #[arg(
        long = "bin-dir",
        short = 'b',
        env = "PHARLINK_BIN_DIR",
        value_name = "PATH",
        global = true
    )]
    pub bin_dir: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Link a package's phar into the shared binary directory
    Install(PackageArgs),

    /// Remove a package's links from the shared binary directory
    Remove(PackageArgs),
}

#[derive(clap::Args, Debug)]
pub struct PackageArgs {
    /// Path to the installed package directory
    #[arg(value_name = "PACKAGE_DIR")]
    pub package_dir: PathBuf,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;

    let args = match &cli.command {
        Commands::Install(args) | Commands::Remove(args) => args,
    };

    let package_dir = runtime
        .canonicalize(&args.package_dir)
        .with_context(|| format!("Package directory {:?} not found", args.package_dir))?;
    let package = Package::load(&runtime, &package_dir)?;

    let bin_dir = match cli.bin_dir {
        Some(path) => path,
        None => default_bin_dir(&package_dir)?,
    };

    let mut installer = PharInstaller::new(runtime, NoopInstaller, ConsoleIo, bin_dir);
    match cli.command {
        Commands::Install(_) => installer.install_binaries(&package),
        Commands::Remove(_) => installer.remove_binaries(&package),
    }
}

/// Default shared binary directory for the conventional vendor layout:
/// packages live at `<vendor root>/<vendor>/<name>`, links at
/// `<vendor root>/bin`.
fn default_bin_dir(package_dir: &Path) -> Result<PathBuf> {
    let Some(vendor_root) = package_dir.parent().and_then(Path::parent) else {
        bail!(
            "Cannot derive a bin directory from {:?}; pass --bin-dir",
            package_dir
        );
    };
    Ok(vendor_root.join("bin"))
}
