use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use neso_core::playback::Session;
use neso_machines::registry;
use tracing::info;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

mod audio;
mod config;
mod emulator;
mod input;
mod overlay;
mod rom_path;
mod video;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "neso", version, about = "Real-time console playback host")]
struct Cli {
    /// Program image to load at startup (raw file or .zip).
    rom: Option<PathBuf>,

    /// Console to run.
    #[arg(long, value_name = "NAME", default_value = "pattern")]
    console: String,

    /// Initial window scale, overriding the config file.
    #[arg(long, value_name = "N")]
    scale: Option<u32>,

    /// Config file (default: <config dir>/neso/config.toml).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// List available consoles and exit.
    #[arg(long, default_value_t = false)]
    list: bool,

    /// Log filter, e.g. "debug" or "neso_core=trace". Overrides RUST_LOG.
    #[arg(long, value_name = "FILTER")]
    log: Option<String>,
}

/// `--log` wins over `RUST_LOG`; with neither set the filter is `info`.
/// Unparsable `RUST_LOG` directives are skipped, a bad `--log` is an error.
fn log_filter(cli: Option<&str>, env: Option<&str>) -> Result<EnvFilter> {
    let builder = EnvFilter::builder().with_default_directive(LevelFilter::INFO.into());
    match cli {
        Some(directives) => builder.parse(directives).context("invalid --log filter"),
        None => Ok(builder.parse_lossy(env.unwrap_or_default())),
    }
}

fn init_logging(cli: Option<&str>) -> Result<()> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = log_filter(cli, env.as_deref())?;
    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log.as_deref())?;

    if cli.list {
        for entry in registry::all() {
            println!("{:<12} {}", entry.name, entry.description);
        }
        return Ok(());
    }

    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(scale) = cli.scale {
        config.video.scale = scale;
    }

    let Some(entry) = registry::find(&cli.console) else {
        let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
        bail!("unknown console {:?} (available: {})", cli.console, names.join(", "));
    };

    let session = Session::new((entry.create)());
    if let Some(path) = &cli.rom {
        let program = rom_path::load_program(path)?;
        session
            .load_program(&program)
            .with_context(|| format!("cannot load {}", path.display()))?;
    }

    if emulator::run(session, &config)?.is_some() {
        info!("console released");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_filter_defaults_to_info() {
        let filter = log_filter(None, None).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
        let filter = log_filter(None, Some("")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }

    #[test]
    fn rust_log_level_is_honored() {
        let filter = log_filter(None, Some("debug")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
        let filter = log_filter(None, Some("warn")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn cli_filter_overrides_rust_log() {
        let filter = log_filter(Some("trace"), Some("warn")).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::TRACE));
    }

    #[test]
    fn bad_cli_filter_is_an_error() {
        assert!(log_filter(Some("neso_core=loud"), None).is_err());
    }
}
