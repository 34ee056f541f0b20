//! Binary entrypoint for the isfri CLI.
//!
//! Commands:
//! - `serve [--bind <addr>]` - run the TCP device node
//! - `cat [--chunk <n>] [--at <rfc3339>]` - open the device in-process and print its answer
//! - `write <text>` - try to write to the device (always refused)
//! - `probe [--addr <addr>] [--timeout <s>]` - ask a running device node, print JSON
//! - `init` - create a starter `config.toml`
//!
//! See the library crate docs for module-level details: `isfri::`.
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use log::info;

use isfri::config::Config;
use isfri::device::{Clock, DeviceEndpoint, FixedClock, SystemClock};
use isfri::host::{self, client, server::DeviceServer};

#[derive(Parser)]
#[command(name = "isfri")]
#[command(about = "A read-only device that tells you whether it is Friday (UTC)")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (can be used before or after subcommand)
    #[arg(short, long, default_value = "config.toml", global = true)]
    config: String,

    /// Verbose logging (-v, -vv for more; may appear before or after subcommand)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TCP device node
    Serve {
        /// Listen address, overrides `server.bind`
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Open the device in-process and print its answer
    Cat {
        /// Bytes per read, overrides `server.chunk_size`
        #[arg(long)]
        chunk: Option<usize>,
        /// Pretend it is this instant (RFC 3339, e.g. 2023-09-15T12:00:00Z)
        #[arg(long)]
        at: Option<String>,
    },
    /// Try to write to the device
    Write {
        text: String,
    },
    /// Connect to a running device node and report what it said as JSON
    Probe {
        /// Node address, defaults to `server.bind`
        #[arg(short, long)]
        addr: Option<String>,
        /// Seconds to wait before giving up
        #[arg(short, long, default_value_t = 5)]
        timeout: u64,
    },
    /// Write a default configuration file
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing config file is fine for everything but an explicit load; fall back to defaults.
    let config = match cli.command {
        Commands::Init => None,
        _ => match Config::load(&cli.config).await {
            Ok(cfg) => Some(cfg),
            Err(e) => {
                if std::path::Path::new(&cli.config).exists() {
                    return Err(e);
                }
                None
            }
        },
    };
    init_logging(&config, cli.verbose);
    let mut config = config.unwrap_or_default();

    match cli.command {
        Commands::Serve { bind } => {
            if let Some(bind) = bind {
                config.server.bind = bind;
            }
            config.validate()?;
            info!("Starting isfri v{}", env!("CARGO_PKG_VERSION"));
            let server = DeviceServer::bind(config, Arc::new(DeviceEndpoint::new())).await?;
            server.run().await?;
        }
        Commands::Cat { chunk, at } => {
            let chunk = chunk.unwrap_or(config.server.chunk_size);
            match at {
                Some(at) => {
                    let now = DateTime::parse_from_rfc3339(&at)
                        .map_err(|e| anyhow!("Invalid --at '{}': {}", at, e))?
                        .with_timezone(&Utc);
                    cat(&DeviceEndpoint::with_clock(FixedClock::new(now)), chunk)?;
                }
                None => cat(&DeviceEndpoint::with_clock(SystemClock), chunk)?,
            }
        }
        Commands::Write { text } => {
            let dev = DeviceEndpoint::new();
            let mut file = host::open_device(&dev)?;
            let result = host::write_device(&dev, &mut file, text.as_bytes());
            host::release_device(&dev, file)?;
            if let Err(e) = result {
                eprintln!("write: {} (errno {})", e, e.errno());
                std::process::exit(1);
            }
        }
        Commands::Probe { addr, timeout } => {
            let addr = addr.unwrap_or_else(|| config.server.bind.clone());
            let addr: std::net::SocketAddr = addr
                .parse()
                .map_err(|_| anyhow!("Invalid address '{}'", addr))?;
            let report = client::probe(addr, Duration::from_secs(timeout)).await?;
            println!("{}", serde_json::to_string(&report)?);
            std::process::exit(if report.is_ok() { 0 } else { 1 });
        }
        Commands::Init => {
            Config::create_default(&cli.config).await?;
            info!("Configuration file created at {}", cli.config);
        }
    }

    Ok(())
}

fn cat<C: Clock>(dev: &DeviceEndpoint<C>, chunk: usize) -> Result<()> {
    let mut file = host::open_device(dev)?;
    let text = host::read_to_end(dev, &mut file, chunk)?;
    host::release_device(dev, file)?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&text)?;
    stdout.flush()?;
    Ok(())
}

fn init_logging(config: &Option<Config>, verbosity: u8) {
    let mut builder = env_logger::Builder::new();
    // CLI verbosity overrides the configured level
    let base_level = match verbosity {
        0 => config
            .as_ref()
            .and_then(|cfg| cfg.log_level().ok())
            .unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    builder.filter_level(base_level);

    let log_file = config
        .as_ref()
        .and_then(|cfg| cfg.logging.file.as_ref())
        .and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

    if let Some(f) = log_file {
        let file = std::sync::Mutex::new(f);
        // Foreground runs also echo to the console
        let is_tty = atty::is(atty::Stream::Stdout);
        builder.format(move |fmt, record| {
            let ts = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
            let line = format!("{} [{}] {}", ts, record.level(), record.args());
            if let Ok(mut guard) = file.lock() {
                let _ = writeln!(guard, "{}", line);
            }
            if is_tty {
                writeln!(fmt, "{}", line)
            } else {
                Ok(())
            }
        });
    } else {
        builder.format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ"),
                record.level(),
                record.args()
            )
        });
    }
    let _ = builder.try_init();
}
