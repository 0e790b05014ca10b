use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, reload, util::SubscriberInitExt};

use playback_proxy::{
    config::{Config, LoggingConfig},
    models::{Headers, QualityLabel},
    proxy::{ExternalPlayer, ProxyResolver},
    quality::{PreferenceStore, qualities_from_master_playlist, visible_qualities},
    utils::url::UrlUtils,
};

#[derive(Parser)]
#[command(name = "playback-proxy")]
#[command(version)]
#[command(about = "Resolve proxied playback URLs and manage stream quality preferences")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Log level (overrides config file)
    #[arg(short = 'v', long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the playback URL for a media URL
    Resolve {
        url: String,

        /// Treat the URL as an HLS manifest
        #[arg(long)]
        hls: bool,

        /// Ask the proxy to serve the media as an attachment
        #[arg(long)]
        download: bool,

        /// Request header forwarded by the proxy, as name=value
        #[arg(short = 'H', long = "header", value_name = "NAME=VALUE")]
        headers: Vec<String>,

        /// Print a deep link for an external player (vlc, iina, outplayer)
        #[arg(long)]
        player: Option<ExternalPlayer>,
    },
    /// Report whether a URL already points at a proxy
    Check { url: String },
    /// Print the quality menu for a set of available qualities
    Qualities {
        /// Quality the source offers (360, 480, 720, 1080, 4k)
        #[arg(short, long = "available")]
        available: Vec<QualityLabel>,

        /// Read the available qualities from an HLS master playlist
        #[arg(long, value_name = "FILE")]
        playlist: Option<String>,
    },
    /// Show or update the stored quality preferences
    Prefs {
        /// Turn automatic quality on or off
        #[arg(long, value_name = "on|off")]
        automatic: Option<String>,

        /// Remember a quality as the last explicit choice
        #[arg(long)]
        choose: Option<QualityLabel>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The config's level replaces the startup filter unless --log-level or
    // RUST_LOG pinned one.
    let env_filter = EnvFilter::try_from_default_env().ok();
    let fixed_level = env_filter.is_some() || cli.log_level.is_some();
    let startup = cli
        .log_level
        .clone()
        .map(|level| LoggingConfig { level })
        .unwrap_or_default();
    let (filter, filter_handle) = reload::Layer::new(
        env_filter.unwrap_or_else(|| EnvFilter::new(startup.filter_directive())),
    );
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load_from_file(&cli.config)?;
    if !fixed_level {
        filter_handle.reload(EnvFilter::new(config.logging.filter_directive()))?;
    }

    info!("Configuration loaded from: {}", cli.config);

    match cli.command {
        Command::Resolve {
            url,
            hls,
            download,
            headers,
            player,
        } => {
            if !UrlUtils::is_valid(&url) {
                bail!("Invalid URL: {}", url);
            }
            let headers = parse_headers(&headers)?;
            let resolver = ProxyResolver::from_config(&config.proxy);

            let resolved = if resolver.is_already_proxied(&url) {
                url
            } else if hls {
                resolver.build_m3u8_proxy_url(&url, &headers, download)
            } else {
                resolver.build_proxy_url(&url, &headers, download)
            };

            match player {
                Some(player) => println!("{}", player.deep_link(&resolved)),
                None => println!("{}", resolved),
            }
        }
        Command::Check { url } => {
            let resolver = ProxyResolver::from_config(&config.proxy);
            println!("{}", resolver.is_already_proxied(&url));
        }
        Command::Qualities {
            mut available,
            playlist,
        } => {
            if let Some(path) = playlist {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read playlist {}", path))?;
                available.extend(qualities_from_master_playlist(&text));
            }
            for option in visible_qualities(&available, None) {
                let marker = if option.selectable { "" } else { " (unavailable)" };
                println!("{}{}", option.label.display_name(), marker);
            }
        }
        Command::Prefs { automatic, choose } => {
            let mut store = PreferenceStore::from_config(&config.preferences);
            if let Some(value) = automatic {
                store.set_automatic_quality(parse_switch(&value)?);
            }
            if let Some(quality) = choose
                && !store.set_last_chosen_quality(Some(quality))
            {
                bail!("Quality {} cannot be chosen", quality);
            }
            println!("{}", serde_json::to_string_pretty(store.preferences())?);
        }
    }

    Ok(())
}

fn parse_headers(raw: &[String]) -> Result<Headers> {
    raw.iter()
        .map(|pair| {
            let (name, value) = pair
                .split_once('=')
                .with_context(|| format!("Header must be NAME=VALUE: {}", pair))?;
            Ok((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn parse_switch(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        other => bail!("Expected on or off, got {}", other),
    }
}
