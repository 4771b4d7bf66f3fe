//! Discover command implementation.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use regex::Regex;

use nearby_link_core::{
    default_content_filter, Advertisement, ContentFilter, HttpResolver, MetadataResolver,
    NoopResolver, PeerObserver, PeerRecord, PeerTracker, TrackerConfig, UdpBeaconDriver,
};

use crate::cli::DiscoverArgs;
use crate::commands::load_config;
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the discover command
pub async fn run_discover(
    args: DiscoverArgs,
    config_path: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let mut config = load_config(config_path.as_deref()).await?;
    if let Some(ms) = args.inactivity_ms {
        config.inactivity_threshold_ms = ms;
    }
    config.validate()?;

    let filter = build_filter(args.filter.as_deref())?;
    let resolver: Arc<dyn MetadataResolver> = match &args.resolve_endpoint {
        Some(endpoint) => Arc::new(HttpResolver::new(endpoint.clone())?),
        None => Arc::new(NoopResolver),
    };
    let driver = Arc::new(UdpBeaconDriver::new(args.port));

    if args.watch {
        run_watch_mode(config, driver, filter, resolver, json).await
    } else {
        run_oneshot_mode(config, driver, filter, resolver, args.duration, json).await
    }
}

async fn run_oneshot_mode(
    config: TrackerConfig,
    driver: Arc<UdpBeaconDriver>,
    filter: ContentFilter,
    resolver: Arc<dyn MetadataResolver>,
    duration_secs: u64,
    json: bool,
) -> Result<(), CliError> {
    let tracker = PeerTracker::start(config, driver, filter, resolver, Arc::new(SilentObserver));

    let spinner = if json {
        None
    } else {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
        spinner.set_message(format!("Discovering peers for {} seconds...", duration_secs));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Some(spinner)
    };

    tokio::time::sleep(Duration::from_secs(duration_secs)).await;

    let peers = tracker.peers().await;
    tracker.stop().await;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    println!("{}", get_formatter(json).format_peers(&peers));

    if peers.is_empty() {
        return Err(CliError::NoPeersFound);
    }

    Ok(())
}

async fn run_watch_mode(
    config: TrackerConfig,
    driver: Arc<UdpBeaconDriver>,
    filter: ContentFilter,
    resolver: Arc<dyn MetadataResolver>,
    json: bool,
) -> Result<(), CliError> {
    if !json {
        println!("{}", "NearbyLink Peer Watch".bold());
        println!("{}", "Press Ctrl+C to stop".dimmed());
        println!();
    }

    let tracker = PeerTracker::start(
        config,
        driver,
        filter,
        resolver,
        Arc::new(EventPrinter { json }),
    );

    tokio::signal::ctrl_c().await.map_err(CliError::Io)?;
    tracker.stop().await;

    Ok(())
}

/// Combine the default content filter with an optional name/URI pattern.
fn build_filter(pattern: Option<&str>) -> Result<ContentFilter, CliError> {
    let base = default_content_filter();

    match pattern {
        None => Ok(base),
        Some(pattern) => {
            let regex = Regex::new(pattern)
                .map_err(|e| CliError::InvalidArgument(format!("invalid filter pattern: {}", e)))?;

            Ok(Arc::new(move |advertisement: &Advertisement| {
                base(advertisement) && matches_pattern(&regex, advertisement)
            }))
        }
    }
}

fn matches_pattern(regex: &Regex, advertisement: &Advertisement) -> bool {
    advertisement
        .name
        .as_deref()
        .map(|name| regex.is_match(name))
        .unwrap_or(false)
        || advertisement
            .uri
            .as_deref()
            .map(|uri| regex.is_match(uri))
            .unwrap_or(false)
}

/// Observer for one-shot discovery; the final table is the output.
struct SilentObserver;

impl PeerObserver for SilentObserver {
    fn on_found(&self, _peer: &PeerRecord) {}
    fn on_lost(&self, _peer: &PeerRecord) {}
}

/// Observer that prints one line per found/lost transition.
struct EventPrinter {
    json: bool,
}

impl PeerObserver for EventPrinter {
    fn on_found(&self, peer: &PeerRecord) {
        self.print("found", "+".green().bold(), peer);
    }

    fn on_lost(&self, peer: &PeerRecord) {
        self.print("lost", "-".red().bold(), peer);
    }
}

impl EventPrinter {
    fn print(&self, event: &str, marker: ColoredString, peer: &PeerRecord) {
        if self.json {
            let line = serde_json::json!({
                "event": event,
                "id": peer.id,
                "rssi": peer.rssi,
                "name": peer.advertisement.name,
                "uri": peer.advertisement.uri,
            });
            println!("{}", line);
        } else {
            let uri = peer
                .advertisement
                .uri
                .as_deref()
                .map(|uri| format!("  {}", uri.dimmed()))
                .unwrap_or_default();

            println!(
                "{} {} {} ({} dBm){}",
                chrono::Local::now().format("%H:%M:%S"),
                marker,
                peer.id,
                peer.rssi,
                uri
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advertisement(name: Option<&str>, uri: Option<&str>) -> Advertisement {
        Advertisement {
            name: name.map(|s| s.to_string()),
            uri: uri.map(|s| s.to_string()),
            tx_power: None,
        }
    }

    #[test]
    fn test_build_filter_default_requires_uri() {
        let filter = build_filter(None).unwrap();
        assert!(filter(&advertisement(None, Some("https://example.com"))));
        assert!(!filter(&advertisement(Some("nameless"), None)));
    }

    #[test]
    fn test_build_filter_pattern_narrows_matches() {
        let filter = build_filter(Some("lobby")).unwrap();
        assert!(filter(&advertisement(
            Some("lobby-beacon"),
            Some("https://example.com")
        )));
        assert!(filter(&advertisement(None, Some("https://example.com/lobby"))));
        assert!(!filter(&advertisement(
            Some("garage"),
            Some("https://example.com/garage")
        )));
    }

    #[test]
    fn test_build_filter_rejects_invalid_pattern() {
        let result = build_filter(Some("["));
        assert!(matches!(result, Err(CliError::InvalidArgument(_))));
    }
}
