//! cassmon - Cassandra metrics integration.
//!
//! Reads JMX attributes of a Cassandra node through a Jolokia agent and
//! prints them as a host-agent integration payload on stdout. Runs once by
//! default; with `--long-running` it collects every `--interval` seconds and
//! prints a `{}` heartbeat in between.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;
#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::io::{Stdout, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use cassmon_core::catalog::Catalog;
use cassmon_core::collector::{Collector, DEFAULT_COLUMN_FAMILIES_LIMIT};
use cassmon_core::filter::{CONFIG_PATH_ENV, FilterRule};
use cassmon_core::integration::Integration;
use cassmon_core::inventory::{load_config_file, populate_inventory};
use cassmon_core::sample::store::{DEFAULT_TTL_SECS, MetricStore, SharedStore};
use cassmon_core::source::{AttributeSource, JolokiaConfig, JolokiaSource};

/// Environment variable naming the metric store file.
const CACHE_PATH_ENV: &str = "NRIA_CACHE_PATH";

/// Cassandra metrics integration.
#[derive(Parser, Debug)]
#[command(name = "cassmon", about = "Cassandra metrics integration", version)]
struct Args {
    /// Hostname or IP where Cassandra is running.
    #[arg(long, default_value = "localhost")]
    hostname: String,

    /// Port of the Jolokia agent attached to the Cassandra JVM.
    #[arg(long, env = "PORT", default_value_t = 8778)]
    port: u16,

    /// Context path of the Jolokia agent.
    #[arg(long, env = "JOLOKIA_PATH", default_value = "/jolokia")]
    jolokia_path: String,

    /// URL scheme of the Jolokia agent (http or https).
    #[arg(long, env = "SCHEME", default_value = "http")]
    scheme: String,

    /// Username for accessing JMX.
    #[arg(long, env = "USERNAME", default_value = "")]
    username: String,

    /// Password for the given user.
    #[arg(long, env = "PASSWORD", default_value = "", hide_env_values = true)]
    password: String,

    /// Cassandra configuration file, reported as inventory.
    #[arg(long, default_value = "/etc/cassandra/cassandra.yaml")]
    config_path: PathBuf,

    /// Timeout in milliseconds per single JMX query.
    #[arg(long, env = "TIMEOUT", default_value_t = 2000)]
    timeout: u64,

    /// Limit on number of Cassandra column families. 0 disables them.
    #[arg(long, env = "COLUMN_FAMILIES_LIMIT", default_value_t = DEFAULT_COLUMN_FAMILIES_LIMIT)]
    column_families_limit: usize,

    /// Identifies the monitored entity as remote.
    #[arg(long, env = "REMOTE_MONITORING")]
    remote_monitoring: bool,

    /// Print build information and exit.
    #[arg(long)]
    show_version: bool,

    /// Collect metrics only.
    #[arg(long, env = "METRICS")]
    metrics: bool,

    /// Collect inventory only.
    #[arg(long, env = "INVENTORY")]
    inventory: bool,

    /// Keep running and collect every --interval seconds.
    #[arg(long, env = "LONG_RUNNING")]
    long_running: bool,

    /// Interval in seconds between heartbeats in long-running mode.
    #[arg(long, env = "HEARTBEAT_INTERVAL", default_value_t = 5)]
    heartbeat_interval: u64,

    /// Interval in seconds between collections in long-running mode.
    #[arg(long, env = "INTERVAL", default_value_t = 30)]
    interval: u64,

    /// Filtering rules for metrics collection (YAML).
    #[arg(long, env = "METRICS_FILTER", default_value = "")]
    metrics_filter: String,

    /// Pretty-print the JSON payload.
    #[arg(long)]
    pretty: bool,

    /// Increase logging verbosity (-v for debug, -vv for trace). Default is info level.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Quiet mode - only show errors.
    #[arg(short, long)]
    quiet: bool,
}

impl Args {
    /// Metrics run unless only inventory was asked for.
    fn has_metrics(&self) -> bool {
        self.metrics || !self.inventory
    }

    /// Inventory runs unless only metrics were asked for.
    fn has_inventory(&self) -> bool {
        self.inventory || !self.metrics
    }

    fn jolokia_config(&self) -> JolokiaConfig {
        JolokiaConfig {
            hostname: self.hostname.clone(),
            port: self.port,
            scheme: self.scheme.clone(),
            path: self.jolokia_path.clone(),
            username: (!self.username.is_empty()).then(|| self.username.clone()),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
            timeout: Duration::from_millis(self.timeout),
        }
    }
}

/// Initializes the tracing subscriber on stderr; stdout carries the payload.
fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbose {
            0 => Level::INFO,
            1 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let mut filter = EnvFilter::from_default_env();
    for target in ["cassmon", "cassmon_core"] {
        if let Ok(directive) = format!("{}={}", target, level).parse() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn version_banner() -> String {
    format!(
        "Cassandra integration Version: {}, Platform: {}, GitCommit: {}",
        cassmon_core::VERSION,
        cassmon_core::BUILD_TARGET,
        cassmon_core::GIT_SHA
    )
}

/// Logs the error and exits with status 1.
fn fatal(message: &str, error: &dyn std::fmt::Display) -> ! {
    error!("{}: {}", message, error);
    std::process::exit(1);
}

/// Inline `--metrics-filter` wins; otherwise the host agent config file is
/// used, but only when metrics mode was asked for explicitly.
fn load_filter(args: &Args) -> Result<FilterRule, cassmon_core::filter::FilterError> {
    if !args.metrics_filter.trim().is_empty() {
        return FilterRule::from_yaml(&args.metrics_filter);
    }
    if !args.metrics {
        return Ok(FilterRule::default());
    }
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(path) if !path.is_empty() => FilterRule::from_file(Path::new(&path)),
        _ => {
            debug!("no extra config provided");
            Ok(FilterRule::default())
        }
    }
}

fn open_store() -> Result<SharedStore, cassmon_core::sample::store::StoreError> {
    match std::env::var(CACHE_PATH_ENV) {
        Ok(path) if !path.is_empty() => {
            let store = MetricStore::open(Path::new(&path), DEFAULT_TTL_SECS, Utc::now().timestamp())?;
            debug!(path = %path, entries = store.len(), "metric store opened");
            Ok(store.into_shared())
        }
        _ => Ok(MetricStore::in_memory().into_shared()),
    }
}

/// Prints a colored connection warning with configuration hints.
fn print_connection_warning(config: &JolokiaConfig, error: &str) {
    const RED: &str = "\x1b[1;31m";
    const YELLOW: &str = "\x1b[33m";
    const RESET: &str = "\x1b[0m";

    eprintln!("{RED}Jolokia agent at {}: {error}{RESET}", config.url());
    eprintln!();
    eprintln!("{YELLOW}  Make sure the agent is attached to the Cassandra JVM, e.g.:");
    eprintln!("    JVM_OPTS=\"$JVM_OPTS -javaagent:/opt/jolokia/jolokia-jvm-agent.jar=port={}\"", config.port);
    eprintln!("  and that --hostname/--port/--jolokia-path point at it.{RESET}");
}

/// Runs one metrics cycle into `integration`. Returns false on failure.
fn collect_metrics<S: AttributeSource + ?Sized>(
    collector: &Collector,
    source: &mut S,
    integration: &mut Integration,
) -> bool {
    let mut factory = integration.metric_set_factory();
    match collector.collect(source, &mut factory) {
        Ok(outcome) => {
            if let Some(e) = &outcome.partial_error {
                warn!(error = %e, "failed to fetch column family metrics");
            }
            integration.add_metric_sets(outcome.samples);
            true
        }
        Err(e) => {
            error!(error = %e, "failed to collect metrics");
            false
        }
    }
}

fn collect_inventory(path: &Path, integration: &mut Integration) -> bool {
    match load_config_file(path) {
        Ok(raw) => {
            populate_inventory(integration.inventory_mut(), &raw);
            true
        }
        Err(e) => {
            error!(error = %e, "failed to collect inventory");
            false
        }
    }
}

fn publish<W: Write>(integration: &mut Integration, out: &Mutex<W>, pretty: bool) -> bool {
    let mut out = out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    match integration.publish(&mut *out, pretty) {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, "failed to publish");
            integration.discard();
            false
        }
    }
}

/// Result of one long-running cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CycleStatus {
    Published,
    Skipped,
    SourceGone,
}

/// Runs one long-running cycle and publishes what it collected.
///
/// A metrics failure publishes nothing. An inventory failure only drops the
/// inventory; metrics are still published.
fn run_cycle<S, W>(
    metrics: Option<(&Collector, &mut S)>,
    inventory_path: Option<&Path>,
    integration: &mut Integration,
    out: &Mutex<W>,
    pretty: bool,
) -> CycleStatus
where
    S: AttributeSource + ?Sized,
    W: Write,
{
    let has_metrics = metrics.is_some();
    if let Some((collector, source)) = metrics {
        if !source.is_alive() {
            return CycleStatus::SourceGone;
        }
        if !collect_metrics(collector, source, integration) {
            integration.discard();
            return CycleStatus::Skipped;
        }
    }

    let inventory_ok = inventory_path.is_none_or(|path| collect_inventory(path, integration));
    if !has_metrics && !inventory_ok {
        integration.discard();
        return CycleStatus::Skipped;
    }

    if publish(integration, out, pretty) {
        CycleStatus::Published
    } else {
        CycleStatus::Skipped
    }
}

/// Runs cycles every `interval` until `running` is cleared or the source is
/// gone. Returns the process exit code.
fn collection_loop<S, W>(
    mut metrics: Option<(&Collector, &mut S)>,
    inventory_path: Option<&Path>,
    integration: &mut Integration,
    out: &Mutex<W>,
    pretty: bool,
    interval: Duration,
    running: &AtomicBool,
) -> i32
where
    S: AttributeSource + ?Sized,
    W: Write,
{
    while running.load(Ordering::SeqCst) {
        let cycle_metrics = metrics
            .as_mut()
            .map(|(collector, source)| (*collector, &mut **source));
        match run_cycle(cycle_metrics, inventory_path, integration, out, pretty) {
            CycleStatus::SourceGone => {
                error!("Jolokia agent is gone, stopping");
                return 1;
            }
            status => debug!(?status, "cycle finished"),
        }
        sleep_while_running(interval, running);
    }
    0
}

/// Sleeps `total` in short steps, returning early once `running` is cleared.
fn sleep_while_running(total: Duration, running: &AtomicBool) {
    let step = Duration::from_millis(100);
    let mut remaining = total;
    while remaining > Duration::ZERO && running.load(Ordering::SeqCst) {
        let sleep_time = remaining.min(step);
        std::thread::sleep(sleep_time);
        remaining = remaining.saturating_sub(sleep_time);
    }
}

/// Prints `{}` every `interval` so the host agent knows we are alive.
fn spawn_heartbeat(
    interval: Duration,
    stdout: Arc<Mutex<Stdout>>,
    running: Arc<AtomicBool>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        loop {
            sleep_while_running(interval, &running);
            if !running.load(Ordering::SeqCst) {
                break;
            }
            debug!("sending heartbeat");
            let mut out = stdout.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Err(e) = writeln!(out, "{{}}").and_then(|_| out.flush()) {
                warn!(error = %e, "failed to write heartbeat");
            }
        }
    })
}

fn main() {
    let args = Args::parse();

    if args.show_version {
        println!("{}", version_banner());
        return;
    }

    init_logging(args.verbose, args.quiet);
    info!("cassmon {} ({}) starting", cassmon_core::VERSION, cassmon_core::GIT_SHA);

    let store = match open_store() {
        Ok(store) => store,
        Err(e) => fatal("failed to open metric store", &e),
    };
    let mut integration = Integration::new(
        cassmon_core::VERSION,
        &args.hostname,
        args.port,
        args.remote_monitoring,
        store,
    );
    let stdout = Arc::new(Mutex::new(std::io::stdout()));

    let mut metrics = None;
    if args.has_metrics() {
        let rule = match load_filter(&args) {
            Ok(rule) => rule,
            Err(e) => fatal("failed to load metrics filtering configuration", &e),
        };
        let collector = Collector::new(&Catalog::cassandra(), &rule, args.column_families_limit);

        let config = args.jolokia_config();
        let mut source = match JolokiaSource::new(config.clone()) {
            Ok(source) => source,
            Err(e) => fatal("failed to create Jolokia client", &e),
        };
        match source.agent_version() {
            Ok(version) => debug!(agent = %version, config = %config.describe(), "connected to Jolokia"),
            Err(e) if args.long_running => {
                error!(error = %e, config = %config.describe(), "error while connecting to Jolokia");
            }
            Err(e) => {
                print_connection_warning(&config, &e.to_string());
                fatal(&format!("failed to connect to Jolokia ({})", config.describe()), &e);
            }
        }
        metrics = Some((collector, source));
    }

    if !args.long_running {
        if let Some((collector, source)) = metrics.as_mut()
            && !collect_metrics(collector, source, &mut integration)
        {
            std::process::exit(1);
        }
        if args.has_inventory() && !collect_inventory(&args.config_path, &mut integration) {
            std::process::exit(1);
        }
        if !publish(&mut integration, &*stdout, args.pretty) {
            std::process::exit(1);
        }
        return;
    }

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        r.store(false, Ordering::SeqCst);
    }) {
        warn!("Failed to set Ctrl-C handler: {}", e);
    }

    let heartbeat = spawn_heartbeat(
        Duration::from_secs(args.heartbeat_interval.max(1)),
        stdout.clone(),
        running.clone(),
    );
    let interval = Duration::from_secs(args.interval.max(1));
    info!(interval_secs = interval.as_secs(), "starting collection loop");

    let exit_code = collection_loop(
        metrics.as_mut().map(|(collector, source)| (&*collector, source)),
        args.has_inventory().then_some(args.config_path.as_path()),
        &mut integration,
        &*stdout,
        args.pretty,
        interval,
        &running,
    );

    running.store(false, Ordering::SeqCst);
    if heartbeat.join().is_err() {
        warn!("heartbeat thread panicked");
    }
    info!("Shutdown complete");
    std::process::exit(exit_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use cassmon_core::catalog::{FieldMapping, QueryGroup, ValueKind};
    use cassmon_core::source::{MockSource, SourceError};
    use clap::{CommandFactory, FromArgMatches};

    const STORAGE: &str = "org.apache.cassandra.db:type=StorageService";
    const CLIENTS: &str = "org.apache.cassandra.metrics:type=Client,name=connectedNativeClients";
    const MISSING_CONFIG: &str = "/nonexistent/cassandra/cassandra.yaml";

    /// Parses `argv` with environment fallbacks switched off.
    fn parse(argv: &[&str]) -> Args {
        let matches = Args::command()
            .mut_args(|arg| arg.env(None::<&'static str>))
            .try_get_matches_from(std::iter::once("cassmon").chain(argv.iter().copied()))
            .unwrap();
        Args::from_arg_matches(&matches).unwrap()
    }

    fn collector() -> Collector {
        let catalog = Catalog {
            common: vec![QueryGroup::new(
                STORAGE,
                vec![FieldMapping::new("ReleaseVersion", "software.version", ValueKind::Attribute)],
            )],
            instance_level: vec![QueryGroup::new(
                CLIENTS,
                vec![FieldMapping::new("Value", "client.connectedNativeClients", ValueKind::Gauge)],
            )],
            sub_resource_level: Vec::new(),
        };
        Collector::new(&catalog, &FilterRule::default(), 0)
    }

    fn healthy_source() -> MockSource {
        let mut src = MockSource::new();
        src.add_bean(STORAGE, [("ReleaseVersion", "4.1.3")]);
        src.add_bean(CLIENTS, [("Value", 7.0)]);
        src
    }

    fn integration() -> Integration {
        Integration::new("1.0.0", "db1", 8778, false, MetricStore::in_memory().into_shared())
    }

    fn lines(out: &Mutex<Vec<u8>>) -> Vec<String> {
        let bytes = out.lock().unwrap();
        String::from_utf8_lossy(&bytes).lines().map(str::to_string).collect()
    }

    #[test]
    fn neither_mode_flag_runs_both() {
        let args = parse(&[]);
        assert!(args.has_metrics());
        assert!(args.has_inventory());

        let args = parse(&["--metrics"]);
        assert!(args.has_metrics());
        assert!(!args.has_inventory());

        let args = parse(&["--inventory"]);
        assert!(!args.has_metrics());
        assert!(args.has_inventory());
    }

    #[test]
    fn jolokia_config_from_args() {
        let args = parse(&[
            "--hostname",
            "db1",
            "--port",
            "9999",
            "--username",
            "admin",
            "--timeout",
            "500",
        ]);
        let config = args.jolokia_config();
        assert_eq!(config.url(), "http://db1:9999/jolokia");
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert_eq!(config.password, None);
        assert_eq!(config.timeout, Duration::from_millis(500));
    }

    #[test]
    fn inline_filter_is_parsed() {
        let args = parse(&["--metrics-filter", "exclude: [\"*\"]"]);
        let rule = load_filter(&args).unwrap();
        assert_eq!(rule.exclude, vec!["*"]);

        let args = parse(&["--metrics-filter", "exclude: [unterminated"]);
        assert!(load_filter(&args).is_err());
    }

    #[test]
    fn version_banner_names_build() {
        let banner = version_banner();
        assert!(banner.contains(cassmon_core::VERSION));
        assert!(banner.contains(cassmon_core::GIT_SHA));
    }

    #[test]
    fn inventory_failure_still_publishes_metrics() {
        let collector = collector();
        let mut src = healthy_source();
        let mut integration = integration();
        let out = Mutex::new(Vec::new());

        let status = run_cycle(
            Some((&collector, &mut src)),
            Some(Path::new(MISSING_CONFIG)),
            &mut integration,
            &out,
            false,
        );

        assert_eq!(status, CycleStatus::Published);
        let lines = lines(&out);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("\"event_type\":\"CassandraSample\""));
        assert!(lines[0].contains("\"client.connectedNativeClients\":7.0"));
        assert!(integration.metric_sets().is_empty());
    }

    #[test]
    fn metrics_failure_publishes_nothing_and_leaks_nothing() {
        let collector = collector();
        let mut broken = healthy_source();
        broken.fail_query(CLIENTS, SourceError::Transport("refused".into()));
        let mut integration = integration();
        let out = Mutex::new(Vec::new());

        let status = run_cycle(Some((&collector, &mut broken)), None, &mut integration, &out, false);
        assert_eq!(status, CycleStatus::Skipped);
        assert!(lines(&out).is_empty());
        assert!(integration.metric_sets().is_empty());

        let mut healthy = healthy_source();
        let status = run_cycle(Some((&collector, &mut healthy)), None, &mut integration, &out, false);
        assert_eq!(status, CycleStatus::Published);
        let lines = lines(&out);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].matches("CassandraSample").count(), 1);
    }

    #[test]
    fn inventory_only_failure_publishes_nothing() {
        let mut integration = integration();
        let out = Mutex::new(Vec::new());

        let status = run_cycle::<MockSource, _>(
            None,
            Some(Path::new(MISSING_CONFIG)),
            &mut integration,
            &out,
            false,
        );
        assert_eq!(status, CycleStatus::Skipped);
        assert!(lines(&out).is_empty());
    }

    #[test]
    fn loop_stops_when_source_is_gone() {
        let collector = collector();
        let mut src = healthy_source();
        src.set_alive(false);
        let mut integration = integration();
        let out = Mutex::new(Vec::new());
        let running = AtomicBool::new(true);

        let code = collection_loop(
            Some((&collector, &mut src)),
            None,
            &mut integration,
            &out,
            false,
            Duration::from_secs(30),
            &running,
        );

        assert_eq!(code, 1);
        assert!(lines(&out).is_empty());
        assert!(src.calls().is_empty());
    }

    #[test]
    fn loop_exits_cleanly_once_stopped() {
        let collector = collector();
        let mut src = healthy_source();
        let mut integration = integration();
        let out = Mutex::new(Vec::new());
        let running = AtomicBool::new(false);

        let code = collection_loop(
            Some((&collector, &mut src)),
            None,
            &mut integration,
            &out,
            false,
            Duration::from_secs(30),
            &running,
        );
        assert_eq!(code, 0);
        assert!(src.calls().is_empty());
    }
}
