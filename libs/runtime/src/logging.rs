use crate::config::{LoggingConfig, Section};
use std::{
    collections::HashMap,
    io::{IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::{
    filter::{FilterFn, Targets},
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    Layer, Registry,
};

use file_rotate::{
    compression::Compression,
    suffix::{AppendTimestamp, FileLimit},
    ContentLimit, FileRotate,
};

const DEFAULT_SECTION: &str = "default";
const DEFAULT_MAX_SIZE_MB: u64 = 100;
const DEFAULT_MAX_BACKUPS: usize = 3;

// -------- levels & target matching --------

fn parse_tracing_level(s: &str) -> Option<Level> {
    match s.to_ascii_lowercase().as_str() {
        "trace" => Some(Level::TRACE),
        "debug" => Some(Level::DEBUG),
        "info" => Some(Level::INFO),
        "warn" => Some(Level::WARN),
        "error" => Some(Level::ERROR),
        "off" | "none" => None,
        _ => Some(Level::INFO),
    }
}

/// `target == prefix` or `target` starts with `prefix::`.
fn matches_target_prefix(target: &str, prefix: &str) -> bool {
    match target.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with("::"),
        None => false,
    }
}

type BoxedFilter = FilterFn<Box<dyn Fn(&tracing::Metadata<'_>) -> bool + Send + Sync + 'static>>;

/// Everything not claimed by an explicit subsystem section, up to `max_level`.
fn catch_all_filter(subsystems: &[String], max_level: Level) -> BoxedFilter {
    let subsystems = subsystems.to_vec();
    FilterFn::new(Box::new(move |meta: &tracing::Metadata<'_>| {
        let claimed = subsystems
            .iter()
            .any(|s| matches_target_prefix(meta.target(), s));
        !claimed && *meta.level() <= max_level
    }))
}

// -------- rotating file sinks --------

#[derive(Clone)]
struct RotatingFile(Arc<Mutex<FileRotate<AppendTimestamp>>>);

impl Write for RotatingFile {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self.0.lock() {
            Ok(mut f) => f.write(buf),
            // poisoned sink: drop the line
            Err(_) => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self.0.lock() {
            Ok(mut f) => f.flush(),
            Err(_) => Ok(()),
        }
    }
}

/// Writer handed to the fmt layer for one event; `None` discards the bytes.
struct SinkHandle(Option<RotatingFile>);

impl Write for SinkHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match &mut self.0 {
            Some(w) => w.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match &mut self.0 {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

/// Routes events to the file of the subsystem their target belongs to, falling back to
/// the default file.
#[derive(Clone, Default)]
struct FileRouter {
    default: Option<RotatingFile>,
    by_prefix: HashMap<String, RotatingFile>,
}

impl FileRouter {
    fn resolve_for(&self, target: &str) -> Option<RotatingFile> {
        self.by_prefix
            .iter()
            .find(|(prefix, _)| matches_target_prefix(target, prefix))
            .map(|(_, w)| w.clone())
            .or_else(|| self.default.clone())
    }
}

impl<'a> fmt::MakeWriter<'a> for FileRouter {
    type Writer = SinkHandle;

    fn make_writer(&'a self) -> Self::Writer {
        SinkHandle(self.default.clone())
    }

    fn make_writer_for(&'a self, meta: &tracing::Metadata<'_>) -> Self::Writer {
        SinkHandle(self.resolve_for(meta.target()))
    }
}

/// Relative log paths live under `base_dir` (the home dir); absolute ones are kept.
fn resolve_log_path(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn open_rotating_file(log_path: &Path, section: &Section) -> std::io::Result<RotatingFile> {
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let max_bytes = section.max_size_mb.unwrap_or(DEFAULT_MAX_SIZE_MB) * 1024 * 1024;
    let keep = section.max_backups.unwrap_or(DEFAULT_MAX_BACKUPS);

    let rot = FileRotate::new(
        log_path,
        AppendTimestamp::default(FileLimit::MaxFiles(keep)),
        ContentLimit::BytesSurpassed(usize::try_from(max_bytes).unwrap_or(usize::MAX)),
        Compression::None,
        #[cfg(unix)]
        None,
    );
    Ok(RotatingFile(Arc::new(Mutex::new(rot))))
}

fn file_sink_for(name: &str, section: &Section, base_dir: &Path) -> Option<RotatingFile> {
    if section.file.trim().is_empty() {
        return None;
    }
    let log_path = resolve_log_path(&section.file, base_dir);
    match open_rotating_file(&log_path, section) {
        Ok(w) => Some(w),
        Err(e) => {
            eprintln!(
                "Failed to open log file for '{}': {} ({})",
                name,
                log_path.display(),
                e
            );
            None
        }
    }
}

// -------- plan --------

/// Split view of a `LoggingConfig`: the catch-all section and the explicit subsystems.
struct LogPlan<'a> {
    default_section: Option<&'a Section>,
    subsystems: Vec<(String, &'a Section)>,
}

impl<'a> LogPlan<'a> {
    fn from_config(cfg: &'a LoggingConfig) -> Self {
        let mut subsystems: Vec<(String, &Section)> = cfg
            .iter()
            .filter(|(k, _)| k.as_str() != DEFAULT_SECTION)
            .map(|(k, v)| (k.clone(), v))
            .collect();
        // longest prefix first so nested subsystems win over their parents
        subsystems.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self {
            default_section: cfg.get(DEFAULT_SECTION),
            subsystems,
        }
    }

    fn subsystem_names(&self) -> Vec<String> {
        self.subsystems.iter().map(|(n, _)| n.clone()).collect()
    }

    fn console_targets(&self) -> Targets {
        self.subsystems
            .iter()
            .filter_map(|(name, s)| parse_tracing_level(&s.console_level).map(|l| (name, l)))
            .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, l)| {
                t.with_target(name.clone(), LevelFilter::from_level(l))
            })
    }

    fn file_targets(&self) -> Targets {
        self.subsystems
            .iter()
            .filter(|(_, s)| !s.file.trim().is_empty())
            .filter_map(|(name, s)| parse_tracing_level(&s.file_level).map(|l| (name, l)))
            .fold(Targets::new().with_default(LevelFilter::OFF), |t, (name, l)| {
                t.with_target(name.clone(), LevelFilter::from_level(l))
            })
    }

    fn file_router(&self, base_dir: &Path) -> FileRouter {
        FileRouter {
            default: self
                .default_section
                .and_then(|s| file_sink_for(DEFAULT_SECTION, s, base_dir)),
            by_prefix: self
                .subsystems
                .iter()
                .filter_map(|(name, s)| file_sink_for(name, s, base_dir).map(|w| (name.clone(), w)))
                .collect(),
        }
    }
}

// -------- public init --------

/// Install the global subscriber described by `cfg`.
///
/// Console output is human-readable and goes to stderr, file output is JSON. Relative file
/// paths are resolved against `base_dir` (normally `host.home_dir`). Calling this twice is
/// harmless: the second install attempt is ignored.
pub fn init_logging_from_config(cfg: &LoggingConfig, base_dir: &Path) {
    // Bridge `log` records before the subscriber goes in.
    let _ = tracing_log::LogTracer::init();

    if cfg.is_empty() {
        init_default_logging();
        return;
    }

    let plan = LogPlan::from_config(cfg);
    let subsystems = plan.subsystem_names();
    let router = plan.file_router(base_dir);
    let ansi = std::io::stderr().is_terminal();

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();

    layers.push(
        fmt::layer()
            .with_ansi(ansi)
            .with_target(true)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(std::io::stderr)
            .with_filter(plan.console_targets())
            .boxed(),
    );

    if !router.by_prefix.is_empty() {
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_target(true)
                .with_timer(fmt::time::UtcTime::rfc_3339())
                .with_writer(router.clone())
                .with_filter(plan.file_targets())
                .boxed(),
        );
    }

    if let Some(section) = plan.default_section {
        if let Some(level) = parse_tracing_level(&section.console_level) {
            layers.push(
                fmt::layer()
                    .with_ansi(ansi)
                    .with_target(true)
                    .with_timer(fmt::time::UtcTime::rfc_3339())
                    .with_writer(std::io::stderr)
                    .with_filter(catch_all_filter(&subsystems, level))
                    .boxed(),
            );
        }
        if router.default.is_some() {
            if let Some(level) = parse_tracing_level(&section.file_level) {
                layers.push(
                    fmt::layer()
                        .json()
                        .with_ansi(false)
                        .with_target(true)
                        .with_timer(fmt::time::UtcTime::rfc_3339())
                        .with_writer(router.clone())
                        .with_filter(catch_all_filter(&subsystems, level))
                        .boxed(),
                );
            }
        }
    }

    let _ = Registry::default().with(layers).try_init();
}

fn init_default_logging() {
    let _ = fmt()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::default_logging_config;
    use tempfile::tempdir;

    fn section(console: &str, file: &str, file_level: &str) -> Section {
        Section {
            console_level: console.into(),
            file: file.into(),
            file_level: file_level.into(),
            max_age_days: None,
            max_backups: Some(2),
            max_size_mb: Some(1),
        }
    }

    #[test]
    fn level_parsing() {
        assert_eq!(parse_tracing_level("trace"), Some(Level::TRACE));
        assert_eq!(parse_tracing_level("DEBUG"), Some(Level::DEBUG));
        assert_eq!(parse_tracing_level("Warn"), Some(Level::WARN));
        assert_eq!(parse_tracing_level("off"), None);
        assert_eq!(parse_tracing_level("none"), None);
        assert_eq!(parse_tracing_level("loud"), Some(Level::INFO));
    }

    #[test]
    fn target_prefix_matching() {
        assert!(matches_target_prefix("spr_stats", "spr_stats"));
        assert!(matches_target_prefix("spr_stats::domain::service", "spr_stats"));
        assert!(!matches_target_prefix("spr_stats_extra", "spr_stats"));
        assert!(!matches_target_prefix("pollkit", "spr_stats"));
    }

    #[test]
    fn plan_separates_default_from_subsystems() {
        let mut cfg = default_logging_config();
        cfg.insert("pollkit".into(), section("warn", "", "debug"));
        cfg.insert("pollkit::polling".into(), section("debug", "", "debug"));

        let plan = LogPlan::from_config(&cfg);
        assert!(plan.default_section.is_some());
        // nested subsystem sorts first
        assert_eq!(
            plan.subsystem_names(),
            vec!["pollkit::polling".to_string(), "pollkit".to_string()]
        );
    }

    #[test]
    fn relative_log_paths_resolve_under_base_dir() {
        let tmp = tempdir().unwrap();
        let resolved = resolve_log_path("logs/test.log", tmp.path());
        assert!(resolved.starts_with(tmp.path()));
        assert!(resolved.ends_with("logs/test.log"));

        let abs = tmp.path().join("abs.log");
        assert_eq!(resolve_log_path(&abs.to_string_lossy(), Path::new("/elsewhere")), abs);
    }

    #[test]
    fn file_router_prefers_subsystem_file() {
        let tmp = tempdir().unwrap();
        let mut cfg = default_logging_config();
        cfg.insert("spr_stats".into(), section("info", "logs/stats.log", "debug"));

        let plan = LogPlan::from_config(&cfg);
        let router = plan.file_router(tmp.path());
        assert!(router.default.is_some());
        assert!(router.by_prefix.contains_key("spr_stats"));
        assert!(tmp.path().join("logs").is_dir());

        let stats = router.resolve_for("spr_stats::domain").unwrap();
        assert!(Arc::ptr_eq(&stats.0, &router.by_prefix["spr_stats"].0));
        let other = router.resolve_for("pollkit").unwrap();
        assert!(Arc::ptr_eq(&other.0, &router.default.as_ref().unwrap().0));
    }

    #[test]
    fn empty_file_disables_sink() {
        let tmp = tempdir().unwrap();
        assert!(file_sink_for("x", &section("info", "  ", "debug"), tmp.path()).is_none());
    }
}
