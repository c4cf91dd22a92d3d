//! Timing scopes and an optional render/task debug log.
//!
//! `--perf` prints scope timings to stderr. `--render-debug-log` (or
//! `PAGEWISE_RENDER_DEBUG_LOG`) appends timestamped events to a file; every
//! event is also emitted at trace level.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{LazyLock, Mutex};
use std::time::Instant;

static ENABLED: AtomicBool = AtomicBool::new(false);
static EVENT_LOG: LazyLock<Mutex<EventLog>> = LazyLock::new(|| Mutex::new(EventLog::new()));

#[derive(Debug)]
pub struct Scope {
    name: &'static str,
    start: Instant,
}

impl Drop for Scope {
    fn drop(&mut self) {
        if !is_enabled() {
            return;
        }
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        eprintln!("[perf] {}: {:.2} ms", self.name, elapsed_ms);
    }
}

#[derive(Debug)]
struct EventLog {
    start: Instant,
    writer: Option<BufWriter<File>>,
}

impl EventLog {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            writer: None,
        }
    }
}

pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

pub fn scope(name: &'static str) -> Scope {
    Scope {
        name,
        start: Instant::now(),
    }
}

pub fn is_enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

/// Start writing events to `path`, or stop when `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn set_debug_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut log = EVENT_LOG.lock().expect("event log lock poisoned");
    match path {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            writeln!(writer, "pagewise render debug log start")?;
            writer.flush()?;
            log.start = Instant::now();
            log.writer = Some(writer);
        }
        None => log.writer = None,
    }
    Ok(())
}

pub fn is_debug_log_enabled() -> bool {
    EVENT_LOG
        .lock()
        .expect("event log lock poisoned")
        .writer
        .is_some()
}

pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let detail = detail.as_ref();
    tracing::trace!(target: "pagewise::perf", event = name, "{detail}");
    let mut log = EVENT_LOG.lock().expect("event log lock poisoned");
    let elapsed_ms = log.start.elapsed().as_secs_f64() * 1000.0;
    if let Some(writer) = log.writer.as_mut() {
        let _ = writeln!(writer, "[{elapsed_ms:>10.3} ms] {name}: {detail}");
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_set_enabled_toggles_runtime_flag() {
        set_enabled(true);
        assert!(is_enabled());

        set_enabled(false);
        assert!(!is_enabled());
    }

    #[test]
    fn test_debug_log_path_enables_logging_and_writes() {
        let temp_file = NamedTempFile::new().unwrap();
        set_debug_log_path(Some(temp_file.path())).unwrap();
        assert!(is_debug_log_enabled());
        log_event("render.page", "index=2 width=80");
        set_debug_log_path(None).unwrap();
        assert!(!is_debug_log_enabled());
        log_event("render.page", "after close");

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("pagewise render debug log start"));
        assert!(content.contains("render.page: index=2 width=80"));
        assert!(!content.contains("after close"));
    }
}
