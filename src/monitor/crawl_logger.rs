use crate::{Result, WardenError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex};
use std::thread::{self, JoinHandle};

/// Default bound on the producer queue
const DEFAULT_QUEUE_CAPACITY: usize = 10_000;

/// Header written once when the append sink is first created
const LOG_HEADER: &str = "timestamp,url,title,status_code,depth,domain,content_size,error_message";

/// One fetch outcome, queued by a worker and consumed once by the drain thread
#[derive(Debug)]
struct LogEntry {
    url: String,
    title: String,
    status_code: u16,
    depth: u32,
    domain: String,
    content_size: u64,
    timestamp: DateTime<Utc>,
    error_message: Option<String>,
    is_error: bool,
}

/// State shared between producers and the consumer thread
///
/// The queue, the append sink, and the structured store each sit behind their
/// own lock so the producer path never waits on sink I/O duration.
struct LoggerShared {
    queue: Mutex<VecDeque<LogEntry>>,
    queue_cond: Condvar,
    shutdown: AtomicBool,
    dropped_entries: AtomicU64,
    capacity: usize,
    store: Mutex<Connection>,
    sink: Mutex<BufWriter<File>>,
}

/// Asynchronous durable sink for every fetch outcome
///
/// Producers enqueue via [`log_page`] / [`log_error`] and return immediately;
/// a single background thread drains the queue and writes each entry to an
/// append-only text record and a SQLite store keyed uniquely by URL. On drop
/// the queue is drained to empty before the consumer exits, so nothing
/// enqueued before shutdown is lost.
///
/// Construction fails outright when either sink cannot be initialized - the
/// crawler must not run without provable record-keeping.
///
/// [`log_page`]: CrawlLogger::log_page
/// [`log_error`]: CrawlLogger::log_error
pub struct CrawlLogger {
    shared: Arc<LoggerShared>,
    worker: Option<JoinHandle<()>>,
}

impl CrawlLogger {
    /// Opens both sinks and starts the consumer thread
    ///
    /// Parent directories for both paths are created as needed; the
    /// `crawl_log` table is created when absent; the text sink is opened in
    /// append mode and receives its header only when the file is empty.
    pub fn new(db_path: &Path, log_path: &Path) -> Result<Self> {
        Self::with_capacity(db_path, log_path, DEFAULT_QUEUE_CAPACITY)
    }

    /// Same as [`CrawlLogger::new`] with an explicit queue bound
    ///
    /// When the queue is full the oldest entry is dropped and counted rather
    /// than blocking the producer; see [`dropped_entries`].
    ///
    /// [`dropped_entries`]: CrawlLogger::dropped_entries
    pub fn with_capacity(db_path: &Path, log_path: &Path, capacity: usize) -> Result<Self> {
        let store = open_store(db_path)?;
        let sink = open_sink(log_path)?;

        let shared = Arc::new(LoggerShared {
            queue: Mutex::new(VecDeque::new()),
            queue_cond: Condvar::new(),
            shutdown: AtomicBool::new(false),
            dropped_entries: AtomicU64::new(0),
            capacity,
            store: Mutex::new(store),
            sink: Mutex::new(sink),
        });

        // The consumer starts only after both sinks are provably usable
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("crawl-logger".to_string())
            .spawn(move || worker_shared.drain_loop())
            .map_err(|e| WardenError::LoggerInit {
                path: log_path.display().to_string(),
                source: e,
            })?;

        Ok(Self {
            shared,
            worker: Some(worker),
        })
    }

    /// Queues a successfully fetched page for persistence
    ///
    /// O(1); returns before any disk I/O happens.
    pub fn log_page(
        &self,
        url: &str,
        title: &str,
        status_code: u16,
        depth: u32,
        domain: &str,
        content_size: u64,
    ) {
        self.enqueue(LogEntry {
            url: url.to_string(),
            title: title.to_string(),
            status_code,
            depth,
            domain: domain.to_string(),
            content_size,
            timestamp: Utc::now(),
            error_message: None,
            is_error: false,
        });
    }

    /// Queues a failed fetch attempt for persistence
    pub fn log_error(&self, url: &str, message: &str) {
        self.enqueue(LogEntry {
            url: url.to_string(),
            title: String::new(),
            status_code: 0,
            depth: 0,
            domain: String::new(),
            content_size: 0,
            timestamp: Utc::now(),
            error_message: Some(message.to_string()),
            is_error: true,
        });
    }

    /// Forces the append sink's buffered writes down to storage
    ///
    /// The structured store's durability is independent and unaffected.
    pub fn flush(&self) -> Result<()> {
        let mut sink = self.shared.sink.lock().unwrap();
        sink.flush()?;
        Ok(())
    }

    /// Number of entries discarded by the bounded-queue backpressure policy
    pub fn dropped_entries(&self) -> u64 {
        self.shared.dropped_entries.load(Ordering::Relaxed)
    }

    fn enqueue(&self, entry: LogEntry) {
        {
            let mut queue = self.shared.queue.lock().unwrap();
            if queue.len() >= self.shared.capacity {
                queue.pop_front();
                self.shared.dropped_entries.fetch_add(1, Ordering::Relaxed);
            }
            queue.push_back(entry);
        }
        self.shared.queue_cond.notify_one();
    }
}

impl Drop for CrawlLogger {
    fn drop(&mut self) {
        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.queue_cond.notify_all();

        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }

        if let Ok(mut sink) = self.shared.sink.lock() {
            let _ = sink.flush();
        }
    }
}

impl LoggerShared {
    /// Consumer loop: runs while the queue is non-empty or shutdown has not
    /// been requested, so entries enqueued before shutdown always land
    fn drain_loop(&self) {
        loop {
            let entry = {
                let mut queue = self.queue.lock().unwrap();
                loop {
                    if let Some(entry) = queue.pop_front() {
                        break entry;
                    }
                    if self.shutdown.load(Ordering::Acquire) {
                        return;
                    }
                    queue = self.queue_cond.wait(queue).unwrap();
                }
                // Queue lock released here; sink writes run unguarded by it
            };

            self.persist(&entry);
        }
    }

    fn persist(&self, entry: &LogEntry) {
        self.write_text_record(entry);

        // Error entries are kept in the append record only; the structured
        // store holds one row per successfully fetched URL
        if !entry.is_error {
            if let Err(e) = self.write_store_record(entry) {
                tracing::warn!(url = %entry.url, error = %e, "failed to persist log entry");
            }
        }
    }

    fn write_text_record(&self, entry: &LogEntry) {
        let epoch = entry.timestamp.timestamp();
        let mut sink = self.sink.lock().unwrap();

        let result = if entry.is_error {
            writeln!(
                sink,
                "{},{},ERROR,0,0,,,{}",
                epoch,
                quote(&entry.url),
                quote(entry.error_message.as_deref().unwrap_or("")),
            )
        } else {
            writeln!(
                sink,
                "{},{},{},{},{},{},{},",
                epoch,
                quote(&entry.url),
                quote(&entry.title),
                entry.status_code,
                entry.depth,
                quote(&entry.domain),
                entry.content_size,
            )
        };

        if let Err(e) = result {
            tracing::warn!(url = %entry.url, error = %e, "failed to append log entry");
        }
    }

    fn write_store_record(&self, entry: &LogEntry) -> rusqlite::Result<()> {
        let store = self.store.lock().unwrap();
        // Duplicate crawl attempts for the same URL neither error nor
        // duplicate rows
        store.execute(
            "INSERT OR IGNORE INTO crawl_log
             (url, title, status_code, depth, domain, content_size, timestamp)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.url,
                entry.title,
                entry.status_code,
                entry.depth,
                entry.domain,
                entry.content_size,
                entry.timestamp.timestamp(),
            ],
        )?;
        Ok(())
    }
}

/// Opens the structured store, creating directories and schema as needed
fn open_store(db_path: &Path) -> Result<Connection> {
    create_parent_dirs(db_path)?;

    let conn = Connection::open(db_path)?;
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
    ",
    )?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS crawl_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            url TEXT NOT NULL UNIQUE,
            title TEXT,
            status_code INTEGER,
            depth INTEGER,
            domain TEXT,
            content_size INTEGER,
            timestamp INTEGER,
            error_message TEXT
        )",
        [],
    )?;

    Ok(conn)
}

/// Opens the append sink, writing the header only on first creation
fn open_sink(log_path: &Path) -> Result<BufWriter<File>> {
    create_parent_dirs(log_path)?;

    let init_err = |e: std::io::Error| WardenError::LoggerInit {
        path: log_path.display().to_string(),
        source: e,
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .map_err(init_err)?;

    let is_empty = file.metadata().map_err(init_err)?.len() == 0;

    let mut sink = BufWriter::new(file);
    if is_empty {
        writeln!(sink, "{}", LOG_HEADER).map_err(init_err)?;
        sink.flush().map_err(init_err)?;
    }

    Ok(sink)
}

fn create_parent_dirs(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| WardenError::LoggerInit {
                path: path.display().to_string(),
                source: e,
            })?;
        }
    }
    Ok(())
}

/// Quotes a field for the append record, doubling embedded quotes
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}
