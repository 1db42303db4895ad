use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

/// Lock-free aggregate throughput counters for the whole crawl
///
/// Workers bump these at every step of the pipeline; increments are relaxed
/// atomics, so the hot path never contends. Totals are monotonic until an
/// explicit [`reset`].
///
/// [`reset`]: PerformanceMonitor::reset
#[derive(Debug)]
pub struct PerformanceMonitor {
    pages_crawled: AtomicU64,
    links_discovered: AtomicU64,
    network_errors: AtomicU64,
    bytes_downloaded: AtomicU64,
    pages_filtered: AtomicU64,
    start_time: Mutex<Instant>,
}

impl PerformanceMonitor {
    /// Creates a monitor with all counters at zero and the clock started
    pub fn new() -> Self {
        Self {
            pages_crawled: AtomicU64::new(0),
            links_discovered: AtomicU64::new(0),
            network_errors: AtomicU64::new(0),
            bytes_downloaded: AtomicU64::new(0),
            pages_filtered: AtomicU64::new(0),
            start_time: Mutex::new(Instant::now()),
        }
    }

    /// Records one successfully crawled page
    pub fn increment_pages(&self) {
        self.pages_crawled.fetch_add(1, Ordering::Relaxed);
    }

    /// Records `count` newly discovered links
    pub fn increment_links(&self, count: u64) {
        self.links_discovered.fetch_add(count, Ordering::Relaxed);
    }

    /// Records one network error
    pub fn increment_errors(&self) {
        self.network_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one page rejected by the language gate
    pub fn increment_filtered(&self) {
        self.pages_filtered.fetch_add(1, Ordering::Relaxed);
    }

    /// Adds downloaded payload bytes to the running total
    pub fn add_bytes(&self, bytes: u64) {
        self.bytes_downloaded.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Pages crawled per second of wall-clock time since construction
    ///
    /// Returns 0.0 within the first second, before a rate is meaningful.
    pub fn get_crawl_rate(&self) -> f64 {
        let elapsed = self.start_time.lock().unwrap().elapsed().as_secs();
        if elapsed == 0 {
            return 0.0;
        }
        self.pages_crawled.load(Ordering::Relaxed) as f64 / elapsed as f64
    }

    /// Total pages crawled
    pub fn total_pages(&self) -> u64 {
        self.pages_crawled.load(Ordering::Relaxed)
    }

    /// Total links discovered
    pub fn total_links(&self) -> u64 {
        self.links_discovered.load(Ordering::Relaxed)
    }

    /// Total network errors
    pub fn total_errors(&self) -> u64 {
        self.network_errors.load(Ordering::Relaxed)
    }

    /// Total bytes downloaded
    pub fn total_bytes(&self) -> u64 {
        self.bytes_downloaded.load(Ordering::Relaxed)
    }

    /// Total pages rejected by the language gate
    pub fn filtered_pages(&self) -> u64 {
        self.pages_filtered.load(Ordering::Relaxed)
    }

    /// Renders the periodic statistics report to stdout
    ///
    /// Queue depth and worker count are live state owned by the caller (the
    /// frontier and the worker pool), so they arrive as arguments.
    pub fn print_stats(&self, queue_size: usize, active_threads: usize) {
        let elapsed = self.start_time.lock().unwrap().elapsed().as_secs();
        if elapsed == 0 {
            return;
        }

        let pages = self.total_pages();
        let links = self.total_links();
        let bytes = self.total_bytes();

        let crawl_rate = pages as f64 / elapsed as f64;
        let discovery_rate = links as f64 / elapsed as f64;
        let mb_per_sec = bytes as f64 / (1024.0 * 1024.0 * elapsed as f64);

        println!("\n================== CRAWLER STATISTICS ==================");
        println!("Runtime: {} seconds", elapsed);
        println!("Crawl rate: {:.2} pages/sec", crawl_rate);
        println!("Discovery rate: {:.2} links/sec", discovery_rate);
        println!("Download rate: {:.2} MB/sec", mb_per_sec);
        println!("Total pages: {}", pages);
        println!("Total links: {}", links);
        println!("Network errors: {}", self.total_errors());
        println!("Filtered (non-English): {}", self.filtered_pages());
        println!("Queue size: {}", queue_size);
        println!("Active threads: {}", active_threads);
        println!("========================================================\n");
    }

    /// Zeroes every counter and restarts the clock
    pub fn reset(&self) {
        self.pages_crawled.store(0, Ordering::Relaxed);
        self.links_discovered.store(0, Ordering::Relaxed);
        self.network_errors.store(0, Ordering::Relaxed);
        self.bytes_downloaded.store(0, Ordering::Relaxed);
        self.pages_filtered.store(0, Ordering::Relaxed);
        *self.start_time.lock().unwrap() = Instant::now();
    }
}

impl Default for PerformanceMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_counters_start_at_zero() {
        let monitor = PerformanceMonitor::new();
        assert_eq!(monitor.total_pages(), 0);
        assert_eq!(monitor.total_links(), 0);
        assert_eq!(monitor.total_errors(), 0);
        assert_eq!(monitor.total_bytes(), 0);
        assert_eq!(monitor.filtered_pages(), 0);
    }

    #[test]
    fn test_increments() {
        let monitor = PerformanceMonitor::new();
        monitor.increment_pages();
        monitor.increment_links(7);
        monitor.increment_errors();
        monitor.increment_filtered();
        monitor.add_bytes(4096);

        assert_eq!(monitor.total_pages(), 1);
        assert_eq!(monitor.total_links(), 7);
        assert_eq!(monitor.total_errors(), 1);
        assert_eq!(monitor.filtered_pages(), 1);
        assert_eq!(monitor.total_bytes(), 4096);
    }

    #[test]
    fn test_crawl_rate_guarded_in_first_second() {
        let monitor = PerformanceMonitor::new();
        monitor.increment_pages();
        assert_eq!(monitor.get_crawl_rate(), 0.0);
    }

    #[test]
    fn test_reset_zeroes_counters() {
        let monitor = PerformanceMonitor::new();
        monitor.increment_pages();
        monitor.add_bytes(100);

        monitor.reset();

        assert_eq!(monitor.total_pages(), 0);
        assert_eq!(monitor.total_bytes(), 0);
    }

    #[test]
    fn test_no_lost_updates_under_concurrency() {
        let monitor = Arc::new(PerformanceMonitor::new());
        let threads: u64 = 8;
        let per_thread: u64 = 10_000;

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let monitor = Arc::clone(&monitor);
                thread::spawn(move || {
                    for _ in 0..per_thread {
                        monitor.increment_pages();
                        monitor.increment_links(2);
                        monitor.add_bytes(3);
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(monitor.total_pages(), threads * per_thread);
        assert_eq!(monitor.total_links(), threads * per_thread * 2);
        assert_eq!(monitor.total_bytes(), threads * per_thread * 3);
    }
}
