//! Observability for the fetch pipeline
//!
//! [`CrawlLogger`] persists every fetch outcome durably without ever blocking
//! a fetch worker on disk I/O, and [`PerformanceMonitor`] keeps lock-free
//! aggregate throughput counters rendered as a periodic report.

mod crawl_logger;
mod performance;

pub use crawl_logger::CrawlLogger;
pub use performance::PerformanceMonitor;
