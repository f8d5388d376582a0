use std::time::Duration;

use file_io::ReadStats;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::registry::Registry;

/// Accumulator for data-file read throughput, backed by atomic counters.
///
/// One instance is shared (via `Arc`) by every monitored input assembled for
/// a given tier; its lifecycle is owned by whoever assembles the storage
/// stack, never by an input instance.
#[derive(Default)]
pub struct InputMetrics {
    pub read_bytes_total: Counter<u64>,
    pub read_time_nanos_total: Counter<u64>,
    pub read_calls_total: Counter<u64>,
}

impl InputMetrics {
    /// Register the metrics with the provided registry.
    pub fn register_metrics(&self, metrics_registry: &mut Registry) {
        metrics_registry.register(
            "data_read_bytes",
            "Total bytes read from data files",
            self.read_bytes_total.clone(),
        );
        metrics_registry.register(
            "data_read_time_nanos",
            "Total wall-clock time spent reading data files",
            self.read_time_nanos_total.clone(),
        );
        metrics_registry.register(
            "data_read_calls",
            "Number of data file read calls",
            self.read_calls_total.clone(),
        );
    }

    pub fn bytes_read(&self) -> u64 {
        self.read_bytes_total.get()
    }

    pub fn read_time(&self) -> Duration {
        Duration::from_nanos(self.read_time_nanos_total.get())
    }

    pub fn read_calls(&self) -> u64 {
        self.read_calls_total.get()
    }

    /// Average throughput over everything recorded so far, in bytes per
    /// second. Zero before the first timed read.
    pub fn bytes_per_second(&self) -> f64 {
        let nanos = self.read_time_nanos_total.get();
        if nanos == 0 {
            return 0.0;
        }
        self.read_bytes_total.get() as f64 * 1e9 / nanos as f64
    }
}

impl ReadStats for InputMetrics {
    fn record_read(&self, bytes: u64, elapsed: Duration) {
        self.read_bytes_total.inc_by(bytes);
        self.read_time_nanos_total
            .inc_by(elapsed.as_nanos().min(u64::MAX as u128) as u64);
        self.read_calls_total.inc();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_read_accumulates() {
        let metrics = InputMetrics::default();
        metrics.record_read(100, Duration::from_nanos(50));
        metrics.record_read(24, Duration::from_nanos(10));

        assert_eq!(metrics.bytes_read(), 124);
        assert_eq!(metrics.read_time(), Duration::from_nanos(60));
        assert_eq!(metrics.read_calls(), 2);
    }

    #[test]
    fn test_bytes_per_second() {
        let metrics = InputMetrics::default();
        assert_eq!(metrics.bytes_per_second(), 0.0);

        metrics.record_read(1000, Duration::from_secs(1));
        assert!((metrics.bytes_per_second() - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_as_monitored_input_sink() {
        use std::sync::Arc;

        use file_io::{InputFile, MemoryInputFile, MonitoredInputFile, RandomAccessInput};

        let metrics = Arc::new(InputMetrics::default());
        let delegate = MemoryInputFile::new("memory://sink.bin", b"0123456789".to_vec());
        let file = MonitoredInputFile::new(Box::new(delegate), metrics.clone());

        let mut input = file.open().unwrap();
        assert_eq!(input.read_fully_vec(0, 10).unwrap(), b"0123456789");
        assert_eq!(input.read_tail_vec(4).unwrap(), b"6789");

        assert_eq!(metrics.bytes_read(), 14);
        assert_eq!(metrics.read_calls(), 2);
    }

    #[test]
    fn test_register_metrics() {
        let metrics = InputMetrics::default();
        let mut registry = Registry::default();
        metrics.register_metrics(&mut registry);

        metrics.record_read(42, Duration::from_nanos(7));

        let mut encoded = String::new();
        prometheus_client::encoding::text::encode(&mut encoded, &registry).unwrap();
        assert!(encoded.contains("data_read_bytes_total 42"));
        assert!(encoded.contains("data_read_calls_total 1"));
    }
}
