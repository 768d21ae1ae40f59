pub const DEFAULT_CATALOG_PATH: &str = "tracked-metrics.txt";
pub const DEFAULT_PROMETHEUS_URL: &str = "http://localhost:9090";
pub const DEFAULT_DB_URL: &str = "promingest.db";
pub const DEFAULT_NODE_EXPORTER_BIN: &str = "../node_exporter/node_exporter";
pub const DEFAULT_PROMETHEUS_BIN: &str = "../prometheus/prometheus";
pub const DEFAULT_PROMETHEUS_CONFIG: &str = "../prometheus/prometheus.yml";

pub(crate) const DEFAULT_COLLECT_TIMEOUT: &str = "10s";
pub(crate) const DEFAULT_REQUEST_TIMEOUT: &str = "5s";
pub(crate) const DEFAULT_WRITE_TIMEOUT: &str = "10s";
pub(crate) const DEFAULT_STARTUP_TIMEOUT: &str = "30s";
