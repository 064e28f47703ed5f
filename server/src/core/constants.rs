// =============================================================================
// Application Identity
// =============================================================================

/// Application name in title case (for display)
pub const APP_NAME: &str = "Traceloom";

/// Application name in lowercase (for paths and identifiers)
pub const APP_NAME_LOWER: &str = "traceloom";

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable for server host
pub const ENV_HOST: &str = "TRACELOOM_HOST";

/// Environment variable for server port
pub const ENV_PORT: &str = "TRACELOOM_PORT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "TRACELOOM_LOG";

/// Environment variable for JSON log output
pub const ENV_LOG_JSON: &str = "TRACELOOM_LOG_JSON";

/// Environment variable for the collector buffer capacity
pub const ENV_COLLECTOR_CAPACITY: &str = "TRACELOOM_COLLECTOR_CAPACITY";

// =============================================================================
// Server Defaults
// =============================================================================

/// Default server host
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default server port (the OTLP/HTTP convention)
pub const DEFAULT_PORT: u16 = 4318;

/// Default log filter when TRACELOOM_LOG is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

// =============================================================================
// Ingestion Limits
// =============================================================================

/// Maximum accepted body size for trace export requests (bytes). Bounding
/// payload size here also bounds expansion depth and memory downstream.
pub const OTLP_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// Default number of canonical traces the in-memory collector retains
pub const DEFAULT_COLLECTOR_CAPACITY: usize = 10_000;
