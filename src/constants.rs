pub const CONFIG_PATH: &str = "apifinder.yaml";
pub const CATALOG_PATH: &str = "data/public_apis.csv";
pub const SERVER_ADDRESS: &str = "[::]:50030";

pub const MAX_FEATURES: usize = 1000;
pub const DEFAULT_LIMIT: usize = 20;

pub const REQUEST_TIMEOUT_SECS: u64 = 10;
pub const MAX_BODY_CHARS: usize = 2000;
pub const USER_AGENT: &str = concat!("apifinder/", env!("CARGO_PKG_VERSION"));

pub const SAMPLE_NOTICE: &str = "Using sample dataset. For the full catalog, add a CSV file.";
