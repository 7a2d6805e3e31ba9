pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(not(windows))]
pub const EXEC_NAME: &str = "paym";
#[cfg(windows)]
pub const EXEC_NAME: &str = "paym.exe";

pub const DEFAULT_API_URL: &str = "http://localhost:9001/graphql";

pub const CONTEXT_STORE_PATH: &str = ".paym/context.json";
