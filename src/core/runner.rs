//! Shared async I/O drivers for the report stage.

use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::runtime::Runtime;

// One runtime and one connection pool for every outbound call in the process
static SHARED_RUNTIME: OnceLock<Arc<Runtime>> = OnceLock::new();
static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub fn get_shared_runtime() -> Arc<Runtime> {
    SHARED_RUNTIME
        .get_or_init(|| {
            Arc::new(
                tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .expect("Failed to create global tokio runtime"),
            )
        })
        .clone()
}

pub fn get_shared_client() -> reqwest::Client {
    SHARED_CLIENT
        .get_or_init(|| {
            reqwest::Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .gzip(true)
                .brotli(true)
                .build()
                .expect("Failed to create global reqwest client")
        })
        .clone()
}
