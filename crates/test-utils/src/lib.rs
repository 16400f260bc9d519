pub mod builders;
pub mod recorders;

use std::sync::Once;
use std::time::Duration;

use jobexec::logging::{filter_directives, LOG_ENV};
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

const TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Route tracing to the test writer, filtered the same way as the binary
/// (`JOBEXEC_LOG=debug,job_log=off cargo test`).
pub fn init_tracing() {
    INIT.call_once(|| {
        let env = std::env::var(LOG_ENV).ok();
        let filter = EnvFilter::new(filter_directives(None, env.as_deref()).join(","));

        fmt().with_env_filter(filter).with_test_writer().init();
    });
}

/// Fail the test if `f` outlives [`TEST_TIMEOUT`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(TEST_TIMEOUT, f)
        .await
        .unwrap_or_else(|_| panic!("test timed out after {TEST_TIMEOUT:?}"))
}
