use std::sync::Once;

static INIT: Once = Once::new();

/// Default filter: engine-level debug events (attach, cluster commits,
/// pool misses) plus info for everything else.
const DEFAULT_TEST_FILTER: &str = "info,tessera_pages=debug";

/// Initialize tracing for test binaries. Safe to call multiple times.
///
/// Filter precedence: `TESSERA_TEST_LOG`, then `RUST_LOG`, then
/// [`DEFAULT_TEST_FILTER`].
pub fn init_tracing_for_tests() {
    INIT.call_once(|| {
        use tracing_subscriber::filter::EnvFilter;
        use tracing_subscriber::fmt;
        let filter = match std::env::var("TESSERA_TEST_LOG") {
            Ok(spec) => EnvFilter::new(spec),
            Err(_) => EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER)),
        };
        fmt().with_env_filter(filter).with_target(false).init();
    });
}

#[cfg(feature = "auto-init")]
mod auto {
    // Run at binary init time so individual tests need no explicit call.
    use ctor::ctor;

    #[ctor]
    fn init() {
        super::init_tracing_for_tests();
    }
}
