use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// 初始化日志，级别由 `RUST_LOG` 控制，默认 info
pub fn init() {
    let registry = tracing_subscriber::registry();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt = tracing_subscriber::fmt::layer()
        .with_thread_ids(true)
        .with_target(false);
    registry.with(filter).with(fmt).init();
}
