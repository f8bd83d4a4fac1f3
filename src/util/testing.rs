//! Test support: logging setup and shared snapshot fixtures

use std::env;
use std::sync::Once;

use serde_json::{json, Value};
use tracing::{debug, info};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

/// Install the tracing subscriber once per test binary.
pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

fn setup_test_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_test_writer()
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}

/// Two clusters: `cluster1` (member1, member2, relates to cluster2) and `cluster2` (member3).
pub fn two_cluster_snapshot() -> Value {
    json!({
        "clusters": [
            {
                "id": "cluster1",
                "name": "Test Cluster 1",
                "members": [
                    {"id": "member1", "name": "John Doe", "metadata": {"role": "Developer"}},
                    {"id": "member2", "name": "Jane Smith", "metadata": {"role": "Designer"}}
                ],
                "relationships": ["cluster2"]
            },
            {
                "id": "cluster2",
                "name": "Test Cluster 2",
                "members": [
                    {"id": "member3", "name": "Bob Johnson", "metadata": {"role": "Manager"}}
                ],
                "relationships": []
            }
        ]
    })
}
