//! Embedded `PostgreSQL` cluster for the store integration tests.
//!
//! The cluster is started on first use and shared by every test in the
//! binary. It runs on its own thread and runtime so that starting it never
//! blocks inside a test runtime.

use postgresql_embedded::{PostgreSQL, Settings, Status};
use std::sync::OnceLock;
use tokio::runtime::Builder;

/// Boxed error type for cluster lifecycle failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Database the tests connect to inside the embedded cluster.
const DATABASE: &str = "postgres";

static SHARED_CLUSTER: OnceLock<Option<EmbeddedCluster>> = OnceLock::new();

/// Running embedded cluster.
///
/// Holding the handle keeps the server alive for the life of the process.
pub struct EmbeddedCluster {
    url: String,
    _postgres: PostgreSQL,
}

impl EmbeddedCluster {
    fn start() -> Result<Self, BoxError> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        let mut postgres = PostgreSQL::new(Settings::default());
        runtime.block_on(async {
            postgres.setup().await?;
            if !matches!(postgres.status(), Status::Started) {
                postgres.start().await?;
            }
            Ok::<(), BoxError>(())
        })?;
        let url = postgres.settings().url(DATABASE);
        Ok(Self {
            url,
            _postgres: postgres,
        })
    }

    /// Returns the connection URL of the test database.
    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.url
    }
}

/// Returns the shared cluster, starting it on first use.
///
/// When the cluster cannot start (for example when the tests run as root,
/// which `initdb` refuses) a skip notice is printed once and `None` is
/// returned for the rest of the run.
pub async fn shared_cluster() -> Option<&'static EmbeddedCluster> {
    tokio::task::spawn_blocking(|| SHARED_CLUSTER.get_or_init(start_or_skip).as_ref())
        .await
        .ok()
        .flatten()
}

fn start_or_skip() -> Option<EmbeddedCluster> {
    let started = std::thread::spawn(EmbeddedCluster::start)
        .join()
        .unwrap_or_else(|_| Err("embedded cluster start panicked".into()));
    match started {
        Ok(cluster) => Some(cluster),
        Err(err) => {
            report_skip(&err);
            None
        }
    }
}

#[expect(clippy::print_stderr, reason = "skipped store tests must be visible in test output")]
fn report_skip(err: &BoxError) {
    eprintln!(
        "SKIP-TEST-CLUSTER: embedded PostgreSQL unavailable ({err}); \
         set DOCSCORE_TEST_DATABASE_URL to run the store tests"
    );
}
