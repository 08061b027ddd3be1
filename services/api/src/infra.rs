use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use hireboard::error::AppError;
use hireboard::store::{Fixture, MemoryStore};
use metrics_exporter_prometheus::PrometheusHandle;
use tracing::info;

const BUNDLED_FIXTURE: &str = include_str!("../fixtures/demo.json");

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Read a fixture from disk, or fall back to the bundled demo data.
pub(crate) fn load_fixture(path: Option<&Path>) -> Result<Fixture, AppError> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            info!(path = %path.display(), "loading fixture");
            Ok(serde_json::from_str(&raw)?)
        }
        None => Ok(serde_json::from_str(BUNDLED_FIXTURE)?),
    }
}

pub(crate) fn build_store(path: Option<&Path>) -> Result<MemoryStore, AppError> {
    let fixture = load_fixture(path)?;
    let store = MemoryStore::from_fixture(fixture)?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_fixture_loads() {
        let fixture = load_fixture(None).expect("bundled fixture parses");
        assert_eq!(fixture.posts.len(), 2);
        assert_eq!(fixture.skills.len(), 4);
        let store = MemoryStore::from_fixture(fixture).expect("fixture is consistent");
        assert_eq!(store.application_count().expect("count"), 1);
    }

    #[test]
    fn missing_fixture_path_is_io_error() {
        let err = build_store(Some(Path::new("/nonexistent/hireboard.json")))
            .expect_err("missing file");
        assert!(matches!(err, AppError::Io(_)));
    }
}
