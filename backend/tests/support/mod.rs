#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::NaiveDate;

use climate_api::db::LocalRepository;
use climate_api::models::{Measurement, Station};

#[cfg(feature = "http-server")]
pub use self::router::*;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Small slice of the Hawaii dataset.
///
/// The three August 2017 rows match the worked example for the start/end
/// routes; the 2016 rows straddle the default one-year cutoff (2016-08-23).
pub fn hawaii_fixture() -> LocalRepository {
    LocalRepository::with_data(
        vec![
            Station::new("USC00519397"),
            Station::new("USC00513117"),
            Station::new("USC00519281"),
        ],
        vec![
            Measurement::new("USC00519281", date(2016, 8, 22), Some(0.4), 78.0),
            Measurement::new("USC00519397", date(2016, 8, 23), Some(0.0), 81.0),
            Measurement::new("USC00519281", date(2016, 8, 23), Some(1.79), 77.0),
            Measurement::new("USC00513117", date(2016, 8, 24), None, 76.0),
            Measurement::new("USC00519397", date(2017, 8, 1), Some(0.02), 70.0),
            Measurement::new("USC00519281", date(2017, 8, 10), Some(0.0), 80.0),
            Measurement::new("USC00519397", date(2017, 8, 20), None, 75.0),
        ],
    )
}

#[cfg(feature = "http-server")]
mod router {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use climate_api::config::DatasetConfig;
    use climate_api::db::ClimateRepository;
    use climate_api::http::{create_router, AppState};

    use super::hawaii_fixture;

    pub fn app_with(repo: Arc<dyn ClimateRepository>) -> Router {
        create_router(AppState::new(repo, DatasetConfig::default()))
    }

    pub fn fixture_app() -> Router {
        app_with(Arc::new(hawaii_fixture()))
    }

    pub async fn get(app: Router, uri: &str) -> Response<Body> {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    /// GET `uri`, assert the status, and decode the JSON body.
    pub async fn get_json(app: Router, uri: &str, expected: StatusCode) -> Value {
        let response = get(app, uri).await;
        assert_eq!(response.status(), expected, "unexpected status for {}", uri);
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }
}
