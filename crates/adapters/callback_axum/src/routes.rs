//! Mutable route table consulted on every inbound request.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rulebridge_app::ports::{CallbackFn, CallbackHost};

/// One registered route.
#[derive(Clone)]
pub enum Route {
    /// Answer `302 Found` pointing at `target`.
    Redirect { target: String },
    /// Run the handler in process and answer `200`.
    Callback { handler: CallbackFn },
}

/// Shared, cloneable handle to the route table.
///
/// Paths are stored with trailing slashes trimmed, so `/welcome` and
/// `/welcome/` name the same route.
#[derive(Clone, Default)]
pub struct CallbackRoutes {
    table: Arc<RwLock<HashMap<String, Route>>>,
}

impl CallbackRoutes {
    /// Create an empty route table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the route at `path`.
    pub fn insert(&self, path: &str, route: Route) {
        let path = normalize(path);
        tracing::debug!(path = %path, "route registered");
        self.table
            .write()
            .expect("route table poisoned")
            .insert(path, route);
    }

    /// Look up the route for a request path.
    #[must_use]
    pub fn lookup(&self, path: &str) -> Option<Route> {
        self.table
            .read()
            .expect("route table poisoned")
            .get(&normalize(path))
            .cloned()
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.read().expect("route table poisoned").len()
    }

    /// Whether no route is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CallbackHost for CallbackRoutes {
    fn register_callback(&self, path: &str, handler: CallbackFn) {
        self.insert(path, Route::Callback { handler });
    }

    fn register_redirect(&self, path: &str, target: &str) {
        self.insert(
            path,
            Route::Redirect {
                target: target.to_string(),
            },
        );
    }
}

/// Leading slash enforced, trailing slashes trimmed.
fn normalize(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn should_start_empty() {
        let routes = CallbackRoutes::new();
        assert!(routes.is_empty());
    }

    #[test]
    fn should_treat_trailing_slash_as_same_path() {
        let routes = CallbackRoutes::new();
        routes.register_redirect("/welcome/", "https://www.google.com/");
        assert!(routes.lookup("/welcome").is_some());
        assert!(routes.lookup("/welcome/").is_some());
    }

    #[test]
    fn should_add_leading_slash_when_missing() {
        let routes = CallbackRoutes::new();
        routes.register_callback("test", Arc::new(|| {}));
        assert!(routes.lookup("/test").is_some());
    }

    #[test]
    fn should_return_none_for_unregistered_path() {
        let routes = CallbackRoutes::new();
        assert!(routes.lookup("/missing").is_none());
    }

    #[test]
    fn should_let_last_registration_win() {
        let routes = CallbackRoutes::new();
        let hits = Arc::new(AtomicUsize::new(0));

        routes.register_redirect("/test", "https://example.com/first");
        let hits_clone = Arc::clone(&hits);
        routes.register_callback(
            "/test",
            Arc::new(move || {
                hits_clone.fetch_add(1, Ordering::SeqCst);
            }),
        );

        assert_eq!(routes.len(), 1);
        match routes.lookup("/test") {
            Some(Route::Callback { handler }) => handler(),
            _ => panic!("expected the later callback registration"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
