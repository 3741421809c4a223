//! Worker script catalog.
//!
//! One canonical worker script serves the origin. Deprecated script paths
//! from earlier releases are still recognized: registering one redirects
//! to the canonical script, and a worker that finds itself running a
//! deprecated script unregisters at install so users migrate without
//! clearing state by hand.

/// Default path of the canonical worker script.
pub const CANONICAL_SCRIPT: &str = "/sw.js";

/// Default registration scope.
pub const ROOT_SCOPE: &str = "/";

/// How a requested script path resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptResolution {
    /// The requested path is the canonical script.
    Canonical,
    /// A deprecated path was redirected to the canonical script.
    Redirected {
        /// The deprecated path that was requested.
        from: String,
    },
}

/// Catalog of the canonical worker script and its deprecated ancestors.
#[derive(Debug, Clone)]
pub struct ScriptCatalog {
    canonical: String,
    deprecated: Vec<String>,
}

impl Default for ScriptCatalog {
    fn default() -> Self {
        Self::new(CANONICAL_SCRIPT)
    }
}

impl ScriptCatalog {
    /// Create a catalog with the given canonical script and no history.
    pub fn new(canonical: impl Into<String>) -> Self {
        Self {
            canonical: canonical.into(),
            deprecated: Vec::new(),
        }
    }

    /// Add deprecated script paths from earlier releases.
    pub fn with_deprecated<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.deprecated.extend(paths.into_iter().map(Into::into));
        self
    }

    /// The canonical script path.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Resolve a requested script path to the one that should register.
    pub fn resolve(&self, requested: &str) -> (String, ScriptResolution) {
        if self.deprecated.iter().any(|d| d == requested) {
            (
                self.canonical.clone(),
                ScriptResolution::Redirected {
                    from: requested.to_string(),
                },
            )
        } else {
            (self.canonical.clone(), ScriptResolution::Canonical)
        }
    }

    /// Whether a worker running this script must unregister itself at
    /// install.
    pub fn must_self_unregister(&self, running_script: &str) -> bool {
        self.deprecated.iter().any(|d| d == running_script)
    }
}

/// Worker-side install hook.
///
/// A worker that finds itself running a deprecated script removes its own
/// registration; the page re-registers the canonical script on its next
/// load. Returns `true` when the worker bowed out.
pub async fn self_unregister_if_deprecated(
    catalog: &ScriptCatalog,
    running_script: &str,
    registration: &dyn crate::platform::WorkerRegistration,
) -> brasa_core::AppResult<bool> {
    if !catalog.must_self_unregister(running_script) {
        return Ok(false);
    }

    tracing::info!(
        script = %running_script,
        canonical = %catalog.canonical(),
        "Deprecated worker script unregistering itself"
    );
    registration.unregister().await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use brasa_core::result::AppResult;

    use crate::platform::WorkerRegistration;

    use super::*;

    #[derive(Debug, Default)]
    struct Registration {
        unregisters: AtomicUsize,
    }

    #[async_trait]
    impl WorkerRegistration for Registration {
        fn scope(&self) -> String {
            ROOT_SCOPE.to_string()
        }
        async fn enable_navigation_preload(&self) -> AppResult<()> {
            Ok(())
        }
        async fn unregister(&self) -> AppResult<()> {
            self.unregisters.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn deprecated_script_unregisters_at_install() {
        let catalog = ScriptCatalog::default().with_deprecated(["/old-sw.js"]);
        let registration = Registration::default();

        assert!(
            self_unregister_if_deprecated(&catalog, "/old-sw.js", &registration)
                .await
                .unwrap()
        );
        assert_eq!(registration.unregisters.load(Ordering::SeqCst), 1);

        assert!(
            !self_unregister_if_deprecated(&catalog, CANONICAL_SCRIPT, &registration)
                .await
                .unwrap()
        );
        assert_eq!(registration.unregisters.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn canonical_resolves_to_itself() {
        let catalog = ScriptCatalog::default();
        let (script, resolution) = catalog.resolve(CANONICAL_SCRIPT);
        assert_eq!(script, CANONICAL_SCRIPT);
        assert_eq!(resolution, ScriptResolution::Canonical);
    }

    #[test]
    fn deprecated_path_redirects() {
        let catalog = ScriptCatalog::default().with_deprecated(["/firebase-messaging-sw.js"]);
        let (script, resolution) = catalog.resolve("/firebase-messaging-sw.js");
        assert_eq!(script, CANONICAL_SCRIPT);
        assert_eq!(
            resolution,
            ScriptResolution::Redirected {
                from: "/firebase-messaging-sw.js".to_string()
            }
        );
    }

    #[test]
    fn deprecated_worker_self_unregisters() {
        let catalog = ScriptCatalog::default().with_deprecated(["/old-sw.js"]);
        assert!(catalog.must_self_unregister("/old-sw.js"));
        assert!(!catalog.must_self_unregister(CANONICAL_SCRIPT));
    }
}
