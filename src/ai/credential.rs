//! API Credential Source
//!
//! The gateway never caches the API key. It asks its [`CredentialSource`]
//! on every call, so a key set (or removed) at runtime is picked up by the
//! next request and tests can swap sources without touching the process
//! environment.

use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};

type CredentialFn = dyn Fn() -> Option<SecretString> + Send + Sync;

/// Injected `() -> Option<SecretString>` lookup
#[derive(Clone)]
pub struct CredentialSource {
    /// Human-readable origin, used in the missing-credential message
    origin: String,
    lookup: Arc<CredentialFn>,
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialSource")
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

impl CredentialSource {
    /// Read the named environment variable on every call
    pub fn from_env(var: impl Into<String>) -> Self {
        let var = var.into();
        let name = var.clone();
        Self {
            origin: var,
            lookup: Arc::new(move || std::env::var(&name).ok().map(SecretString::from)),
        }
    }

    /// Always return the given key
    pub fn fixed(key: impl Into<String>) -> Self {
        let key: String = key.into();
        Self {
            origin: "fixed".to_string(),
            lookup: Arc::new(move || Some(SecretString::from(key.clone()))),
        }
    }

    /// Never return a key
    pub fn missing(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            lookup: Arc::new(|| None),
        }
    }

    /// Wrap an arbitrary lookup function
    pub fn from_fn<F>(origin: impl Into<String>, lookup: F) -> Self
    where
        F: Fn() -> Option<SecretString> + Send + Sync + 'static,
    {
        Self {
            origin: origin.into(),
            lookup: Arc::new(lookup),
        }
    }

    /// Current credential. Blank values count as absent.
    pub fn get(&self) -> Option<SecretString> {
        (self.lookup)().filter(|key| !key.expose_secret().trim().is_empty())
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_fixed_source() {
        let source = CredentialSource::fixed("secret-key");
        assert_eq!(source.get().unwrap().expose_secret(), "secret-key");
    }

    #[test]
    fn test_missing_source() {
        let source = CredentialSource::missing("API_KEY");
        assert!(source.get().is_none());
        assert_eq!(source.origin(), "API_KEY");
    }

    #[test]
    fn test_blank_key_counts_as_missing() {
        let source = CredentialSource::fixed("   ");
        assert!(source.get().is_none());
    }

    #[test]
    fn test_lookup_runs_on_every_call() {
        let present = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&present);
        let source = CredentialSource::from_fn("toggle", move || {
            flag.load(Ordering::SeqCst)
                .then(|| SecretString::from("k".to_string()))
        });

        assert!(source.get().is_none());
        present.store(true, Ordering::SeqCst);
        assert!(source.get().is_some());
    }

    #[test]
    fn test_env_source_reads_at_call_time() {
        let var = "TAAZA_TEST_CREDENTIAL_ENV_SOURCE";
        let source = CredentialSource::from_env(var);

        // SAFETY: variable name is unique to this test
        unsafe {
            std::env::remove_var(var);
        }
        assert!(source.get().is_none());

        unsafe {
            std::env::set_var(var, "from-env");
        }
        assert_eq!(source.get().unwrap().expose_secret(), "from-env");

        unsafe {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn test_debug_hides_key() {
        let source = CredentialSource::fixed("super-secret");
        let debug = format!("{:?}", source);
        assert!(!debug.contains("super-secret"));
    }
}
