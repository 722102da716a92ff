//! Read-only environment lookup.
//!
//! Resolution reads its override variables through [`EnvLookup`] on every
//! call, so tests and embedding applications can supply values without
//! touching the real process environment.

use std::collections::HashMap;

/// Read-only key/value lookup for environment overrides.
pub trait EnvLookup {
    /// Value of `name`, or `None` when unset.
    fn var(&self, name: &str) -> Option<String>;
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvLookup for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl EnvLookup for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

impl EnvLookup for HashMap<&str, &str> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).map(|value| (*value).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashmap_lookup() {
        let env = HashMap::from([("PYSHIMMER_PORT", "/dev/ttyACM0")]);
        assert_eq!(env.var("PYSHIMMER_PORT").as_deref(), Some("/dev/ttyACM0"));
        assert_eq!(env.var("PYSHIMMER_BT_PORT"), None);
    }

    #[test]
    fn test_owned_hashmap_lookup() {
        let mut env = HashMap::new();
        env.insert("PYSHIMMER_BT_PORT".to_string(), "COM5".to_string());
        assert_eq!(env.var("PYSHIMMER_BT_PORT").as_deref(), Some("COM5"));
    }

    #[test]
    fn test_process_env_missing_var() {
        assert_eq!(ProcessEnv.var("SHIMPORT_TEST_SURELY_UNSET_VARIABLE"), None);
    }
}
