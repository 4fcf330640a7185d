use std::fmt::Debug;

/// Env abstracts environment variable access so option resolution can be
/// tested without mutating the process environment.
pub(crate) trait Env: Debug + Send + Sync + 'static {
    /// Get an environment variable.
    ///
    /// - Returns `Some(v)` if the variable is found and is valid utf-8.
    /// - Returns `None` if the variable is not found or value is invalid.
    fn var(&self, key: &str) -> Option<String>;
}

/// Implements Env for the OS process environment.
#[derive(Debug, Copy, Clone)]
pub(crate) struct OsEnv;

impl Env for OsEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var_os(key)?.into_string().ok()
    }
}

/// StaticEnv provides a fixed set of variables.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub(crate) struct StaticEnv {
    pub envs: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl StaticEnv {
    pub fn from_iter<K, V>(envs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            envs: envs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
impl Env for StaticEnv {
    fn var(&self, key: &str) -> Option<String> {
        self.envs.get(key).cloned()
    }
}
