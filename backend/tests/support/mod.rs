use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Every variable read by `ServerConfig::from_env`.
pub const CONFIG_VARS: &[&str] = &[
    "TIMING_CONFIG",
    "HOST",
    "PORT",
    "SERIES_SEED",
    "WINDOW_POLICY",
    "CODE_TTL_SECS",
    "CODE_SWEEP_SECS",
];

/// Run `f` with the config variables cleared and `vars` set, restoring the
/// previous environment afterwards (also on panic).
///
/// Calls are serialized because the process environment is global and tests
/// run in parallel.
pub fn with_config_env<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _restore = EnvSnapshot::take(CONFIG_VARS);

    for key in CONFIG_VARS {
        std::env::remove_var(key);
    }
    for (key, value) in vars {
        std::env::set_var(key, value);
    }
    f()
}

struct EnvSnapshot {
    saved: Vec<(String, Option<String>)>,
}

impl EnvSnapshot {
    fn take(keys: &[&str]) -> Self {
        Self {
            saved: keys
                .iter()
                .map(|k| (k.to_string(), std::env::var(k).ok()))
                .collect(),
        }
    }
}

impl Drop for EnvSnapshot {
    fn drop(&mut self) {
        for (key, value) in self.saved.drain(..) {
            match value {
                Some(v) => std::env::set_var(&key, v),
                None => std::env::remove_var(&key),
            }
        }
    }
}
