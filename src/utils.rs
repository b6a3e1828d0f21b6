use std::time::{SystemTime, SystemTimeError};

#[inline]
pub fn timestamp() -> Result<u64, SystemTimeError> {
    Ok(SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)?
        .as_secs())
}

#[cfg(test)]
static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

/// Runs `f` with the given variables set (`Some`) or removed (`None`),
/// restoring the previous values afterwards.
#[cfg(test)]
pub(crate) fn with_env<T>(vars: &[(&str, Option<&str>)], f: impl FnOnce() -> T) -> T {
    use std::{env, ffi::OsStr, panic};

    fn set_or_remove(name: &str, value: Option<&OsStr>) {
        // SAFETY: every test touching the process environment goes through ENV_LOCK.
        unsafe {
            match value {
                Some(value) => env::set_var(name, value),
                None => env::remove_var(name),
            }
        }
    }

    let _guard = ENV_LOCK
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner);

    let saved: Vec<_> = vars
        .iter()
        .map(|(name, _)| (*name, env::var_os(name)))
        .collect();
    for (name, value) in vars {
        set_or_remove(name, value.map(OsStr::new));
    }

    let result = panic::catch_unwind(panic::AssertUnwindSafe(f));

    for (name, value) in &saved {
        set_or_remove(name, value.as_deref());
    }

    result.unwrap_or_else(|payload| panic::resume_unwind(payload))
}
