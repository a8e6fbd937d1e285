//! the process-wide config that `getopt!` reads from
//!
//! library users get the defaults (or whatever is on disk) lazily; the cli calls [`init_config`]
//! up front so a broken config file is reported instead of silently ignored
use {
    crate::config::options::E6PostCfg,
    color_eyre::{
        Result,
        eyre::{Context, eyre},
    },
    std::sync::{LazyLock, PoisonError, RwLock, RwLockReadGuard},
    tracing::{debug, warn},
};

/// the active config
static ACTIVE: LazyLock<RwLock<E6PostCfg>> = LazyLock::new(|| RwLock::new(load_or_default()));

/// whatever loads from disk, or the defaults when that fails
fn load_or_default() -> E6PostCfg {
    E6PostCfg::load().unwrap_or_else(|e| {
        warn!("failed to load configuration, using defaults: {:#}", e);
        E6PostCfg::default()
    })
}

/// map a poisoned lock into a report
fn poisoned<T>(e: PoisonError<T>) -> color_eyre::Report {
    eyre!("Configuration lock poisoned: {}", e)
}

/// load the config from disk and make it the active one
///
/// # Errors
///
/// returns an error if a config file or env override is invalid
pub fn init_config() -> Result<()> {
    let loaded = E6PostCfg::load().wrap_err("Failed to load configuration")?;
    install(loaded)
}

/// replace the active config
///
/// # Errors
///
/// returns an error if `cfg` fails validation, leaving the active config untouched
pub fn install(cfg: E6PostCfg) -> Result<()> {
    cfg.run_validation()?;

    *ACTIVE.write().map_err(poisoned)? = cfg;
    debug!("installed configuration");

    Ok(())
}

/// read access to the active config
pub fn config() -> Result<RwLockReadGuard<'static, E6PostCfg>> {
    ACTIVE.read().map_err(poisoned)
}

/// read one value off the active config, falling back to `default` when it's unset
pub fn get_or_default<T, F>(getter: F, default: T) -> T
where
    F: FnOnce(&E6PostCfg) -> Option<T>,
{
    config()
        .ok()
        .and_then(|cfg| getter(&cfg))
        .unwrap_or(default)
}
