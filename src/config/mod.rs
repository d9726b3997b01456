/// Configuration system for jarvis.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** from [`schema::JarvisConfig::default()`]
/// 2. **User global config** at `~/.jarvis/config.toml`
/// 3. **Project local config** at `.jarvis.toml` in the current directory
/// 4. **Environment variables** `JARVIS_*` (highest precedence)
///
/// Files are merged key by key: a file that sets only `api.base_url` leaves
/// every other value from the previous layer in place.
///
/// # Usage
///
/// ```rust,ignore
/// use jarvis::config;
///
/// let cfg = config::load();
/// let backend = jarvis::api::HttpBackend::from_config(&cfg.api);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::warn;

pub use schema::JarvisConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved configuration.
///
/// Merges defaults → global TOML → project TOML → env vars.
pub fn load() -> JarvisConfig {
    let mut config = load_from(
        global_config_path().as_deref(),
        project_config_path().as_deref(),
    );
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

/// Merge the file layers only. Missing files are skipped; malformed files
/// are skipped with a warning so a typo never keeps the dashboard from
/// starting.
pub fn load_from(global: Option<&Path>, project: Option<&Path>) -> JarvisConfig {
    let mut merged = match toml::Value::try_from(JarvisConfig::default()) {
        Ok(value) => value,
        Err(_) => return JarvisConfig::default(),
    };

    for path in [global, project].into_iter().flatten() {
        if let Some(layer) = load_toml_file(path) {
            merge_toml(&mut merged, layer);
        }
    }

    merged.try_into().unwrap_or_else(|err| {
        warn!("invalid config value, using defaults: {err}");
        JarvisConfig::default()
    })
}

fn load_toml_file(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(path = %path.display(), "ignoring malformed config file: {err}");
            None
        }
    }
}

/// Recursively overlay `overlay` onto `base`. Tables merge; any other value
/// replaces the base value.
fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// `~/.jarvis`
pub fn jarvis_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".jarvis"))
}

/// Path to the user global config: `~/.jarvis/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    jarvis_dir().map(|dir| dir.join("config.toml"))
}

/// Path to the project local config: `.jarvis.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".jarvis.toml"))
}

pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `JARVIS_API_URL`: backend base URL
/// - `JARVIS_API_TIMEOUT_MS`: backend timeout
/// - `JARVIS_LANGUAGE`: voice command language code
/// - `JARVIS_WEB_ADDR`: dashboard listen address
/// - `JARVIS_LOG_LEVEL`: log filter
///
/// `lookup` returns a variable's value; empty values are ignored.
pub fn apply_env_overrides(config: &mut JarvisConfig, lookup: impl Fn(&str) -> Option<String>) {
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(val) = var("JARVIS_API_URL") {
        config.api.base_url = val;
    }
    if let Some(val) = var("JARVIS_API_TIMEOUT_MS")
        && let Ok(ms) = val.trim().parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Some(val) = var("JARVIS_LANGUAGE") {
        config.voice.language_code = val;
    }
    if let Some(val) = var("JARVIS_WEB_ADDR") {
        config.web.addr = val;
    }
    if let Some(val) = var("JARVIS_LOG_LEVEL") {
        config.logging.level = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.jarvis/config.toml`.
///
/// Fails if the file already exists unless `force` is set.
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    init_config_at(&path, force)?;
    Ok(path)
}

pub fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, JarvisConfig::default_toml()).context("failed to write config file")?;
    Ok(())
}

/// Set a single dotted key (e.g. `api.base_url`) in the global config file.
pub fn set_config_value(key: &str, value: &str) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)?;
    Ok(path)
}

/// Set a dotted key in the config file at `path`, creating it from the
/// defaults when missing. The value is parsed to the type of the existing
/// key.
pub fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut root =
        toml::Value::try_from(JarvisConfig::default()).context("failed to serialize defaults")?;
    if path.exists() {
        let content = fs::read_to_string(path).context("failed to read config file")?;
        let existing: toml::Value =
            toml::from_str(&content).context("failed to parse config as TOML value")?;
        // Layered over the defaults so any known key can be set.
        merge_toml(&mut root, existing);
    }

    set_toml_value(&mut root, key, value)?;

    // Validate before writing so a bad value never lands on disk.
    let _: JarvisConfig = root
        .clone()
        .try_into()
        .with_context(|| format!("invalid value for '{key}': '{value}'"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")?;
    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let (section, leaf) = match key.rsplit_once('.') {
        Some((section, leaf)) => (Some(section), leaf),
        None => (None, key),
    };
    if leaf.is_empty() {
        anyhow::bail!("empty config key");
    }

    let mut current = root;
    for part in section.into_iter().flat_map(|s| s.split('.')) {
        current = current
            .get_mut(part)
            .with_context(|| format!("config key not found: section '{part}' in '{key}'"))?;
    }

    let table = current
        .as_table_mut()
        .with_context(|| format!("expected table at '{}'", section.unwrap_or("")))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        Some(toml::Value::String(_)) => toml::Value::String(raw_value.to_string()),
        Some(_) => anyhow::bail!("'{key}' is a section, not a value"),
        None => anyhow::bail!("unknown config key '{key}'"),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// The effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
