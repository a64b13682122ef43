//! Layered configuration loading for the CLI
//!
//! Precedence, lowest first: built-in defaults, `wmata.toml` (or the file
//! passed with `--config`), `WMATA_*` environment variables, command-line flags.

use std::path::Path;

use integration_wmata::WmataConfig;

/// Environment variable prefix (e.g. `WMATA_API_KEY`, `WMATA_TIMEOUT_SECS`)
pub const ENV_PREFIX: &str = "WMATA";

/// Values given on the command line, applied last
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Load configuration from file, environment, and command-line overrides
pub fn load(path: Option<&Path>, overrides: &Overrides) -> Result<WmataConfig, config::ConfigError> {
    load_with_env(path, overrides, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}

fn load_with_env(
    path: Option<&Path>,
    overrides: &Overrides,
    env: config::Environment,
) -> Result<WmataConfig, config::ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("wmata").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(env)
        .set_override_option("base_url", overrides.base_url.clone())?
        .set_override_option("api_key", overrides.api_key.clone())?
        .set_override_option("timeout_secs", overrides.timeout_secs)?;

    builder.build()?.try_deserialize()
}
