//! every single available configuration option and its type is listed in this file
use {
    crate::{
        config::validate::{Validate, format_validation_errors},
        error::E6Error,
    },
    color_eyre::{
        Section, SectionExt,
        eyre::{Context, OptionExt, Result},
    },
    config::{Config, ConfigBuilder},
    schemars::JsonSchema,
    serde::{Deserialize, Serialize},
    smart_default::SmartDefault,
    std::path::{Path, PathBuf},
    tracing::info,
};

/// name of the config file, both globally and locally
pub const CONFIG_FILE_NAME: &str = "e6post.toml";

/// prefix for environment variable overrides
pub const ENV_PREFIX: &str = "E6POST";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, JsonSchema, SmartDefault)]
/// The format to log in
pub enum LoggingFormat {
    /// Use the compact output format
    Compact,

    /// Use an excessively pretty output format
    #[default]
    Pretty,
}

/// Settings for logging
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct LoggingConfig {
    /// Enable logging
    #[default(Some(true))]
    pub enable: Option<bool>,

    /// The max level to log at
    #[default(Some("warn".to_string()))]
    pub level: Option<String>,

    /// Which output format to use
    #[default(Some(LoggingFormat::Compact))]
    pub format: Option<LoggingFormat>,

    /// Enable ANSI escape codes for colors and stuff
    #[default(Some(true))]
    pub ansi: Option<bool>,

    /// Display event targets in log messages
    #[default(Some(false))]
    pub event_targets: Option<bool>,

    /// Display line numbers in log messages
    #[default(Some(false))]
    pub line_numbers: Option<bool>,
}

/// Settings for filtering decoded posts
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct FilterCfg {
    /// Blacklist rules, one query per entry. A post matching any rule is hidden
    #[default(Some(vec!["gore".to_string(), "scat".to_string()]))]
    pub blacklist: Option<Vec<String>>,

    /// The minimum score a post should have to be shown
    #[default(Some(i64::MIN))]
    pub min_post_score: Option<i64>,

    /// The maximum score a post should have to be shown
    #[default(Some(i64::MAX))]
    pub max_post_score: Option<i64>,
}

/// e6post configuration options
#[derive(Serialize, Deserialize, Clone, Debug, JsonSchema, SmartDefault)]
#[schemars(default)]
pub struct E6PostCfg {
    /// Configuration file version (do not modify manually)
    #[default(Some(1))]
    pub version: Option<u32>,

    /// The base URL used when printing post links
    #[schemars(url)]
    #[default(Some("https://e621.net".to_string()))]
    pub base_url: Option<String>,

    /// Post filtering settings
    #[default(Some(FilterCfg::default()))]
    pub filter: Option<FilterCfg>,

    /// Logging settings
    #[default(Some(LoggingConfig::default()))]
    pub logging: Option<LoggingConfig>,
}

impl E6PostCfg {
    /// load config from default locations
    ///
    /// load prio: env > local > global > defaults
    pub fn load() -> Result<Self> {
        let local = Self::find_local_config()?;
        Self::load_from(Self::global_config_path().ok().as_deref(), local.as_deref())
    }

    /// load config from explicit global/local files, layered over the defaults
    ///
    /// either file may be missing
    pub fn load_from(global: Option<&Path>, local: Option<&Path>) -> Result<Self> {
        let mut builder = Self::create_builder(Self::default())?;

        for path in [global, local].into_iter().flatten() {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("filter.blacklist")
                .try_parsing(true),
        );

        let settings = builder.build().wrap_err("Failed to build configuration")?;
        let cfg: E6PostCfg = settings
            .try_deserialize::<E6PostCfg>()
            .wrap_err("Failed to deserialize configuration")?;

        cfg.run_validation()?;
        info!("Configuration validation successful");

        Ok(cfg)
    }

    /// get the global config file path
    pub fn global_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_eyre("Unable to determine system config directory")
            .suggestion("Ensure XDG_CONFIG_HOME or HOME environment variables are set")
            .suggestion("On Windows, APPDATA should be set")?;

        Ok(config_dir.join(CONFIG_FILE_NAME))
    }

    /// create a config builder with defaults
    fn create_builder(defaults: E6PostCfg) -> Result<ConfigBuilder<config::builder::DefaultState>> {
        let builder = Config::builder();
        let config_source = Config::try_from(&defaults)
            .wrap_err("Failed to convert default config struct to config source")?;

        Ok(builder.add_source(config_source))
    }

    /// run validation and return a pretty error if it fails
    ///
    /// the report wraps an [`E6Error::Validation`] holding the numbered list of problems
    pub(crate) fn run_validation(&self) -> Result<()> {
        self.validate()
            .map_err(|errors| E6Error::Validation(format_validation_errors(&errors)))
            .wrap_err("config validation failed")
            .suggestion(format!("Check your {} for invalid values", CONFIG_FILE_NAME))
            .suggestion("Run with --gen-default to see valid options")
    }

    /// find the nearest config file in the current directory or its ancestors
    fn find_local_config() -> Result<Option<PathBuf>> {
        let curr_dir = std::env::current_dir()
            .wrap_err("Failed to get current working directory")
            .suggestion("Ensure the current directory exists and is accessible")?;

        Ok(Self::find_config_in(&curr_dir))
    }

    /// walk up from `start` looking for a config file
    pub fn find_config_in(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|ancestor| ancestor.join(CONFIG_FILE_NAME))
            .find(|path| path.exists())
    }

    /// save config to a file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let toml_str =
            toml::to_string_pretty(self).wrap_err("Failed to serialize config to TOML")?;

        std::fs::write(path, &toml_str)
            .wrap_err_with(|| format!("Failed to write config file: {}", path.display()))
            .with_section(|| path.display().to_string().header("File path"))
            .with_section(|| format!("{} bytes", toml_str.len()).header("Content size:"))?;

        Ok(())
    }
}
