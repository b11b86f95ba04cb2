use std::path::{Path, PathBuf};

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::proxy::PartialProxyPolicy;
use crate::error::ConfigError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: String,
    /// How the default text encoding is chosen.
    pub default_encoding: DefaultEncoding,
    pub partial_proxy: PartialProxyPolicy,
    pub overrides: Overrides,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            default_encoding: DefaultEncoding::Utf8,
            partial_proxy: PartialProxyPolicy::Disable,
            overrides: Overrides::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultEncoding {
    /// Always `UTF-8`.
    #[default]
    Utf8,
    /// Same as the native encoding of the host locale.
    Native,
}

/// Values that replace what the collector would read from the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    pub os_name: Option<String>,
    pub os_version: Option<String>,
    pub os_arch: Option<String>,
    pub arch_abi: Option<String>,
    pub patch_level: Option<String>,
    pub native_encoding: Option<String>,
}

impl Config {
    pub fn path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("platprops").join("config.toml"))
    }

    /// Defaults, then the TOML file if present, then `PLATPROPS_*` variables.
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("PLATPROPS_").split("__"))
    }
}

/// Load from the default location. A missing file is not an error.
pub fn load() -> Result<Config, ConfigError> {
    let path = Config::path()?;
    Ok(Config::figment(&path).extract()?)
}

/// Load from an explicit path, which must exist.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::Missing {
            path: path.to_path_buf(),
        });
    }
    Ok(Config::figment(path).extract()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_a_file() {
        Jail::expect_with(|jail| {
            let config: Config = Config::figment(&jail.directory().join("absent.toml")).extract()?;
            assert_eq!(config, Config::default());
            Ok(())
        });
    }

    #[test]
    fn file_values_override_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "config.toml",
                r#"
                default_encoding = "native"
                partial_proxy = "pass-through"

                [overrides]
                os_name = "TestOS"
                "#,
            )?;
            let config: Config = Config::figment(Path::new("config.toml")).extract()?;
            assert_eq!(config.default_encoding, DefaultEncoding::Native);
            assert_eq!(config.partial_proxy, PartialProxyPolicy::PassThrough);
            assert_eq!(config.overrides.os_name.as_deref(), Some("TestOS"));
            assert_eq!(config.log_level, "warn");
            Ok(())
        });
    }

    #[test]
    fn environment_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file("config.toml", "log_level = \"info\"\n")?;
            jail.set_env("PLATPROPS_LOG_LEVEL", "debug");
            jail.set_env("PLATPROPS_OVERRIDES__ARCH_ABI", "gnueabihf");
            let config: Config = Config::figment(Path::new("config.toml")).extract()?;
            assert_eq!(config.log_level, "debug");
            assert_eq!(config.overrides.arch_abi.as_deref(), Some("gnueabihf"));
            Ok(())
        });
    }

    #[test]
    fn explicit_path_must_exist() {
        let err = load_from(Path::new("/nonexistent/platprops.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Missing { .. }));
    }
}
