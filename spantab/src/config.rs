//! Configuration for the table compiler.
//!
//! Values are layered, later sources overriding earlier ones:
//! 1. built-in defaults,
//! 2. an optional TOML file,
//! 3. `SPANTAB_`-prefixed environment variables.
//!
//! Command-line flags are applied on top by the binary.
use std::path::Path;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::cost::Catalog;
use crate::cost::TableFormat;
use crate::error::Error;

/// Default ceiling on the number of intervals after merging.
pub const DEFAULT_MAX_INTERVALS: usize = 2048;

/// Default table formats, in tie-break order.
pub const DEFAULT_CATALOG: [&str; 2] = ["16x16", "32x32"];

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Table formats the optimizer may choose from, in tie-break order.
    pub catalog: Vec<TableFormat>,
    /// Inputs merging to more intervals than this are rejected.
    pub max_intervals: usize,
}

impl Settings {
    /// Loads defaults, then the file at `config_path` if given, then the
    /// environment. Nested keys would use a double underscore, and list
    /// values are comma separated:
    ///
    /// ```text
    /// SPANTAB_CATALOG=12x12,16x16,32x32
    /// SPANTAB_MAX_INTERVALS=4096
    /// ```
    pub fn new(config_path: Option<impl AsRef<Path>>) -> Result<Self, Error> {
        let env = Environment::with_prefix("SPANTAB")
            .prefix_separator("_")
            .separator("__")
            .list_separator(",")
            .try_parsing(true)
            .with_list_parse_key("catalog");

        let mut cfg_builder = Config::builder();
        cfg_builder = cfg_builder.set_default("catalog", DEFAULT_CATALOG.to_vec())?;
        cfg_builder = cfg_builder.set_default("max_intervals", DEFAULT_MAX_INTERVALS as u64)?;

        if let Some(path) = config_path {
            cfg_builder = cfg_builder.add_source(File::from(path.as_ref()));
        }
        cfg_builder = cfg_builder.add_source(env);

        let cfg = cfg_builder.build()?;

        let settings: Settings = cfg.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Perform validation on the configuration.
    fn validate(&self) -> Result<(), Error> {
        if self.max_intervals == 0 {
            let msg = "max_intervals must be at least 1".to_string();
            return Err(ConfigError::Message(msg).into());
        }

        self.catalog()?;
        Ok(())
    }

    /// The configured formats as a validated catalog.
    pub fn catalog(&self) -> Result<Catalog, Error> {
        Catalog::new(self.catalog.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn write_config(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("spantab.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_load_without_a_file() {
        let settings = Settings::new(None::<&Path>).unwrap();

        assert_eq!(settings.max_intervals, DEFAULT_MAX_INTERVALS);
        assert_eq!(settings.catalog().unwrap(), Catalog::default());
    }

    #[test]
    fn file_overrides_defaults() {
        let (_dir, path) = write_config(
            r#"
            catalog = ["12x12", "10x6", "32x32"]
            max_intervals = 100
            "#,
        );

        let settings = Settings::new(Some(&path)).unwrap();

        assert_eq!(settings.max_intervals, 100);
        assert_eq!(
            settings.catalog,
            vec![
                TableFormat::new(12, 12).unwrap(),
                TableFormat::new(10, 6).unwrap(),
                TableFormat::W32X32,
            ]
        );
    }

    #[test]
    fn file_may_set_only_some_keys() {
        let (_dir, path) = write_config("max_intervals = 7\n");

        let settings = Settings::new(Some(&path)).unwrap();

        assert_eq!(settings.max_intervals, 7);
        assert_eq!(settings.catalog().unwrap(), Catalog::default());
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let (_dir, path) = write_config("catalog = []\n");
        assert_matches!(Settings::new(Some(&path)), Err(Error::EmptyCatalog));
    }

    #[test]
    fn duplicate_formats_are_rejected() {
        let (_dir, path) = write_config(r#"catalog = ["16x16", "8x8", "16x16"]"#);
        assert_matches!(
            Settings::new(Some(&path)),
            Err(Error::DuplicateFormat(f)) if f == TableFormat::W16X16
        );
    }

    #[test]
    fn unparseable_format_is_a_config_error() {
        let (_dir, path) = write_config(r#"catalog = ["sixteen"]"#);
        assert_matches!(Settings::new(Some(&path)), Err(Error::Config(_)));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let (_dir, path) = write_config("max_intervals = 0\n");
        assert_matches!(
            Settings::new(Some(&path)),
            Err(Error::Config(ConfigError::Message(msg))) if msg.contains("max_intervals")
        );
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        assert_matches!(Settings::new(Some(&path)), Err(Error::Config(_)));
    }
}
