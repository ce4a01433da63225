//! Settings for the application.
//!
//! Values come from `settings.toml` (or the file given with `--config`), then from
//! `CLUB_BOOKING__*` environment variables, e.g. `CLUB_BOOKING__STORE__TESTING=true`.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
pub struct App {
    /// Log level for this crate
    pub level: String,
}

#[derive(Debug, Deserialize)]
pub struct Store {
    pub clubs: PathBuf,
    pub competitions: PathBuf,
    /// Keep bookings in memory instead of writing them to the record files
    #[serde(default)]
    pub testing: bool,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub store: Store,
}

impl Settings {
    pub fn new(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name("settings").required(false),
        };

        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("store.clubs", "clubs.json")?
            .set_default("store.competitions", "competitions.json")?
            .add_source(file)
            .add_source(Environment::with_prefix("CLUB_BOOKING").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use speculoos::prelude::*;

    #[test]
    fn test_new_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            r#"
            [app]
            level = "debug"

            [store]
            clubs = "data/clubs.json"
            testing = true
            "#,
        )
        .unwrap();

        let settings = Settings::new(Some(&path)).unwrap();

        assert_that!(settings.app.level).is_equal_to("debug".to_string());
        assert_that!(settings.store.clubs).is_equal_to(PathBuf::from("data/clubs.json"));
        // Defaults fill in what the file leaves out
        assert_that!(settings.store.competitions)
            .is_equal_to(PathBuf::from("competitions.json"));
        assert_that!(settings.store.testing).is_true();
    }

    #[test]
    fn test_new_missing_file() {
        let res = Settings::new(Some(Path::new("does/not/exist.toml")));

        assert_that!(res).is_err();
    }
}
