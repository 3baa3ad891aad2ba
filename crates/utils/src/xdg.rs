use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "cellar";

/// XDG Base Directory paths for cellar
pub struct XdgPaths;

impl XdgPaths {
    /// Get XDG_CONFIG_HOME/cellar or fallback
    pub fn config_dir() -> PathBuf {
        Self::base("XDG_CONFIG_HOME", ".config").join(APP_DIR)
    }

    /// Get XDG_DATA_HOME/cellar or fallback
    pub fn data_dir() -> PathBuf {
        Self::base("XDG_DATA_HOME", ".local/share").join(APP_DIR)
    }

    /// The JSON configuration file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    fn base(var: &str, home_relative: &str) -> PathBuf {
        env::var(var)
            .ok()
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::home_dir()
                    .map(|home| home.join(home_relative))
                    .unwrap_or_else(|| PathBuf::from(home_relative))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn with_var<F: FnOnce()>(name: &str, value: Option<&str>, f: F) {
        let original = env::var(name).ok();
        match value {
            Some(value) => env::set_var(name, value),
            None => env::remove_var(name),
        }
        f();
        match original {
            Some(value) => env::set_var(name, value),
            None => env::remove_var(name),
        }
    }

    #[test]
    #[serial]
    fn test_xdg_paths_with_env() {
        with_var("XDG_CONFIG_HOME", Some("/tmp/config"), || {
            assert_eq!(XdgPaths::config_dir(), PathBuf::from("/tmp/config/cellar"));
            assert_eq!(
                XdgPaths::config_file(),
                PathBuf::from("/tmp/config/cellar/config.json")
            );
        });
        with_var("XDG_DATA_HOME", Some("/tmp/data"), || {
            assert_eq!(XdgPaths::data_dir(), PathBuf::from("/tmp/data/cellar"));
        });
    }

    #[test]
    #[serial]
    fn test_empty_variable_falls_back_to_home() {
        with_var("XDG_DATA_HOME", Some(""), || {
            assert!(XdgPaths::data_dir().ends_with(".local/share/cellar"));
        });
    }
}
