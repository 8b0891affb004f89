use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use common::games::tictactoe::TicTacToeSettings;
use common::log;
use serde::{Deserialize, Serialize};

const CONFIG_FILE_NAME: &str = "tictactoe_arena_config.yaml";

fn get_config_path() -> String {
    if let Ok(exe_path) = std::env::current_exe()
        && let Some(exe_dir) = exe_path.parent()
    {
        return exe_dir.join(CONFIG_FILE_NAME).to_string_lossy().into_owned();
    }
    CONFIG_FILE_NAME.to_string()
}

fn get_config_manager() -> ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(get_config_path())
}

/// Reads the config file, falling back to defaults when it is unreadable.
pub fn load_config() -> Config {
    match get_config_manager().get_config() {
        Ok(config) => config,
        Err(e) => {
            log!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    pub tictactoe: TicTacToeSettings,
    /// Directory holding the per-difficulty win statistics.
    pub stats_location: String,
    pub player_name: Option<String>,
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        self.tictactoe.validate()?;
        if self.stats_location.is_empty() {
            return Err("stats_location must not be empty".to_string());
        }
        if let Some(name) = &self.player_name
            && name.trim().is_empty()
        {
            return Err("player_name must not be blank".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tictactoe: TicTacToeSettings::default(),
            stats_location: "tictactoe_stats".to_string(),
            player_name: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::config::{ConfigContentProvider, ConfigSerializer};

    fn get_temp_file_path() -> String {
        use std::env;
        let mut path = env::temp_dir();
        let random_number: u32 = rand::random();
        let file_name = format!("temp_tictactoe_arena_config_{}.yaml", random_number);
        path.push(file_name);
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_string() {
        let default_config = Config::default();
        let serializer = YamlConfigSerializer::new();
        let serialized_string = serializer.serialize(&default_config).unwrap();
        let deserialized_config: Config = serializer.deserialize(&serialized_string).unwrap();
        assert_eq!(default_config, deserialized_config);
    }

    #[test]
    fn test_default_config_can_be_saved_and_loaded_by_manager() {
        let config = Config {
            player_name: Some("Swift Falcon".to_string()),
            ..Config::default()
        };
        let file_path = get_temp_file_path();
        let manager = ConfigManager::new(
            FileContentConfigProvider::new(file_path.clone()),
            YamlConfigSerializer::new(),
        );

        assert!(manager.set_config(&config).is_ok());
        assert_eq!(manager.get_config().unwrap(), config);

        let fresh_manager: ConfigManager<_, Config, _> = ConfigManager::new(
            FileContentConfigProvider::new(file_path.clone()),
            YamlConfigSerializer::new(),
        );
        assert_eq!(fresh_manager.get_config().unwrap(), config);

        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_load_config_without_file_uses_defaults() {
        assert!(!std::path::Path::new(&get_config_path()).exists());

        assert_eq!(load_config(), Config::default());
    }

    #[test]
    fn test_config_file_does_not_exist_returns_default_config() {
        let file_path = "this_file_does_not_exist.yaml".to_string();
        let manager: ConfigManager<_, Config, _> = ConfigManager::new(
            FileContentConfigProvider::new(file_path),
            YamlConfigSerializer::new(),
        );
        assert_eq!(manager.get_config().unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_config_cant_be_read() {
        let invalid_config_content = r#"
            tictactoe:
              human_turn_seconds: 0
            stats_location: tictactoe_stats
        "#;

        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(file_path);
        content_provider
            .set_config_content(invalid_config_content)
            .unwrap();

        let manager: ConfigManager<_, Config, _> =
            ConfigManager::new(content_provider, YamlConfigSerializer::new());
        assert!(manager.get_config().is_err());
    }

    #[test]
    fn test_zero_turn_timer_fails_validation() {
        let mut config = Config::default();
        config.tictactoe.human_turn_seconds = 0;
        assert!(config.validate().is_err());

        let config = Config {
            player_name: Some("   ".to_string()),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
