//! Tests for configuration

#[cfg(test)]
mod tests {
    use super::super::config::*;
    use super::super::types::{Horizon, ResponseNaming};
    use std::io::Write;
    use std::path::PathBuf;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8000);
        assert_eq!(config.response_naming, ResponseNaming::Horizon);
    }

    #[test]
    fn test_server_config_deserialize() {
        let toml_str = r#"
host = "127.0.0.1"
port = 9100
response_naming = "presentation"
"#;
        let config: ServerConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9100);
        assert_eq!(config.response_naming, ResponseNaming::Presentation);
    }

    #[test]
    fn test_models_config_defaults() {
        let config: ModelsConfig = toml::from_str("").unwrap();
        assert_eq!(config.dir, "models");
        assert_eq!(config.artifacts.file_for(Horizon::Days30), "LinearRegression_30d.json");
        assert_eq!(config.artifacts.file_for(Horizon::Days180), "XGBoost_180d.json");
    }

    #[test]
    fn test_models_config_artifact_override() {
        let toml_str = r#"
dir = "/srv/models"

[artifacts]
"60d" = "gbm_60d_v2.json"
"#;
        let config: ModelsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.artifacts.file_for(Horizon::Days60), "gbm_60d_v2.json");
        assert_eq!(config.artifacts.file_for(Horizon::Days90), "XGBoost_90d.json");

        let sources = config.sources();
        assert_eq!(sources.len(), 4);
        assert_eq!(sources[1], (Horizon::Days60, PathBuf::from("/srv/models/gbm_60d_v2.json")));
    }

    #[test]
    fn test_sources_follow_declaration_order() {
        let horizons: Vec<Horizon> = ModelsConfig::default().sources().into_iter().map(|(h, _)| h).collect();
        assert_eq!(horizons, Horizon::ALL.to_vec());
    }

    #[test]
    fn test_sources_expand_tilde() {
        let config = ModelsConfig {
            dir: "~/models".to_string(),
            ..Default::default()
        };
        let (_, path) = &config.sources()[0];
        assert!(!path.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn test_client_config_defaults() {
        let config: ClientConfig = toml::from_str("").unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load("does/not/exist.toml").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.models.dir, "models");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(
            file,
            r#"
[server]
port = 8123
response_naming = "presentation"

[models]
dir = "artifacts"

[client]
base_url = "http://predictor:8123"
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.server.port, 8123);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.response_naming, ResponseNaming::Presentation);
        assert_eq!(config.models.dir, "artifacts");
        assert_eq!(config.client.base_url, "http://predictor:8123");
        assert_eq!(config.client.timeout_secs, 30);
    }
}
