//! Fixed configuration values for deterministic tests

use std::collections::HashMap;
use token_service::config::Config;

pub const TEST_API_KEY: &str = "APItestkey2025";
pub const TEST_API_SECRET: &str = "test-api-secret-0123456789abcdefghijkl";
pub const TEST_SERVER_URL: &str = "wss://media.test.example.com";

pub const TEST_ROOM: &str = "test-room";
pub const TEST_PARTICIPANT: &str = "TestUser";

/// Environment map with all signing values set.
pub fn test_config_vars() -> HashMap<String, String> {
    HashMap::from([
        ("BIND_HOST".to_string(), "127.0.0.1".to_string()),
        ("PORT".to_string(), "0".to_string()),
        ("LIVEKIT_API_KEY".to_string(), TEST_API_KEY.to_string()),
        ("LIVEKIT_API_SECRET".to_string(), TEST_API_SECRET.to_string()),
        ("LIVEKIT_URL".to_string(), TEST_SERVER_URL.to_string()),
    ])
}

/// Fully configured service config.
pub fn test_config() -> Config {
    config_from(test_config_vars())
}

/// Config with none of the signing values set.
pub fn unconfigured_config() -> Config {
    config_from(HashMap::from([
        ("BIND_HOST".to_string(), "127.0.0.1".to_string()),
        ("PORT".to_string(), "0".to_string()),
    ]))
}

/// Config with one signing variable removed.
pub fn config_without(var: &str) -> Config {
    let mut vars = test_config_vars();
    vars.remove(var);
    config_from(vars)
}

fn config_from(vars: HashMap<String, String>) -> Config {
    Config::from_vars(&vars).expect("test config vars should always parse")
}
