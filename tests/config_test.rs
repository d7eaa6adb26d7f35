//! Tests for configuration loading

use std::path::PathBuf;

use tempfile::TempDir;

use rushctl::config::{BootConfig, Credentials, Settings, TokenSpec};
use rushctl::domain::RamQuota;

const SAMPLE_BOOT_CONFIG: &str = r#"{
    "build_dir": "/opt/rush/build",
    "system_token": {
        "symbol": "RUSH",
        "max_supply": 10000000000,
        "supply": 0.2,
        "precision": 4
    },
    "support_token": {
        "symbol": "VOTE",
        "max_supply": 1000000,
        "precision": 0
    },
    "tokens": {
        "rush": { "symbol": "RUSH", "precision": 4 }
    },
    "accounts": [
        {
            "name": "rush.found",
            "pub": "EOS5vBqi8YSzFCeTv4weRTwBzVkGCY5PJvCqXGKs9RwwYurJJDmZG",
            "tokens": { "rush": 50000 },
            "ram": "64kb",
            "net": "default",
            "cpu": 2,
            "management": true
        },
        {
            "name": "rush.ops",
            "pub": "EOS5vBqi8YSzFCeTv4weRTwBzVkGCY5PJvCqXGKs9RwwYurJJDmZG"
        }
    ],
    "contracts": [
        { "account": "rush.market", "name": "marketplace" }
    ]
}"#;

#[test]
fn given_sample_file_when_load_then_all_sections_parse() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("boot_config.json");
    std::fs::write(&path, SAMPLE_BOOT_CONFIG).unwrap();

    // Act
    let config = BootConfig::load(&path).unwrap();

    // Assert
    assert_eq!(config.build_dir, PathBuf::from("/opt/rush/build"));
    assert_eq!(config.system_token.symbol, "RUSH");
    assert_eq!(config.support_token.supply, 0.0);
    assert_eq!(config.tokens["rush"].precision, 4);
    assert_eq!(config.accounts.len(), 2);
    assert_eq!(config.contracts[0].account, "rush.market");
}

#[test]
fn given_sample_file_when_load_then_account_quotas_are_typed() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("boot_config.json");
    std::fs::write(&path, SAMPLE_BOOT_CONFIG).unwrap();

    // Act
    let config = BootConfig::load(&path).unwrap();

    // Assert - explicit quotas
    let found = &config.accounts[0];
    assert_eq!(found.ram, RamQuota::Bytes(64 * 1024));
    assert_eq!(found.net.0, 1);
    assert_eq!(found.cpu.0, 2);
    assert!(found.management);

    // Assert - omitted fields fall back to defaults
    let ops = &config.accounts[1];
    assert_eq!(ops.ram, RamQuota::Default);
    assert_eq!(ops.net.0, 1);
    assert!(!ops.management);
    assert!(ops.tokens.is_empty());
}

#[test]
fn given_bad_ram_quota_when_load_then_parse_error() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("boot_config.json");
    let bad = SAMPLE_BOOT_CONFIG.replace("\"64kb\"", "\"64gb\"");
    std::fs::write(&path, bad).unwrap();

    // Act & Assert
    assert!(BootConfig::load(&path).is_err());
}

#[test]
fn given_missing_file_when_load_then_config_error() {
    let err = BootConfig::load(&PathBuf::from("/nonexistent/boot.json")).unwrap_err();
    assert!(err.to_string().contains("config error"));
}

#[test]
fn given_config_when_management_names_then_only_flagged_accounts() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("boot_config.json");
    std::fs::write(&path, SAMPLE_BOOT_CONFIG).unwrap();
    let config = BootConfig::load(&path).unwrap();

    // Act & Assert
    assert_eq!(config.management_account_names(), vec!["rush.found"]);
}

#[test]
fn given_build_dir_when_defaults_then_paths_derive_from_it() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("boot_config.json");
    std::fs::write(&path, SAMPLE_BOOT_CONFIG).unwrap();
    let config = BootConfig::load(&path).unwrap();

    // Act & Assert
    assert_eq!(
        config.default_nodeos(),
        PathBuf::from("/opt/rush/build/programs/nodeos/nodeos")
    );
    assert_eq!(
        config.default_keosd(),
        PathBuf::from("/opt/rush/build/programs/keosd/keosd")
    );
    assert_eq!(
        config.default_cleos(),
        PathBuf::from("/opt/rush/build/programs/cleos/cleos")
    );
    assert_eq!(
        config.default_contracts_dir(),
        PathBuf::from("/opt/rush/build/contracts")
    );
}

#[test]
fn given_ini_file_when_load_credentials_then_repository_section_parses() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("credentials.ini");
    std::fs::write(&path, "[repository]\nlogin = ci-bot\npassword = hunter2\n").unwrap();

    // Act
    let credentials = Credentials::load(&path).unwrap();

    // Assert
    assert_eq!(credentials.login, "ci-bot");
    assert_eq!(credentials.password, "hunter2");
}

#[test]
fn given_missing_ini_when_load_credentials_then_error() {
    assert!(Credentials::load(&PathBuf::from("/nonexistent/credentials.ini")).is_err());
}

#[test]
fn given_defaults_when_settings_then_prefix_and_paths_are_set() {
    let settings = Settings::default();
    assert_eq!(settings.image_prefix, "asteroid_rush/");
    assert_eq!(settings.dockerfiles_dir, PathBuf::from("./dockerfiles"));
    assert_eq!(settings.wallet_url, "http://127.0.0.1:6666");
}

#[test]
fn given_zero_supply_when_issue_asset_then_none() {
    // Arrange
    let spec = TokenSpec {
        symbol: "VOTE".to_string(),
        max_supply: 1_000_000,
        supply: 0.0,
        precision: 0,
    };

    // Act & Assert
    assert!(spec.issue_asset().is_none());
}

#[test]
fn given_fraction_when_issue_asset_then_amount_is_rounded() {
    // Arrange
    let spec = TokenSpec {
        symbol: "RUSH".to_string(),
        max_supply: 1_000_001,
        supply: 0.5,
        precision: 4,
    };

    // Act
    let asset = spec.issue_asset().unwrap();

    // Assert - 500000.5 base units round up
    assert_eq!(asset.amount, 500_001);
    assert_eq!(asset.to_string(), "50.0001 RUSH");
}
