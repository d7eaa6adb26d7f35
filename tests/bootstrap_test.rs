//! End-to-end runbook test for BootstrapService (mocked processes)

mod common;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use common::{MockClock, MockCommandRunner, MockResponse};
use tempfile::TempDir;

use rushctl::application::services::{BootOptions, BootstrapService};
use rushctl::config::{AccountSpec, BootConfig, Settings, TokenInfo, TokenSpec};
use rushctl::domain::{BandwidthWeight, RamQuota};
use rushctl::infrastructure::traits::RealFileSystem;

const KEY_OUTPUT: &str = "Private key: 5KQwrPbwdL6PhXujxW37FSSQZ1JiwsST4cqQzDeyXtP79zkvFD3\nPublic key: EOS5vBqi8YSzFCeTv4weRTwBzVkGCY5PJvCqXGKs9RwwYurJJDmZG\n";

fn boot_config() -> BootConfig {
    let mut tokens = BTreeMap::new();
    tokens.insert(
        "rush".to_string(),
        TokenInfo {
            symbol: "RUSH".to_string(),
            precision: 4,
        },
    );
    BootConfig {
        build_dir: PathBuf::from("/build"),
        system_token: TokenSpec {
            symbol: "RUSH".to_string(),
            max_supply: 10_000_000_000,
            supply: 0.2,
            precision: 4,
        },
        support_token: TokenSpec {
            symbol: "VOTE".to_string(),
            max_supply: 1_000_000,
            supply: 0.0,
            precision: 0,
        },
        tokens,
        accounts: vec![
            AccountSpec {
                name: "rush.found".to_string(),
                pub_key: "EOS5vBqi8YSzFCeTv4weRTwBzVkGCY5PJvCqXGKs9RwwYurJJDmZG".to_string(),
                tokens: BTreeMap::from([("rush".to_string(), 50_000u64)]),
                ram: RamQuota::Bytes(64 * 1024),
                net: BandwidthWeight(2),
                cpu: BandwidthWeight(1),
                management: true,
            },
            AccountSpec {
                name: "rush.ops".to_string(),
                pub_key: "EOS5vBqi8YSzFCeTv4weRTwBzVkGCY5PJvCqXGKs9RwwYurJJDmZG".to_string(),
                tokens: BTreeMap::new(),
                ram: RamQuota::Default,
                net: BandwidthWeight::default(),
                cpu: BandwidthWeight::default(),
                management: false,
            },
        ],
        contracts: vec![],
    }
}

struct Fixture {
    cmd: Arc<MockCommandRunner>,
    clock: Arc<MockClock>,
    bootstrap: BootstrapService,
    log_path: PathBuf,
    _temp: TempDir,
}

fn fixture() -> Fixture {
    let temp = TempDir::new().unwrap();
    let genesis = temp.path().join("genesis.json");
    std::fs::write(&genesis, "{}").unwrap();
    let log_path = temp.path().join("output.log");

    let cmd = Arc::new(MockCommandRunner::new());
    cmd.stub("create key", MockResponse::ok_with(KEY_OUTPUT));
    let clock = Arc::new(MockClock::new());

    let options = BootOptions {
        public_key: "EOS6DovkiCze69bSzptXRnth7crDP1J6XvaXu1hJMJfgWdDPC45Fy".to_string(),
        private_key: "5KfjdDqaKCiDpMern6mGmtL4HNzWiRxRSF5mZUg9uFDrfk3xYT1".to_string(),
        wallet_dir: temp.path().join("wallet"),
        genesis,
        data_dir: None,
        nodeos: None,
        keosd: None,
        cleos: None,
        contracts_dir: None,
        log_path: log_path.clone(),
    };

    let bootstrap = BootstrapService::new(
        Arc::new(RealFileSystem),
        cmd.clone(),
        clock.clone(),
        &Settings::default(),
        boot_config(),
        options,
    );

    Fixture {
        cmd,
        clock,
        bootstrap,
        log_path,
        _temp: temp,
    }
}

#[test]
fn given_fresh_machine_when_run_then_runbook_executes_in_order() {
    // Arrange
    let f = fixture();

    // Act
    f.bootstrap.run().unwrap();

    // Assert - stale daemons are killed first
    let lines = f.cmd.run_lines();
    assert_eq!(lines[0], "killall keosd nodeos");

    // Daemons spawn from the build tree: nodeos first, then keosd
    let spawns = f.cmd.spawn_lines();
    assert_eq!(spawns.len(), 2);
    assert!(spawns[0].starts_with("/build/programs/nodeos/nodeos"));
    assert!(spawns[0].contains("--producer-name eosio"));
    assert!(spawns[0].contains(
        "--signature-provider EOS6DovkiCze69bSzptXRnth7crDP1J6XvaXu1hJMJfgWdDPC45Fy=KEY:5Kfjd"
    ));
    assert!(spawns[0].contains("--delete-all-blocks"));
    assert!(spawns[1].starts_with("/build/programs/keosd/keosd"));

    // Boot key lands in the freshly created wallet
    let position = |pattern: &str| {
        lines
            .iter()
            .position(|l| l.contains(pattern))
            .unwrap_or_else(|| panic!("missing command: {pattern}"))
    };
    assert!(position("wallet create --to-console") < position("wallet import"));

    // 5 system accounts + 2 contract accounts, each with a minted key
    assert_eq!(f.cmd.lines_matching("create key --to-console").len(), 7);
    assert_eq!(f.cmd.lines_matching("create account eosio ").len(), 7);

    // Contracts land from the build tree
    assert_eq!(
        f.cmd
            .lines_matching("set contract eosio.token /build/contracts/eosio.token/")
            .len(),
        1
    );
    assert_eq!(
        f.cmd
            .lines_matching("set contract eosio /build/contracts/eosio.system/")
            .len(),
        1
    );

    // Tokens: both created, only the system token issues at boot
    assert_eq!(f.cmd.lines_matching("push action eosio.token create").len(), 2);
    let issues = f.cmd.lines_matching("push action eosio.token issue");
    assert_eq!(issues.len(), 1);
    assert!(issues[0].contains(r#"["eosio","200000.0000 RUSH","memo"]"#));

    // Ordering across stages: base contracts before tokens, system
    // contract after tokens, management accounts after the system contract
    assert!(position("set contract eosio.token") < position("push action eosio.token create"));
    assert!(position("push action eosio.token create") < position("set contract eosio /"));
    assert!(position("push action eosio setpriv") < position("system newaccount eosio rush.found"));

    // Management accounts get their grants and quotas
    assert_eq!(f.cmd.lines_matching("system newaccount eosio").len(), 2);
    assert_eq!(
        f.cmd
            .lines_matching("transfer eosio rush.found 5.0000 RUSH")
            .len(),
        1
    );
    assert_eq!(
        f.cmd
            .lines_matching("set account ram rush.found 65536")
            .len(),
        1
    );
    assert_eq!(
        f.cmd
            .lines_matching("set account bandwidth rush.found 2 1")
            .len(),
        1
    );

    // Resign: gov to management, eosio to gov, system accounts to eosio
    // (owner + active each) - 7 resigns, 14 updateauth pushes
    assert_eq!(f.cmd.lines_matching("push action eosio updateauth").len(), 14);
    let gov_resigns = f.cmd.lines_matching(r#""account":"eosio.gov""#);
    assert_eq!(gov_resigns.len(), 4, "gov resigned as target and system account");
    assert!(gov_resigns[0].contains(r#""actor":"rush.found""#));
    assert!(!gov_resigns[0].contains(r#""actor":"rush.ops""#));
    assert!(lines.last().unwrap().contains("get account eosio.gov"));
}

#[test]
fn given_runbook_when_run_then_sleeps_follow_the_script() {
    // Arrange
    let f = fixture();

    // Act
    f.bootstrap.run().unwrap();

    // Assert - settle after killall, grace after keosd, settle per resign
    let sleeps = f.clock.sleeps();
    assert_eq!(sleeps[0], Duration::from_millis(1500));
    assert_eq!(sleeps[1], Duration::from_millis(400));
    assert_eq!(sleeps[2..].len(), 7);
    assert!(sleeps[2..].iter().all(|d| *d == Duration::from_secs(1)));
}

#[test]
fn given_runbook_when_run_then_journal_records_commands() {
    // Arrange
    let f = fixture();

    // Act
    f.bootstrap.run().unwrap();

    // Assert
    let journal = std::fs::read_to_string(&f.log_path).unwrap();
    assert!(journal.contains("killall keosd nodeos"));
    assert!(journal.contains("/build/programs/cleos/cleos --wallet-url http://127.0.0.1:6666"));
    assert!(journal.contains("wallet create --to-console"));
}
