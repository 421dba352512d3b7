//! Configuration loading: files, environment overrides and validation.

use std::io::Write;

use tempfile::NamedTempFile;
use xp_ledger::domain::models::{LogFormat, ProblemSourceKind, RotationPolicy};
use xp_ledger::ConfigLoader;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file.flush().unwrap();
    file
}

const SAMPLE: &str = r"
database:
  path: /var/lib/xp/ledger.db
logging:
  level: warn
  format: json
  log_dir: /var/log/xp
  rotation: hourly
problem_source:
  kind: http
  base_url: https://problems.example.test
  timeout_ms: 1500
ranks:
  - name: Bronze
    min_xp: 0
  - name: Silver
    min_xp: 250
  - name: Gold
    min_xp: 1000
";

#[test]
fn test_load_from_file() {
    let file = config_file(SAMPLE);

    temp_env::with_vars_unset(["XP_LEDGER_LOGGING__LEVEL", "XP_LEDGER_DATABASE__MAX_CONNECTIONS"], || {
        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.database.path, "/var/lib/xp/ledger.db");
        assert_eq!(config.database.max_connections, 5, "unset fields keep their defaults");
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.logging.rotation, RotationPolicy::Hourly);
        assert_eq!(config.problem_source.kind, ProblemSourceKind::Http);
        assert_eq!(config.problem_source.timeout_ms, 1500);
        assert_eq!(config.ranks.progress_for(300).rank, "Silver");
    });
}

#[test]
fn test_env_overrides_file() {
    let file = config_file(SAMPLE);

    temp_env::with_vars(
        [
            ("XP_LEDGER_LOGGING__LEVEL", Some("debug")),
            ("XP_LEDGER_DATABASE__MAX_CONNECTIONS", Some("2")),
            ("XP_LEDGER_PROBLEM_SOURCE__TIMEOUT_MS", Some("250")),
        ],
        || {
            let config = ConfigLoader::load_from_file(file.path()).unwrap();
            assert_eq!(config.logging.level, "debug");
            assert_eq!(config.database.max_connections, 2);
            assert_eq!(config.problem_source.timeout_ms, 250);
            assert_eq!(config.database.path, "/var/lib/xp/ledger.db");
        },
    );
}

#[test]
fn test_invalid_env_override_is_rejected() {
    let file = config_file(SAMPLE);

    temp_env::with_var("XP_LEDGER_DATABASE__MAX_CONNECTIONS", Some("0"), || {
        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("max_connections"), "{err}");
    });
}

#[test]
fn test_http_source_requires_base_url() {
    let file = config_file("problem_source:\n  kind: http\n");

    temp_env::with_var_unset("XP_LEDGER_PROBLEM_SOURCE__BASE_URL", || {
        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("base_url"), "{err}");
    });
}

#[test]
fn test_unordered_ranks_are_rejected() {
    let file = config_file("ranks:\n  - name: A\n    min_xp: 0\n  - name: B\n    min_xp: 0\n");

    temp_env::with_var_unset("XP_LEDGER_RANKS", || {
        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("rank"), "{err}");
    });
}

#[test]
fn test_fixed_scores_from_file() {
    let file = config_file("problem_source:\n  scores:\n    '7': 100\n    '42': 300\n");

    temp_env::with_var_unset("XP_LEDGER_PROBLEM_SOURCE__KIND", || {
        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.problem_source.kind, ProblemSourceKind::Fixed);
        assert_eq!(config.problem_source.scores.get("42"), Some(&300));
    });
}
