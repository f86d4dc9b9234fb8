use gryphon_vantage::domains::view_planning::StrategyMode;
use gryphon_vantage::Config;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_defaults_match_hardware_tuning() {
    let config = Config::default();
    assert_eq!(config.costs.turn_cost, 6);
    assert_eq!(config.costs.half_turn_cost, 10);
    assert_eq!(config.costs.reverse_cost, 3);
    assert_eq!(config.views.min_standoff, 2);
    assert_eq!(config.views.max_standoff, 4);
    assert_eq!(config.search.max_expansions, 200_000);
    assert_eq!(config.optimizer.exhaustive_threshold, 8);
    assert_eq!(config.optimizer.exhaustive_max_states, 1 << 22);
    assert_eq!(config.optimizer.mode, StrategyMode::Auto);
    assert!(config.data.base_dir.is_none());
    assert_eq!(config.logging.filter, "info");
}

#[test]
fn test_partial_toml_keeps_defaults() {
    let config = Config::from_toml_str(
        r#"
[costs]
turn_cost = 9

[costs.turn_cells]
major = 6
minor = 2

[optimizer]
mode = "local_search"
time_budget_ms = 250
seed = 11

[data]
base_dir = "/srv/arenas"
"#,
    )
    .unwrap();

    assert_eq!(config.costs.turn_cost, 9);
    assert_eq!(config.costs.reverse_cost, 3);
    assert_eq!((config.costs.turn_cells.major, config.costs.turn_cells.minor), (6, 2));
    assert_eq!(config.optimizer.mode, StrategyMode::LocalSearch);
    assert_eq!(config.optimizer.time_budget_ms, Some(250));
    assert_eq!(config.optimizer.seed, 11);
    assert_eq!(config.optimizer.exhaustive_threshold, 8);
    assert_eq!(config.data.base_dir, Some(PathBuf::from("/srv/arenas")));

    let settings = config.planner_settings();
    assert_eq!(settings.costs.turn_cost, 9);
    assert_eq!(settings.optimizer.seed, 11);
}

#[test]
fn test_malformed_toml_is_an_error() {
    assert!(Config::from_toml_str("[costs]\nturn_cost = \"six\"").is_err());
}

#[tokio::test]
async fn test_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vantage.toml");
    tokio::fs::write(&path, "[search]\nmax_expansions = 5000\nuse_heuristic = false\n")
        .await
        .unwrap();

    let config = Config::from_file(&path).await.unwrap();
    assert_eq!(config.search.max_expansions, 5000);
    assert!(!config.search.use_heuristic);

    assert!(Config::from_file(dir.path().join("missing.toml")).await.is_err());
}

#[tokio::test]
async fn test_shipped_config_parses() {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config.toml");
    let config = Config::from_file(path).await.unwrap();
    assert_eq!(config.costs, Config::default().costs);
    assert_eq!(config.optimizer.seed, Config::default().optimizer.seed);
    assert_eq!(config.data.base_dir, Some(PathBuf::from("resources/vantage")));
}
