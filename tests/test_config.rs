use std::fs;
use std::path::PathBuf;

use galaxy_wars::config::*;
use galaxy_wars::GameError;

use tempfile::tempdir;

#[test]
fn missing_tables_keep_the_built_in_levels() {
    let config = GameConfig::from_toml(
        r#"
        high_score_path = "scores.txt"

        [level2]
        meteor_spawn_interval = 0.5
        enemy_spawn_interval = 0.7
        player_speed = 700.0
        enemy_track = "Blue"
        waves = 3
        "#,
    )
    .unwrap();

    assert_eq!(config.high_score_path, PathBuf::from("scores.txt"));
    assert_eq!(config.level1, LevelConfig::level_one());
    assert_eq!(config.level2.player_speed, 700.0);
    assert_eq!(config.level2.target_score(), 480);
    assert_eq!(config.level3, LevelConfig::level_three());
}

#[test]
fn incomplete_level_table_is_rejected() {
    let err = GameConfig::from_toml("[level1]\nplayer_speed = 300.0\n").unwrap_err();
    assert!(matches!(err, GameError::ConfigParse(_)));
    assert_eq!(err.kind(), "Config");
}

#[test]
fn empty_file_is_the_default_config() {
    assert_eq!(GameConfig::from_toml("").unwrap(), GameConfig::default());
}

#[test]
fn missing_file_is_a_resource_error() {
    let dir = tempdir().unwrap();
    let err = GameConfig::load(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, GameError::ResourceLoad { .. }));
}

#[test]
fn broken_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("galaxy_wars.toml");
    fs::write(&path, "waves = [").unwrap();
    assert_eq!(GameConfig::load_or_default(&path), GameConfig::default());

    fs::write(&path, "[level3]\nmeteor_spawn_interval = 0.3\nenemy_spawn_interval = 0.8\nplayer_speed = 600.0\nenemy_track = \"Green\"\nwaves = 3\n").unwrap();
    let config = GameConfig::load_or_default(&path);
    assert_eq!(config.level3.meteor_spawn_interval, 0.3);
    assert!(config.level3.has_boss());
}

#[test]
fn enemy_speed_follows_wave_count() {
    assert_eq!(LevelConfig::level_one().enemy_speed(), 80.0);
    assert_eq!(LevelConfig::level_two().enemy_speed(), 120.0);
}

#[test]
fn written_config_reads_back_unchanged() {
    let mut config = GameConfig::default();
    config.level2.player_speed = 610.0;
    let text = toml::to_string(&config).unwrap();
    assert!(text.contains("[level3]"));
    assert_eq!(GameConfig::from_toml(&text).unwrap(), config);
}
