use gryphon_vantage::adapters::outbound::arena_data::FilesystemArenaSource;
use gryphon_vantage::domains::view_planning::{Arena, ArenaSource, Cell, Heading, Obstacle, RobotState};
use gryphon_vantage::DomainError;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_filesystem_arena_source_save_and_load() {
    let dir = tempdir().unwrap();
    let source = FilesystemArenaSource::new(Some(dir.path().to_path_buf()));

    let arena = Arena::new(20, 20, RobotState::new(1, 1, Heading::North))
        .with_obstacle(Obstacle::new(1, 5, 15, Heading::South))
        .with_walls(vec![Cell::new(9, 9), Cell::new(10, 9)]);
    source.save_arena("lab.json", &arena).unwrap();

    let loaded = source.load_arena("lab.json").unwrap();
    assert_eq!(loaded, arena);
    assert_eq!(source.list_arenas().unwrap(), vec!["lab.json".to_string()]);
}

#[test]
fn test_hand_written_arena_without_walls() {
    let dir = tempdir().unwrap();
    let arenas = dir.path().join("arenas");
    fs::create_dir_all(&arenas).unwrap();
    fs::write(
        arenas.join("course.json"),
        r#"{
    "width": 20,
    "height": 20,
    "start": { "cell": { "x": 1, "y": 1 }, "heading": "North" },
    "obstacles": [
        { "id": 4, "cell": { "x": 10, "y": 12 }, "face": "West" }
    ]
}"#,
    )
    .unwrap();

    let source = FilesystemArenaSource::new(Some(dir.path().to_path_buf()));
    let arena = source.load_arena("course.json").unwrap();
    assert_eq!(arena.obstacles, vec![Obstacle::new(4, 10, 12, Heading::West)]);
    assert!(arena.walls.is_empty());
}

#[test]
fn test_missing_and_malformed_arenas_are_errors() {
    let dir = tempdir().unwrap();
    let source = FilesystemArenaSource::new(Some(dir.path().to_path_buf()));
    assert!(source.list_arenas().unwrap().is_empty());
    assert!(matches!(
        source.load_arena("absent.json"),
        Err(DomainError::InfrastructureError(_))
    ));

    let arenas = dir.path().join("arenas");
    fs::create_dir_all(&arenas).unwrap();
    fs::write(arenas.join("broken.json"), "{ width: ").unwrap();
    assert!(matches!(
        source.load_arena("broken.json"),
        Err(DomainError::SerializationError(_))
    ));
}

#[test]
fn test_bundled_course_loads() {
    let base = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("resources/vantage");
    let source = FilesystemArenaSource::new(Some(base));
    assert_eq!(source.list_arenas().unwrap(), vec!["course.json".to_string()]);

    let arena = source.load_arena("course.json").unwrap();
    assert_eq!(arena.obstacles.len(), 3);
    assert_eq!(arena.start, RobotState::new(1, 1, Heading::North));
}
