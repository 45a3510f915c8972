use std::fs;

use ndarray::Array3;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tempfile::tempdir;

use tank_qlearning::discretizer::{DiscreteState, StateDiscretizer};
use tank_qlearning::{QTable, TankError};

#[test]
fn missing_file_gives_fresh_random_table() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("q_table.json");
    let mut rng = SmallRng::seed_from_u64(1);

    let table = QTable::load_or_init(&path, &StateDiscretizer::default(), &mut rng).unwrap();

    assert_eq!(table.shape(), [36, 10, 3]);
    assert!(table.as_array().iter().all(|v| (-1.0..=1.0).contains(v)));
    assert!(!path.exists());
}

#[test]
fn saved_table_loads_back_identically() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("q_table.json");
    let mut rng = SmallRng::seed_from_u64(2);
    let mut table = QTable::random(36, 10, &mut rng);
    table.update(DiscreteState::new(35, 9), 1, 42.125).unwrap();

    table.save(&path).unwrap();
    let loaded = QTable::load_or_init(&path, &StateDiscretizer::default(), &mut rng).unwrap();

    assert_eq!(loaded, table);
}

#[test]
fn save_overwrites_previous_content() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("q_table.json");
    QTable::zeros(36, 10).save(&path).unwrap();
    let mut second = QTable::zeros(36, 10);
    second.update(DiscreteState::new(0, 0), 0, -3.5).unwrap();
    second.save(&path).unwrap();

    let loaded = QTable::load(&path, [36, 10, 3]).unwrap().unwrap();
    assert_eq!(loaded, second);
}

#[test]
fn incompatible_shape_is_reported_and_file_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("q_table.json");
    let foreign: Array3<f64> = Array3::zeros((18, 10, 3));
    fs::write(&path, serde_json::to_string(&foreign).unwrap()).unwrap();
    let before = fs::read(&path).unwrap();

    let mut rng = SmallRng::seed_from_u64(3);
    let result = QTable::load_or_init(&path, &StateDiscretizer::default(), &mut rng);

    match result {
        Err(TankError::IncompatibleTable { expected, found }) => {
            assert_eq!(expected, [36, 10, 3]);
            assert_eq!(found, vec![18, 10, 3]);
        }
        other => panic!("expected IncompatibleTable, got {:?}", other),
    }
    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn different_rank_is_incompatible_too() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("q_table.json");
    let flat = ndarray::Array2::<f64>::zeros((360, 3));
    fs::write(&path, serde_json::to_string(&flat).unwrap()).unwrap();

    let result = QTable::load(&path, [36, 10, 3]);
    assert!(matches!(result, Err(TankError::IncompatibleTable { .. })));
}

#[test]
fn corrupt_file_is_not_masked() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("q_table.json");
    fs::write(&path, "not a table").unwrap();

    let mut rng = SmallRng::seed_from_u64(4);
    let result = QTable::load_or_init(&path, &StateDiscretizer::default(), &mut rng);
    assert!(matches!(result, Err(TankError::Format { .. })));
    assert_eq!(fs::read_to_string(&path).unwrap(), "not a table");
}

#[test]
fn unreadable_path_is_a_storage_error() {
    let dir = tempdir().unwrap();
    let mut rng = SmallRng::seed_from_u64(5);
    let result = QTable::load_or_init(dir.path(), &StateDiscretizer::default(), &mut rng);
    assert!(matches!(result, Err(TankError::Storage { .. })));
}

#[test]
fn unwritable_path_is_a_storage_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("q_table.json");
    let result = QTable::zeros(36, 10).save(&path);
    assert!(matches!(result, Err(TankError::Storage { .. })));
}
