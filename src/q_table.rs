use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::Path;

use log::info;
use ndarray::{s, Array3, ArrayD, ArrayView1, Ix3};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::Rng;

use crate::discretizer::{DiscreteState, StateDiscretizer};
use crate::env::Action;
use crate::error::{Result, TankError};
use crate::utils::{argmax, max};

/// Dense action-value table indexed by (angle bin, distance bin, action).
#[derive(Debug, Clone, PartialEq)]
pub struct QTable {
    values: Array3<f64>,
}

fn storage_error(operation: &'static str, path: &Path, source: std::io::Error) -> TankError {
    TankError::Storage {
        operation,
        path: path.to_path_buf(),
        source,
    }
}

fn json_error(path: &Path, source: serde_json::Error) -> TankError {
    if source.is_io() {
        storage_error("access", path, source.into())
    } else {
        TankError::Format {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl QTable {
    pub fn zeros(angle_bins: usize, distance_bins: usize) -> Self {
        Self {
            values: Array3::zeros((angle_bins, distance_bins, Action::COUNT)),
        }
    }

    /// Every cell drawn independently from U(-1, 1).
    pub fn random<R: Rng + ?Sized>(angle_bins: usize, distance_bins: usize, rng: &mut R) -> Self {
        Self {
            values: Array3::random_using(
                (angle_bins, distance_bins, Action::COUNT),
                Uniform::new(-1.0, 1.0),
                rng,
            ),
        }
    }

    pub fn from_array(values: Array3<f64>) -> Result<Self> {
        if values.shape()[2] != Action::COUNT {
            return Err(TankError::IncompatibleTable {
                expected: [values.shape()[0], values.shape()[1], Action::COUNT],
                found: values.shape().to_vec(),
            });
        }
        Ok(Self { values })
    }

    pub fn shape(&self) -> [usize; 3] {
        let (a, d, n) = self.values.dim();
        [a, d, n]
    }

    pub fn as_array(&self) -> &Array3<f64> {
        &self.values
    }

    /// Loads the table stored at `path`, or draws a fresh random one when no file exists.
    ///
    /// Any other failure (unreadable file, malformed content, wrong shape) is returned
    /// as an error and the file is left as it is.
    pub fn load_or_init<R: Rng + ?Sized>(
        path: &Path,
        discretizer: &StateDiscretizer,
        rng: &mut R,
    ) -> Result<Self> {
        let expected = [
            discretizer.angle_bins(),
            discretizer.distance_bins(),
            Action::COUNT,
        ];
        match Self::load(path, expected)? {
            Some(table) => {
                info!("Loaded existing Q-table from {}", path.display());
                Ok(table)
            }
            None => {
                info!("No Q-table at {}, created a new one", path.display());
                Ok(Self::random(expected[0], expected[1], rng))
            }
        }
    }

    /// `Ok(None)` only when nothing exists at `path`.
    pub fn load(path: &Path, expected: [usize; 3]) -> Result<Option<Self>> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error("open", path, e)),
        };
        let stored: ArrayD<f64> =
            serde_json::from_reader(BufReader::new(file)).map_err(|e| json_error(path, e))?;
        let found = stored.shape().to_vec();
        if found[..] != expected[..] {
            return Err(TankError::IncompatibleTable { expected, found });
        }
        let values = stored
            .into_dimensionality::<Ix3>()
            .map_err(|_| TankError::IncompatibleTable { expected, found })?;
        Ok(Some(Self { values }))
    }

    /// Overwrites whatever is stored at `path` with the full table.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| storage_error("create", path, e))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &self.values).map_err(|e| json_error(path, e))?;
        writer.flush().map_err(|e| storage_error("write", path, e))?;
        info!("Q-table saved to {}", path.display());
        Ok(())
    }

    pub fn values(&self, state: DiscreteState) -> ArrayView1<'_, f64> {
        self.values.slice(s![state.angle_bin, state.distance_bin, ..])
    }

    pub fn value(&self, state: DiscreteState, action: usize) -> f64 {
        self.values[[state.angle_bin, state.distance_bin, action]]
    }

    pub fn best_value(&self, state: DiscreteState) -> f64 {
        max(self.values(state).iter())
    }

    /// First index holding the maximum value.
    pub fn best_action(&self, state: DiscreteState) -> usize {
        argmax(self.values(state).iter())
    }

    /// Overwrites a single cell. Non-finite values are refused and the cell keeps its value.
    pub fn update(&mut self, state: DiscreteState, action: usize, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(TankError::NonFiniteValue {
                state,
                action,
                value,
            });
        }
        self.values[[state.angle_bin, state.distance_bin, action]] = value;
        Ok(())
    }
}
