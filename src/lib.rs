pub mod action_selection;
pub mod agent;
pub mod config;
pub mod discretizer;
pub mod env;
pub mod error;
pub mod q_table;
pub mod trainer;
pub mod utils;

pub use agent::Agent;
pub use error::{Result, TankError};
pub use q_table::QTable;
pub use trainer::Trainer;
