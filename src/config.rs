use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::action_selection::{EnumEpsilonDecay, LinearDecay, MultiplicativeDecay};
use crate::error::{Result, TankError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecaySchedule {
    Multiplicative,
    Linear,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearningConfig {
    pub learning_rate: f64,
    pub discount_factor: f64,
    pub initial_epsilon: f64,
    /// Factor for the multiplicative schedule, step for the linear one.
    pub epsilon_decay: f64,
    pub final_epsilon: f64,
    pub decay_schedule: DecaySchedule,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.1,
            discount_factor: 0.9,
            initial_epsilon: 1.0,
            epsilon_decay: 0.995,
            final_epsilon: 0.05,
            decay_schedule: DecaySchedule::Multiplicative,
        }
    }
}

impl LearningConfig {
    pub fn epsilon_schedule(&self) -> EnumEpsilonDecay {
        match self.decay_schedule {
            DecaySchedule::Multiplicative => MultiplicativeDecay::new(self.epsilon_decay).into(),
            DecaySchedule::Linear => LinearDecay::new(self.epsilon_decay).into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub step_penalty: f64,
    pub miss_penalty: f64,
    pub hit_reward: f64,
    pub hit_radius: f64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step_penalty: -1.0,
            miss_penalty: -10.0,
            hit_reward: 100.0,
            hit_radius: 50.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    pub width: f64,
    pub height: f64,
    pub tank_center: (f64, f64),
    pub muzzle: (f64, f64),
    pub bullet_size: (f64, f64),
    pub target_size: f64,
    pub target_x_range: (f64, f64),
    pub target_y_range: (f64, f64),
    pub bullet_speed: f64,
    pub turn_step: f64,
}

impl Default for RangeConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            tank_center: (400.0, 530.0),
            muzzle: (390.0, 490.0),
            bullet_size: (20.0, 80.0),
            target_size: 50.0,
            target_x_range: (20.0, 730.0),
            target_y_range: (20.0, 300.0),
            bullet_speed: 5.0,
            turn_step: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub learning: LearningConfig,
    pub rewards: RewardConfig,
    pub range: RangeConfig,
    pub table_path: PathBuf,
    pub episodes: u128,
    pub max_ticks: Option<u128>,
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            learning: LearningConfig::default(),
            rewards: RewardConfig::default(),
            range: RangeConfig::default(),
            table_path: PathBuf::from("q_table.json"),
            episodes: 1,
            max_ticks: None,
            seed: None,
        }
    }
}

fn check(ok: bool, message: impl FnOnce() -> String) -> Result<()> {
    if ok {
        Ok(())
    } else {
        Err(TankError::InvalidConfig(message()))
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| TankError::Storage {
            operation: "read config",
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| TankError::Format {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<()> {
        let l = &self.learning;
        check(l.learning_rate > 0.0 && l.learning_rate <= 1.0, || {
            format!("learning_rate must be in (0, 1], got {}", l.learning_rate)
        })?;
        check((0.0..=1.0).contains(&l.discount_factor), || {
            format!("discount_factor must be in [0, 1], got {}", l.discount_factor)
        })?;
        check((0.0..=1.0).contains(&l.initial_epsilon), || {
            format!("initial_epsilon must be in [0, 1], got {}", l.initial_epsilon)
        })?;
        check(
            (0.0..=1.0).contains(&l.final_epsilon) && l.final_epsilon <= l.initial_epsilon,
            || {
                format!(
                    "final_epsilon must be in [0, initial_epsilon], got {}",
                    l.final_epsilon
                )
            },
        )?;
        check(l.epsilon_decay > 0.0 && l.epsilon_decay <= 1.0, || {
            format!("epsilon_decay must be in (0, 1], got {}", l.epsilon_decay)
        })?;

        let r = &self.range;
        check(r.width > 0.0 && r.height > 0.0, || {
            format!("playfield must be non-empty, got {}x{}", r.width, r.height)
        })?;
        check(r.bullet_speed > 0.0, || {
            format!("bullet_speed must be positive, got {}", r.bullet_speed)
        })?;
        check(r.turn_step.is_finite() && r.turn_step != 0.0, || {
            format!("turn_step must be finite and non-zero, got {}", r.turn_step)
        })?;
        check(
            r.target_x_range.0 <= r.target_x_range.1 && r.target_y_range.0 <= r.target_y_range.1,
            || "target placement ranges must be ordered".to_string(),
        )?;
        check(self.rewards.hit_radius > 0.0, || {
            format!("hit_radius must be positive, got {}", self.rewards.hit_radius)
        })?;
        check(self.max_ticks != Some(0), || {
            "max_ticks must be at least 1".to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_remaining_defaults() {
        let config: Config =
            serde_json::from_str(r#"{"episodes": 50, "learning": {"learning_rate": 0.2}}"#)
                .unwrap();
        assert_eq!(config.episodes, 50);
        assert_eq!(config.learning.learning_rate, 0.2);
        assert_eq!(config.learning.discount_factor, 0.9);
        assert_eq!(config.rewards, RewardConfig::default());
    }

    #[test]
    fn floor_above_initial_epsilon_is_rejected() {
        let mut config = Config::default();
        config.learning.final_epsilon = 1.0;
        config.learning.initial_epsilon = 0.5;
        assert!(matches!(
            config.validate(),
            Err(TankError::InvalidConfig(_))
        ));
    }

    #[test]
    fn zero_tick_ceiling_is_rejected() {
        let config = Config {
            max_ticks: Some(0),
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
