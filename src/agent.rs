mod q_step;

pub use q_step::{QStep, Transition};

use log::debug;
use rand::Rng;

use crate::action_selection::{EpsilonGreedy, ExplorationRate};
use crate::config::{Config, RewardConfig};
use crate::discretizer::{DiscreteState, StateDiscretizer};
use crate::env::{Action, Observation, TankEnv};
use crate::error::{Result, TankError};
use crate::q_table::QTable;

/// Whether the gun can fire on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Aiming,
    BulletInFlight,
}

impl Phase {
    pub fn of(env: &dyn TankEnv) -> Self {
        if env.bullet().is_some() {
            Phase::BulletInFlight
        } else {
            Phase::Aiming
        }
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    pub state: DiscreteState,
    pub action: Action,
    pub reward: f64,
    pub next_state: DiscreteState,
    /// Phase after the tick.
    pub phase: Phase,
    /// The target was hit; the episode accepts no further ticks.
    pub done: bool,
    pub temporal_difference: f64,
}

/// The learning gunner. Owns the value table, the exploration rate and the
/// policy's random source; the environment is borrowed one tick at a time.
pub struct Agent<R> {
    q_table: QTable,
    policy: EpsilonGreedy<R>,
    learner: QStep,
    exploration: ExplorationRate,
    discretizer: StateDiscretizer,
    rewards: RewardConfig,
    turn_step: f64,
    finished: bool,
}

impl<R: Rng> Agent<R> {
    pub fn new(q_table: QTable, rng: R, config: &Config) -> Result<Self> {
        let discretizer = StateDiscretizer::default();
        let expected = [
            discretizer.angle_bins(),
            discretizer.distance_bins(),
            Action::COUNT,
        ];
        if q_table.shape() != expected {
            return Err(TankError::IncompatibleTable {
                expected,
                found: q_table.shape().to_vec(),
            });
        }
        let learning = &config.learning;
        Ok(Self {
            q_table,
            policy: EpsilonGreedy::new(rng),
            learner: QStep::new(learning.learning_rate, learning.discount_factor),
            exploration: ExplorationRate::new(
                learning.initial_epsilon,
                learning.final_epsilon,
                learning.epsilon_schedule(),
            ),
            discretizer,
            rewards: config.rewards.clone(),
            turn_step: config.range.turn_step,
            finished: false,
        })
    }

    pub fn q_table(&self) -> &QTable {
        &self.q_table
    }

    pub fn into_q_table(self) -> QTable {
        self.q_table
    }

    pub fn exploration(&self) -> &ExplorationRate {
        &self.exploration
    }

    pub fn exploration_mut(&mut self) -> &mut ExplorationRate {
        &mut self.exploration
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn start_episode(&mut self, env: &mut dyn TankEnv) {
        env.reset();
        self.finished = false;
    }

    /// Decays the exploration rate. Called once per episode, whether it ended on a hit or not.
    pub fn end_episode(&mut self) {
        self.exploration.decay();
        debug!("epsilon decayed to {:.4}", self.exploration.epsilon());
    }

    /// One full observe → select → act → learn cycle.
    pub fn step(&mut self, env: &mut dyn TankEnv) -> Result<Step> {
        let epsilon = self.exploration.epsilon();
        self.tick(env, epsilon, true)
    }

    /// Acts greedily and leaves the table untouched.
    pub fn act_greedy(&mut self, env: &mut dyn TankEnv) -> Result<Step> {
        self.tick(env, 0.0, false)
    }

    fn tick(&mut self, env: &mut dyn TankEnv, epsilon: f64, learn: bool) -> Result<Step> {
        if self.finished {
            return Err(TankError::EpisodeFinished);
        }
        let state = self.discretizer.observe(&Observation::from_env(env))?;
        let action = Action::try_from(self.policy.select_action(&self.q_table, state, epsilon))?;
        let mut reward = self.rewards.step_penalty;

        // rotation is allowed while a bullet is in flight; firing is not
        match action {
            Action::TurnLeft => env.rotate_tank(self.turn_step),
            Action::TurnRight => env.rotate_tank(-self.turn_step),
            Action::Fire => {
                if Phase::of(env) == Phase::Aiming {
                    let angle = env.tank_angle();
                    env.fire_bullet(angle);
                }
            }
        }

        if Phase::of(env) == Phase::BulletInFlight {
            env.advance_bullet();
            if let Some(bullet) = env.bullet() {
                if !env.bounds().contains(&bullet.position) {
                    reward = self.rewards.miss_penalty;
                    env.reload();
                } else if bullet.center().distance(&env.target_position())
                    < self.rewards.hit_radius
                {
                    reward = self.rewards.hit_reward;
                    env.reload();
                    self.finished = true;
                }
            }
        }

        let next_state = self.discretizer.observe(&Observation::from_env(env))?;
        let temporal_difference = if learn {
            self.learner.update(
                &mut self.q_table,
                &Transition {
                    prev_state: state,
                    action: action.index(),
                    reward,
                    next_state,
                },
            )?
        } else {
            0.0
        };

        Ok(Step {
            state,
            action,
            reward,
            next_state,
            phase: Phase::of(env),
            done: self.finished,
            temporal_difference,
        })
    }
}
