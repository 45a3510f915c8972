use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::discretizer::DiscreteState;
use crate::env::Action;
use crate::q_table::QTable;

/// Epsilon-greedy selector. Owns only its random source; the exploration
/// probability is handed in on every call.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy<R> {
    rng: R,
    exploration_decider: Uniform<f64>,
    rand_action_selecter: Uniform<usize>,
}

impl<R: Rng> EpsilonGreedy<R> {
    pub fn new(rng: R) -> Self {
        Self {
            rng,
            exploration_decider: Uniform::from(0.0..1.0),
            rand_action_selecter: Uniform::from(0..Action::COUNT),
        }
    }

    fn should_explore(&mut self, epsilon: f64) -> bool {
        epsilon != 0.0 && self.exploration_decider.sample(&mut self.rng) < epsilon
    }

    pub fn select_action(&mut self, q_table: &QTable, state: DiscreteState, epsilon: f64) -> usize {
        if self.should_explore(epsilon) {
            self.rand_action_selecter.sample(&mut self.rng)
        } else {
            q_table.best_action(state)
        }
    }
}
