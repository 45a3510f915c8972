use crate::discretizer::DiscreteState;
use crate::error::Result;
use crate::q_table::QTable;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub prev_state: DiscreteState,
    pub action: usize,
    pub reward: f64,
    pub next_state: DiscreteState,
}

/// One-step Q-learning: moves Q(s, a) toward r + γ·max_a' Q(s', a').
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QStep {
    learning_rate: f64,
    discount_factor: f64,
}

impl Default for QStep {
    fn default() -> Self {
        Self::new(0.1, 0.9)
    }
}

impl QStep {
    pub fn new(learning_rate: f64, discount_factor: f64) -> Self {
        Self {
            learning_rate,
            discount_factor,
        }
    }

    pub fn target(&self, q_table: &QTable, transition: &Transition) -> f64 {
        transition.reward + self.discount_factor * q_table.best_value(transition.next_state)
    }

    /// Applies the update in place and returns the temporal difference.
    pub fn update(&self, q_table: &mut QTable, transition: &Transition) -> Result<f64> {
        let current = q_table.value(transition.prev_state, transition.action);
        let temporal_difference = self.target(q_table, transition) - current;
        q_table.update(
            transition.prev_state,
            transition.action,
            current + self.learning_rate * temporal_difference,
        )?;
        Ok(temporal_difference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TankError;

    fn hit_transition() -> Transition {
        Transition {
            prev_state: DiscreteState::new(0, 0),
            action: 2,
            reward: 100.0,
            next_state: DiscreteState::new(0, 0),
        }
    }

    #[test]
    fn single_cell_update_from_zero_table() {
        let mut table = QTable::zeros(36, 10);
        let td = QStep::default().update(&mut table, &hit_transition()).unwrap();
        assert_eq!(td, 100.0);
        assert!((table.value(DiscreteState::new(0, 0), 2) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn bootstraps_from_the_best_next_value() {
        let mut table = QTable::zeros(36, 10);
        let next = DiscreteState::new(4, 1);
        table.update(next, 0, 2.0).unwrap();
        table.update(next, 1, 5.0).unwrap();
        let transition = Transition {
            prev_state: DiscreteState::new(3, 1),
            action: 0,
            reward: -1.0,
            next_state: next,
        };
        let learner = QStep::new(0.5, 0.9);
        assert!((learner.target(&table, &transition) - 3.5).abs() < 1e-12);
        learner.update(&mut table, &transition).unwrap();
        assert!((table.value(DiscreteState::new(3, 1), 0) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn same_inputs_same_result() {
        let start = QTable::zeros(36, 10);
        let mut a = start.clone();
        let mut b = start;
        let learner = QStep::default();
        learner.update(&mut a, &hit_transition()).unwrap();
        learner.update(&mut b, &hit_transition()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_reward_leaves_table_untouched() {
        let mut table = QTable::zeros(36, 10);
        let transition = Transition {
            reward: f64::NAN,
            ..hit_transition()
        };
        assert!(matches!(
            QStep::default().update(&mut table, &transition),
            Err(TankError::NonFiniteValue { .. })
        ));
        assert_eq!(table, QTable::zeros(36, 10));
    }
}
