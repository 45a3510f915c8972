use super::{EnumEpsilonDecay, EpsilonDecay};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiplicativeDecay {
    factor: f64,
}

impl MultiplicativeDecay {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }
}

impl EpsilonDecay for MultiplicativeDecay {
    fn decay(&self, epsilon: f64) -> f64 {
        epsilon * self.factor
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearDecay {
    step: f64,
}

impl LinearDecay {
    pub fn new(step: f64) -> Self {
        Self { step }
    }
}

impl EpsilonDecay for LinearDecay {
    fn decay(&self, epsilon: f64) -> f64 {
        epsilon - self.step
    }
}

/// Process-wide exploration probability, decayed once per episode and never
/// allowed below `final_epsilon`. Not persisted: every run starts from `initial_epsilon`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorationRate {
    pub initial_epsilon: f64,
    epsilon: f64,
    final_epsilon: f64,
    schedule: EnumEpsilonDecay,
}

impl ExplorationRate {
    pub fn new(initial_epsilon: f64, final_epsilon: f64, schedule: EnumEpsilonDecay) -> Self {
        Self {
            initial_epsilon,
            epsilon: initial_epsilon,
            final_epsilon,
            schedule,
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn final_epsilon(&self) -> f64 {
        self.final_epsilon
    }

    pub fn decay(&mut self) {
        self.epsilon = self.schedule.decay(self.epsilon).max(self.final_epsilon);
    }

    pub fn reset(&mut self) {
        self.epsilon = self.initial_epsilon;
    }
}
