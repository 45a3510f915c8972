mod epsilon_decay;
mod epsilon_greedy;

use enum_dispatch::enum_dispatch;
pub use epsilon_decay::{ExplorationRate, LinearDecay, MultiplicativeDecay};
pub use epsilon_greedy::EpsilonGreedy;

/// One step of an exploration schedule, applied at the end of every episode.
#[enum_dispatch]
pub trait EpsilonDecay {
    fn decay(&self, epsilon: f64) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[enum_dispatch(EpsilonDecay)]
pub enum EnumEpsilonDecay {
    Multiplicative(MultiplicativeDecay),
    Linear(LinearDecay),
}
