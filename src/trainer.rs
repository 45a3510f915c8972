use kdam::{tqdm, Bar, BarExt};
use log::{debug, info, warn};
use rand::Rng;

use crate::agent::{Agent, Step};
use crate::env::TankEnv;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpisodeSummary {
    pub reward: f64,
    pub ticks: u128,
    /// False when the tick ceiling cut the episode short.
    pub hit: bool,
    pub mean_abs_error: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrainResults {
    pub rewards: Vec<f64>,
    pub lengths: Vec<u128>,
    pub errors: Vec<f64>,
    pub hits: usize,
    pub final_epsilon: f64,
}

/// Runs whole episodes against an environment.
#[derive(Debug, Clone)]
pub struct Trainer {
    max_ticks: Option<u128>,
    show_progress: bool,
}

impl Default for Trainer {
    fn default() -> Self {
        Self::new(None)
    }
}

fn tick_bar(pb: &mut Option<Bar>, postfix: impl FnOnce() -> String) {
    if let Some(pb) = pb.as_mut() {
        pb.set_postfix(postfix());
        if let Err(e) = pb.update(1) {
            warn!("progress bar: {}", e);
        }
    }
}

impl Trainer {
    /// Ceiling applied to evaluation and example runs when none was configured,
    /// since a greedy policy may never fire at the target.
    pub const EVAL_TICKS: u128 = 10_000;

    pub fn new(max_ticks: Option<u128>) -> Self {
        Self {
            max_ticks,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn play<R, F>(
        &self,
        agent: &mut Agent<R>,
        env: &mut dyn TankEnv,
        max_ticks: Option<u128>,
        mut tick: F,
    ) -> Result<EpisodeSummary>
    where
        R: Rng,
        F: FnMut(&mut Agent<R>, &mut dyn TankEnv) -> Result<Step>,
    {
        agent.start_episode(env);
        let mut summary = EpisodeSummary {
            reward: 0.0,
            ticks: 0,
            hit: false,
            mean_abs_error: 0.0,
        };
        let mut total_error = 0.0;
        while max_ticks.map_or(true, |limit| summary.ticks < limit) {
            let step = tick(agent, env)?;
            summary.ticks += 1;
            summary.reward += step.reward;
            total_error += step.temporal_difference.abs();
            if step.done {
                summary.hit = true;
                break;
            }
        }
        if summary.ticks > 0 {
            summary.mean_abs_error = total_error / summary.ticks as f64;
        }
        Ok(summary)
    }

    /// Plays one learning episode and decays the exploration rate afterwards.
    pub fn run_episode<R: Rng>(
        &self,
        agent: &mut Agent<R>,
        env: &mut dyn TankEnv,
    ) -> Result<EpisodeSummary> {
        let summary = self.play(agent, env, self.max_ticks, |agent, env| agent.step(env))?;
        agent.end_episode();
        debug!(
            "episode finished: reward={} ticks={} hit={}",
            summary.reward, summary.ticks, summary.hit
        );
        Ok(summary)
    }

    pub fn train<R: Rng>(
        &self,
        agent: &mut Agent<R>,
        env: &mut dyn TankEnv,
        n_episodes: u128,
    ) -> Result<TrainResults> {
        let mut results = TrainResults::default();
        let mut pb = if self.show_progress {
            Some(tqdm!(total = n_episodes as usize))
        } else {
            None
        };

        for _ in 0..n_episodes {
            let summary = self.run_episode(agent, env)?;
            results.rewards.push(summary.reward);
            results.lengths.push(summary.ticks);
            results.errors.push(summary.mean_abs_error);
            if summary.hit {
                results.hits += 1;
            }
            let epsilon = agent.exploration().epsilon();
            tick_bar(&mut pb, || {
                format!("epsilon={:.3}, reward={}", epsilon, summary.reward)
            });
        }
        results.final_epsilon = agent.exploration().epsilon();
        info!(
            "trained {} episodes, {} hits, epsilon now {:.4}",
            n_episodes, results.hits, results.final_epsilon
        );
        Ok(results)
    }

    /// Greedy episodes without learning; the exploration rate is left alone.
    pub fn evaluate<R: Rng>(
        &self,
        agent: &mut Agent<R>,
        env: &mut dyn TankEnv,
        n_episodes: u128,
    ) -> Result<(Vec<f64>, Vec<u128>)> {
        let max_ticks = Some(self.max_ticks.unwrap_or(Self::EVAL_TICKS));
        let mut reward_history = vec![];
        let mut episode_length = vec![];
        for _ in 0..n_episodes {
            let summary = self.play(agent, env, max_ticks, |agent, env| agent.act_greedy(env))?;
            reward_history.push(summary.reward);
            episode_length.push(summary.ticks);
        }
        Ok((reward_history, episode_length))
    }

    /// Prints the range after every greedy tick of a single episode.
    pub fn example<R: Rng>(&self, agent: &mut Agent<R>, env: &mut dyn TankEnv) -> Result<()> {
        let max_ticks = Some(self.max_ticks.unwrap_or(Self::EVAL_TICKS));
        let summary = self.play(agent, env, max_ticks, |agent, env| {
            let step = agent.act_greedy(env)?;
            println!("{:<10} | {}", step.action.label(), env.render());
            Ok(step)
        })?;
        println!("episode reward {:?}", summary.reward);
        println!("terminated with {:?} steps", summary.ticks);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::env::ShootingRange;
    use crate::q_table::QTable;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn agent(seed: u64) -> Agent<SmallRng> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let table = QTable::random(36, 10, &mut rng);
        Agent::new(table, rng, &Config::default()).unwrap()
    }

    #[test]
    fn tick_ceiling_truncates_without_hit() {
        let mut env = ShootingRange::default();
        let mut agent = agent(5);
        let summary = Trainer::new(Some(3))
            .run_episode(&mut agent, &mut env)
            .unwrap();
        assert!(summary.ticks <= 3);
        if !summary.hit {
            assert_eq!(summary.ticks, 3);
        }
        assert!((agent.exploration().epsilon() - 0.995).abs() < 1e-12);
    }

    #[test]
    fn training_records_one_entry_per_episode() {
        let mut env = ShootingRange::default();
        let mut agent = agent(11);
        let results = Trainer::new(Some(200))
            .train(&mut agent, &mut env, 5)
            .unwrap();
        assert_eq!(results.rewards.len(), 5);
        assert_eq!(results.lengths.len(), 5);
        assert_eq!(results.errors.len(), 5);
        assert!(results.hits <= 5);
        assert!((results.final_epsilon - 0.995f64.powi(5)).abs() < 1e-12);
        assert!(agent.q_table().as_array().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn evaluation_keeps_table_and_epsilon() {
        let mut env = ShootingRange::default();
        let mut agent = agent(13);
        let before = agent.q_table().clone();
        let (rewards, lengths) = Trainer::new(Some(50))
            .evaluate(&mut agent, &mut env, 3)
            .unwrap();
        assert_eq!(rewards.len(), 3);
        assert!(lengths.iter().all(|l| *l <= 50));
        assert_eq!(agent.q_table(), &before);
        assert_eq!(agent.exploration().epsilon(), 1.0);
    }
}
