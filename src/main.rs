use std::path::PathBuf;
use std::time::Instant;

use log::{error, info};
use plotters::style::{BLUE, RED};
use rand::rngs::SmallRng;
use rand::SeedableRng;

use tank_qlearning::config::Config;
use tank_qlearning::discretizer::StateDiscretizer;
use tank_qlearning::env::ShootingRange;
use tank_qlearning::utils::{moving_average, plot_moving_average};
use tank_qlearning::{Agent, QTable, Result, Trainer};

extern crate structopt;

use structopt::StructOpt;

/// Train the tank gunner, keeping its Q-table between runs
#[derive(StructOpt, Debug)]
#[structopt(name = "RLRust - Tank gunner")]
struct Cli {
    /// JSON configuration file; the flags below override its values
    #[structopt(long = "config", parse(from_os_str))]
    config: Option<PathBuf>,

    /// Number of episodes for the training
    #[structopt(long = "n_episodes", short = "n")]
    n_episodes: Option<u128>,

    /// Maximum number of ticks per episode (unbounded by default)
    #[structopt(long = "max_ticks")]
    max_ticks: Option<u128>,

    /// Where the Q-table is loaded from and saved to
    #[structopt(long = "table", parse(from_os_str))]
    table: Option<PathBuf>,

    /// Seed for target placement, table initialization and exploration
    #[structopt(long = "seed")]
    seed: Option<u64>,

    /// Learning rate of the RL agent
    #[structopt(long = "learning_rate")]
    learning_rate: Option<f64>,

    /// Discount factor to be used on the temporal difference calculation
    #[structopt(long = "discount_factor")]
    discount_factor: Option<f64>,

    /// Initial value for the exploration ratio
    #[structopt(long = "initial_epsilon")]
    initial_epsilon: Option<f64>,

    /// Decay applied to the exploration ratio after every episode
    #[structopt(long = "epsilon_decay")]
    epsilon_decay: Option<f64>,

    /// Final value for the exploration ratio
    #[structopt(long = "final_epsilon")]
    final_epsilon: Option<f64>,

    /// Number of greedy evaluation episodes to run after training
    #[structopt(long = "evaluate", default_value = "0")]
    evaluate: u128,

    /// Directory where training curves are written
    #[structopt(long = "plot", parse(from_os_str))]
    plot: Option<PathBuf>,

    /// Moving average window to be used on the visualization of results
    #[structopt(long = "moving_average_window", default_value = "50")]
    moving_average_window: usize,

    /// Show example of episode
    #[structopt(long = "show_example")]
    show_example: bool,

    /// Hide the progress bar
    #[structopt(long = "no_progress")]
    no_progress: bool,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(n) = self.n_episodes {
            config.episodes = n;
        }
        if self.max_ticks.is_some() {
            config.max_ticks = self.max_ticks;
        }
        if let Some(path) = &self.table {
            config.table_path = path.clone();
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        let learning = &mut config.learning;
        if let Some(v) = self.learning_rate {
            learning.learning_rate = v;
        }
        if let Some(v) = self.discount_factor {
            learning.discount_factor = v;
        }
        if let Some(v) = self.initial_epsilon {
            learning.initial_epsilon = v;
        }
        if let Some(v) = self.epsilon_decay {
            learning.epsilon_decay = v;
        }
        if let Some(v) = self.final_epsilon {
            learning.final_epsilon = v;
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    cli.apply(&mut config);
    config.validate()?;

    let seed = config.seed.unwrap_or_else(rand::random);
    info!("Using seed {}", seed);
    let mut rng = SmallRng::seed_from_u64(seed);

    let q_table = QTable::load_or_init(&config.table_path, &StateDiscretizer::default(), &mut rng)?;
    let mut env = ShootingRange::new(config.range.clone(), seed.wrapping_add(1));
    let mut agent = Agent::new(q_table, rng, &config)?;
    let trainer = Trainer::new(config.max_ticks).with_progress(!cli.no_progress);

    let now = Instant::now();
    let results = trainer.train(&mut agent, &mut env, config.episodes)?;
    info!("Training done in {:.2?}", now.elapsed());

    if cli.evaluate > 0 {
        let (rewards, lengths) = trainer.evaluate(&mut agent, &mut env, cli.evaluate)?;
        let mr: f64 = rewards.iter().sum::<f64>() / rewards.len() as f64;
        let ml: f64 = lengths.iter().sum::<u128>() as f64 / lengths.len() as f64;
        info!("Evaluation: avg reward={:.2}, avg episode length={:.1}", mr, ml);
    }

    if cli.show_example {
        trainer.example(&mut agent, &mut env)?;
    }

    agent.q_table().save(&config.table_path)?;

    if let Some(dir) = &cli.plot {
        let window = cli.moving_average_window;
        let lengths: Vec<f64> = results.lengths.iter().map(|x| *x as f64).collect();
        plot_moving_average(
            &[moving_average(window, &results.rewards)],
            &[&BLUE],
            &["ε-Greedy One-Step Qlearning"],
            "Train Rewards",
            &dir.join("train_rewards.svg"),
        )?;
        plot_moving_average(
            &[moving_average(window, &lengths)],
            &[&RED],
            &["ε-Greedy One-Step Qlearning"],
            "Train Episodes Length",
            &dir.join("train_episodes_length.svg"),
        )?;
        info!("Training curves written to {}", dir.display());
    }
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli: Cli = Cli::from_args();
    if let Err(e) = run(&cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}
