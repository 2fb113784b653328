use valvenet::config::{Cli, Config};
use valvenet::network::Network;
use valvenet::scenario::Scenario;
use valvenet::solver::{DualAgent, SingleAgent, Solver};

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{error, info, Level};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .init();
    let cli = Cli::parse();

    if let Some(path) = cli.scenario.as_ref() {
        return run_scenario(path);
    }

    let config = Config::new(&cli);
    config.validate()?;

    let answer = execute(&config.input, &config.start, config.minutes, config.agents)?;
    info!(
        "{} agent(s), {} minutes: maximum released pressure {answer}",
        config.agents, config.minutes
    );
    Ok(())
}

fn run_scenario(path: &str) -> anyhow::Result<()> {
    let scenario = Scenario::load_from_file(path)?;
    let mut failures = 0;

    for run in &scenario.runs {
        let answer = execute(&run.input, &run.start, run.minutes, run.agents)
            .with_context(|| format!("scenario run {} failed", run.name))?;

        match run.expected {
            Some(expected) if expected != answer => {
                error!("run {}: expected {expected}, got {answer}", run.name);
                failures += 1;
            }
            _ => info!("run {}: {answer}", run.name),
        }
    }

    if failures > 0 {
        bail!("{failures} scenario run(s) did not match their expected answer");
    }
    Ok(())
}

fn execute(input: &str, start: &str, minutes: u32, agents: usize) -> anyhow::Result<usize> {
    let network = Network::from_file(input)?;
    let graph = network.compile(start)?;

    match agents {
        1 => SingleAgent::new(&graph, minutes).solve(),
        2 => DualAgent::new(&graph, minutes).solve(),
        n => bail!("agent count must be 1 or 2, got {n}"),
    }
}
