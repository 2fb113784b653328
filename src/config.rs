use anyhow::bail;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "valvenet",
    about = "Time-bounded value-maximizing search over a valve network.",
    version = "1.0"
)]
pub struct Cli {
    #[arg(
        long,
        help = "Path to the valve network description",
        default_value = "data/example.txt"
    )]
    pub input: String,

    #[arg(
        long,
        help = "Path to a YAML scenario file; overrides the single-run flags"
    )]
    pub scenario: Option<String>,

    #[arg(long, help = "Valve the search starts from", default_value = "AA")]
    pub start: String,

    #[arg(long, help = "Time budget in minutes", default_value_t = 30)]
    pub minutes: u32,

    #[arg(long, help = "Number of cooperating agents (1 or 2)", default_value_t = 1)]
    pub agents: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub input: String,
    pub start: String,
    pub minutes: u32,
    pub agents: usize,
}

impl Config {
    pub fn new(cli: &Cli) -> Self {
        Self {
            input: cli.input.clone(),
            start: cli.start.clone(),
            minutes: cli.minutes,
            agents: cli.agents,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.minutes == 0 {
            bail!("time budget must be positive, got 0");
        }

        if !(1..=2).contains(&self.agents) {
            bail!("agent count must be 1 or 2, got {}", self.agents);
        }

        Ok(())
    }
}
