use std::time::Instant;

use anyhow::{bail, Result};
use tracing::debug;

use crate::common::ValveSet;
use crate::network::SearchGraph;
use crate::search::search;
use crate::stat::Stats;

pub trait Solver {
    fn solve(&mut self) -> Result<usize>;
}

/// One agent opening valves for the full budget. The answer is simply
/// the best value over every opened set the search discovered.
pub struct SingleAgent<'a> {
    graph: &'a SearchGraph,
    minutes: u32,
    stats: Stats,
}

impl<'a> SingleAgent<'a> {
    pub fn new(graph: &'a SearchGraph, minutes: u32) -> Self {
        SingleAgent {
            graph,
            minutes,
            stats: Stats::default(),
        }
    }
}

impl Solver for SingleAgent<'_> {
    fn solve(&mut self) -> Result<usize> {
        if self.minutes == 0 {
            bail!("time budget must be positive");
        }

        let solve_start = Instant::now();
        let results = search(self.graph, self.minutes, &mut self.stats);
        let best = results.values().copied().max().unwrap_or(0);

        self.stats.best = best;
        self.stats.time_us = solve_start.elapsed().as_micros() as usize;
        self.stats.print();
        Ok(best)
    }
}

/// Two agents splitting the valves between them under a shared budget.
///
/// One search run produces the best value per opened set; the combiner
/// then picks the two disjoint sets with the largest value sum, so the
/// agents never claim the same valve.
pub struct DualAgent<'a> {
    graph: &'a SearchGraph,
    minutes: u32,
    stats: Stats,
}

impl<'a> DualAgent<'a> {
    pub fn new(graph: &'a SearchGraph, minutes: u32) -> Self {
        DualAgent {
            graph,
            minutes,
            stats: Stats::default(),
        }
    }
}

impl Solver for DualAgent<'_> {
    fn solve(&mut self) -> Result<usize> {
        if self.minutes == 0 {
            bail!("time budget must be positive");
        }

        let solve_start = Instant::now();
        let results = search(self.graph, self.minutes, &mut self.stats);

        let mut entries: Vec<(ValveSet, usize)> = results.into_iter().collect();
        // Descending by value; the set tiebreak only pins the order down.
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        if entries.len() < 2 {
            bail!(
                "a budget of {} minutes leaves nothing for two agents to split",
                self.minutes
            );
        }

        let best = combine_disjoint(&entries);
        debug!("best disjoint pair sums to {best}");

        self.stats.best = best;
        self.stats.time_us = solve_start.elapsed().as_micros() as usize;
        self.stats.print();
        Ok(best)
    }
}

/// Best value sum over pairs of disjoint opened sets. `entries` must be
/// sorted by value descending.
///
/// Once the two largest values still in play cannot beat the running
/// best, no later pair can either, which is what both early exits rely
/// on.
fn combine_disjoint(entries: &[(ValveSet, usize)]) -> usize {
    debug_assert!(entries.windows(2).all(|w| w[0].1 >= w[1].1));

    let mut best = 0;
    for i in 0..entries.len().saturating_sub(1) {
        if entries[i].1 + entries[i + 1].1 <= best {
            break;
        }
        for j in i + 1..entries.len() {
            let sum = entries[i].1 + entries[j].1;
            if sum <= best {
                break;
            }
            if entries[i].0.is_disjoint(&entries[j].0) {
                best = sum;
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::Network;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    // Helper function to setup tracing
    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("debug")
            .try_init();
    }

    fn example_graph() -> SearchGraph {
        Network::from_file("data/example.txt")
            .unwrap()
            .compile("AA")
            .unwrap()
    }

    #[test]
    fn test_example_single_agent() {
        init_tracing();
        let graph = example_graph();
        let answer = SingleAgent::new(&graph, 30).solve().unwrap();
        assert_eq!(answer, 1651);
    }

    #[test]
    fn test_example_dual_agent() {
        init_tracing();
        let graph = example_graph();
        let answer = DualAgent::new(&graph, 26).solve().unwrap();
        assert_eq!(answer, 1707);
    }

    #[test]
    fn test_zero_budget_is_rejected() {
        let graph = example_graph();
        assert!(SingleAgent::new(&graph, 0).solve().is_err());
        assert!(DualAgent::new(&graph, 0).solve().is_err());
    }

    #[test]
    fn test_single_valve_budget() {
        let network =
            Network::from_text("Valve AA has flow rate=7; tunnel leads to valve AA").unwrap();
        let graph = network.compile("AA").unwrap();

        assert_eq!(SingleAgent::new(&graph, 10).solve().unwrap(), 63);
        // One minute only buys the opening itself.
        assert_eq!(SingleAgent::new(&graph, 1).solve().unwrap(), 0);
    }

    #[test]
    fn test_dual_agent_budget_too_small() {
        // With one minute nobody can even reach BB, so the search only
        // yields the empty set and the combiner has nothing to pair.
        let text = "Valve AA has flow rate=0; tunnel leads to valve BB\n\
                    Valve BB has flow rate=13; tunnel leads to valve AA";
        let network = Network::from_text(text).unwrap();
        let graph = network.compile("AA").unwrap();
        assert!(DualAgent::new(&graph, 1).solve().is_err());
    }

    #[test]
    fn test_combiner_pairs_are_disjoint() {
        let a = ValveSet::EMPTY.with(0).with(1);
        let b = ValveSet::EMPTY.with(0).with(2);
        let c = ValveSet::EMPTY.with(3);

        // a+b would be the largest sum but they share valve 0.
        let entries = vec![(a, 100), (b, 90), (c, 50)];
        assert_eq!(combine_disjoint(&entries), 150);
    }

    #[test]
    fn test_combiner_accepts_empty_set_partner() {
        // A lone productive set pairs with the empty set; one agent
        // simply does nothing.
        let entries = vec![(ValveSet::EMPTY.with(0), 42), (ValveSet::EMPTY, 0)];
        assert_eq!(combine_disjoint(&entries), 42);
    }

    /// Every pair, no pruning. Ground truth for the combiner.
    fn brute_force_pairs(entries: &[(ValveSet, usize)]) -> usize {
        let mut best = 0;
        for i in 0..entries.len() {
            for j in i + 1..entries.len() {
                if entries[i].0.is_disjoint(&entries[j].0) {
                    best = best.max(entries[i].1 + entries[j].1);
                }
            }
        }
        best
    }

    #[test]
    fn test_combiner_matches_brute_force_on_random_networks() {
        let mut rng = StdRng::seed_from_u64(1707);
        for _ in 0..20 {
            let valves = rng.gen_range(4..=8);
            let name = |i: usize| format!("V{i:02}");
            let mut lines = Vec::new();
            for i in 0..valves {
                let mut tunnels = Vec::new();
                if i > 0 {
                    tunnels.push(name(i - 1));
                }
                if i + 1 < valves {
                    tunnels.push(name(i + 1));
                }
                if tunnels.is_empty() {
                    tunnels.push(name(i));
                }
                let flow = rng.gen_range(0..=15);
                lines.push(format!(
                    "Valve {} has flow rate={flow}; tunnels lead to valves {}",
                    name(i),
                    tunnels.join(", ")
                ));
            }
            let network = Network::from_text(&lines.join("\n")).unwrap();
            let graph = network.compile("V00").unwrap();

            let results = search(&graph, 10, &mut Stats::default());
            let mut entries: Vec<(ValveSet, usize)> = results.into_iter().collect();
            entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            if entries.len() < 2 {
                continue;
            }

            assert_eq!(combine_disjoint(&entries), brute_force_pairs(&entries));
        }
    }
}
