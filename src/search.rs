use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use crate::common::{SearchState, ValveSet};
use crate::network::SearchGraph;
use crate::stat::Stats;

/// Dominance table over state keys.
///
/// A state reaching the same (position, time left, opened set) as an
/// earlier one with no more pressure released can never lead to a better
/// final answer: everything still possible depends only on the key.
/// Built fresh per search invocation, never shared between runs.
#[derive(Debug, Default)]
pub struct BestStateTable {
    entries: HashMap<(usize, u32, ValveSet), usize>,
}

impl BestStateTable {
    pub fn new() -> Self {
        BestStateTable {
            entries: HashMap::new(),
        }
    }

    /// Store `value` under `key` and report true iff the key was absent
    /// or strictly improved. Equal re-derivations are rejected.
    pub fn record(&mut self, key: (usize, u32, ValveSet), value: usize) -> bool {
        match self.entries.get_mut(&key) {
            Some(best) => {
                if value > *best {
                    *best = value;
                    true
                } else {
                    false
                }
            }
            None => {
                self.entries.insert(key, value);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Explore every undominated way of opening valves within `budget`
/// minutes, returning for each opened set the most pressure any state
/// sharing that set released.
///
/// The map is the input of the two-agent combiner; its maximum value is
/// the single-agent answer. An explicit worklist stands in for the call
/// stack so deep branching cannot overflow it.
#[instrument(skip_all, fields(budget = budget), level = "debug")]
pub fn search(graph: &SearchGraph, budget: u32, stats: &mut Stats) -> HashMap<ValveSet, usize> {
    let mut best_states = BestStateTable::new();
    let mut results: HashMap<ValveSet, usize> = HashMap::new();
    let mut worklist = vec![SearchState {
        at: graph.start_row(),
        time_left: budget,
        opened: ValveSet::EMPTY,
        released: 0,
    }];

    while let Some(state) = worklist.pop() {
        trace!("expand state: {state:?}");
        stats.expanded_states += 1;
        debug_assert!(state.opened.within(graph.openable()));

        // Every popped state feeds the per-set output, not just terminal
        // ones: time left over after the last action is never spent, so
        // the best value for a set can come from an interior state.
        let entry = results.entry(state.opened).or_insert(0);
        if state.released > *entry {
            *entry = state.released;
        }

        // Spend one minute opening the valve here. The start row is only
        // openable when the start valve itself has flow.
        if state.time_left >= 1 && state.at < graph.openable() && !state.opened.contains(state.at)
        {
            let time_left = state.time_left - 1;
            let next = SearchState {
                at: state.at,
                time_left,
                opened: state.opened.with(state.at),
                released: state.released + time_left as usize * graph.flow(state.at),
            };
            if best_states.record(next.key(), next.released) {
                worklist.push(next);
            } else {
                stats.pruned_states += 1;
            }
        }

        // Travel to some other closed valve. Strict inequality keeps at
        // least one minute to open it on arrival.
        for target in 0..graph.openable() {
            if target == state.at || state.opened.contains(target) {
                continue;
            }
            let distance = graph.distance(state.at, target);
            if distance >= state.time_left {
                continue;
            }
            let next = SearchState {
                at: target,
                time_left: state.time_left - distance,
                opened: state.opened,
                released: state.released,
            };
            if best_states.record(next.key(), next.released) {
                worklist.push(next);
            } else {
                stats.pruned_states += 1;
            }
        }
    }

    stats.best_state_entries = best_states.len();
    stats.distinct_sets = results.len();
    debug!(
        "search done: {} states expanded, {} pruned, {} distinct opened sets",
        stats.expanded_states, stats.pruned_states, stats.distinct_sets
    );

    results
}
