use std::collections::{HashMap, VecDeque};
use std::fs;

use anyhow::{anyhow, bail, Context, Result};
use tracing::{debug, warn};

use crate::common::VALVE_SET_CAPACITY;

/// One valve as it appears in the input: a name, a flow rate and the
/// tunnels leading away from it. Immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Valve {
    pub name: String,
    pub flow: usize,
    pub tunnels: Vec<String>,
}

/// The full tunnel network, with tunnel targets resolved to indices.
#[derive(Debug, Clone)]
pub struct Network {
    valves: Vec<Valve>,
    index: HashMap<String, usize>,
    adjacency: Vec<Vec<usize>>,
}

/// Compacted view of the network the search engine runs on.
///
/// Only valves worth opening (flow > 0) get an index; everything else in
/// the network exists solely to route the precomputed distances. Index
/// positions double as bit positions in a `ValveSet`.
#[derive(Debug, Clone)]
pub struct SearchGraph {
    names: Vec<String>,
    flows: Vec<usize>,
    /// Row the search starts from. Equals the start valve's own index if
    /// it is openable, otherwise the extra trailing row.
    start_row: usize,
    /// dist[row][col]: shortest hop count. Rows cover every openable
    /// valve plus (possibly) the start; columns cover openable valves.
    dist: Vec<Vec<u32>>,
}

impl Network {
    pub fn from_file(path: &str) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read network file {path}"))?;
        Self::from_text(&text)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let valves = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(parse_line)
            .collect::<Result<Vec<_>>>()?;

        if valves.is_empty() {
            bail!("network is empty");
        }

        let mut index = HashMap::new();
        for (i, valve) in valves.iter().enumerate() {
            if index.insert(valve.name.clone(), i).is_some() {
                bail!("duplicate valve {}", valve.name);
            }
        }

        // Resolve tunnel targets up front so a dangling reference fails
        // here instead of deep inside the distance build.
        let mut adjacency = Vec::with_capacity(valves.len());
        for valve in &valves {
            let mut neighbors = Vec::with_capacity(valve.tunnels.len());
            for target in &valve.tunnels {
                let target_index = index.get(target).ok_or_else(|| {
                    anyhow!("valve {} leads to unknown valve {target}", valve.name)
                })?;
                neighbors.push(*target_index);
            }
            adjacency.push(neighbors);
        }

        Ok(Network {
            valves,
            index,
            adjacency,
        })
    }

    pub fn len(&self) -> usize {
        self.valves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.valves.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Valve> {
        self.index.get(name).map(|&i| &self.valves[i])
    }

    /// Build the compacted graph the search consumes: openable valves,
    /// the start row, and the all-pairs shortest-distance table.
    pub fn compile(&self, start: &str) -> Result<SearchGraph> {
        let start_index = *self
            .index
            .get(start)
            .ok_or_else(|| anyhow!("start valve {start} not found in network"))?;

        let openable: Vec<usize> = (0..self.valves.len())
            .filter(|&i| self.valves[i].flow > 0)
            .collect();

        if openable.len() > VALVE_SET_CAPACITY {
            bail!(
                "{} openable valves exceed the supported maximum of {VALVE_SET_CAPACITY}",
                openable.len()
            );
        }
        if openable.len() > 20 {
            warn!(
                "{} openable valves; state space is exponential and this may not finish",
                openable.len()
            );
        }

        // Openable valves come first so a column index is also its own
        // row index; the start only needs a row of its own when it has
        // zero flow.
        let mut sources = openable.clone();
        let start_row = match openable.iter().position(|&i| i == start_index) {
            Some(position) => position,
            None => {
                sources.push(start_index);
                sources.len() - 1
            }
        };

        let mut dist = Vec::with_capacity(sources.len());
        for &source in &sources {
            let reached = self.bfs(source);
            let mut row = Vec::with_capacity(openable.len());
            for &target in &openable {
                match reached[target] {
                    Some(d) => row.push(d),
                    None => bail!(
                        "valve {} is unreachable from {}",
                        self.valves[target].name,
                        self.valves[source].name
                    ),
                }
            }
            dist.push(row);
        }

        debug!(
            "compiled graph: {} openable valves, {} distance rows",
            openable.len(),
            dist.len()
        );

        Ok(SearchGraph {
            names: openable
                .iter()
                .map(|&i| self.valves[i].name.clone())
                .collect(),
            flows: openable.iter().map(|&i| self.valves[i].flow).collect(),
            start_row,
            dist,
        })
    }

    /// Breadth-first hop counts from `source` over the whole network.
    /// First dequeue of a valve fixes its distance (uniform edge cost).
    fn bfs(&self, source: usize) -> Vec<Option<u32>> {
        let mut dist = vec![None; self.valves.len()];
        let mut queue = VecDeque::new();

        dist[source] = Some(0);
        queue.push_back((source, 0u32));

        while let Some((current, d)) = queue.pop_front() {
            for &next in &self.adjacency[current] {
                if dist[next].is_none() {
                    dist[next] = Some(d + 1);
                    queue.push_back((next, d + 1));
                }
            }
        }

        dist
    }
}

impl SearchGraph {
    /// Number of openable valves (and width of the valve bitset).
    pub fn openable(&self) -> usize {
        self.flows.len()
    }

    pub fn flow(&self, valve: usize) -> usize {
        self.flows[valve]
    }

    pub fn name(&self, valve: usize) -> &str {
        &self.names[valve]
    }

    pub fn start_row(&self) -> usize {
        self.start_row
    }

    /// Hop count from a distance-table row to an openable valve.
    pub fn distance(&self, from_row: usize, to: usize) -> u32 {
        self.dist[from_row][to]
    }
}

fn parse_line(line: &str) -> Result<Valve> {
    let rest = line
        .strip_prefix("Valve ")
        .ok_or_else(|| anyhow!("malformed valve line: {line}"))?;
    let (name, rest) = rest
        .split_once(" has flow rate=")
        .ok_or_else(|| anyhow!("missing flow rate: {line}"))?;
    let (flow, rest) = rest
        .split_once("; ")
        .ok_or_else(|| anyhow!("missing tunnel list: {line}"))?;
    let flow = flow
        .parse()
        .with_context(|| format!("bad flow rate in line: {line}"))?;

    // Singular and plural phrasing both occur in the input.
    let targets = rest
        .strip_prefix("tunnels lead to valves ")
        .or_else(|| rest.strip_prefix("tunnel leads to valve "))
        .ok_or_else(|| anyhow!("missing tunnel list: {line}"))?;

    Ok(Valve {
        name: name.to_string(),
        flow,
        tunnels: targets.split(", ").map(str::to_string).collect(),
    })
}
