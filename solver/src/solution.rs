use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::graph::{Player, VertexId};

/// Winning player of each vertex. A vertex with no entry is not decided.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RegionMap(BTreeMap<VertexId, Player>);

impl RegionMap {
    pub fn get(&self, v: VertexId) -> Option<Player> {
        self.0.get(&v).copied()
    }

    /// Once decided a vertex stays decided, this can only move it to another player.
    pub fn set(&mut self, v: VertexId, player: Player) {
        self.0.insert(v, player);
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, Player)> + '_ {
        self.0.iter().map(|(&v, &p)| (v, p))
    }

    pub fn region(&self, player: Player) -> impl Iterator<Item = VertexId> + '_ {
        self.iter().filter(move |&(_, p)| p == player).map(|(v, _)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Positional strategy: the successor chosen at each vertex that has one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StrategyMap(BTreeMap<VertexId, VertexId>);

impl StrategyMap {
    pub fn get(&self, v: VertexId) -> Option<VertexId> {
        self.0.get(&v).copied()
    }

    pub fn set(&mut self, v: VertexId, successor: VertexId) {
        self.0.insert(v, successor);
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.0.iter().map(|(&v, &w)| (v, w))
    }

    pub fn retain(&mut self, mut f: impl FnMut(VertexId, VertexId) -> bool) {
        self.0.retain(|&v, &mut w| f(v, w));
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValueMap<T>(BTreeMap<VertexId, T>);

impl<T> Default for ValueMap<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> ValueMap<T> {
    pub fn get(&self, v: VertexId) -> Option<&T> {
        self.0.get(&v)
    }

    pub fn set(&mut self, v: VertexId, value: T) {
        self.0.insert(v, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &T)> + '_ {
        self.0.iter().map(|(&v, t)| (v, t))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Named counters a solver reports about a run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Statistics(BTreeMap<&'static str, u64>);

impl Statistics {
    pub fn get(&self, name: &str) -> Option<u64> {
        self.0.get(name).copied()
    }

    pub fn set(&mut self, name: &'static str, value: u64) {
        self.0.insert(name, value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        self.0.iter().map(|(&k, &v)| (k, v))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

pub trait Regions {
    fn regions(&self) -> &RegionMap;
    fn regions_mut(&mut self) -> &mut RegionMap;

    fn winner(&self, v: VertexId) -> Option<Player> {
        self.regions().get(v)
    }

    fn is_won_by(&self, v: VertexId, player: Player) -> bool {
        self.winner(v) == Some(player)
    }

    fn set_winner(&mut self, v: VertexId, player: Player) {
        self.regions_mut().set(v, player);
    }
}

pub trait Strategies {
    fn strategies(&self) -> &StrategyMap;
    fn strategies_mut(&mut self) -> &mut StrategyMap;

    fn strategy(&self, v: VertexId) -> Option<VertexId> {
        self.strategies().get(v)
    }

    fn set_strategy(&mut self, v: VertexId, successor: VertexId) {
        self.strategies_mut().set(v, successor);
    }
}

pub trait Values {
    type Value;

    fn values(&self) -> &ValueMap<Self::Value>;
    fn values_mut(&mut self) -> &mut ValueMap<Self::Value>;

    fn value(&self, v: VertexId) -> Option<&Self::Value> {
        self.values().get(v)
    }

    fn set_value(&mut self, v: VertexId, value: Self::Value) {
        self.values_mut().set(v, value);
    }
}

/// Winning regions and positional strategies.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RsSolution {
    #[serde(rename = "winning_regions")]
    pub regions: RegionMap,
    #[serde(rename = "strategy")]
    pub strategies: StrategyMap,
    #[serde(skip_serializing_if = "Statistics::is_empty")]
    pub statistics: Statistics,
}

impl RsSolution {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Winning regions, positional strategies and a quantitative value per vertex.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RsqSolution<T> {
    #[serde(rename = "winning_regions")]
    pub regions: RegionMap,
    #[serde(rename = "strategy")]
    pub strategies: StrategyMap,
    pub values: ValueMap<T>,
    #[serde(skip_serializing_if = "Statistics::is_empty")]
    pub statistics: Statistics,
}

impl<T> Default for RsqSolution<T> {
    fn default() -> Self {
        Self {
            regions: RegionMap::default(),
            strategies: StrategyMap::default(),
            values: ValueMap::default(),
            statistics: Statistics::default(),
        }
    }
}

impl<T> RsqSolution<T> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T> From<RsSolution> for RsqSolution<T> {
    fn from(solution: RsSolution) -> Self {
        let RsSolution { regions, strategies, statistics } = solution;
        Self { regions, strategies, values: ValueMap::default(), statistics }
    }
}

macro_rules! impl_capabilities {
    ($ty:ty $(, $gen:ident)?) => {
        impl$(<$gen>)? Regions for $ty {
            fn regions(&self) -> &RegionMap {
                &self.regions
            }

            fn regions_mut(&mut self) -> &mut RegionMap {
                &mut self.regions
            }
        }

        impl$(<$gen>)? Strategies for $ty {
            fn strategies(&self) -> &StrategyMap {
                &self.strategies
            }

            fn strategies_mut(&mut self) -> &mut StrategyMap {
                &mut self.strategies
            }
        }
    };
}

impl_capabilities!(RsSolution);
impl_capabilities!(RsqSolution<T>, T);

impl<T> Values for RsqSolution<T> {
    type Value = T;

    fn values(&self) -> &ValueMap<T> {
        &self.values
    }

    fn values_mut(&mut self) -> &mut ValueMap<T> {
        &mut self.values
    }
}

fn write_map<K: fmt::Display, V: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    label: &str,
    entries: impl Iterator<Item = (K, V)>,
) -> fmt::Result {
    write!(f, "{label}: {{")?;
    for (i, (k, v)) in entries.enumerate() {
        if i != 0 {
            write!(f, ",")?;
        }
        write!(f, "{k}:{v}")?;
    }
    write!(f, "}}")
}

impl fmt::Display for RsSolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_map(f, "Winning regions", self.regions.iter())?;
        writeln!(f)?;
        write_map(f, "Strategy", self.strategies.iter())
    }
}

impl<T: fmt::Display> fmt::Display for RsqSolution<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_map(f, "Winning regions", self.regions.iter())?;
        writeln!(f)?;
        write_map(f, "Strategy", self.strategies.iter())?;
        writeln!(f)?;
        write_map(f, "Values", self.values.iter())
    }
}
