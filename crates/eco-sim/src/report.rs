use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// End-of-run counts, printed by `ecosim run` as text or JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub steps: u64,
    pub time_seconds: f64,
    pub births: u64,
    pub deaths: u64,
    /// Living creatures per species, including species that died out.
    pub population: BTreeMap<String, usize>,
    /// Remaining items per food tag.
    pub food: BTreeMap<String, usize>,
    /// Living creatures per state name.
    pub states: BTreeMap<String, usize>,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "seed {} | {} steps | {:.1}s simulated",
            self.seed, self.steps, self.time_seconds
        )?;
        writeln!(f, "births: {}  deaths: {}", self.births, self.deaths)?;
        writeln!(f, "population:")?;
        for (species, count) in &self.population {
            writeln!(f, "  {species:<12} {count}")?;
        }
        writeln!(f, "food:")?;
        for (tag, count) in &self.food {
            writeln!(f, "  {tag:<12} {count}")?;
        }
        writeln!(f, "states:")?;
        for (state, count) in &self.states {
            writeln!(f, "  {state:<16} {count}")?;
        }
        Ok(())
    }
}
