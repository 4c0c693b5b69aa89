use std::collections::BTreeMap;

use eco_agent::{
    Animator, ConfigError, Creature, CreatureStats, Effect, Gender, Lifecycle, SpeciesProfile,
    SpeciesTree, SpeciesTreeBuilder, Tuning,
};
use eco_core::rng::derive_seed;
use eco_core::{BlackboardConfig, SplitMix64, TickContext};
use eco_nav::NavWorldMut;

use crate::world::Birth;
use crate::{RunSummary, SandboxWorld, ScenarioConfig, ScenarioError};

const PLACEMENT_STREAM: u64 = 0x9_1ACE;

struct Agent {
    creature: Creature<u64>,
    tree: SpeciesTree<SandboxWorld>,
}

#[derive(Debug, Clone)]
struct Species {
    profile: SpeciesProfile,
    tuning: Tuning,
    blackboard: BlackboardConfig,
}

/// Fixed-step driver: one [`Creature`] and species tree per living creature.
pub struct Simulation {
    config: ScenarioConfig,
    world: SandboxWorld,
    agents: BTreeMap<u64, Agent>,
    species: BTreeMap<String, Species>,
    ctx: TickContext,
    rng: SplitMix64,
    regrowth: Vec<f32>,
    births: u64,
    deaths: u64,
}

impl Simulation {
    /// Validate `config`, scatter its food and creatures, and stand at tick 0.
    ///
    /// Initial creatures alternate female and male within each group.
    pub fn new(config: ScenarioConfig) -> Result<Self, ScenarioError> {
        config.validate()?;

        let world = SandboxWorld::new(config.world.clone(), config.water.clone());
        let species = config
            .species
            .iter()
            .map(|g| {
                let setup = Species {
                    profile: g.profile.clone(),
                    tuning: g.tuning,
                    blackboard: g.blackboard,
                };
                (g.profile.name.clone(), setup)
            })
            .collect();

        let mut sim = Self {
            ctx: TickContext::fixed(0, config.dt_seconds, config.seed),
            rng: SplitMix64::new(derive_seed(config.seed, 0, PLACEMENT_STREAM)),
            regrowth: vec![0.0; config.food.len()],
            config,
            world,
            agents: BTreeMap::new(),
            species,
            births: 0,
            deaths: 0,
        };

        for food in sim.config.food.clone() {
            for _ in 0..food.initial {
                let at = sim.world.random_point(&mut sim.rng);
                sim.world.add_food(&food.tag, at);
            }
        }

        for group in sim.config.species.clone() {
            let name = group.profile.name;
            for i in 0..group.count {
                let gender = if i % 2 == 0 { Gender::Female } else { Gender::Male };
                let at = sim.world.random_point(&mut sim.rng);
                let id = sim.world.add_creature(&name, at);
                sim.admit(id, &name, group.stats.with_gender(gender), false)
                    .map_err(|source| ScenarioError::Species {
                        species: name.clone(),
                        source,
                    })?;
            }
        }

        tracing::info!(
            seed = sim.config.seed,
            creatures = sim.agents.len(),
            "simulation ready"
        );
        Ok(sim)
    }

    fn admit(
        &mut self,
        id: u64,
        species: &str,
        stats: CreatureStats,
        newborn: bool,
    ) -> Result<(), ConfigError> {
        let Some(setup) = self.species.get(species) else {
            // Bodies are only ever created for configured species.
            return Ok(());
        };
        let mut creature =
            Creature::new(id, species, stats, setup.tuning, &self.world, self.config.seed)?;
        if newborn {
            creature = creature.with_child();
            self.world.set_scale(id, creature.vitals().scale);
        }
        let tree = SpeciesTreeBuilder::new(setup.profile.clone())
            .blackboard(setup.blackboard)
            .build();
        self.world.sync(id, creature.snapshot());
        self.agents.insert(id, Agent { creature, tree });
        Ok(())
    }

    /// Advance every creature by one fixed step, in ascending id order.
    pub fn step(&mut self) {
        let ctx = self.ctx;
        let ids: Vec<u64> = self.agents.keys().copied().collect();

        for id in ids {
            let Some(mut agent) = self.agents.remove(&id) else {
                continue;
            };
            let was_dead = agent.creature.is_dead();

            agent.creature.update(&ctx, &mut self.world);
            if !agent.creature.destroy_requested() {
                agent.tree.tick(&ctx, &mut agent.creature, &mut self.world);
            }
            if !was_dead && agent.creature.is_dead() {
                self.deaths += 1;
            }

            if !agent.creature.destroy_requested() {
                self.world.sync(id, agent.creature.snapshot());
                self.agents.insert(id, agent);
            }
            self.apply_effects();
        }

        for birth in self.world.take_births() {
            self.admit_birth(birth);
        }
        self.world.integrate(ctx.dt_seconds);
        self.regrow_food(ctx.dt_seconds);
        self.ctx = ctx.next();
    }

    /// Run `steps` more steps and summarize.
    pub fn run(&mut self, steps: u64) -> RunSummary {
        for _ in 0..steps {
            self.step();
        }
        let summary = self.summary();
        tracing::info!(
            steps = summary.steps,
            births = summary.births,
            deaths = summary.deaths,
            "simulation finished"
        );
        summary
    }

    fn apply_effects(&mut self) {
        for effect in self.world.take_effects() {
            match effect {
                Effect::Damage { target, amount } => {
                    if let Some(agent) = self.agents.get_mut(&target) {
                        agent.creature.take_damage(amount);
                        self.world.sync(target, agent.creature.snapshot());
                    }
                }
                Effect::MarkMated { target } => {
                    if let Some(agent) = self.agents.get_mut(&target) {
                        agent.creature.mark_mated();
                        self.world.sync(target, agent.creature.snapshot());
                    }
                }
                Effect::Face { target, toward } => self.world.look_at(target, toward),
            }
        }
    }

    fn admit_birth(&mut self, birth: Birth) {
        match self.admit(birth.child, &birth.species, birth.stats, true) {
            Ok(()) => self.births += 1,
            Err(err) => {
                tracing::warn!(
                    child = birth.child,
                    parent = birth.parent,
                    error = %err,
                    "offspring rejected"
                );
                self.world.destroy(birth.child);
            }
        }
    }

    fn regrow_food(&mut self, dt: f32) {
        for (i, food) in self.config.food.iter().enumerate() {
            if food.regrow_seconds <= 0.0 {
                continue;
            }
            self.regrowth[i] += dt;
            while self.regrowth[i] >= food.regrow_seconds {
                self.regrowth[i] -= food.regrow_seconds;
                if self.world.count_tag(&food.tag) < food.max {
                    let at = self.world.random_point(&mut self.rng);
                    self.world.add_food(&food.tag, at);
                }
            }
        }
    }

    pub fn summary(&self) -> RunSummary {
        let mut population: BTreeMap<String, usize> =
            self.species.keys().map(|name| (name.clone(), 0)).collect();
        let mut states = BTreeMap::new();
        for agent in self.agents.values().filter(|a| !a.creature.is_dead()) {
            *population
                .entry(agent.creature.species().to_owned())
                .or_default() += 1;
            *states
                .entry(agent.creature.state().as_str().to_owned())
                .or_default() += 1;
        }
        let food = self
            .config
            .food
            .iter()
            .map(|f| (f.tag.clone(), self.world.count_tag(&f.tag)))
            .collect();

        RunSummary {
            seed: self.config.seed,
            steps: self.ctx.tick,
            time_seconds: self.ctx.time_seconds,
            births: self.births,
            deaths: self.deaths,
            population,
            food,
            states,
        }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    pub fn world(&self) -> &SandboxWorld {
        &self.world
    }

    pub fn tick(&self) -> u64 {
        self.ctx.tick
    }

    pub fn creature(&self, id: u64) -> Option<&Creature<u64>> {
        self.agents.get(&id).map(|a| &a.creature)
    }

    /// Ids of creatures still held by the simulation, dead ones included until destroyed.
    pub fn creature_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.agents.keys().copied()
    }
}
