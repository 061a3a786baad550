use crate::battle::{BattleOutcome, BattleState};
use crate::cell::Cell;
use crate::config::SimConfig;
use crate::entity::{draw_name, Entity, EntityKind, MobId, Occupant, Plant, PlantId};
use crate::error::ConfigError;
use crate::events::EventLog;
use crate::gene::{genome_to_string, Gene};
use crate::grid::{Grid, Point};
use crate::mob::{Action, Mob};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Why an entity left the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
    OldAge,
    Starvation,
    Combat,
    Eaten,
}

/// Running totals since the world was created
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldStats {
    pub ticks: u64,
    pub plant_births: u64,
    pub mob_births: u64,
    pub plant_deaths: u64,
    pub mob_deaths: u64,
    pub battles: u64,
}

/// Bounded, non-wrapping grid world of plants and mobs
pub struct World {
    config: SimConfig,

    /// Outer grid; each cell lists who stands on it
    grid: Grid<Cell>,

    /// Live entities keyed by id. Ids grow monotonically, so iteration follows creation order.
    plants: BTreeMap<PlantId, Plant>,
    mobs: BTreeMap<MobId, Mob>,

    next_id: u64,

    /// Single random source for every choice the simulation makes
    rng: ChaCha8Rng,
    seed: u64,

    pub stats: WorldStats,
    events: EventLog,
}

impl World {
    /// Validate `config` and build an empty world seeded with `seed`
    pub fn new(config: SimConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height, |_| Cell::new());

        tracing::debug!(
            width = config.width,
            height = config.height,
            seed,
            "world created"
        );

        Ok(Self {
            config,
            grid,
            plants: BTreeMap::new(),
            mobs: BTreeMap::new(),
            next_id: 0,
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            stats: WorldStats::default(),
            events: EventLog::new(),
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Get world dimensions
    pub fn dimensions(&self) -> (usize, usize) {
        (self.grid.width(), self.grid.height())
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    /// Cell at `point`. Panics when out of bounds.
    pub fn cell(&self, point: Point) -> &Cell {
        self.grid.at(point)
    }

    /// Every cell with its coordinate, row-major
    pub fn cells(&self) -> impl Iterator<Item = (Point, &Cell)> + '_ {
        self.grid.iter()
    }

    pub fn plants(&self) -> impl Iterator<Item = &Plant> + '_ {
        self.plants.values()
    }

    pub fn mobs(&self) -> impl Iterator<Item = &Mob> + '_ {
        self.mobs.values()
    }

    pub fn plant(&self, id: PlantId) -> Option<&Plant> {
        self.plants.get(&id)
    }

    pub fn plant_mut(&mut self, id: PlantId) -> Option<&mut Plant> {
        self.plants.get_mut(&id)
    }

    pub fn mob(&self, id: MobId) -> Option<&Mob> {
        self.mobs.get(&id)
    }

    /// Direct access for drivers and tests. Moving a mob must go through `move_mob`.
    pub fn mob_mut(&mut self, id: MobId) -> Option<&mut Mob> {
        self.mobs.get_mut(&id)
    }

    pub fn plant_count(&self) -> usize {
        self.plants.len()
    }

    pub fn mob_count(&self) -> usize {
        self.mobs.len()
    }

    /// Most recent events, oldest first
    pub fn recent_events(&self, count: usize) -> Vec<String> {
        self.events.recent(count)
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seed `count` entities of `kind` at uniformly random cells.
    /// Each placement draws x, then y, then the entity's own creation draws.
    pub fn populate(&mut self, kind: EntityKind, count: usize) {
        for _ in 0..count {
            let x = self.rng.gen_range(0..self.grid.width()) as i32;
            let y = self.rng.gen_range(0..self.grid.height()) as i32;
            let point = Point::new(x, y);
            match kind {
                EntityKind::Plant => {
                    self.spawn_plant(point);
                }
                EntityKind::Mob => {
                    self.spawn_mob(point);
                }
            }
        }
        tracing::debug!(?kind, count, "populated");
    }

    /// Place a new plant with a freshly drawn name
    pub fn spawn_plant(&mut self, point: Point) -> PlantId {
        let name = draw_name(EntityKind::Plant, &mut self.rng);
        self.insert_plant(point, name)
    }

    fn insert_plant(&mut self, point: Point, name: char) -> PlantId {
        let id = PlantId(self.allocate_id());
        let plant = Plant::new(id, point, self.config.plant_initial_resources, name);
        self.grid.at_mut(point).insert(Occupant::Plant(id));
        self.plants.insert(id, plant);
        self.stats.plant_births += 1;
        id
    }

    /// Place a new mob with a random genome
    pub fn spawn_mob(&mut self, point: Point) -> MobId {
        let id = MobId(self.allocate_id());
        let mob = Mob::spawn(id, point, &self.config, &mut self.rng);
        self.insert_mob(mob)
    }

    /// Place a new mob built from a given genome (no mutation)
    pub fn spawn_mob_with_genome(&mut self, point: Point, genome: Vec<Gene>) -> MobId {
        let id = MobId(self.allocate_id());
        let name = draw_name(EntityKind::Mob, &mut self.rng);
        let mob = Mob::new(id, point, genome, name, &self.config);
        self.insert_mob(mob)
    }

    fn insert_mob(&mut self, mob: Mob) -> MobId {
        let id = mob.id;
        self.grid.at_mut(mob.state.position).insert(Occupant::Mob(id));
        self.mobs.insert(id, mob);
        self.stats.mob_births += 1;
        id
    }

    fn live_mob_mut(&mut self, id: MobId) -> &mut Mob {
        self.mobs
            .get_mut(&id)
            .unwrap_or_else(|| panic!("{} is dead or unknown", id))
    }

    /// Move a mob to `to`, updating both cells in one step
    pub fn move_mob(&mut self, id: MobId, to: Point) {
        let from = self.live_mob_mut(id).state.position;
        assert!(self.grid.in_bounds(to), "move target out of bounds");

        self.grid.at_mut(from).remove(Occupant::Mob(id));
        self.grid.at_mut(to).insert(Occupant::Mob(id));
        self.live_mob_mut(id).state.position = to;
    }

    /// Remove a plant from the world and its cell
    pub fn kill_plant(&mut self, id: PlantId, cause: DeathCause) -> Option<Plant> {
        let mut plant = self.plants.remove(&id)?;
        plant.state.alive = false;
        self.grid.at_mut(plant.state.position).remove(Occupant::Plant(id));
        self.stats.plant_deaths += 1;
        tracing::debug!(%id, ?cause, "plant died");
        Some(plant)
    }

    /// Remove a mob from the world and its cell. Children lose their parent link,
    /// and the parent stops listing this mob as a child.
    pub fn kill_mob(&mut self, id: MobId, cause: DeathCause) -> Option<Mob> {
        let mut mob = self.mobs.remove(&id)?;
        mob.state.alive = false;
        self.grid.at_mut(mob.state.position).remove(Occupant::Mob(id));

        for child in mob.children.drain(..) {
            if let Some(child) = self.mobs.get_mut(&child) {
                child.parent = None;
            }
        }
        if let Some(parent) = mob.parent.take() {
            if let Some(parent) = self.mobs.get_mut(&parent) {
                parent.children.retain(|&c| c != id);
            }
        }

        self.stats.mob_deaths += 1;
        self.events.log(format!(
            "[DEATH] {} '{}' at ({},{}) {:?} age:{} kills:{}",
            id,
            mob.state.name,
            mob.state.position.x,
            mob.state.position.y,
            cause,
            mob.state.age,
            mob.kills
        ));
        Some(mob)
    }

    /// Execute one tick: plants, then mob movement, then encounters
    pub fn advance_tick(&mut self) {
        let mobs_before = self.mobs.len();

        self.step_plants();
        self.step_mob_movement();
        self.step_mob_encounters();

        self.stats.ticks += 1;
        tracing::trace!(
            tick = self.stats.ticks,
            plants = self.plants.len(),
            mobs = self.mobs.len(),
            "tick complete"
        );

        if mobs_before > 0 && self.mobs.is_empty() {
            self.events.log(format!(
                "[EXTINCT] tick {} mobs went from {} to 0",
                self.stats.ticks, mobs_before
            ));
        }
    }

    /// Photosynthesis, spread and aging for every plant alive at phase start
    pub fn step_plants(&mut self) {
        let ids: Vec<PlantId> = self.plants.keys().copied().collect();
        let yield_amount = self.config.photosynth_yield;
        let resource_max = self.config.resource_max;
        let age_max = self.config.plant_age_max;

        for id in ids {
            let Some(plant) = self.plants.get_mut(&id) else {
                continue;
            };
            plant.photosynth(yield_amount, resource_max);

            self.spread(id);

            let Some(plant) = self.plants.get_mut(&id) else {
                continue;
            };
            plant.state.age += 1;
            if plant.state.age >= age_max {
                self.kill_plant(id, DeathCause::OldAge);
            }
        }
    }

    /// Try to seed a neighboring cell that is under the plant density cap.
    /// The child keeps the parent's name; the parent pays the spread cost.
    pub fn spread(&mut self, id: PlantId) -> Option<PlantId> {
        let cost = self.config.plant_spread_cost;
        let density_max = self.config.plant_density_max;

        let plant = self.plants.get(&id)?;
        if !plant.can_spread(cost) {
            return None;
        }
        let (position, name) = (plant.state.position, plant.state.name);

        let candidates: Vec<Point> = self
            .grid
            .adjacent_points(position)
            .into_iter()
            .filter(|&p| self.grid.at(p).plant_count() < density_max)
            .collect();
        let target = *candidates.choose(&mut self.rng)?;

        let child = self.insert_plant(target, name);
        if let Some(plant) = self.plants.get_mut(&id) {
            plant.state.resources -= cost;
        }
        tracing::debug!(parent = %id, %child, x = target.x, y = target.y, "plant spread");
        Some(child)
    }

    /// Move every mob alive at phase start to a random neighbor, then pay for the
    /// move and age. Mobs that cannot pay starve; mobs past the age limit die.
    pub fn step_mob_movement(&mut self) {
        let ids: Vec<MobId> = self.mobs.keys().copied().collect();
        let move_cost = self.config.move_cost;
        let age_max = self.config.mob_age_max;

        for id in ids {
            let Some(position) = self.mobs.get(&id).map(|m| m.state.position) else {
                continue;
            };

            let options = self.grid.adjacent_points(position);
            if let Some(&destination) = options.choose(&mut self.rng) {
                self.move_mob(id, destination);
            }

            let mob = self.live_mob_mut(id);
            if !mob.tire(move_cost) {
                self.kill_mob(id, DeathCause::Starvation);
                continue;
            }

            mob.state.age += 1;
            if mob.state.age >= age_max {
                self.kill_mob(id, DeathCause::OldAge);
            }
        }
    }

    /// Fight, graze, recover and reproduce, for every mob still alive
    pub fn step_mob_encounters(&mut self) {
        let ids: Vec<MobId> = self.mobs.keys().copied().collect();
        let mana_regen = self.config.mana_regen;

        for id in ids {
            if !self.mobs.contains_key(&id) {
                continue;
            }

            let rivals = self.rivals_of(id);
            if let Some(&rival) = rivals.choose(&mut self.rng) {
                self.battle(id, rival);
            }
            if !self.mobs.contains_key(&id) {
                continue;
            }

            self.graze(id);

            let mob = self.live_mob_mut(id);
            mob.heal();
            mob.regen_mana(mana_regen);

            self.reproduce(id);
        }
    }

    /// Other living mobs in the same cell, excluding direct parent and children
    pub fn rivals_of(&self, id: MobId) -> Vec<MobId> {
        let Some(mob) = self.mobs.get(&id) else {
            return Vec::new();
        };
        self.grid
            .at(mob.state.position)
            .mobs()
            .filter(|&other| {
                other != id
                    && self.mobs.get(&other).is_some_and(|o| o.state.alive)
                    && !mob.is_relative(other)
            })
            .collect()
    }

    /// Eat one random plant in the mob's cell, taking half its resources
    pub fn graze(&mut self, id: MobId) -> Option<PlantId> {
        let position = self.mobs.get(&id)?.state.position;
        let local: Vec<PlantId> = self
            .grid
            .at(position)
            .plants()
            .filter(|p| self.plants.get(p).is_some_and(|p| p.state.alive))
            .collect();
        let plant_id = *local.choose(&mut self.rng)?;

        let eaten = self.kill_plant(plant_id, DeathCause::Eaten)?;
        let resource_max = self.config.resource_max;
        self.live_mob_mut(id)
            .add_resources(eaten.state.resources / 2, resource_max);
        Some(plant_id)
    }

    /// Fight to the death. A coin flip picks who acts first.
    pub fn battle(&mut self, a: MobId, b: MobId) -> BattleOutcome {
        self.run_battle(BattleState::ChoosingOrder { a, b })
    }

    /// Fight to the death with a fixed turn order
    pub fn battle_in_order(&mut self, first: MobId, second: MobId) -> BattleOutcome {
        self.run_battle(BattleState::Exchanging {
            first,
            second,
            swings: 0,
        })
    }

    fn run_battle(&mut self, mut state: BattleState) -> BattleOutcome {
        loop {
            state = match state {
                BattleState::ChoosingOrder { a, b } => {
                    let (first, second) = if self.rng.gen_range(0..2) == 1 {
                        (a, b)
                    } else {
                        (b, a)
                    };
                    BattleState::Exchanging {
                        first,
                        second,
                        swings: 0,
                    }
                }
                BattleState::Exchanging {
                    first,
                    second,
                    swings,
                } => self.exchange(first, second, swings),
                BattleState::Resolved(outcome) => return outcome,
            };
        }
    }

    /// One round: `first` acts, then `second` answers if still standing
    fn exchange(&mut self, first: MobId, second: MobId, mut swings: u32) -> BattleState {
        // battles never touch resources, so these are the loser's residual resources
        let first_resources = self.live_mob_mut(first).state.resources;
        let second_resources = self.live_mob_mut(second).state.resources;

        self.attack(first, second);
        swings += 1;
        if self.mobs.contains_key(&second) {
            self.attack(second, first);
            swings += 1;
        }

        match (self.mobs.contains_key(&first), self.mobs.contains_key(&second)) {
            (true, true) => BattleState::Exchanging {
                first,
                second,
                swings,
            },
            (true, false) => {
                BattleState::Resolved(self.settle(first, second, second_resources, first, swings))
            }
            (false, true) => {
                BattleState::Resolved(self.settle(second, first, first_resources, first, swings))
            }
            (false, false) => unreachable!("at most one mob falls per exchange"),
        }
    }

    fn settle(
        &mut self,
        winner: MobId,
        loser: MobId,
        loser_resources: u32,
        first: MobId,
        swings: u32,
    ) -> BattleOutcome {
        let spoils = loser_resources / 2;
        let resource_max = self.config.resource_max;
        let victor = self.live_mob_mut(winner);
        victor.add_resources(spoils, resource_max);
        victor.kills += 1;
        let kills = victor.kills;

        self.stats.battles += 1;
        self.events.log(format!(
            "[BATTLE] {} beat {} in {} swings (spoils:{} kills:{})",
            winner, loser, swings, spoils, kills
        ));

        BattleOutcome {
            winner,
            loser,
            first,
            swings,
            spoils,
        }
    }

    /// Resolve the attacker's current ability against `target`
    pub fn attack(&mut self, attacker: MobId, target: MobId) -> Action {
        let heal_cost = self.config.heal_mana_cost;
        let action = self.live_mob_mut(attacker).act(heal_cost);
        if let Action::Strike(amount) = action {
            self.take_damage(target, amount);
        }
        action
    }

    /// Damage greater than current health kills the mob and returns the health
    /// it had left; otherwise the damage is subtracted and returned.
    pub fn take_damage(&mut self, id: MobId, amount: u32) -> u32 {
        let mob = self.live_mob_mut(id);
        if amount > mob.health {
            let remaining = mob.health;
            self.kill_mob(id, DeathCause::Combat);
            remaining
        } else {
            mob.health -= amount;
            amount
        }
    }

    /// Spawn a mutated child into a neighboring cell with no mobs, if the mob
    /// is old and rich enough and such a cell exists
    pub fn reproduce(&mut self, id: MobId) -> Option<MobId> {
        let reproduce_cost = self.config.mob_reproduce_cost;
        let parent = self.mobs.get(&id)?;
        if !parent.can_reproduce(&self.config) {
            return None;
        }
        let position = parent.state.position;
        let debit = parent.reproduce_debit(reproduce_cost);

        let candidates: Vec<Point> = self
            .grid
            .adjacent_points(position)
            .into_iter()
            .filter(|&p| self.grid.at(p).mob_count() == 0)
            .collect();
        let target = *candidates.choose(&mut self.rng)?;

        let child_id = MobId(self.allocate_id());
        let parent = self.mobs.get(&id)?;
        let (child, mutation) = parent.spawn_child(child_id, target, &self.config, &mut self.rng);
        let genome = genome_to_string(&child.genome);

        let parent = self.live_mob_mut(id);
        parent.children.push(child_id);
        parent.offspring_count += 1;
        parent.state.resources = parent.state.resources.saturating_sub(debit);
        let generation = parent.generation + 1;

        self.insert_mob(child);
        self.events.log(format!(
            "[BIRTH] {} -> {} at ({},{}) gen:{} genome:{} {:?}",
            id, child_id, target.x, target.y, generation, genome, mutation
        ));
        Some(child_id)
    }

    /// Glyph a renderer shows for a cell: the lowest display priority occupant
    pub fn glyph_at(&self, point: Point) -> Option<char> {
        match self.grid.at(point).top_occupant()? {
            Occupant::Plant(id) => self.plants.get(&id).map(|p| p.display()),
            Occupant::Mob(id) => self.mobs.get(&id).map(|m| m.display()),
        }
    }

    /// Mob with the most living children (lowest id on ties)
    pub fn most_prolific_mob(&self) -> Option<&Mob> {
        self.mobs
            .values()
            .max_by(|a, b| a.child_count().cmp(&b.child_count()).then(b.id.cmp(&a.id)))
    }

    /// Check that every live entity sits in exactly the cell it points at and
    /// that no cell lists anything else
    pub fn verify_membership(&self) -> Result<(), String> {
        for plant in self.plants.values() {
            check_single_membership(self, Occupant::Plant(plant.id), plant.state.position)?;
        }
        for mob in self.mobs.values() {
            check_single_membership(self, Occupant::Mob(mob.id), mob.state.position)?;
        }

        let listed: usize = self.grid.iter().map(|(_, cell)| cell.occupants().len()).sum();
        if listed != self.plants.len() + self.mobs.len() {
            return Err(format!(
                "cells list {} occupants but {} entities are alive",
                listed,
                self.plants.len() + self.mobs.len()
            ));
        }
        Ok(())
    }
}

fn check_single_membership(world: &World, occupant: Occupant, position: Point) -> Result<(), String> {
    let count = world
        .grid
        .at(position)
        .occupants()
        .iter()
        .filter(|&&o| o == occupant)
        .count();
    if count != 1 {
        return Err(format!(
            "{:?} appears {} times in its cell ({},{})",
            occupant, count, position.x, position.y
        ));
    }
    Ok(())
}
