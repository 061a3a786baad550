/// Diagnostic tools for analyzing population dynamics
use crate::gene::Gene;
use crate::mob::{Ability, Mob};
use crate::world::World;
use rayon::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct PopulationStats {
    pub plants: usize,
    pub mobs: usize,
    pub average_genome_length: f64,
    pub average_attack: f64,
    pub average_max_health: f64,
    /// Mobs with HEAL in their rotation
    pub healers: usize,
    pub max_kills: u32,
    pub max_generation: u32,
}

impl PopulationStats {
    pub fn report(&self) -> String {
        format!(
            "plants:{} mobs:{} genome:{:.2} attack:{:.2} max_health:{:.2} healers:{} max_kills:{} max_gen:{}",
            self.plants,
            self.mobs,
            self.average_genome_length,
            self.average_attack,
            self.average_max_health,
            self.healers,
            self.max_kills,
            self.max_generation
        )
    }
}

#[derive(Default)]
struct Totals {
    count: usize,
    genome: usize,
    attack: u64,
    max_health: u64,
    healers: usize,
    max_kills: u32,
    max_generation: u32,
}

impl Totals {
    fn add(mut self, mob: &Mob) -> Self {
        self.count += 1;
        self.genome += mob.genome_len();
        self.attack += u64::from(mob.attack_power);
        self.max_health += u64::from(mob.max_health);
        if mob.abilities.contains(&Ability::Heal) {
            self.healers += 1;
        }
        self.max_kills = self.max_kills.max(mob.kills);
        self.max_generation = self.max_generation.max(mob.generation);
        self
    }

    fn merge(self, other: Self) -> Self {
        Self {
            count: self.count + other.count,
            genome: self.genome + other.genome,
            attack: self.attack + other.attack,
            max_health: self.max_health + other.max_health,
            healers: self.healers + other.healers,
            max_kills: self.max_kills.max(other.max_kills),
            max_generation: self.max_generation.max(other.max_generation),
        }
    }
}

fn average(total: f64, count: usize) -> f64 {
    if count > 0 {
        total / count as f64
    } else {
        0.0
    }
}

/// Summarize the living mob population (parallel)
pub fn population_stats(world: &World) -> PopulationStats {
    let mobs: Vec<&Mob> = world.mobs().collect();
    let totals = mobs
        .par_iter()
        .fold(Totals::default, |acc, mob| acc.add(mob))
        .reduce(Totals::default, Totals::merge);

    PopulationStats {
        plants: world.plant_count(),
        mobs: totals.count,
        average_genome_length: average(totals.genome as f64, totals.count),
        average_attack: average(totals.attack as f64, totals.count),
        average_max_health: average(totals.max_health as f64, totals.count),
        healers: totals.healers,
        max_kills: totals.max_kills,
        max_generation: totals.max_generation,
    }
}

/// Count each gene letter across all living genomes
pub fn gene_diversity(world: &World) -> HashMap<char, usize> {
    let mut counts = HashMap::new();
    for mob in world.mobs() {
        for gene in &mob.genome {
            *counts.entry(gene.to_char()).or_insert(0) += 1;
        }
    }
    counts
}

/// Share of painting genes (versus cursor moves) across the population
pub fn paint_ratio(world: &World) -> f64 {
    let (painted, total) = world
        .mobs()
        .flat_map(|mob| mob.genome.iter())
        .fold((0usize, 0usize), |(painted, total), gene: &Gene| {
            (painted + usize::from(!gene.is_move()), total + 1)
        });
    average(painted as f64, total)
}

/// Genome strings of the first `count` mobs in creation order
pub fn sample_genomes(world: &World, count: usize) -> Vec<String> {
    world.mobs().take(count).map(|m| m.genome_string()).collect()
}
