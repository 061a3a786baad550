//! Rune power scoring and the combat stats derived from it.
//!
//! Every cell of a rune grid is scored against its in-bounds neighbors. A cell
//! with at most two same-rune neighbors and at least one differing neighbor earns
//! `same + 1` points for its own rune. Small bordered clusters score; large blobs
//! and cells surrounded only by their own rune do not.

use crate::config::SimConfig;
use crate::mob::Ability;
use crate::rune::{Rune, RuneGrid};

/// Per-rune point totals from one scoring pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunePower {
    // indexed by `Rune::index`; slot 0 collects unpainted cells and is never read back
    totals: [u32; 5],
}

impl RunePower {
    fn total(&self, rune: Rune) -> u32 {
        self.totals[rune.index()]
    }

    pub fn red(&self) -> u32 {
        self.total(Rune::Red)
    }

    pub fn black(&self) -> u32 {
        self.total(Rune::Black)
    }

    pub fn green(&self) -> u32 {
        self.total(Rune::Green)
    }

    pub fn blue(&self) -> u32 {
        self.total(Rune::Blue)
    }
}

/// Points a single cell contributes to its own rune's total
pub fn cell_score(same: usize, different: usize) -> u32 {
    if same <= 2 && different > 0 {
        same as u32 + 1
    } else {
        0
    }
}

/// Score every cell of the grid. Pure: the grid is only read.
pub fn calc_power(runes: &RuneGrid) -> RunePower {
    let grid = runes.grid();
    let mut power = RunePower::default();

    for (point, &rune) in grid.iter() {
        let neighbors = grid.possible_adjacent(point);
        let same = neighbors.iter().filter(|&&&n| n == rune).count();
        let different = neighbors.len() - same;
        power.totals[rune.index()] += cell_score(same, different);
    }

    power
}

/// Combat stats fixed at mob creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatStats {
    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub attack_power: u32,
    pub healing_power: u32,
    pub abilities: Vec<Ability>,
}

impl CombatStats {
    /// Map rune totals onto the configured base stats.
    /// Attack never drops below 1; HEAL joins the rotation only when the mob
    /// can both heal and hold mana.
    pub fn from_power(power: &RunePower, config: &SimConfig) -> Self {
        let health_bonus = power.black().saturating_mul(config.health_per_black);
        let mana_bonus = power.blue().saturating_mul(config.mana_per_blue);

        let max_health = config.mob_base_health.saturating_add(health_bonus);
        let max_mana = config.mob_base_mana.saturating_add(mana_bonus);
        let attack_power = power.red().saturating_mul(config.attack_per_red).max(1);
        let healing_power = power.green().saturating_mul(config.heal_per_green);

        let mut abilities = vec![Ability::Attack];
        if healing_power > 0 && max_mana > 0 {
            abilities.push(Ability::Heal);
        }

        Self {
            health: max_health,
            max_health,
            mana: max_mana,
            max_mana,
            attack_power,
            healing_power,
            abilities,
        }
    }

    /// Interpret, score and map in one pass
    pub fn from_runes(runes: &RuneGrid, config: &SimConfig) -> Self {
        Self::from_power(&calc_power(runes), config)
    }
}
