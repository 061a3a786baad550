use crate::config::SimConfig;
use crate::entity::{draw_name, Entity, EntityKind, EntityState, MobId};
use crate::gene::{genome_to_string, mutate, random_genome, Gene, Mutation};
use crate::grid::Point;
use crate::power::CombatStats;
use crate::rune::RuneGrid;
use rand::Rng;

/// Combat action in a mob's round-robin rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ability {
    Attack,
    Heal,
}

/// What a mob actually did on its turn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Deal this much damage to the opponent
    Strike(u32),
    /// Restored this much health to itself
    Healed(u32),
}

/// A mobile, fighting entity whose stats come from its genome
#[derive(Debug, Clone)]
pub struct Mob {
    pub id: MobId,
    pub state: EntityState,

    /// Drawing instructions for the rune grid
    pub genome: Vec<Gene>,

    /// Rune grid painted once at creation
    pub runes: RuneGrid,

    pub health: u32,
    pub max_health: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub attack_power: u32,
    pub healing_power: u32,

    /// Rotation, ATTACK always first
    pub abilities: Vec<Ability>,
    pub ability_index: usize,

    pub kills: u32,

    /// Generation number (0 for seeded mobs)
    pub generation: u32,

    /// Weak link to the parent, cleared when the parent dies
    pub parent: Option<MobId>,

    /// Living children
    pub children: Vec<MobId>,

    /// Children ever produced
    pub offspring_count: u32,
}

impl Mob {
    /// Build a mob from a genome: paint the rune grid, score it and fix the stats
    pub fn new(id: MobId, position: Point, genome: Vec<Gene>, name: char, config: &SimConfig) -> Self {
        assert!(!genome.is_empty(), "mob genome must hold at least one gene");

        let runes = RuneGrid::from_genome(config.rune_grid_width, config.rune_grid_height, &genome);
        let stats = CombatStats::from_runes(&runes, config);

        Self {
            id,
            state: EntityState::new(position, config.mob_initial_resources, name),
            genome,
            runes,
            health: stats.health,
            max_health: stats.max_health,
            mana: stats.mana,
            max_mana: stats.max_mana,
            attack_power: stats.attack_power,
            healing_power: stats.healing_power,
            abilities: stats.abilities,
            ability_index: 0,
            kills: 0,
            generation: 0,
            parent: None,
            children: Vec::new(),
            offspring_count: 0,
        }
    }

    /// Seed mob with a random genome. Draws the name, then each gene.
    pub fn spawn<R: Rng + ?Sized>(id: MobId, position: Point, config: &SimConfig, rng: &mut R) -> Self {
        let name = draw_name(EntityKind::Mob, rng);
        let genome = random_genome(rng, config.initial_genome_length);
        Self::new(id, position, genome, name, config)
    }

    /// Child carrying a once-mutated copy of this mob's genome.
    /// The caller registers it in `children` and the world.
    pub fn spawn_child<R: Rng + ?Sized>(
        &self,
        id: MobId,
        position: Point,
        config: &SimConfig,
        rng: &mut R,
    ) -> (Self, Mutation) {
        let name = draw_name(EntityKind::Mob, rng);
        let (genome, mutation) = mutate(&self.genome, rng);

        let mut child = Self::new(id, position, genome, name, config);
        child.parent = Some(self.id);
        child.generation = self.generation + 1;
        (child, mutation)
    }

    pub fn current_ability(&self) -> Ability {
        self.abilities[self.ability_index]
    }

    /// Take one combat turn: resolve the current ability, then rotate.
    /// HEAL without enough mana falls back to a strike.
    pub fn act(&mut self, heal_mana_cost: u32) -> Action {
        let action = match self.current_ability() {
            Ability::Attack => Action::Strike(self.attack_power),
            Ability::Heal => {
                if self.use_mana(heal_mana_cost) {
                    Action::Healed(self.heal())
                } else {
                    Action::Strike(self.attack_power)
                }
            }
        };
        self.ability_index = (self.ability_index + 1) % self.abilities.len();
        action
    }

    /// Restore `healing_power / 2` health, capped at max. Returns the amount gained.
    pub fn heal(&mut self) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(self.healing_power / 2).min(self.max_health);
        self.health - before
    }

    pub fn regen_mana(&mut self, amount: u32) {
        self.mana = self.mana.saturating_add(amount).min(self.max_mana);
    }

    pub fn use_mana(&mut self, amount: u32) -> bool {
        match self.mana.checked_sub(amount) {
            Some(left) => {
                self.mana = left;
                true
            }
            None => false,
        }
    }

    /// Pay the movement cost. False means the mob could not pay and starves.
    pub fn tire(&mut self, cost: u32) -> bool {
        self.state.use_resources(cost)
    }

    /// `ceil(genome_len / 2)`, the genome-size part of reproduction costs
    pub fn genome_cost(&self) -> u32 {
        u32::try_from(self.genome.len().div_ceil(2)).unwrap_or(u32::MAX)
    }

    /// Resources needed on hand before reproducing
    pub fn reproduce_threshold(&self, reproduce_cost: u32) -> u32 {
        self.genome_cost()
            .saturating_add(reproduce_cost.saturating_mul(2))
    }

    /// Resources taken from the parent per child: `reproduce_cost` once on its
    /// own and once more inside `genome_cost + reproduce_cost`
    pub fn reproduce_debit(&self, reproduce_cost: u32) -> u32 {
        reproduce_cost.saturating_add(self.genome_cost().saturating_add(reproduce_cost))
    }

    /// Old enough and rich enough to try for a child
    pub fn can_reproduce(&self, config: &SimConfig) -> bool {
        self.state.age >= config.mob_reproduce_age
            && self.state.resources >= self.reproduce_threshold(config.mob_reproduce_cost)
    }

    /// Direct parent or child; relatives never fight
    pub fn is_relative(&self, other: MobId) -> bool {
        self.parent == Some(other) || self.children.contains(&other)
    }

    pub fn genome_string(&self) -> String {
        genome_to_string(&self.genome)
    }

    pub fn genome_len(&self) -> usize {
        self.genome.len()
    }

    pub fn health(&self) -> u32 {
        self.health
    }

    pub fn max_health(&self) -> u32 {
        self.max_health
    }

    pub fn mana(&self) -> u32 {
        self.mana
    }

    pub fn max_mana(&self) -> u32 {
        self.max_mana
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// One-line summary for a stats display
    pub fn stats_line(&self) -> String {
        format!(
            "({}, {}) {} {} resources, {}/{} health, {}/{} mana; {} attack power, {} healing power; genome {} children {}",
            self.state.position.x,
            self.state.position.y,
            self.state.name,
            self.state.resources,
            self.health,
            self.max_health,
            self.mana,
            self.max_mana,
            self.attack_power,
            self.healing_power,
            self.genome_string(),
            self.children.len()
        )
    }
}

impl Entity for Mob {
    fn kind(&self) -> EntityKind {
        EntityKind::Mob
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::parse_genome;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn mob(genome: &str) -> Mob {
        Mob::new(
            MobId(1),
            Point::new(0, 0),
            parse_genome(genome).unwrap(),
            'A',
            &SimConfig::default(),
        )
    }

    #[test]
    fn test_new_mob_defaults() {
        let m = mob("UD");
        assert_eq!(m.health, 10);
        assert_eq!(m.max_health, 10);
        assert_eq!(m.mana, 0);
        assert_eq!(m.attack_power, 1);
        assert_eq!(m.abilities, vec![Ability::Attack]);
        assert_eq!(m.resources(), 10);
        assert_eq!(m.kills, 0);
        assert!(m.parent.is_none());
        assert!(m.can_fight());
        assert_eq!(m.display_priority(), 1);
    }

    #[test]
    fn test_spawn_uses_initial_genome_length() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let m = Mob::spawn(MobId(0), Point::new(1, 1), &SimConfig::default(), &mut rng);
        assert_eq!(m.genome_len(), 5);
        assert!(m.display().is_ascii_uppercase());
        assert!(m.attack_power >= 1);
    }

    #[test]
    fn test_spawn_child_links_parent() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let parent = mob("EUEKG");
        let (child, _) = parent.spawn_child(MobId(9), Point::new(1, 0), &SimConfig::default(), &mut rng);
        assert_eq!(child.parent, Some(MobId(1)));
        assert_eq!(child.generation, 1);
        assert_eq!(child.age(), 0);
        assert!(child.genome_len().abs_diff(parent.genome_len()) <= 1);
    }

    #[test]
    fn test_attack_rotation_only_attack() {
        let mut m = mob("EUE");
        assert_eq!(m.act(2), Action::Strike(4));
        assert_eq!(m.act(2), Action::Strike(4));
        assert_eq!(m.ability_index, 0);
    }

    #[test]
    fn test_heal_rotation_spends_mana() {
        let mut m = mob("GUB");
        m.health = 5;
        assert_eq!(m.act(2), Action::Strike(1));
        // mana 1 < cost 2: falls back to a strike but still rotates
        assert_eq!(m.act(2), Action::Strike(1));
        assert_eq!(m.ability_index, 0);
        m.mana = 2;
        m.act(2);
        assert_eq!(m.act(2), Action::Healed(1));
        assert_eq!(m.mana, 0);
        assert_eq!(m.health, 6);
    }

    #[test]
    fn test_heal_caps_at_max() {
        let mut m = mob("GGG");
        m.healing_power = 30;
        m.health = m.max_health - 2;
        assert_eq!(m.heal(), 2);
        assert_eq!(m.health, m.max_health);
    }

    #[test]
    fn test_regen_mana_caps() {
        let mut m = mob("B");
        assert_eq!(m.max_mana, 1);
        m.mana = 0;
        m.regen_mana(5);
        assert_eq!(m.mana, 1);
    }

    #[test]
    fn test_use_mana() {
        let mut m = mob("B");
        assert!(!m.use_mana(2));
        assert_eq!(m.mana, 1);
        assert!(m.use_mana(1));
        assert_eq!(m.mana, 0);
    }

    #[test]
    fn test_tire_until_starved() {
        let mut m = mob("E");
        m.state.resources = 1;
        assert!(m.tire(1));
        assert!(!m.tire(1));
    }

    #[test]
    fn test_reproduction_costs() {
        let m = mob("EUEKG");
        assert_eq!(m.genome_cost(), 3);
        assert_eq!(m.reproduce_threshold(10), 23);
        // the reproduce cost is charged twice on top of the genome cost
        assert_eq!(m.reproduce_debit(10), 23);
    }

    #[test]
    fn test_can_reproduce_requires_age() {
        let config = SimConfig::default();
        let mut m = mob("EE");
        m.state.resources = 100;
        m.state.age = 10;
        assert!(!m.can_reproduce(&config));
        m.state.age = 50;
        assert!(m.can_reproduce(&config));
        m.state.resources = 20;
        assert!(!m.can_reproduce(&config));
    }

    #[test]
    fn test_is_relative() {
        let mut m = mob("E");
        m.parent = Some(MobId(4));
        m.children.push(MobId(5));
        assert!(m.is_relative(MobId(4)));
        assert!(m.is_relative(MobId(5)));
        assert!(!m.is_relative(MobId(6)));
    }

    #[test]
    fn test_stats_line_mentions_genome() {
        let m = mob("EK");
        assert!(m.stats_line().contains("genome EK"));
    }

    #[test]
    fn test_huge_reproduce_cost_never_qualifies() {
        let config = SimConfig {
            mob_reproduce_cost: u32::MAX / 2 + 1,
            ..SimConfig::default()
        };
        let mut m = mob("EUEKG");
        m.state.age = 60;
        m.state.resources = 100;
        assert_eq!(m.reproduce_threshold(config.mob_reproduce_cost), u32::MAX);
        assert_eq!(m.reproduce_debit(config.mob_reproduce_cost), u32::MAX);
        assert!(!m.can_reproduce(&config));
    }

    #[test]
    fn test_heal_and_regen_saturate() {
        let mut m = mob("B");
        m.healing_power = u32::MAX;
        m.max_health = u32::MAX;
        m.health = u32::MAX - 1;
        m.heal();
        assert_eq!(m.health, u32::MAX);
        m.max_mana = u32::MAX;
        m.mana = u32::MAX - 1;
        m.regen_mana(u32::MAX);
        assert_eq!(m.mana, u32::MAX);
    }
}
