use crate::grid::Point;
use rand::Rng;
use std::fmt;

/// Stable identifier for a plant in the world arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlantId(pub u64);

/// Stable identifier for a mob in the world arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MobId(pub u64);

impl fmt::Display for PlantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "plant#{}", self.0)
    }
}

impl fmt::Display for MobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mob#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Plant,
    Mob,
}

impl EntityKind {
    /// Glyph pool a new entity of this kind draws its name from
    pub fn name_pool(self) -> &'static [char] {
        match self {
            EntityKind::Plant => &PLANT_NAMES,
            EntityKind::Mob => &MOB_NAMES,
        }
    }

    /// Lower values win when several entities share a cell on screen
    pub fn display_priority(self) -> u8 {
        match self {
            EntityKind::Plant => 2,
            EntityKind::Mob => 1,
        }
    }
}

const PLANT_NAMES: [char; 26] = alphabet(b'a');
const MOB_NAMES: [char; 26] = alphabet(b'A');

const fn alphabet(start: u8) -> [char; 26] {
    let mut names = ['?'; 26];
    let mut i = 0;
    while i < 26 {
        names[i] = (start + i as u8) as char;
        i += 1;
    }
    names
}

/// Draw a display glyph for a new entity of `kind`
pub fn draw_name<R: Rng + ?Sized>(kind: EntityKind, rng: &mut R) -> char {
    let pool = kind.name_pool();
    pool[rng.gen_range(0..pool.len())]
}

/// Reference to an entity stored in a world cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Occupant {
    Plant(PlantId),
    Mob(MobId),
}

impl Occupant {
    pub fn kind(self) -> EntityKind {
        match self {
            Occupant::Plant(_) => EntityKind::Plant,
            Occupant::Mob(_) => EntityKind::Mob,
        }
    }
}

/// State shared by plants and mobs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityState {
    /// Cell this entity occupies; the cell's occupant list is the source of truth
    pub position: Point,
    pub alive: bool,
    pub resources: u32,
    pub age: u32,
    /// Display glyph
    pub name: char,
}

impl EntityState {
    pub fn new(position: Point, resources: u32, name: char) -> Self {
        Self {
            position,
            alive: true,
            resources,
            age: 0,
            name,
        }
    }

    /// Add resources, clamped to `max`
    pub fn add_resources(&mut self, amount: u32, max: u32) {
        self.resources = self.resources.saturating_add(amount).min(max);
    }

    /// Spend resources if enough are held. Returns false (and spends nothing) otherwise.
    pub fn use_resources(&mut self, amount: u32) -> bool {
        match self.resources.checked_sub(amount) {
            Some(left) => {
                self.resources = left;
                true
            }
            None => false,
        }
    }
}

/// Capabilities common to everything that lives on the world grid
pub trait Entity {
    fn kind(&self) -> EntityKind;
    fn state(&self) -> &EntityState;
    fn state_mut(&mut self) -> &mut EntityState;

    fn can_fight(&self) -> bool {
        self.kind() == EntityKind::Mob
    }

    fn display_priority(&self) -> u8 {
        self.kind().display_priority()
    }

    fn display(&self) -> char {
        self.state().name
    }

    fn position(&self) -> Point {
        self.state().position
    }

    fn is_alive(&self) -> bool {
        self.state().alive
    }

    fn resources(&self) -> u32 {
        self.state().resources
    }

    fn age(&self) -> u32 {
        self.state().age
    }

    fn add_resources(&mut self, amount: u32, max: u32) {
        self.state_mut().add_resources(amount, max);
    }
}

/// Stationary producer: photosynthesizes and spreads to nearby cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plant {
    pub id: PlantId,
    pub state: EntityState,
}

impl Plant {
    pub fn new(id: PlantId, position: Point, resources: u32, name: char) -> Self {
        Self {
            id,
            state: EntityState::new(position, resources, name),
        }
    }

    /// Gain one tick's yield
    pub fn photosynth(&mut self, yield_amount: u32, max: u32) {
        self.state.add_resources(yield_amount, max);
    }

    /// Spread requires twice the cost on hand, leaving at least the cost behind
    pub fn can_spread(&self, spread_cost: u32) -> bool {
        self.state.resources >= spread_cost.saturating_mul(2)
    }
}

impl Entity for Plant {
    fn kind(&self) -> EntityKind {
        EntityKind::Plant
    }

    fn state(&self) -> &EntityState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut EntityState {
        &mut self.state
    }
}
