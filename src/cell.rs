use crate::entity::{EntityKind, MobId, Occupant, PlantId};

/// One square of the world grid and the entities currently standing on it.
/// Occupants keep insertion order; density limits are enforced by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    occupants: Vec<Occupant>,
}

impl Cell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    pub fn contains(&self, occupant: Occupant) -> bool {
        self.occupants.contains(&occupant)
    }

    pub(crate) fn insert(&mut self, occupant: Occupant) {
        debug_assert!(!self.contains(occupant), "{:?} already in cell", occupant);
        self.occupants.push(occupant);
    }

    /// Remove `occupant`, returning whether it was present
    pub(crate) fn remove(&mut self, occupant: Occupant) -> bool {
        match self.occupants.iter().position(|&o| o == occupant) {
            Some(idx) => {
                self.occupants.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn count(&self, kind: EntityKind) -> usize {
        self.occupants.iter().filter(|o| o.kind() == kind).count()
    }

    pub fn plant_count(&self) -> usize {
        self.count(EntityKind::Plant)
    }

    pub fn mob_count(&self) -> usize {
        self.count(EntityKind::Mob)
    }

    /// Mob ids in insertion order
    pub fn mobs(&self) -> impl Iterator<Item = MobId> + '_ {
        self.occupants.iter().filter_map(|o| match o {
            Occupant::Mob(id) => Some(*id),
            Occupant::Plant(_) => None,
        })
    }

    /// Plant ids in insertion order
    pub fn plants(&self) -> impl Iterator<Item = PlantId> + '_ {
        self.occupants.iter().filter_map(|o| match o {
            Occupant::Plant(id) => Some(*id),
            Occupant::Mob(_) => None,
        })
    }

    /// Occupant a renderer should show: lowest display priority, earliest inserted on ties
    pub fn top_occupant(&self) -> Option<Occupant> {
        self.occupants
            .iter()
            .copied()
            .min_by_key(|o| o.kind().display_priority())
    }
}
