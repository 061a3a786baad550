use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use runegrid::gene::{mutate, Gene, ALL_GENES};
use runegrid::grid::{Grid, Point};
use runegrid::power::{calc_power, CombatStats};
use runegrid::rune::RuneGrid;
use runegrid::{Entity, EntityKind, SimConfig, World};

prop_compose! {
    fn arb_genome(max_len: usize)(
        genes in prop::collection::vec(prop::sample::select(ALL_GENES.to_vec()), 1..max_len)
    ) -> Vec<Gene> {
        genes
    }
}

prop_compose! {
    fn arb_grid_point()(width in 1usize..12, height in 1usize..12)(
        width in Just(width),
        height in Just(height),
        x in 0..width as i32,
        y in 0..height as i32
    ) -> (usize, usize, Point) {
        (width, height, Point::new(x, y))
    }
}

fn small_config(width: usize, height: usize) -> SimConfig {
    SimConfig {
        width,
        height,
        initial_mobs: 6,
        initial_plants: 20,
        mob_reproduce_age: 5,
        ..SimConfig::default()
    }
}

/// Check everything that must hold between ticks
fn assert_world_consistent(world: &World) -> Result<(), TestCaseError> {
    prop_assert!(world.verify_membership().is_ok(), "{:?}", world.verify_membership());
    let max = world.config().resource_max;

    for plant in world.plants() {
        prop_assert!(plant.is_alive());
        prop_assert!(plant.resources() <= max);
    }
    for mob in world.mobs() {
        prop_assert!(mob.is_alive());
        prop_assert!(mob.resources() <= max);
        prop_assert!(mob.attack_power >= 1);
        prop_assert!(!mob.genome.is_empty());
        prop_assert!(mob.health <= mob.max_health);
        prop_assert!(mob.mana <= mob.max_mana);

        if let Some(parent) = mob.parent {
            let parent = world.mob(parent);
            prop_assert!(parent.is_some(), "parent link to a dead mob");
            prop_assert!(parent.map_or(false, |p| p.children.contains(&mob.id)));
        }
        for &child in &mob.children {
            prop_assert_eq!(world.mob(child).and_then(|c| c.parent), Some(mob.id));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_neighbors_stay_in_bounds((width, height, point) in arb_grid_point()) {
        let grid = Grid::new(width, height, |_| ());
        let neighbors = grid.adjacent_points(point);

        prop_assert!(neighbors.len() <= 8);
        prop_assert!(!neighbors.contains(&point));
        for n in &neighbors {
            prop_assert!(grid.in_bounds(*n));
            prop_assert!((n.x - point.x).abs() <= 1 && (n.y - point.y).abs() <= 1);
        }
        if width >= 3 && height >= 3 && point.x > 0 && point.y > 0
            && (point.x as usize) < width - 1 && (point.y as usize) < height - 1
        {
            prop_assert_eq!(neighbors.len(), 8);
        }
    }

    #[test]
    fn test_rune_painting_is_deterministic(genome in arb_genome(40)) {
        let first = RuneGrid::from_genome(30, 10, &genome);
        let second = RuneGrid::from_genome(30, 10, &genome);
        prop_assert_eq!(first.render_rows(), second.render_rows());
        prop_assert_eq!(calc_power(&first), calc_power(&second));
    }

    #[test]
    fn test_attack_power_never_zero(genome in arb_genome(40)) {
        let stats = CombatStats::from_runes(
            &RuneGrid::from_genome(30, 10, &genome),
            &SimConfig::default(),
        );
        prop_assert!(stats.attack_power >= 1);
        prop_assert_eq!(stats.abilities[0], runegrid::mob::Ability::Attack);
        prop_assert!(stats.abilities.len() <= 2);
    }

    #[test]
    fn test_mutation_changes_length_by_at_most_one(genome in arb_genome(30), seed in any::<u64>()) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let (child, _) = mutate(&genome, &mut rng);
        prop_assert!(!child.is_empty());
        prop_assert!(child.len().abs_diff(genome.len()) <= 1);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_world_invariants_hold_across_ticks(
        seed in any::<u64>(),
        width in 1usize..10,
        height in 1usize..10
    ) {
        let config = small_config(width, height);
        let (plants, mobs) = (config.initial_plants, config.initial_mobs);
        let mut world = World::new(config, seed).unwrap();
        world.populate(EntityKind::Plant, plants);
        world.populate(EntityKind::Mob, mobs);
        assert_world_consistent(&world)?;

        for _ in 0..40 {
            world.advance_tick();
            assert_world_consistent(&world)?;
        }
        prop_assert_eq!(world.stats.ticks, 40);
    }
}
