//! Property tests for grid-wide invariants.

use belief_core::{AbortSignal, NeighborhoodTable, SimulationConfig, SimulationEngine, TableCache};
use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn dim_and_degree() -> impl Strategy<Value = (usize, usize)> {
    (1usize..=9).prop_flat_map(|dim| (Just(dim), 1..=dim * dim))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn neighborhoods_have_exact_distinct_members(
        (dim, degree) in dim_and_degree(),
        seed in any::<u64>(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let table = NeighborhoodTable::build(dim, degree, &mut rng).unwrap();

        prop_assert_eq!(table.len(), dim * dim);
        for (cell, neighbors) in table.iter().enumerate() {
            prop_assert_eq!(neighbors.len(), degree);
            prop_assert!(neighbors.contains(&cell));
            let distinct: HashSet<_> = neighbors.iter().collect();
            prop_assert_eq!(distinct.len(), degree);
        }
    }

    #[test]
    fn credences_stay_in_unit_interval(
        (dim, degree) in (1usize..=5).prop_flat_map(|dim| (Just(dim), 1..=dim * dim)),
        p in 0.501f64..=0.8,
        n in 1u32..=30,
        m in 1.0f64..=3.0,
        granularity in 1u32..=40,
        seed in any::<u64>(),
    ) {
        let cache = TableCache::new();
        let config = SimulationConfig {
            dim,
            degree,
            p,
            n,
            m,
            granularity,
            seed,
            max_steps: 15,
            ..SimulationConfig::default()
        };

        let mut engine = SimulationEngine::seeded(&config, &cache, AbortSignal::new()).unwrap();
        while !engine.status().is_terminal() {
            let snapshot = engine.advance();
            for &c in &snapshot.credences {
                prop_assert!((0.0..=1.0).contains(&c), "credence {} out of range", c);
            }
            let entropy = snapshot.entropy.unwrap();
            prop_assert!(entropy >= 0.0 && entropy.is_finite());
        }
        prop_assert_eq!(engine.entropy_trace().len() as u64, engine.step());
    }
}
