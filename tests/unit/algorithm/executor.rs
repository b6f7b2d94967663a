//! Tests for solver construction, boundary seeding and the iteration loop

#[cfg(test)]
mod tests {
    use tilewave::TilewaveError;
    use tilewave::algorithm::executor::{
        BoundaryMode, GeneratedGrid, SolveState, SolverConfig, WaveSolver,
    };
    use tilewave::catalog::modules::{ModuleId, ModuleRegistry, SymmetryClass};
    use tilewave::catalog::patterns::{PatternCatalog, PatternKey};
    use tilewave::math::rotation::Rotation;
    use tilewave::spatial::grid::Grid3;
    use tilewave::spatial::neighborhood::Offset;

    fn registry() -> ModuleRegistry {
        let mut registry = ModuleRegistry::new();
        registry.set_symmetry("Air", SymmetryClass::FourWay);
        registry.set_symmetry("Base", SymmetryClass::FourWay);
        registry.identity_of("Air", Rotation::R0);
        registry.identity_of("Base", Rotation::R0);
        registry
    }

    fn column_catalog() -> PatternCatalog {
        let (air, base) = (ModuleId(0), ModuleId(1));
        let mut catalog = PatternCatalog::new();
        for (a, b, offset, count) in [
            (base, base, Offset::UP, 2),
            (base, air, Offset::UP, 1),
            (air, air, Offset::UP, 3),
            (base, base, Offset::DOWN, 2),
            (air, base, Offset::DOWN, 1),
            (air, air, Offset::DOWN, 3),
        ] {
            catalog.record(PatternKey::new(a, b, offset), count).unwrap();
        }
        catalog
    }

    fn config(boundary: BoundaryMode) -> SolverConfig {
        SolverConfig {
            ground: Some(ModuleId(1)),
            ceiling: Some(ModuleId(0)),
            boundary,
        }
    }

    // Tests zero and oversized dimensions are rejected up front
    // Verified by removing the dimension check
    #[test]
    fn test_rejects_invalid_dimensions() {
        let registry = registry();
        for dims in [[0, 1, 1], [1, 0, 1], [1, 1, 20_000]] {
            let result = WaveSolver::with_seed(
                column_catalog(),
                &registry,
                dims,
                SolverConfig::default(),
                1,
            );
            assert!(matches!(
                result,
                Err(TilewaveError::InvalidParameter { .. })
            ));
        }
    }

    // Tests an empty catalog is invalid source data
    #[test]
    fn test_rejects_empty_catalog() {
        let result = WaveSolver::with_seed(
            PatternCatalog::new(),
            &registry(),
            [1, 1, 1],
            SolverConfig::default(),
            1,
        );
        assert!(matches!(result, Err(TilewaveError::InvalidSourceData { .. })));
    }

    // Tests catalogs referencing unregistered modules are refused
    // Verified by skipping catalog validation
    #[test]
    fn test_rejects_unregistered_modules() {
        let mut catalog = column_catalog();
        catalog
            .record(PatternKey::new(ModuleId(5), ModuleId(0), Offset::UP), 1)
            .unwrap();
        let result =
            WaveSolver::with_seed(catalog, &registry(), [1, 2, 1], SolverConfig::default(), 1);
        assert!(matches!(
            result,
            Err(TilewaveError::UnknownModule { id: ModuleId(5), .. })
        ));

        let bad_ground = SolverConfig {
            ground: Some(ModuleId(9)),
            ..SolverConfig::default()
        };
        let result = WaveSolver::with_seed(column_catalog(), &registry(), [1, 2, 1], bad_ground, 1);
        assert!(matches!(result, Err(TilewaveError::UnknownModule { .. })));
    }

    // Tests the state machine walks from initializing to solved
    // Verified by leaving the state at Selecting after the final iteration
    #[test]
    fn test_state_transitions() {
        let mut solver = WaveSolver::with_seed(
            column_catalog(),
            &registry(),
            [1, 4, 1],
            config(BoundaryMode::Propagate),
            5,
        )
        .unwrap();
        assert_eq!(solver.state(), SolveState::Initializing);

        solver.initialize().unwrap();
        assert_eq!(solver.state(), SolveState::Selecting);

        let grid = solver.run().unwrap();
        assert_eq!(solver.state(), SolveState::Solved);
        assert!(solver.state().is_terminal());
        assert!(!solver.execute_iteration().unwrap());
        assert_eq!(grid.get([0, 0, 0]), Some(ModuleId(1)));
        assert_eq!(grid.get([0, 3, 0]), Some(ModuleId(0)));
    }

    // Tests every cell ends resolved with collapsed count matching
    #[test]
    fn test_run_resolves_every_cell() {
        let mut solver = WaveSolver::with_seed(
            column_catalog(),
            &registry(),
            [2, 5, 2],
            config(BoundaryMode::Propagate),
            9,
        )
        .unwrap();
        let grid = solver.run().unwrap();

        assert_eq!(grid.dims(), [2, 5, 2]);
        assert_eq!(grid.filled_count(), 20);
        assert_eq!(solver.collapsed_count(), solver.cell_count());
        assert!(solver.propagation_stats().dequeued > 0);
    }

    // Tests both boundary modes settle the same boundary layers
    // Verified by skipping the final propagate in replicate mode
    #[test]
    fn test_boundary_modes_agree_on_layers() {
        let mut outputs = Vec::new();
        for mode in [BoundaryMode::Propagate, BoundaryMode::Replicate] {
            let mut solver =
                WaveSolver::with_seed(column_catalog(), &registry(), [3, 3, 3], config(mode), 4)
                    .unwrap();
            solver.initialize().unwrap();
            let bottom: Vec<_> = (0..3)
                .flat_map(|x| (0..3).map(move |z| [x, 0, z]))
                .map(|coord| solver.wave().resolved_module(coord, solver.catalog()))
                .collect();
            outputs.push(bottom);
        }
        assert_eq!(outputs[0], outputs[1]);
        assert!(outputs[0].iter().all(|m| *m == Some(ModuleId(1))));
    }

    // Tests the cell between incompatible seeds fails and the run stays failed
    #[test]
    fn test_contradiction_is_terminal() {
        let (air, base) = (ModuleId(0), ModuleId(1));
        let mut catalog = PatternCatalog::new();
        catalog
            .record(PatternKey::new(base, base, Offset::UP), 1)
            .unwrap();
        catalog
            .record(PatternKey::new(air, air, Offset::DOWN), 1)
            .unwrap();
        let mut solver = WaveSolver::with_seed(
            catalog,
            &registry(),
            [1, 3, 1],
            SolverConfig {
                ground: Some(base),
                ceiling: Some(air),
                boundary: BoundaryMode::Propagate,
            },
            1,
        )
        .unwrap();

        let error = solver.run().unwrap_err();
        assert!(matches!(
            error,
            TilewaveError::Contradiction { iteration: 0, .. }
        ));
        assert_eq!(solver.state(), SolveState::Contradiction);
        assert!(!solver.execute_iteration().unwrap());
    }

    #[test]
    fn test_boundary_mode_parsing() {
        assert_eq!(
            "Replicate".parse::<BoundaryMode>().unwrap(),
            BoundaryMode::Replicate
        );
        assert_eq!(BoundaryMode::Propagate.to_string(), "propagate");
        assert!("mirror".parse::<BoundaryMode>().is_err());
    }

    // Tests placements enumerate every cell including unfilled ones
    #[test]
    fn test_generated_grid_placements() {
        let mut cells = Grid3::filled([2, 1, 1], None);
        *cells.get_mut([1, 0, 0]).unwrap() = Some(ModuleId(3));
        let grid = GeneratedGrid::new(cells);

        let placements: Vec<_> = grid.placements().collect();
        assert_eq!(
            placements,
            vec![([0, 0, 0], None), ([1, 0, 0], Some(ModuleId(3)))]
        );
        assert_eq!(grid.filled_count(), 1);
        assert_eq!(grid.get([5, 0, 0]), None);
    }
}
