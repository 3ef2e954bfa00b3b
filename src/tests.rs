#[cfg(test)]
mod tests {
    use crate::builder::StageBuilder;
    use crate::cell::Tile;
    use crate::config::FaucetMode;
    use crate::engine::Engine;
    use crate::error::EngineError;
    use crate::location::Location;
    use crate::piece::PieceId;
    use crate::step::{Move, ResolveStep, Source, WaterCell};

    fn engine(dims: (usize, usize), piece: PieceId, seed: u64, layout: &str) -> Engine {
        let config = StageBuilder::with_dims(dims)
            .weight(piece, 1.0)
            .seed(seed)
            .build()
            .unwrap();
        let mut engine = Engine::new(config).unwrap();
        engine.load_layout(layout).unwrap();
        engine
    }

    fn water(cells: &[(usize, usize, usize)]) -> ResolveStep {
        ResolveStep::Water {
            cells: cells.iter().map(|(x, y, distance)| WaterCell { location: Location(*x, *y), distance: *distance }).collect(),
        }
    }

    #[test]
    fn straight_run_drains() {
        // elbows can never drain a single row, so nothing follows the first flow
        let mut engine = engine((3, 1), PieceId::Elbow, 3, "───\n");

        let outcome = engine.resolve_all().unwrap();
        assert_eq!(outcome.flows_gained, 1);
        assert_eq!(outcome.steps.len(), 4);
        assert_eq!(outcome.steps[0], water(&[(0, 0, 0), (1, 0, 1), (2, 0, 2)]));
        assert_eq!(outcome.steps[1], ResolveStep::Clear { cells: vec![Location(0, 0), Location(1, 0), Location(2, 0)] });
        assert_eq!(outcome.steps[2], ResolveStep::FlowCount { delta: 1 });

        let ResolveStep::Drop { moves } = &outcome.steps[3] else {
            panic!("expected a refill, got {:?}", outcome.steps[3]);
        };
        assert_eq!(
            moves.iter().map(|single| (single.from, single.to)).collect::<Vec<_>>(),
            vec![
                (Source::OffGrid { column: 0, depth: 1 }, Location(0, 0)),
                (Source::OffGrid { column: 1, depth: 1 }, Location(1, 0)),
                (Source::OffGrid { column: 2, depth: 1 }, Location(2, 0)),
            ],
        );
        assert!(moves.iter().all(|single| single.tile.piece == PieceId::Elbow));

        assert_eq!(engine.flows_gained(), 1);
        assert!(engine.is_goal_met());
        assert!(engine.grid().is_full());
    }

    #[test]
    fn blocked_run_stays() {
        let mut engine = engine((3, 1), PieceId::Elbow, 3, "─│─\n");

        let outcome = engine.resolve_all().unwrap();
        assert_eq!(outcome.flows_gained, 0);
        assert!(outcome.steps.is_empty());
        assert_eq!(format!("{}", engine), "─│─
");
        assert!(!engine.is_goal_met());
    }

    #[test]
    fn rotate_to_complete() {
        let mut engine = engine((3, 1), PieceId::Elbow, 3, "─│─\n");

        engine.rotate_cw(Location(1, 0));
        assert_eq!(format!("{}", engine), "───
");
        assert_eq!(engine.resolve_all().unwrap().flows_gained, 1);
    }

    #[test]
    fn rotation_is_cyclic() {
        let mut engine = engine((2, 2), PieceId::Cap, 1, "┬╴\n.┘\n");

        for _ in 0..4 {
            engine.rotate_cw(Location(0, 0));
        }
        assert_eq!(engine.get_cell(Location(0, 0)), Some(Tile::new(PieceId::Tee, 0)));

        engine.rotate_cw(Location(0, 0));
        engine.rotate_cw(Location(1, 0));
        // empty and off-board cells are ignored
        engine.rotate_cw(Location(0, 1));
        engine.rotate_cw(Location(5, 5));
        assert_eq!(format!("{}", engine), "┤╵
.┘
");
    }

    #[test]
    fn lower_row_drains_and_the_top_falls() {
        let mut engine = engine((3, 2), PieceId::Cap, 7, "╴│╴\n─│─\n");

        engine.rotate_cw(Location(1, 1));
        let outcome = engine.resolve_all().unwrap();

        assert_eq!(outcome.flows_gained, 1);
        assert_eq!(outcome.steps.len(), 5);
        assert_eq!(outcome.steps[0], water(&[(0, 1, 0), (1, 1, 1), (2, 1, 2)]));
        assert_eq!(outcome.steps[3], ResolveStep::Drop {
            moves: vec![
                Move { from: Source::Cell(Location(0, 0)), to: Location(0, 1), tile: Tile::new(PieceId::Cap, 2) },
                Move { from: Source::Cell(Location(1, 0)), to: Location(1, 1), tile: Tile::new(PieceId::Straight, 1) },
                Move { from: Source::Cell(Location(2, 0)), to: Location(2, 1), tile: Tile::new(PieceId::Cap, 2) },
            ],
        });
        assert!(matches!(&outcome.steps[4], ResolveStep::Drop { moves } if moves.len() == 3));

        assert_eq!(format!("{}", engine).lines().nth(1), Some("╴│╴"));
    }

    #[test]
    fn swap_then_swap_back() {
        let mut engine = engine((3, 2), PieceId::Cap, 7, "╴│╴\n─┼─\n");

        engine.swap_cells(Location(1, 0), Location(1, 1));
        assert_eq!(format!("{}", engine), "╴┼╴
─│─
");

        engine.swap_cells(Location(1, 1), Location(1, 0));
        assert_eq!(format!("{}", engine), "╴│╴
─┼─
");

        // no-ops
        engine.swap_cells(Location(0, 0), Location(0, 0));
        engine.swap_cells(Location(0, 0), Location(3, 0));
        assert_eq!(format!("{}", engine), "╴│╴
─┼─
");
    }

    #[test]
    fn swap_with_an_empty_cell() {
        let mut engine = engine((2, 1), PieceId::Cap, 7, "┼.\n");
        engine.swap_cells(Location(0, 0), Location(1, 0));
        assert_eq!(format!("{}", engine), ".┼
");
    }

    #[test]
    fn shift_carries_the_head_to_the_tail() {
        let mut engine = engine((3, 2), PieceId::Cap, 7, "╴│─\n┌┘.\n");

        let moves = engine.shift_along_path(&[Location(0, 0), Location(1, 0), Location(1, 1)]);
        assert_eq!(format!("{}", engine), "│┘─
┌╴.
");
        assert_eq!(moves, vec![
            Move { from: Source::Cell(Location(0, 0)), to: Location(1, 1), tile: Tile::new(PieceId::Cap, 2) },
            Move { from: Source::Cell(Location(1, 0)), to: Location(0, 0), tile: Tile::new(PieceId::Straight, 1) },
            Move { from: Source::Cell(Location(1, 1)), to: Location(1, 0), tile: Tile::new(PieceId::Elbow, 3) },
        ]);
    }

    #[test]
    fn drag_moves_log_as_a_shift() {
        let mut engine = engine((3, 2), PieceId::Cap, 7, "╴│─\n┌┘.\n");

        let moves = engine.shift_along_path(&[Location(0, 0), Location(1, 0), Location(1, 1)]);
        let step = ResolveStep::shift(moves.clone()).unwrap();
        assert_eq!(step, ResolveStep::Shift { moves });

        let json = serde_json::to_string(&step).unwrap();
        assert!(json.starts_with(r#"{"kind":"SHIFT","moves":["#));
        assert_eq!(serde_json::from_str::<ResolveStep>(&json).unwrap(), step);

        // a rejected drag has nothing to log
        assert_eq!(ResolveStep::shift(engine.shift_along_path(&[Location(0, 0)])), None);
    }

    #[test]
    fn shift_rejects_bad_paths() {
        let mut engine = engine((3, 2), PieceId::Cap, 7, "╴│─\n┌┘.\n");
        let before = format!("{}", engine);

        assert!(engine.shift_along_path(&[Location(0, 0)]).is_empty());
        assert!(engine.shift_along_path(&[Location(1, 1), Location(2, 1)]).is_empty());
        assert!(engine.shift_along_path(&[Location(2, 0), Location(3, 0)]).is_empty());
        assert!(engine.shift_along_path(&[Location(0, 0), Location(1, 0), Location(0, 0)]).is_empty());
        assert_eq!(format!("{}", engine), before);
    }

    #[test]
    fn arrow_clears_its_line() {
        let mut engine = engine((4, 2), PieceId::Cap, 7, "╴╴╴╴\n→─.╴\n");

        let steps = engine.trigger_at(Location(0, 1)).unwrap();
        assert_eq!(steps[0], ResolveStep::Clear { cells: vec![Location(0, 1), Location(1, 1)] });
        assert_eq!(steps[1], ResolveStep::Drop {
            moves: (0..3)
                .map(|x| Move { from: Source::Cell(Location(x, 0)), to: Location(x, 1), tile: Tile::new(PieceId::Cap, 2) })
                .collect(),
        });
        assert!(matches!(&steps[2], ResolveStep::Drop { moves } if moves.len() == 3));
        assert_eq!(steps.len(), 3);

        assert_eq!(format!("{}", engine).lines().nth(1), Some("╴╴╴╴"));
        assert!(engine.grid().is_full());
        assert_eq!(engine.flows_gained(), 0);
    }

    #[test]
    fn arrow_stops_at_the_edge() {
        let mut engine = engine((3, 3), PieceId::Cap, 7, "╴╴╴\n╴╴╴\n╴↑╴\n");

        let steps = engine.trigger_at(Location(1, 2)).unwrap();
        assert_eq!(steps[0], ResolveStep::Clear { cells: vec![Location(1, 2), Location(1, 1), Location(1, 0)] });
        // the whole column was cleared, so nothing falls and three tiles come in
        assert_eq!(steps.len(), 2);
        assert!(matches!(&steps[1], ResolveStep::Drop { moves } if moves.len() == 3));
    }

    #[test]
    fn only_arrows_fire() {
        let mut engine = engine((3, 1), PieceId::Cap, 7, "─.→\n");

        assert!(engine.trigger_at(Location(0, 0)).unwrap().is_empty());
        assert!(engine.trigger_at(Location(1, 0)).unwrap().is_empty());
        assert!(engine.trigger_at(Location(9, 0)).unwrap().is_empty());
        assert_eq!(format!("{}", engine), "─.→
");
    }

    #[test]
    fn arrows_block_water() {
        let mut engine = engine((3, 1), PieceId::Elbow, 3, "─→─\n");
        assert_eq!(engine.resolve_all().unwrap().flows_gained, 0);
    }

    #[test]
    fn refills_cascade() {
        // from seed 1 the first five straights all come out horizontal
        let config = StageBuilder::with_dims((1, 1))
            .weight(PieceId::Straight, 1.0)
            .seed(1)
            .goal(5)
            .build()
            .unwrap();
        let mut engine = Engine::new(config).unwrap();
        assert_eq!(format!("{}", engine), "─
");

        let outcome = engine.resolve_all().unwrap();
        assert_eq!(outcome.flows_gained, 5);
        assert_eq!(
            outcome.steps.iter().filter(|step| matches!(step, ResolveStep::Clear { .. })).count(),
            5,
        );
        assert_eq!(format!("{}", engine), "│
");
        assert!(engine.is_goal_met());
    }

    #[test]
    fn runaway_resolve_is_an_error() {
        let config = StageBuilder::with_dims((1, 1))
            .weight(PieceId::Straight, 1.0)
            .seed(1)
            .max_passes(3)
            .build()
            .unwrap();
        let mut engine = Engine::new(config).unwrap();

        let Err(EngineError::PassLimitExceeded { limit, applied }) = engine.resolve_all() else {
            panic!("expected the pass cap to trip");
        };
        assert_eq!(limit, 3);
        assert_eq!(engine.flows_gained(), 3);

        // the log covers exactly the three clears already on the board
        assert_eq!(applied.iter().filter(|step| matches!(step, ResolveStep::Clear { .. })).count(), 3);
        assert_eq!(applied.iter().filter(|step| matches!(step, ResolveStep::FlowCount { .. })).count(), 3);
        let ResolveStep::Drop { moves } = applied.last().unwrap() else {
            panic!("expected the log to end with a refill");
        };
        assert_eq!(engine.get_cell(Location(0, 0)), Some(moves[0].tile));
    }

    #[test]
    fn single_refill_settles() {
        let config = StageBuilder::with_dims((1, 1))
            .weight(PieceId::Straight, 1.0)
            .seed(2)
            .build()
            .unwrap();
        let mut engine = Engine::new(config).unwrap();

        assert_eq!(engine.resolve_all().unwrap().flows_gained, 1);
        assert_eq!(format!("{}", engine), "│
");
        assert_eq!(engine.resolve_all().unwrap().flows_gained, 0);
    }

    #[test]
    fn first_inlet_wins() {
        let mut engine = engine((3, 2), PieceId::Cap, 7, "───\n───\n");

        let outcome = engine.resolve_all().unwrap();
        assert_eq!(outcome.steps[0], water(&[(0, 0, 0), (1, 0, 1), (2, 0, 2)]));
        // the bottom row stays put while the top refills, and drains on the next pass
        assert_eq!(outcome.steps[4], water(&[(0, 1, 0), (1, 1, 1), (2, 1, 2)]));
        assert_eq!(outcome.flows_gained, 2);
    }

    #[test]
    fn disabled_outlet_keeps_the_run() {
        let config = StageBuilder::with_dims((3, 2))
            .outlets(&[1])
            .weight(PieceId::Cap, 1.0)
            .seed(7)
            .build()
            .unwrap();
        let mut engine = Engine::new(config).unwrap();
        engine.load_layout("───\n╴╴╴\n").unwrap();

        assert_eq!(engine.resolve_all().unwrap().flows_gained, 0);
        assert_eq!(engine.drain_cells(), vec![Location(2, 1)]);
        assert_eq!(engine.inlet_cells(), vec![Location(0, 0), Location(0, 1)]);
    }

    #[test]
    fn vertical_faucets() {
        let config = StageBuilder::with_dims((2, 3))
            .faucets(FaucetMode::TopToBottom)
            .inlets(&[1])
            .weight(PieceId::Cap, 1.0)
            .seed(7)
            .build()
            .unwrap();
        let mut engine = Engine::new(config).unwrap();
        engine.load_layout("╴│\n╴│\n╴│\n").unwrap();

        let outcome = engine.resolve_all().unwrap();
        assert_eq!(outcome.steps[0], water(&[(1, 0, 0), (1, 1, 1), (1, 2, 2)]));
        assert_eq!(outcome.flows_gained, 1);
    }

    #[test]
    fn stage_from_json() {
        let mut engine = Engine::from_json(r#"{
            "board": { "width": 3, "height": 1 },
            "faucets": { "mode": "LEFT_TO_RIGHT", "inlets": "ALL", "outlets": [0] },
            "deck": { "weights": { "L2": 1.0, "I2": 0.0 }, "rngSeed": 3 },
            "goal": { "flowsToClear": 1 }
        }"#).unwrap();

        assert_eq!(engine.seed(), 3);
        assert_eq!((engine.width(), engine.height()), (3, 1));
        assert!(engine.grid().tiles().all(|(_, tile)| tile.piece == PieceId::Elbow));

        engine.load_layout("───\n").unwrap();
        assert_eq!(engine.resolve_all().unwrap().flows_gained, 1);
    }

    #[test]
    fn bad_stages_are_refused() {
        let zero = Engine::from_json(r#"{
            "board": { "width": 0, "height": 4 },
            "faucets": { "mode": "LEFT_TO_RIGHT", "inlets": "ALL", "outlets": "ALL" },
            "deck": { "weights": { "I2": 1.0 } },
            "goal": { "flowsToClear": 1 }
        }"#);
        assert!(matches!(zero, Err(EngineError::InvalidStage(_))));

        let unselectable = Engine::from_json(r#"{
            "board": { "width": 2, "height": 2 },
            "faucets": { "mode": "LEFT_TO_RIGHT", "inlets": "ALL", "outlets": "ALL" },
            "deck": { "enabledPieces": ["X4"], "weights": { "I2": 1.0 } },
            "goal": { "flowsToClear": 1 }
        }"#);
        assert!(matches!(unselectable, Err(EngineError::InvalidStage(_))));

        let garbled = Engine::from_json("{ \"board\": 3 }");
        assert!(matches!(garbled, Err(EngineError::Parse(_))));
    }

    #[test]
    fn partial_initial_fill() {
        let config = StageBuilder::with_dims((2, 3))
            .weight(PieceId::Cross, 1.0)
            .fill_rows(1)
            .seed(9)
            .build()
            .unwrap();
        let engine = Engine::new(config).unwrap();

        assert_eq!(format!("{}", engine), "..
..
┼┼
");
    }

    #[test]
    fn layouts_must_fit() {
        let mut engine = engine((3, 1), PieceId::Cap, 7, "───\n");

        assert!(matches!(engine.load_layout("──\n"), Err(EngineError::Layout(_))));
        assert!(matches!(engine.load_layout("─x─\n"), Err(EngineError::Layout(_))));
        assert_eq!(format!("{}", engine), "───
");
    }

    #[test]
    fn place_and_read_back() {
        let mut engine = engine((2, 1), PieceId::Cap, 7, "..\n");

        assert_eq!(engine.place(Location(1, 0), Some(Tile::new(PieceId::Arrow, 3))), None);
        assert_eq!(engine.place(Location(2, 0), Some(Tile::new(PieceId::Cap, 0))), None);
        assert_eq!(engine.get_cell(Location(1, 0)), Some(Tile::new(PieceId::Arrow, 3)));
        assert_eq!(engine.get_cell(Location(2, 0)), None);
        assert!(!engine.in_bounds(Location(2, 0)));
        assert_eq!(format!("{}", engine), ".←
");
    }

    #[test]
    fn stored_tile_with_wild_rotation_turns_cleanly() {
        let mut engine = engine((2, 1), PieceId::Cap, 7, "..\n");
        let tile: Tile = serde_json::from_str(r#"{"piece":"I2","rotation":255}"#).unwrap();

        engine.place(Location(0, 0), Some(tile));
        assert_eq!(engine.get_cell(Location(0, 0)).map(|tile| tile.rotation()), Some(3));
        assert_eq!(format!("{}", engine), "│.\n");

        for turn in 1..=5u8 {
            engine.rotate_cw(Location(0, 0));
            assert_eq!(engine.get_cell(Location(0, 0)), Some(Tile::new(PieceId::Straight, 3 + turn)));
        }
        assert_eq!(format!("{}", engine), "─.\n");
    }
}
