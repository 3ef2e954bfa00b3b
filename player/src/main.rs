use spillway::builder::StageBuilder;
use spillway::{Engine, Location, PieceId, ResolveStep};

fn main() {
    let config = StageBuilder::with_dims((5, 4))
        .weight(PieceId::Straight, 4.0)
        .weight(PieceId::Elbow, 3.0)
        .weight(PieceId::Tee, 1.0)
        .weight(PieceId::Cap, 1.0)
        .fill_rows(4)
        .seed(2024)
        .goal(2)
        .build()
        .unwrap();
    let mut engine = Engine::new(config).unwrap();

    // a straight run along the bottom row, with one piece knocked out of line
    engine.load_layout("┌┐╷┘╶
└┤┬╵│
┼╴┘┌┐
──│──
").unwrap();
    println!("{}", engine);

    let outcome = engine.resolve_all().unwrap();
    assert_eq!(outcome.flows_gained, 0);

    engine.rotate_cw(Location(2, 3));
    println!("{}", engine);

    let outcome = engine.resolve_all().unwrap();
    for step in &outcome.steps {
        match step {
            ResolveStep::Water { cells } => println!("water through {} cells", cells.len()),
            ResolveStep::Clear { cells } => println!("cleared {} cells", cells.len()),
            ResolveStep::Drop { moves } => println!("{} tiles dropped", moves.len()),
            ResolveStep::Shift { moves } => println!("{} tiles shifted", moves.len()),
            ResolveStep::FlowCount { delta } => println!("flows +{}", delta),
        }
    }
    assert!(outcome.flows_gained >= 1);

    println!("{}", engine);
    println!("{} of {} flows, seed {}", engine.flows_gained(), engine.stage_config().goal.flows_to_clear, engine.seed());
}
