use battleships::{BattleEngine, Coordinate, MatchConfig, PlacementError, Seat, ShipId};
use proptest::prelude::*;

const SIZE: usize = 10;

fn engine(fleet: Vec<usize>) -> BattleEngine {
    let config = MatchConfig::new("P1", "P2", SIZE, SIZE, fleet.clone(), fleet);
    BattleEngine::with_config(&config).unwrap()
}

fn line() -> impl Strategy<Value = (Coordinate, Coordinate)> {
    (0..SIZE, 0..SIZE, 1..=5usize, any::<bool>()).prop_filter_map(
        "ship must fit on the board",
        |(row, col, len, horizontal)| {
            let end = if horizontal {
                Coordinate::new(row, col + len - 1)
            } else {
                Coordinate::new(row + len - 1, col)
            };
            (end.row < SIZE && end.col < SIZE).then(|| (Coordinate::new(row, col), end))
        },
    )
}

/// Every cell between the two ends of a line.
fn path((start, end): (Coordinate, Coordinate)) -> Vec<Coordinate> {
    let mut cells = Vec::new();
    for row in start.row.min(end.row)..=start.row.max(end.row) {
        for col in start.col.min(end.col)..=start.col.max(end.col) {
            cells.push(Coordinate::new(row, col));
        }
    }
    cells
}

fn span(start: Coordinate, end: Coordinate) -> usize {
    start.row.abs_diff(end.row) + start.col.abs_diff(end.col) + 1
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn placed_ship_covers_exactly_its_length((start, end) in line(), reversed in any::<bool>()) {
        let length = span(start, end);
        let mut engine = engine(vec![length]);
        let (a, b) = if reversed { (end, start) } else { (start, end) };
        engine.place_ship(Seat::First, ShipId(0), a, b).unwrap();

        let ship = engine.ship(Seat::First, ShipId(0)).unwrap();
        prop_assert_eq!(ship.positions().len(), length);
        prop_assert_eq!(engine.grid(Seat::First).unwrap().occupied_by(ShipId(0)), length);
        for &coord in ship.positions() {
            let cell = engine.grid(Seat::First).unwrap().cell(coord).unwrap();
            prop_assert_eq!(cell.ship(), Some(ShipId(0)));
        }
    }

    #[test]
    fn wrong_length_never_touches_the_grid((start, end) in line(), extra in 1..3usize) {
        let mut engine = engine(vec![span(start, end) + extra]);
        let before = engine.grid(Seat::First).unwrap().clone();
        prop_assert!(engine.place_ship(Seat::First, ShipId(0), start, end).is_err());
        prop_assert_eq!(engine.grid(Seat::First).unwrap(), &before);
    }

    #[test]
    fn placements_succeed_iff_paths_are_disjoint(first in line(), second in line()) {
        let intersect = path(first).iter().any(|c| path(second).contains(c));
        let fleet = vec![span(first.0, first.1), span(second.0, second.1)];
        let mut forward = engine(fleet.clone());
        let mut backward = engine(fleet);

        prop_assert!(forward.place_ship(Seat::First, ShipId(0), first.0, first.1).is_ok());
        let f2 = forward.place_ship(Seat::First, ShipId(1), second.0, second.1);
        prop_assert!(backward.place_ship(Seat::First, ShipId(1), second.0, second.1).is_ok());
        let b1 = backward.place_ship(Seat::First, ShipId(0), first.0, first.1);

        prop_assert_eq!(f2.is_ok(), !intersect);
        prop_assert_eq!(b1.is_ok(), !intersect);
        if intersect {
            prop_assert_eq!(f2, Err(PlacementError::Overlap));
            prop_assert_eq!(b1, Err(PlacementError::Overlap));
            prop_assert_eq!(forward.grid(Seat::First).unwrap().occupied_by(ShipId(1)), 0);
            prop_assert_eq!(backward.grid(Seat::First).unwrap().occupied_by(ShipId(0)), 0);
            prop_assert_eq!(
                forward.grid(Seat::First).unwrap().occupied_by(ShipId(0)),
                span(first.0, first.1)
            );
        } else {
            prop_assert_eq!(forward.grid(Seat::First), backward.grid(Seat::First));
        }
    }
}
