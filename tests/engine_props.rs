use battleships::{AttackError, BattleEngine, Coordinate, GameStatus, MatchConfig, Seat, ShipId};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

const SIZE: usize = 8;

fn random_engine(rng: &mut SmallRng) -> BattleEngine {
    let config = MatchConfig::standard("P1", "P2");
    let mut engine = BattleEngine::with_config(&config).unwrap();
    for seat in Seat::BOTH {
        for i in 0..engine.roster(seat).len() {
            engine.place_ship_randomly(seat, ShipId(i), rng).unwrap();
        }
    }
    engine
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Turn order, scoring and the end-of-game rule hold over random games.
    #[test]
    fn random_games_follow_the_rules(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut engine = random_engine(&mut rng);
        let mut hits = [0u32; 2];

        for _ in 0..(SIZE * SIZE * 4) {
            let seat = match engine.status() {
                GameStatus::Turn(seat) => seat,
                _ => break,
            };
            let sunk_before = engine.all_ships_sunk(seat.other());
            let coord = Coordinate::new(rng.random_range(0..SIZE), rng.random_range(0..SIZE));
            match engine.attack(coord) {
                Ok(outcome) => {
                    prop_assert_eq!(outcome.attacker, seat);
                    if outcome.hit {
                        hits[seat.index()] += 1;
                    }
                    if outcome.game_over {
                        prop_assert!(engine.all_ships_sunk(seat.other()));
                        prop_assert_eq!(engine.status(), GameStatus::GameOver { winner: seat });
                    } else if outcome.hit {
                        prop_assert_eq!(engine.current_seat(), Some(seat));
                    } else {
                        prop_assert_eq!(engine.current_seat(), Some(seat.other()));
                    }
                }
                Err(e) => {
                    prop_assert_eq!(e, AttackError::AlreadyAttacked);
                    prop_assert_eq!(engine.current_seat(), Some(seat));
                }
            }
            // once everything is sunk it stays sunk
            if sunk_before {
                prop_assert!(engine.all_ships_sunk(seat.other()));
            }
        }

        prop_assert_eq!(engine.score(Seat::First), hits[0]);
        prop_assert_eq!(engine.score(Seat::Second), hits[1]);
        prop_assert!(engine.drain_events().len() as u32 >= hits[0] + hits[1]);
    }

    #[test]
    fn finished_games_reject_every_attack(seed in any::<u64>(), row in 0..SIZE, col in 0..SIZE) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut engine = random_engine(&mut rng);
        let targets: Vec<Coordinate> = engine
            .roster(Seat::Second)
            .iter()
            .flat_map(|ship| ship.positions().to_vec())
            .collect();
        for coord in targets {
            engine.attack(coord).unwrap();
        }
        prop_assert!(engine.is_over());
        prop_assert_eq!(engine.score(Seat::First), 12);
        prop_assert_eq!(
            engine.attack(Coordinate::new(row, col)),
            Err(AttackError::GameAlreadyOver)
        );
    }
}
