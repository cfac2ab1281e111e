use std::collections::BTreeSet;

use proptest::prelude::*;
use sapper_core::*;

/// Valid config with at least one mine and one safe cell, plus a placement seed.
fn arb_game() -> impl Strategy<Value = (GameConfig, u64)> {
    (1u8..=12, 2u8..=12)
        .prop_flat_map(|(rows, cols)| {
            let total = mult(rows, cols);
            (Just((rows, cols)), 1..total, any::<u64>())
        })
        .prop_map(|(size, mines, seed)| (GameConfig::new_unchecked(size, mines), seed))
}

fn start(config: GameConfig, seed: u64) -> GameManager {
    let mut manager = GameManager::new();
    manager
        .start_seeded(config, seed, &mut DiscardEvents)
        .expect("config is valid");
    manager
}

fn nth_coords(board: &Board, n: usize) -> Coord2 {
    let total = board.iter_coords().count();
    board.iter_coords().nth(n % total).expect("board is not empty")
}

/// Zero region reachable from `start` plus its numbered border, computed independently of the engine.
fn expected_flood(board: &Board, start: Coord2) -> BTreeSet<Coord2> {
    let mut region = BTreeSet::from([start]);
    let mut queue = vec![start];

    while let Some(coords) = queue.pop() {
        if board.adjacent_mine_count(coords) != 0 {
            continue;
        }
        for pos in board.neighbors(coords) {
            if region.insert(pos) {
                queue.push(pos);
            }
        }
    }
    region
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn start_places_exact_mines_with_true_counts((config, seed) in arb_game()) {
        let mut events = Vec::new();
        let mut manager = GameManager::new();
        manager.start_seeded(config, seed, &mut events).unwrap();
        let board = manager.board();

        prop_assert_eq!(board.mine_coords().count(), usize::from(config.mines));
        prop_assert_eq!(events.len(), usize::from(config.mines));
        let all_mine_located = events.iter().all(|event| matches!(event, GameEvent::MineLocated { .. }));
        prop_assert!(all_mine_located);

        for coords in board.iter_coords() {
            if board.has_mine(coords) {
                continue;
            }
            let (row, col) = (i16::from(coords.0), i16::from(coords.1));
            let mut expected = 0;
            for other in board.iter_coords() {
                let (o_row, o_col) = (i16::from(other.0), i16::from(other.1));
                let touching = other != coords && (o_row - row).abs() <= 1 && (o_col - col).abs() <= 1;
                if touching && board.has_mine(other) {
                    expected += 1;
                }
            }
            prop_assert_eq!(board.adjacent_mine_count(coords), expected);
        }
    }

    #[test]
    fn revealing_twice_equals_revealing_once((config, seed) in arb_game(), pick in any::<usize>()) {
        let mut manager = start(config, seed);
        let coords = nth_coords(manager.board(), pick);

        manager.reveal_cell(coords, &mut DiscardEvents);
        let once = manager.clone();
        let mut events = Vec::new();
        let outcome = manager.reveal_cell(coords, &mut events);

        prop_assert_eq!(outcome, RevealOutcome::NoChange);
        prop_assert!(events.is_empty());
        prop_assert_eq!(manager, once);
    }

    #[test]
    fn flood_fill_reveals_exactly_the_zero_region((config, seed) in arb_game(), pick in any::<usize>()) {
        let mut manager = start(config, seed);
        let board = manager.board();
        let total = board.iter_coords().count();
        let zero_cell = (0..total)
            .map(|offset| nth_coords(board, pick.wrapping_add(offset)))
            .find(|&coords| !board.has_mine(coords) && board.adjacent_mine_count(coords) == 0);
        let Some(zero_cell) = zero_cell else {
            return Ok(());
        };
        let expected = expected_flood(board, zero_cell);

        manager.reveal_cell(zero_cell, &mut DiscardEvents);

        let board = manager.board();
        let revealed: BTreeSet<Coord2> = board.iter_coords().filter(|&pos| board.is_revealed(pos)).collect();
        prop_assert_eq!(revealed, expected);
        prop_assert!(!board.mine_triggered());
    }

    #[test]
    fn loss_leaves_no_hidden_unflagged_cell(
        (config, seed) in arb_game(),
        flags in proptest::collection::vec(any::<usize>(), 0..6),
    ) {
        let mut manager = start(config, seed);
        for pick in flags {
            let coords = nth_coords(manager.board(), pick);
            manager.flag_cell(coords, &mut DiscardEvents);
        }
        let board = manager.board();
        let Some(mine) = board.mine_coords().find(|&pos| !board.is_flagged(pos)) else {
            return Ok(());
        };
        let flagged_safe: BTreeSet<Coord2> = board
            .iter_coords()
            .filter(|&pos| board.is_flagged(pos) && !board.has_mine(pos))
            .collect();

        let mut events = Vec::new();
        let outcome = manager.reveal_cell(mine, &mut events);

        prop_assert_eq!(outcome, RevealOutcome::HitMine);
        prop_assert_eq!(manager.state(), GameState::Lost);
        let board = manager.board();
        prop_assert!(board.iter_coords().all(|pos| board.is_revealed(pos) || board.is_flagged(pos)));
        let misflagged: BTreeSet<Coord2> = events
            .iter()
            .filter_map(|event| match *event {
                GameEvent::CellMisflagged { coords } => Some(coords),
                _ => None,
            })
            .collect();
        prop_assert_eq!(misflagged, flagged_safe);
        prop_assert_eq!(events.iter().filter(|event| event.is_terminal()).count(), 1);
    }

    #[test]
    fn revealing_every_safe_cell_wins_and_flags_mines((config, seed) in arb_game()) {
        let mut manager = start(config, seed);
        let safe: Vec<Coord2> = manager
            .board()
            .iter_coords()
            .filter(|&pos| !manager.board().has_mine(pos))
            .collect();

        let mut events = Vec::new();
        for coords in safe {
            if !manager.board().is_revealed(coords) {
                manager.reveal_cell(coords, &mut events);
            }
        }

        prop_assert_eq!(manager.state(), GameState::Won);
        prop_assert_eq!(events.iter().filter(|&&event| event == GameEvent::GameWon).count(), 1);
        let board = manager.board();
        prop_assert!(board.mine_coords().all(|pos| board.is_flagged(pos) && !board.is_revealed(pos)));
        prop_assert_eq!(manager.mines_left(), 0);
    }
}
