#[path = "../support/mod.rs"]
mod support;

use std::collections::BTreeSet;

use dice_game::{Command, Game, GameEvent, GameId, PlayerId, ScriptedDice, Turn, Violation};
use support::{players, roll, start, tick_down_to, TIMEOUT};

fn winners(names: &[&str]) -> BTreeSet<PlayerId> {
    names.iter().map(|name| PlayerId::from(*name)).collect()
}

#[test]
fn too_few_players_leaves_game_uninitialized() {
    support::init_logging();
    let game = Game::create(GameId::from("game-1"));
    let result = game.handle_command(
        Command::StartGame {
            players: players(&["solo"]),
        },
        TIMEOUT,
        &mut ScriptedDice::default(),
    );

    assert_eq!(result, Err(Violation::NotEnoughPlayers));
    assert!(!game.is_running());
    assert!(game.new_events().is_empty());
}

#[test]
fn starting_twice_is_rejected_in_every_later_state() {
    let running = start(&["a", "b"]);
    let finished = roll(&roll(&running, "a", 1).unwrap(), "b", 2).unwrap();

    for game in [running, finished] {
        let result = game.handle_command(
            Command::StartGame {
                players: players(&["x", "y"]),
            },
            TIMEOUT,
            &mut ScriptedDice::default(),
        );
        assert_eq!(result, Err(Violation::GameAlreadyStarted));
    }
}

#[test]
fn rolling_needs_a_running_game() {
    let fresh = Game::create(GameId::from("game-1"));
    assert_eq!(roll(&fresh, "a", 3), Err(Violation::GameNotRunning));

    let finished = roll(&roll(&start(&["a", "b"]), "a", 1).unwrap(), "b", 2).unwrap();
    assert_eq!(roll(&finished, "b", 3), Err(Violation::GameNotRunning));
}

#[test]
fn rolling_out_of_turn_changes_nothing() {
    let game = start(&["a", "b", "c"]);
    let snapshot = game.clone();

    assert_eq!(roll(&game, "c", 6), Err(Violation::NotCurrentPlayer));
    assert_eq!(game, snapshot);
}

#[test]
fn three_players_play_one_round_without_wraparound() {
    let game = start(&["a", "b", "c"]);
    assert_eq!(game.turn().unwrap().current_player, PlayerId::from("a"));

    let game = roll(&game, "a", 2).unwrap();
    assert_eq!(game.turn().unwrap().current_player, PlayerId::from("b"));

    let game = roll(&game, "b", 4).unwrap();
    assert_eq!(game.turn().unwrap().current_player, PlayerId::from("c"));

    let game = roll(&game, "c", 1).unwrap();
    assert!(game.is_finished());
    assert_eq!(game.winners(), Some(&winners(&["b"])));
    assert_eq!(game.players(), players(&["a", "b", "c"]).as_slice());
}

#[test]
fn double_six_ties() {
    let game = roll(&roll(&start(&["a", "b"]), "a", 6).unwrap(), "b", 6).unwrap();
    assert_eq!(game.winners(), Some(&winners(&["a", "b"])));
}

#[test]
fn three_beats_five_loses() {
    let game = roll(&roll(&start(&["a", "b"]), "a", 3).unwrap(), "b", 5).unwrap();
    assert_eq!(game.winners(), Some(&winners(&["b"])));
}

#[test]
fn countdown_ticks_one_second() {
    let game = tick_down_to(start(&["a", "b"]), 5).mark_committed();
    let ticked = game.tick_countdown(TIMEOUT);

    assert!(ticked.is_running());
    assert_eq!(ticked.turn(), Some(&Turn::new(PlayerId::from("a"), 4)));
}

#[test]
fn last_player_timing_out_finishes_with_earlier_rolls() {
    let game = roll(&start(&["a", "b"]), "a", 5).unwrap();
    let game = tick_down_to(game, 1).mark_committed();

    let finished = game.tick_countdown(TIMEOUT);
    assert!(finished.is_finished());
    assert_eq!(finished.winners(), Some(&winners(&["a"])));
    assert_eq!(
        finished.new_events(),
        &[
            GameEvent::TurnCountdownUpdated { seconds_left: 0 },
            GameEvent::TurnTimedOut,
            GameEvent::GameFinished {
                winners: winners(&["a"])
            },
        ]
    );
}

#[test]
fn everybody_timing_out_finishes_with_no_winner() {
    let game = start(&["a", "b"]);
    let game = tick_down_to(game, 1).tick_countdown(TIMEOUT);
    assert_eq!(game.turn(), Some(&Turn::new(PlayerId::from("b"), TIMEOUT)));

    let game = tick_down_to(game, 1).tick_countdown(TIMEOUT);
    assert!(game.is_finished());
    assert_eq!(game.winners(), Some(&BTreeSet::new()));
}

#[test]
fn timed_out_player_cannot_roll_later() {
    let game = tick_down_to(start(&["a", "b", "c"]), 1).tick_countdown(TIMEOUT);
    assert_eq!(roll(&game, "a", 6), Err(Violation::NotCurrentPlayer));

    let game = roll(&game, "b", 2).unwrap();
    let game = roll(&game, "c", 3).unwrap();
    assert_eq!(game.winners(), Some(&winners(&["c"])));
}

#[test]
fn finished_game_accepts_no_events() {
    let game = roll(&roll(&start(&["a", "b"]), "a", 1).unwrap(), "b", 2).unwrap();
    assert!(game.clone().apply_event(GameEvent::TurnTimedOut).is_err());
    assert_eq!(game.tick_countdown(TIMEOUT), game);
}
