#[path = "../support/mod.rs"]
mod support;

use std::sync::Arc;
use std::thread;

use dice_game::{
    EventStore, GameConfig, GameEvent, GameId, GameService, HashMapEventStore, PlayerId,
    RandomDice, ServiceError, Violation,
};
use support::players;

fn service(timeout: u32) -> Arc<GameService<HashMapEventStore, RandomDice>> {
    support::init_logging();
    Arc::new(GameService::new(
        HashMapEventStore::new(),
        RandomDice::new(Some(99)),
        GameConfig::with_turn_timeout(timeout),
    ))
}

#[test]
fn stored_stream_replays_to_the_served_state() {
    let service = service(5);
    let id = service.create_game().unwrap();
    service.start_game(&id, players(&["a", "b", "c"])).unwrap();
    service.roll_dice(&id, PlayerId::from("a")).unwrap();
    service.tick(&id).unwrap();
    let served = service.roll_dice(&id, PlayerId::from("b")).unwrap();

    let records = service.repository().store().load(&id).unwrap();
    let sequences: Vec<u64> = records.iter().map(|r| r.sequence).collect();
    assert_eq!(sequences, (1..=records.len() as u64).collect::<Vec<_>>());

    let names: Vec<&str> = records.iter().map(|r| r.event_name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            GameEvent::GAME_STARTED,
            GameEvent::DICE_ROLLED,
            GameEvent::TURN_CHANGED,
            GameEvent::TURN_COUNTDOWN_UPDATED,
            GameEvent::DICE_ROLLED,
            GameEvent::TURN_CHANGED,
        ]
    );
    assert_eq!(service.game(&id).unwrap(), served);
}

#[test]
fn racing_rolls_for_one_game_are_serialized() {
    let service = service(30);
    let id = service.create_game().unwrap();
    service.start_game(&id, players(&["a", "b"])).unwrap();

    // Everyone tries to roll as "a"; exactly one may succeed.
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            let id = id.clone();
            thread::spawn(move || service.roll_dice(&id, PlayerId::from("a")))
        })
        .collect();

    let results: Vec<Result<_, ServiceError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();
    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1);
    for result in results.iter().filter_map(|r| r.as_ref().err()) {
        assert_eq!(result.violation(), Some(Violation::NotCurrentPlayer));
    }

    let records = service.repository().store().load(&id).unwrap();
    let rolls = records
        .iter()
        .filter(|r| r.event_name == GameEvent::DICE_ROLLED)
        .count();
    assert_eq!(rolls, 1);
}

#[test]
fn ticks_and_rolls_interleave_without_lost_updates() {
    let service = service(1_000);
    let id = service.create_game().unwrap();
    service.start_game(&id, players(&["a", "b"])).unwrap();

    let ticker = {
        let service = Arc::clone(&service);
        let id = id.clone();
        thread::spawn(move || {
            for _ in 0..50 {
                service.tick(&id).unwrap();
            }
        })
    };
    let roller = {
        let service = Arc::clone(&service);
        let id = id.clone();
        thread::spawn(move || service.roll_dice(&id, PlayerId::from("a")).unwrap())
    };
    ticker.join().unwrap();
    roller.join().unwrap();

    let records = service.repository().store().load(&id).unwrap();
    let ticks = records
        .iter()
        .filter(|r| r.event_name == GameEvent::TURN_COUNTDOWN_UPDATED)
        .count();
    assert_eq!(ticks, 50);

    let game = service.game(&id).unwrap();
    assert_eq!(game.turn().unwrap().current_player, PlayerId::from("b"));
    assert_eq!(game.version(), records.len() as u64);
}

#[test]
fn separate_games_progress_in_parallel() {
    let service = service(10);
    let ids: Vec<GameId> = (0..6).map(|_| service.create_game().unwrap()).collect();

    let handles: Vec<_> = ids
        .iter()
        .cloned()
        .map(|id| {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                service.start_game(&id, players(&["x", "y"])).unwrap();
                service.roll_dice(&id, PlayerId::from("x")).unwrap();
                service.roll_dice(&id, PlayerId::from("y")).unwrap()
            })
        })
        .collect();

    for handle in handles {
        let game = handle.join().unwrap();
        assert!(game.is_finished());
        assert!(!game.winners().unwrap().is_empty());
    }
    assert_eq!(service.repository().ids().unwrap().len(), ids.len());
}

#[test]
fn tick_running_only_touches_live_games() {
    let service = service(2);
    let live = service.create_game().unwrap();
    service.start_game(&live, players(&["a", "b"])).unwrap();
    let pending = service.create_game().unwrap();

    assert_eq!(service.tick_running().unwrap(), 1);
    assert_eq!(service.tick_running().unwrap(), 1);
    assert_eq!(service.tick_running().unwrap(), 1);
    assert_eq!(service.tick_running().unwrap(), 1);
    assert!(service.game(&live).unwrap().is_finished());
    assert_eq!(service.tick_running().unwrap(), 0);
    assert!(!service.game(&pending).unwrap().is_running());
}
