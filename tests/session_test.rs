//! Tests for the room state machine and registry.

use std::collections::HashSet;
use std::thread;
use strictly_ludo::{
    Action, ActionOutcome, Color, DieValue, GameSession, GameStatus, LudoError, PieceId, Position,
    RoomRegistry,
};

fn die(value: u8) -> DieValue {
    DieValue::new(value).expect("valid die")
}

fn joined(colors: &[Color]) -> GameSession {
    let mut session = GameSession::new("room-1".to_string());
    for (i, color) in colors.iter().enumerate() {
        session
            .join(format!("Player {}", i), *color)
            .expect("join should succeed");
    }
    session
}

fn piece(session: &GameSession, player: usize, index: usize) -> PieceId {
    session.players()[player].pieces()[index].id().clone()
}

fn active_count(session: &GameSession) -> usize {
    session.players().iter().filter(|p| *p.is_active()).count()
}

#[test]
fn test_new_session_is_waiting() {
    let session = GameSession::new("room-1".to_string());
    assert_eq!(*session.status(), GameStatus::Waiting);
    assert!(session.players().is_empty());
    assert_eq!(*session.dice_value(), None);
    assert_eq!(*session.winner(), None);
    assert_eq!(session.board().cells().len(), 225);
}

#[test]
fn test_join_rejects_taken_color_and_full_room() {
    let mut session = joined(&[Color::Red, Color::Green, Color::Yellow]);

    assert_eq!(
        session.join("Eve".into(), Color::Red),
        Err(LudoError::ColorTaken(Color::Red))
    );
    session.join("Dan".into(), Color::Blue).unwrap();
    assert_eq!(
        session.join("Eve".into(), Color::Blue),
        Err(LudoError::ColorTaken(Color::Blue))
    );
    assert_eq!(session.players().len(), 4);

    let colors: HashSet<_> = session.players().iter().map(|p| *p.color()).collect();
    assert_eq!(colors.len(), 4);
    assert!(session.players().iter().all(|p| !*p.is_active()));
}

#[test]
fn test_start_requires_two_players() {
    let mut session = joined(&[Color::Red]);
    assert_eq!(session.start(), Err(LudoError::NotEnoughPlayers(1)));
    assert_eq!(*session.status(), GameStatus::Waiting);

    session.join("Bob".into(), Color::Blue).unwrap();
    session.start().unwrap();
    assert_eq!(*session.status(), GameStatus::Playing);
    assert_eq!(*session.current_player_index(), 0);
    assert!(*session.players()[0].is_active());
    assert_eq!(active_count(&session), 1);

    assert!(matches!(
        session.start(),
        Err(LudoError::InvalidGameStatus { .. })
    ));
    assert!(matches!(
        session.join("Carol".into(), Color::Green),
        Err(LudoError::InvalidGameStatus { .. })
    ));
}

#[test]
fn test_roll_requires_playing() {
    let mut session = joined(&[Color::Red, Color::Blue]);
    assert_eq!(
        session.roll_dice(None),
        Err(LudoError::InvalidGameStatus {
            expected: GameStatus::Playing,
            actual: GameStatus::Waiting
        })
    );
}

#[test]
fn test_random_rolls_stay_in_range() {
    let mut session = joined(&[Color::Red, Color::Blue]);
    session.start().unwrap();
    for _ in 0..100 {
        let (value, _) = session.roll_dice(None).unwrap();
        assert!((1..=6).contains(&value.get()));
        assert_eq!(active_count(&session), 1);
    }
}

#[test]
fn test_roll_out_of_turn_is_rejected() {
    let mut session = joined(&[Color::Red, Color::Blue]);
    session.start().unwrap();
    let before = session.clone();

    assert_eq!(
        session.record_roll(Some(Color::Blue), die(6)),
        Err(LudoError::NotYourTurn(Color::Red))
    );
    assert_eq!(session, before);
}

#[test]
fn test_alice_and_bob_scenario() {
    let mut session = joined(&[Color::Red, Color::Blue]);
    session.start().unwrap();
    let red0 = piece(&session, 0, 0);

    // A six brings a piece from home to its start square.
    let (_, passed) = session.record_roll(Some(Color::Red), die(6)).unwrap();
    assert!(!passed);
    let report = session.move_piece(&red0, 6).unwrap();
    assert_eq!(report.original_position, Position::Home);
    assert_eq!(report.new_position, Position::Start);
    assert!(*session.players()[1].is_active());

    // Bob has nothing to move with a 2.
    let (_, passed) = session.record_roll(Some(Color::Blue), die(2)).unwrap();
    assert!(passed);
    assert_eq!(*session.current_player_index(), 0);

    // Red has a start piece, but a 4 does not release it.
    let (_, passed) = session.record_roll(Some(Color::Red), die(4)).unwrap();
    assert!(passed);

    // Bob passes again, then red's start piece enters the path with a six.
    session.record_roll(None, die(1)).unwrap();
    session.record_roll(None, die(6)).unwrap();
    let report = session.move_piece(&red0, 6).unwrap();
    assert_eq!(report.original_position, Position::Start);
    assert_eq!(report.new_position, Position::path(1).unwrap());
    assert_eq!(*session.current_player_index(), 1);
    assert_eq!(*session.dice_value(), None);
}

#[test]
fn test_rejected_moves_leave_state_unchanged() {
    let mut session = joined(&[Color::Red, Color::Blue]);
    session.start().unwrap();
    let red0 = piece(&session, 0, 0);
    let red1 = piece(&session, 0, 1);
    session.record_roll(None, die(6)).unwrap();
    let before = session.clone();

    assert_eq!(
        session.move_piece("nope", 6),
        Err(LudoError::PieceNotFound("nope".to_string()))
    );
    assert!(matches!(session.move_piece(&red0, 7), Err(LudoError::InvalidMove(_))));
    assert!(matches!(session.move_piece(&red0, 5), Err(LudoError::InvalidMove(_))));
    assert_eq!(session, before);

    session.move_piece(&red0, 6).unwrap();
    // Die was consumed by the move.
    assert!(matches!(session.move_piece(&red1, 6), Err(LudoError::InvalidMove(_))));
}

#[test]
fn test_turn_rotation_is_cyclic() {
    let mut session = joined(&[Color::Red, Color::Green, Color::Yellow]);
    session.start().unwrap();

    let mut seen = Vec::new();
    for _ in 0..3 {
        seen.push(*session.current_player_index());
        let (_, passed) = session.record_roll(None, die(3)).unwrap();
        assert!(passed);
        assert_eq!(active_count(&session), 1);
        let active = session.active_player().unwrap();
        assert_eq!(
            active.id(),
            session.players()[*session.current_player_index()].id()
        );
    }
    assert_eq!(seen, vec![0, 1, 2]);
    assert_eq!(*session.current_player_index(), 0);
}

#[test]
fn test_rotation_after_one_move_per_player() {
    let mut session = joined(&[Color::Red, Color::Green, Color::Yellow, Color::Blue]);
    session.start().unwrap();
    let count = session.players().len();

    // First lap brings each first piece to its start square, the second
    // lap puts it on the path.
    for lap in 0..2 {
        for turn in 0..count {
            let mover = *session.current_player_index();
            assert_eq!(mover, turn, "lap {}", lap);
            let id = piece(&session, mover, 0);

            let (_, passed) = session.record_roll(None, die(6)).unwrap();
            assert!(!passed);
            session.move_piece(&id, 6).unwrap();

            assert_eq!(active_count(&session), 1);
            let active = session.active_player().unwrap();
            assert!(*active.is_active());
            assert_eq!(
                active.id(),
                session.players()[*session.current_player_index()].id()
            );
            assert_eq!(*session.current_player_index(), (mover + 1) % count);
        }
        assert_eq!(*session.current_player_index(), 0);
    }
}

#[test]
fn test_full_game_to_winner() {
    let mut session = joined(&[Color::Red, Color::Blue]);
    session.start().unwrap();

    let red_turn = |session: &mut GameSession, piece_id: &PieceId, value: u8| {
        session.record_roll(Some(Color::Red), die(value)).unwrap();
        session.move_piece(piece_id, value).unwrap()
    };
    let blue_pass = |session: &mut GameSession| {
        if *session.status() == GameStatus::Playing {
            let (_, passed) = session.record_roll(Some(Color::Blue), die(1)).unwrap();
            assert!(passed);
        }
    };

    for index in 0..4 {
        let id = piece(&session, 0, index);
        // home -> start -> 1 -> 55 -> finish
        let mut rolls = vec![6, 6];
        rolls.extend(std::iter::repeat_n(6, 9));
        rolls.push(1);
        for value in rolls {
            assert_eq!(*session.winner(), None);
            red_turn(&mut session, &id, value);
            blue_pass(&mut session);
        }
        assert_eq!(session.players()[0].finished_count(), index + 1);
    }

    assert_eq!(*session.status(), GameStatus::Finished);
    assert_eq!(*session.winner(), Some(Color::Red));
    assert_eq!(active_count(&session), 0);
    assert!(matches!(
        session.apply(Action::RollDice { color: None }),
        Err(LudoError::InvalidGameStatus { .. })
    ));
}

#[test]
fn test_registry_creates_rooms_lazily() {
    let rooms = RoomRegistry::new();
    assert_eq!(
        rooms.get_session("lobby"),
        Err(LudoError::RoomNotFound("lobby".to_string()))
    );

    let report = rooms
        .apply(
            "lobby",
            Action::Join {
                name: "Alice".into(),
                color: Color::Red,
            },
        )
        .unwrap();
    assert!(matches!(report.outcome, ActionOutcome::Joined { .. }));
    assert_eq!(rooms.get_session("lobby").unwrap().players().len(), 1);
    assert_eq!(rooms.list_rooms().unwrap(), vec!["lobby".to_string()]);
}

#[test]
fn test_registry_rejection_keeps_room() {
    let rooms = RoomRegistry::new();
    assert_eq!(
        rooms.apply("empty", Action::Start).unwrap_err(),
        LudoError::NotEnoughPlayers(0)
    );
    assert_eq!(*rooms.get_session("empty").unwrap().status(), GameStatus::Waiting);
}

#[test]
fn test_concurrent_joins_never_exceed_four_players() {
    let rooms = RoomRegistry::new();
    let colors = [Color::Red, Color::Green, Color::Yellow, Color::Blue];

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let rooms = rooms.clone();
            let color = colors[i % colors.len()];
            thread::spawn(move || {
                rooms
                    .apply(
                        "busy",
                        Action::Join {
                            name: format!("Player {}", i),
                            color,
                        },
                    )
                    .is_ok()
            })
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|h| h.join().expect("thread panicked"))
        .filter(|ok| *ok)
        .count();

    let session = rooms.get_session("busy").unwrap();
    assert_eq!(successes, 4);
    assert_eq!(session.players().len(), 4);
    let distinct: HashSet<_> = session.players().iter().map(|p| *p.color()).collect();
    assert_eq!(distinct.len(), 4);
}
