//! Many boards hosted side by side.

use rust_ludo::core::{Command, GameStatus, PlayerId, RulesConfig, ScriptedDice};
use rust_ludo::events::SessionEvent;
use rust_ludo::hub::{BoardHandle, BoardId, SessionHub};
use rust_ludo::rules::{Applied, Rejection};

async fn seat(handle: &BoardHandle, players: &[&str]) {
    for player in players {
        let joined = handle
            .send(PlayerId::new(*player), Command::Join { name: player.to_uppercase() })
            .await
            .unwrap();
        assert!(joined.is_ok());
    }
    for player in players {
        handle.send(PlayerId::new(*player), Command::Ready).await.unwrap().unwrap();
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_boards_stay_isolated() {
    let mut hub = SessionHub::new(RulesConfig::default());
    let handles: Vec<BoardHandle> = (0..8)
        .map(|i| hub.open(BoardId::new(format!("board-{}", i))).unwrap())
        .collect();

    let mut tasks = Vec::new();
    for (i, handle) in handles.iter().cloned().enumerate() {
        tasks.push(tokio::spawn(async move {
            // Board i seats 2 + i % 3 players, all with the same names
            let players: Vec<&str> = ["a", "b", "c", "d"].into_iter().take(2 + i % 3).collect();
            seat(&handle, &players).await;
            for _ in 0..50 {
                let snapshot = handle.snapshot().await.unwrap();
                let Some(current) = snapshot.current else { break };
                let player = snapshot.players[current.index()].id.clone();
                let moves = handle.legal_moves().await.unwrap();
                let command = match moves.first() {
                    Some(&pawn) => Command::MovePawn { pawn },
                    None if snapshot.last_roll.is_some() => Command::Pass,
                    None => Command::RollDice,
                };
                handle.send(player, command).await.unwrap().unwrap();
            }
            players.len()
        }));
    }

    for (i, task) in tasks.into_iter().enumerate() {
        let seats = task.await.unwrap();
        let snapshot = handles[i].snapshot().await.unwrap();
        assert_eq!(snapshot.players.len(), seats);
        assert_eq!(snapshot.status, GameStatus::InProgress);
        assert!(snapshot.validate().is_ok());
    }
    assert_eq!(hub.len(), 8);
}

#[tokio::test]
async fn test_each_board_publishes_only_its_own_events() {
    let mut hub = SessionHub::new(RulesConfig::default());
    let left = hub.open_with(BoardId::new("left"), ScriptedDice::new([6])).unwrap();
    let right = hub.open_with(BoardId::new("right"), ScriptedDice::new([3])).unwrap();
    let mut left_events = left.subscribe();
    let mut right_events = right.subscribe();

    seat(&left, &["a", "b"]).await;
    seat(&right, &["a", "b"]).await;

    let rolled = left.send(PlayerId::new("a"), Command::RollDice).await.unwrap();
    assert_eq!(rolled, Ok(Applied::Rolled { value: 6, forfeited: false }));
    let rolled = right.send(PlayerId::new("a"), Command::RollDice).await.unwrap();
    assert_eq!(rolled, Ok(Applied::Rolled { value: 3, forfeited: true }));

    let mut left_draws = Vec::new();
    while let Ok(event) = left_events.try_recv() {
        if let SessionEvent::Draw { number } = event {
            left_draws.push(number);
        }
    }
    let mut right_draws = Vec::new();
    while let Ok(event) = right_events.try_recv() {
        if let SessionEvent::Draw { number } = event {
            right_draws.push(number);
        }
    }
    assert_eq!(left_draws, vec![6]);
    assert_eq!(right_draws, vec![3]);
}

#[tokio::test]
async fn test_same_player_on_two_boards() {
    let mut hub = SessionHub::new(RulesConfig::default());
    let one = hub.open_with(BoardId::new("one"), ScriptedDice::new([6])).unwrap();
    let two = hub.open_with(BoardId::new("two"), ScriptedDice::new([6])).unwrap();
    seat(&one, &["a", "b"]).await;

    // Seated on board one, a stranger on board two
    let result = two.send(PlayerId::new("a"), Command::RollDice).await.unwrap();
    assert_eq!(result, Err(Rejection::GameNotStarted));
    let result = two.send(PlayerId::new("a"), Command::Ready).await.unwrap();
    assert_eq!(result, Err(Rejection::UnknownPlayer(PlayerId::new("a"))));

    one.send(PlayerId::new("a"), Command::RollDice).await.unwrap().unwrap();
    one.send(PlayerId::new("a"), Command::MovePawn { pawn: 1 }).await.unwrap().unwrap();

    let snapshot = two.snapshot().await.unwrap();
    assert!(snapshot.players.is_empty());
    assert_eq!(snapshot.status, GameStatus::Lobby);
}

#[tokio::test]
async fn test_boards_seeded_per_name() {
    let config = RulesConfig::default().with_seed(9);
    let mut first = SessionHub::new(config.clone());
    let mut second = SessionHub::new(config);

    let mut rolls = Vec::new();
    for hub in [&mut first, &mut second] {
        let handle = hub.open(BoardId::new("same")).unwrap();
        seat(&handle, &["a", "b"]).await;
        let snapshot = handle.snapshot().await.unwrap();
        let current = snapshot.current.unwrap();
        let player = snapshot.players[current.index()].id.clone();
        let rolled = handle.send(player, Command::RollDice).await.unwrap().unwrap();
        rolls.push((current, rolled));
    }
    assert_eq!(rolls[0], rolls[1]);
}
