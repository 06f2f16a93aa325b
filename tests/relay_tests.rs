use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use battleships::notify::in_memory::InMemoryNotifier;
use battleships::notify::tcp::{TcpNotifier, TcpSubscriber};
use battleships::{
    BattleEngine, EventKind, GameStatus, MatchConfig, MatchHandle, Notification,
    NotificationRelay, Notifier, Seat, ShipId,
};
use tokio::net::TcpListener;

fn engine() -> BattleEngine {
    BattleEngine::with_config(&MatchConfig::new("Ann", "Ben", 5, 5, vec![2], vec![2])).unwrap()
}

async fn deploy(handle: &MatchHandle) {
    for seat in Seat::BOTH {
        handle
            .place_ship_notation(seat, ShipId(0), "A1", "B1")
            .await
            .unwrap();
    }
}

struct FailingNotifier {
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl Notifier for FailingNotifier {
    async fn notify(&mut self, _note: &Notification) -> anyhow::Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(anyhow::anyhow!("watcher went away"))
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn relay_delivers_events_in_attack_order() -> anyhow::Result<()> {
    let (relay, task) = NotificationRelay::spawn();
    let (notifier, subscriber) = InMemoryNotifier::pair();
    relay.attach(notifier);

    let handle = MatchHandle::with_relay(engine(), relay);
    deploy(&handle).await;
    handle.attack_notation("C3").await?;
    handle.attack_notation("E5").await?;
    handle.attack_notation("A1").await?;
    handle.attack_notation("B1").await?;
    assert_eq!(handle.status().await, GameStatus::GameOver { winner: Seat::First });

    drop(handle);
    task.await?;

    let notes = subscriber.drain();
    let kinds: Vec<_> = notes.iter().map(|n| n.event.kind).collect();
    assert_eq!(
        kinds,
        vec![EventKind::Miss, EventKind::Miss, EventKind::Hit, EventKind::GameOver]
    );
    assert_eq!(notes[1].event.attacker, "Ben");
    assert_eq!(notes[3].message, notes[3].event.message());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_notifier_is_detached_without_affecting_play() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let (relay, task) = NotificationRelay::spawn();
    relay.attach(FailingNotifier {
        calls: calls.clone(),
    });
    let (notifier, mut subscriber) = InMemoryNotifier::pair();
    relay.attach(notifier);

    let handle = MatchHandle::with_relay(engine(), relay);
    deploy(&handle).await;
    let outcome = handle.attack_notation("A1").await?;
    assert!(outcome.hit);
    handle.attack_notation("D4").await?;

    assert_eq!(subscriber.recv().await?.event.kind, EventKind::Hit);
    assert_eq!(subscriber.recv().await?.event.kind, EventKind::Miss);

    drop(handle);
    task.await?;
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn dropped_subscriber_does_not_stop_the_relay() -> anyhow::Result<()> {
    let (relay, task) = NotificationRelay::spawn();
    let (gone, subscriber) = InMemoryNotifier::pair();
    drop(subscriber);
    relay.attach(gone);
    let (notifier, kept) = InMemoryNotifier::pair();
    relay.attach(notifier);

    let handle = MatchHandle::with_relay(engine(), relay);
    deploy(&handle).await;
    handle.attack_notation("A1").await?;
    handle.attack_notation("A2").await?;
    drop(handle);
    task.await?;

    assert_eq!(kept.drain().len(), 2);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn handle_without_relay_discards_events() -> anyhow::Result<()> {
    let handle = MatchHandle::new(engine());
    deploy(&handle).await;
    handle.attack_notation("A1").await?;
    assert!(!handle.read(|e| e.is_over()).await);
    assert_eq!(handle.score(Seat::First).await, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_attacks_are_serialized() -> anyhow::Result<()> {
    let config = MatchConfig::new("Ann", "Ben", 8, 8, vec![1], vec![1]);
    let handle = MatchHandle::new(BattleEngine::with_config(&config)?);
    for seat in Seat::BOTH {
        handle
            .place_ship_notation(seat, ShipId(0), "H8", "H8")
            .await?;
    }

    let mut tasks = Vec::new();
    for col in ['A', 'B', 'C', 'D'] {
        let handle = handle.clone();
        tasks.push(tokio::spawn(async move {
            handle.attack_notation(&format!("{}1", col)).await
        }));
    }
    for task in tasks {
        assert!(!task.await??.hit);
    }

    // four misses alternate the turn back to the first seat
    assert_eq!(handle.status().await, GameStatus::Turn(Seat::First));
    let shots = handle
        .read(|e| {
            Seat::BOTH
                .iter()
                .map(|&s| e.grid(s).map_or(0, |g| g.cells().filter(|(_, c)| c.is_hit()).count()))
                .sum::<usize>()
        })
        .await;
    assert_eq!(shots, 4);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn attack_report_carries_scores() -> anyhow::Result<()> {
    let handle = MatchHandle::new(engine());
    deploy(&handle).await;
    let report = handle.attack_report("A1").await?;
    assert!(report.is_hit);
    assert_eq!(report.message, "Hit");
    assert_eq!(report.scores.entries[0].score, 1);

    let report = handle.attack_report("B1").await?;
    assert!(report.is_game_over);
    assert_eq!(report.winner.as_deref(), Some("Ann"));
    assert!(handle.attack_report("C1").await.is_err());
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn tcp_watcher_receives_notifications() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let (relay, task) = NotificationRelay::spawn();

    let acceptor = relay.clone();
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await?;
        acceptor.attach(TcpNotifier::new(socket));
        Ok::<_, anyhow::Error>(())
    });
    let mut watcher = TcpSubscriber::connect(addr).await?;
    server.await??;

    let handle = MatchHandle::with_relay(engine(), relay);
    deploy(&handle).await;
    handle.attack_notation("A1").await?;
    handle.attack_notation("B1").await?;

    let first = watcher.recv().await?;
    assert_eq!(first.event.kind, EventKind::Hit);
    assert_eq!(first.event.coordinate.to_notation(), "A1");
    let last = watcher.recv().await?;
    assert_eq!(last.event.kind, EventKind::GameOver);
    assert!(last.message.contains("Winner: Ann"));

    drop(handle);
    task.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn concurrent_shots_reach_watchers_in_resolution_order() -> anyhow::Result<()> {
    let config = MatchConfig::new("Ann", "Ben", 8, 8, vec![1], vec![1]);
    let (relay, task) = NotificationRelay::spawn();
    let (notifier, subscriber) = InMemoryNotifier::pair();
    relay.attach(notifier);
    let handle = MatchHandle::with_relay(BattleEngine::with_config(&config)?, relay);
    for seat in Seat::BOTH {
        handle
            .place_ship_notation(seat, ShipId(0), "H8", "H8")
            .await?;
    }

    let mut tasks = Vec::new();
    for row in 1..=7 {
        for col in ['A', 'B'] {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                handle.attack_notation(&format!("{}{}", col, row)).await
            }));
        }
    }
    for task in tasks {
        task.await??;
    }
    drop(handle);
    task.await?;

    // every shot misses, so the attackers must alternate in delivery order
    let notes = subscriber.drain();
    assert_eq!(notes.len(), 14);
    for (i, note) in notes.iter().enumerate() {
        let expected = if i % 2 == 0 { "Ann" } else { "Ben" };
        assert_eq!(note.event.attacker, expected);
    }
    Ok(())
}
