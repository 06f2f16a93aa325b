#[cfg(not(feature = "std"))]
fn main() {}

#[cfg(feature = "std")]
use battleships::{
    init_logging, notify::console::ConsoleNotifier, notify::tcp::TcpNotifier,
    notify::tcp::TcpSubscriber, parse_fleet, BattleEngine, ConsoleGame, EventKind, MatchConfig,
    MatchHandle, NotificationRelay, RelayHandle,
};

#[cfg(feature = "std")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "std")]
use rand::rngs::SmallRng;
#[cfg(feature = "std")]
use rand::SeedableRng;
#[cfg(feature = "std")]
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[cfg(feature = "std")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug)]
#[cfg(feature = "std")]
struct GameArgs {
    #[arg(long, default_value = "P 1")]
    player1: String,
    #[arg(long, default_value = "P 2")]
    player2: String,
    #[arg(long, default_value_t = battleships::DEFAULT_WIDTH)]
    width: usize,
    #[arg(long, default_value_t = battleships::DEFAULT_HEIGHT)]
    height: usize,
    #[arg(
        long,
        default_value = "5,4,3",
        help = "Ship lengths for player 1 (and player 2 unless --fleet2 is given)"
    )]
    fleet: String,
    #[arg(long, help = "Ship lengths for player 2")]
    fleet2: Option<String>,
    #[arg(long, help = "Place every ship randomly instead of prompting")]
    auto_place: bool,
    #[arg(long, help = "Fix RNG seed for reproducible random placement (e.g., --seed 12345)")]
    seed: Option<u64>,
    #[arg(long, help = "Print the final scores as JSON")]
    json: bool,
}

#[derive(Subcommand)]
#[cfg(feature = "std")]
enum Commands {
    /// Play a hot-seat game on this terminal.
    Local {
        #[command(flatten)]
        game: GameArgs,
    },
    /// Play on this terminal and push notifications to TCP watchers.
    Serve {
        #[command(flatten)]
        game: GameArgs,
        #[arg(long, default_value = "127.0.0.1:7878")]
        bind: String,
    },
    /// Print the notifications of a game started with `serve`.
    Watch {
        #[arg(long, default_value = "127.0.0.1:7878")]
        connect: String,
    },
}

#[cfg(feature = "std")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Local { game } => {
            let (relay, relay_task) = NotificationRelay::spawn();
            relay.attach(ConsoleNotifier);
            play(&game, relay).await?;
            relay_task.await?;
        }
        Commands::Serve { game, bind } => {
            let listener = TcpListener::bind(&bind).await?;
            println!("Watchers can connect at {}", listener.local_addr()?);
            let (relay, relay_task) = NotificationRelay::spawn();
            relay.attach(ConsoleNotifier);

            let acceptor = relay.clone();
            let accept_task = tokio::spawn(async move {
                loop {
                    match listener.accept().await {
                        Ok((stream, addr)) => {
                            log::info!("watcher connected from {}", addr);
                            acceptor.attach(TcpNotifier::new(stream));
                        }
                        Err(e) => {
                            log::warn!("failed to accept watcher: {}", e);
                            break;
                        }
                    }
                }
            });

            let result = play(&game, relay).await;
            accept_task.abort();
            relay_task.await?;
            result?;
        }
        Commands::Watch { connect } => {
            println!("Connecting to {}...", connect);
            let mut subscriber = TcpSubscriber::connect(&connect).await?;
            println!("Connected. Waiting for the game to progress.");
            loop {
                let note = subscriber.recv().await?;
                println!("{}", note.message);
                if note.event.kind == EventKind::GameOver {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Run one console game. `relay` is consumed so the relay task can finish
/// once the game is over.
#[cfg(feature = "std")]
async fn play(args: &GameArgs, relay: RelayHandle) -> anyhow::Result<()> {
    let fleet1 = parse_fleet(&args.fleet)?;
    let fleet2 = match &args.fleet2 {
        Some(f) => parse_fleet(f)?,
        None => fleet1.clone(),
    };
    let config = MatchConfig::new(
        args.player1.clone(),
        args.player2.clone(),
        args.width,
        args.height,
        fleet1,
        fleet2,
    );
    let engine = BattleEngine::with_config(&config)?;
    let handle = MatchHandle::with_relay(engine, relay);

    let mut rng = match args.seed {
        Some(s) => {
            println!("Using fixed seed: {} (placement will be reproducible)", s);
            SmallRng::seed_from_u64(s)
        }
        None => {
            let mut seed_rng = rand::rng();
            SmallRng::from_rng(&mut seed_rng)
        }
    };

    let stdin = std::io::stdin();
    let mut game =
        ConsoleGame::new(handle, stdin.lock(), std::io::stdout()).auto_place(args.auto_place);
    let scores = game.run(&mut rng).await?;
    if args.json {
        println!("{}", serde_json::to_string(&scores)?);
    }
    Ok(())
}
