//! Text rendering of grids and the interactive hot-seat game loop.

use std::fmt::Write as _;
use std::io::{BufRead, Write};

use rand::Rng;

use crate::{
    board::{Cell, Grid},
    config::MAX_COLUMNS,
    coordinate::Coordinate,
    domain::ScoreBoard,
    game::GameStatus,
    player::Seat,
    session::MatchHandle,
    ship::ShipId,
};

fn render(grid: &Grid, symbol: impl Fn(&Cell) -> &'static str) -> String {
    let mut out = String::from("   ");
    for col in 0..grid.width() {
        // columns past Z have no letter
        match u8::try_from(col) {
            Ok(c) if col < MAX_COLUMNS => {
                let _ = write!(out, " {} ", (b'A' + c) as char);
            }
            _ => {
                let _ = write!(out, "{:^3}", col + 1);
            }
        }
    }
    out.push('\n');
    for row in 0..grid.height() {
        let _ = write!(out, "{:2} ", row + 1);
        for col in 0..grid.width() {
            if let Some(cell) = grid.cell(Coordinate::new(row, col)) {
                out.push_str(symbol(cell));
            }
        }
        out.push('\n');
    }
    out
}

/// Owner's view during placement: `[s]` ship, `[ ]` water.
pub fn render_fleet_board(grid: &Grid) -> String {
    render(grid, |cell| if cell.ship().is_some() { "[s]" } else { "[ ]" })
}

/// Opponent's view during battle: `[x]` hit, `[o]` miss, `[ ]` not fired at.
pub fn render_target_board(grid: &Grid) -> String {
    render(grid, |cell| match (cell.is_hit(), cell.ship().is_some()) {
        (true, true) => "[x]",
        (true, false) => "[o]",
        (false, _) => "[ ]",
    })
}

/// Interactive console front end reading commands from `input`.
pub struct ConsoleGame<I, O> {
    handle: MatchHandle,
    input: I,
    output: O,
    auto_place: bool,
}

impl<I: BufRead, O: Write> ConsoleGame<I, O> {
    pub fn new(handle: MatchHandle, input: I, output: O) -> Self {
        Self {
            handle,
            input,
            output,
            auto_place: false,
        }
    }

    /// Place every ship randomly without prompting.
    pub fn auto_place(mut self, enabled: bool) -> Self {
        self.auto_place = enabled;
        self
    }

    fn prompt(&mut self, text: &str) -> anyhow::Result<String> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(anyhow::anyhow!("input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// Run placement for both players, then the battle. Returns final scores.
    pub async fn run<R: Rng + Send>(&mut self, rng: &mut R) -> anyhow::Result<ScoreBoard> {
        writeln!(self.output, "Welcome to Battleships.")?;
        for seat in Seat::BOTH {
            self.place_fleet(seat, rng).await?;
        }
        writeln!(self.output, "All ships placed. Battle starts.\n")?;
        self.battle().await?;
        self.report().await
    }

    async fn place_fleet<R: Rng + Send>(&mut self, seat: Seat, rng: &mut R) -> anyhow::Result<()> {
        let (name, lengths) = self
            .handle
            .read(|e| {
                (
                    e.player(seat).map(|p| p.name().to_string()),
                    e.roster(seat).iter().map(|s| s.length()).collect::<Vec<_>>(),
                )
            })
            .await;
        let name = name.ok_or_else(|| anyhow::anyhow!("game has not been initialized"))?;

        for (i, length) in lengths.into_iter().enumerate() {
            let id = ShipId(i);
            loop {
                if self.auto_place {
                    self.handle.place_ship_randomly(seat, id, rng).await?;
                    break;
                }
                self.show_fleet(seat).await?;
                writeln!(self.output, "{}, place ship {} (length {}).", name, i + 1, length)?;
                let start = self.prompt("Start coordinate (ex A1, empty for random): ")?;
                let placed = if start.is_empty() {
                    self.handle.place_ship_randomly(seat, id, rng).await.map(|_| ())
                } else {
                    let end = self.prompt("End coordinate (ex A5): ")?;
                    self.handle
                        .place_ship_notation(seat, id, &start, &end)
                        .await
                };
                match placed {
                    Ok(()) => break,
                    Err(e) => writeln!(self.output, "Placement failed: {}. Try again.", e)?,
                }
            }
        }
        writeln!(self.output, "All ships placed for {}.", name)?;
        self.show_fleet(seat).await
    }

    async fn show_fleet(&mut self, seat: Seat) -> anyhow::Result<()> {
        if let Some(grid) = self.handle.grid(seat).await {
            writeln!(self.output, "{}", render_fleet_board(&grid))?;
        }
        Ok(())
    }

    async fn battle(&mut self) -> anyhow::Result<()> {
        while let GameStatus::Turn(attacker) = self.handle.status().await {
            let defender = attacker.other();
            let (attacker_name, defender_name, grid) = self
                .handle
                .read(|e| {
                    (
                        e.player(attacker).map(|p| p.name().to_string()).unwrap_or_default(),
                        e.player(defender).map(|p| p.name().to_string()).unwrap_or_default(),
                        e.grid(defender).cloned(),
                    )
                })
                .await;
            writeln!(self.output, "Attacker : {}", attacker_name)?;
            writeln!(self.output, "Defender : {}", defender_name)?;
            if let Some(grid) = grid {
                writeln!(self.output, "{}", render_target_board(&grid))?;
            }

            let target = self.prompt("Attack coordinate (ex A1): ")?;
            match self.handle.attack_notation(&target).await {
                Ok(outcome) if outcome.ship_sunk => writeln!(self.output, "Hit. Ship sunk!\n")?,
                Ok(outcome) if outcome.hit => writeln!(self.output, "Hit.\n")?,
                Ok(_) => writeln!(self.output, "Miss.\n")?,
                Err(e) => writeln!(self.output, "{}. Try again.\n", e)?,
            }
        }
        Ok(())
    }

    async fn report(&mut self) -> anyhow::Result<ScoreBoard> {
        let (winner, loser) = self
            .handle
            .read(|e| match e.status() {
                GameStatus::GameOver { winner } => (
                    e.player(winner).cloned(),
                    e.player(winner.other()).cloned(),
                ),
                _ => (None, None),
            })
            .await;
        if let (Some(winner), Some(loser)) = (winner, loser) {
            writeln!(self.output, "=== GAME RESULT ===")?;
            writeln!(self.output, "Winner: {}", winner.name())?;
            writeln!(self.output, "Loser : {}", loser.name())?;
            writeln!(self.output, "Winner Score : {}", winner.score())?;
            writeln!(self.output, "Loser Score : {}", loser.score())?;
            writeln!(self.output, "Thanks for playing.")?;
        }
        Ok(self.handle.scores().await)
    }
}
