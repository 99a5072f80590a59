use super::{InputCmd, Player, SectorCommand, door};
use crate::world::Level;
use std::time::{Duration, Instant};

pub const TIC_RATE: u32 = 60;
const TIC: Duration = Duration::from_micros(1_000_000 / TIC_RATE as u64);

/// Owns the player and the sector command queue, and drives both at a
/// fixed rate.
pub struct TicRunner {
    player: Player,
    commands: Vec<SectorCommand>,
    last: Instant,
}

impl TicRunner {
    pub fn new(player: Player) -> Self {
        Self {
            player,
            commands: Vec::new(),
            last: Instant::now(),
        }
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Queue a command for the start of the next tic.
    #[inline]
    pub fn queue(&mut self, cmd: SectorCommand) {
        self.commands.push(cmd);
    }

    /// Advance enough tics to synchronise simulation with real time.
    /// Returns the number of tics run.
    pub fn pump(&mut self, level: &mut Level, input: &InputCmd) -> u32 {
        let mut ran = 0;
        while self.last.elapsed() >= TIC {
            self.tick(level, input);
            self.last += TIC;
            ran += 1;
        }
        ran
    }

    /// Run exactly one game tic.
    pub fn tick(&mut self, level: &mut Level, input: &InputCmd) {
        door::apply_commands(level, &mut self.commands);
        door::update_sectors(level);
        self.player.update(level, input, &mut self.commands);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
