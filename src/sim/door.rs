//! Manual doors: a sector whose ceiling rises, waits, and falls back.

use crate::world::{Level, Sector, SectorMotion};

use super::SectorCommand;

/// How far above the floor an open door's ceiling stops.
pub const DOOR_TRAVEL: f32 = 64.0;
/// Tics an open door waits before closing (4 s at 60 Hz).
pub const DOOR_WAIT_TICS: u32 = 240;
/// Ceiling movement per tic.
const DOOR_SPEED: f32 = 1.0;

impl Sector {
    /// Start opening. Returns `false` when the door is already opening or
    /// waiting open, in which case nothing changes.
    pub fn open(&mut self) -> bool {
        match self.motion {
            SectorMotion::Idle | SectorMotion::Closing => {
                self.motion = SectorMotion::Opening;
                true
            }
            SectorMotion::Opening | SectorMotion::Waiting(_) => false,
        }
    }

    /// Advance the door by one tic. Returns `true` on a state change.
    pub fn update(&mut self) -> bool {
        let before = self.motion;
        match self.motion {
            SectorMotion::Idle => {}
            SectorMotion::Opening => {
                let top = self.floor_h + DOOR_TRAVEL;
                if self.ceil_h >= top {
                    // already open at least this far; never pulled down
                    self.motion = SectorMotion::Idle;
                } else {
                    self.ceil_h = (self.ceil_h + DOOR_SPEED).min(top);
                    if self.ceil_h >= top {
                        self.motion = SectorMotion::Waiting(DOOR_WAIT_TICS);
                    }
                }
            }
            SectorMotion::Waiting(n) if n > 0 => self.motion = SectorMotion::Waiting(n - 1),
            SectorMotion::Waiting(_) | SectorMotion::Closing => {
                self.ceil_h = (self.ceil_h - DOOR_SPEED).max(self.floor_h);
                self.motion = if self.ceil_h <= self.floor_h {
                    SectorMotion::Idle
                } else {
                    SectorMotion::Closing
                };
            }
        }
        std::mem::discriminant(&before) != std::mem::discriminant(&self.motion)
    }
}

/// Apply queued commands, emptying the queue.
pub fn apply_commands(level: &mut Level, commands: &mut Vec<SectorCommand>) {
    for cmd in commands.drain(..) {
        match cmd {
            SectorCommand::Open(id) => {
                let Some(sector) = level.sectors.get_mut(id as usize) else {
                    log::warn!("open command for missing sector {id}");
                    continue;
                };
                if sector.open() {
                    log::debug!("sector {id}: opening from ceiling {}", sector.ceil_h);
                }
            }
        }
    }
}

/// Run one tic of every sector's motion.
pub fn update_sectors(level: &mut Level) {
    for (id, sector) in level.sectors.iter_mut().enumerate() {
        if sector.update() {
            log::debug!("sector {id}: {:?} at ceiling {}", sector.motion, sector.ceil_h);
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
