use crate::world::SectorId;

/// One tic's worth of player intent, sampled from the keyboard.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputCmd {
    pub forward: f32, // –1 … +1
    pub strafe: f32,  // –1 … +1  (left / right)
    pub turn: f32,    // –1 … +1  (right / left)
    pub run: bool,    // Shift
}

/// Requests the simulation makes of sectors; applied at the next tic.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectorCommand {
    Open(SectorId),
}
