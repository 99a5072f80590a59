mod components;
mod door;
mod player;
mod tic;

pub use components::{InputCmd, SectorCommand};
pub use door::{DOOR_TRAVEL, DOOR_WAIT_TICS, apply_commands, update_sectors};
pub use player::{
    EYE_HEIGHT, MAX_STEP, MIN_HEADROOM, PLAYER_RADIUS, Player, TURN_SPEED, WALK_SPEED,
};
pub use tic::{TIC_RATE, TicRunner};
