pub mod event;
pub mod game;
pub mod names;
pub mod raw_row;
pub mod schedule;
pub mod snapshot;
