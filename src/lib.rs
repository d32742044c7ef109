pub mod calendar;
pub mod config;
pub mod diff;
pub mod discord;
pub mod error;
pub mod handler;
pub mod model;
pub mod portal;
pub mod resync;
pub mod snapshot_store;
pub mod sync;
