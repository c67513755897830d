//! Connection acceptance and worker spawning.

pub mod listener;
pub mod worker;

pub use listener::Server;
pub use worker::{Spawner, TaskSpawner};
