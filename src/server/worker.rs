//! Worker spawning
//!
//! The acceptor hands every connection to a [`Spawner`]. The default spawns
//! one tokio task per connection with no limit; a bounded pool can implement
//! the same trait without changing the connection contract.

use std::future::Future;
use std::pin::Pin;

pub type Job = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

pub trait Spawner: Send + Sync {
    fn spawn(&self, job: Job);
}

/// One detached tokio task per job.
#[derive(Debug, Default, Clone, Copy)]
pub struct TaskSpawner;

impl Spawner for TaskSpawner {
    fn spawn(&self, job: Job) {
        tokio::spawn(job);
    }
}
