//! Repository implementations: SeaORM for production, in-memory for tests and local runs.

pub mod memory;
pub mod seaorm;

pub use memory::InMemoryRepository;
pub use seaorm::SeaOrmRepository;
