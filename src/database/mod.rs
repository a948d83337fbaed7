//! Storage backends and repository traits.
//!
//! Production runs on PostgreSQL ([`postgres::PostgresStore`]); tests run on
//! the in-memory backend ([`memory::InMemoryStore`]). Handlers only ever see
//! the [`Database`] enum through the repository traits.

pub mod memory;
pub mod postgres;
pub mod repository;
pub mod schema;

pub use memory::InMemoryStore;
pub use postgres::PostgresStore;
pub use repository::{
    Database, PracticeRepository, ReportRepository, StatsRepository, TopicRepository,
};
