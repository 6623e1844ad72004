//! Entity to model mappers
//!
//! This module provides conversions between domain entities (watch-core) and
//! database models: `From<Model> for Entity` turns rows into domain objects.

mod log;
mod page;
mod watch;
