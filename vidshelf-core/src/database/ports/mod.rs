//! Repository ports (interfaces) grouped by bounded context.
//!
//! Application services only talk to these traits. Implementations live in
//! `database::infrastructure` (PostgreSQL and in-memory).

pub mod catalog;
pub mod comments;
pub mod users;
