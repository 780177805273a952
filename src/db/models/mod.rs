//! Database models split into separate files.
//! This module re-exports individual model modules so imports like
//! `use crate::db::models::*;` pick up every entity.

pub mod event;
pub mod event_type;
pub mod participant;
pub mod user;

pub use self::event::*;
pub use self::event_type::*;
pub use self::participant::*;
pub use self::user::*;
