//! Thin HTTP front end over [`crate::Desk`].

pub mod router;

pub use router::{DeskState, desk_router};
