//! Review-session coordination for critique.
//!
//! Everything here is UI-agnostic: the host message protocol ([`bridge`]), the
//! response normalizer ([`normalize`]), grading ([`score`]), the derived UI
//! state ([`state`]) and the controller that ties them together ([`session`]).
//! The `critique` binary supplies the display surface, the stdio transport and
//! the HTTP implementation of [`service::ReviewService`].

pub mod bridge;
pub mod catalog;
pub mod error;
pub mod normalize;
pub mod score;
pub mod service;
pub mod session;
pub mod state;
pub mod types;
