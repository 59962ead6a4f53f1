//! # Interaction Module
//!
//! The interaction mediator: a typed request/response contract between
//! decoupled parties. View models raise requests through an
//! [`Interaction`]; whichever views (or tests) currently hold a registered
//! handler answer them, most recently registered first.
//!
//! See [`mediator::Interaction`] for the full protocol: LIFO chain walk,
//! decline semantics, scheduler affinity, and cancellation.

pub mod context;
pub mod handler;
pub mod mediator;

pub use context::InteractionContext;
pub use mediator::{HandlerGuard, Interaction, UnhandledInteraction};
