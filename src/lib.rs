//! # CrossBind - Interaction Mediation & Command Binding for MVVM Terminals
//!
//! Core primitives for MVVM terminal applications: a mediator that lets view
//! models request decisions from whatever view currently answers them, and a
//! binder that wires commands to native controls by affinity-ranked dispatch.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   Handle(input)   ┌──────────────┐   handler chain   ┌─────────┐
//! │ View Model  │──────────────────▶│ Interaction  │──────────────────▶│  Views  │
//! │             │◀──────────────────│  (mediator)  │   (LIFO, first    │         │
//! │ - raises    │  output /         │              │    responder      │ - hold  │
//! │   requests  │  unhandled        │ - scheduler  │    wins)          │   guard │
//! └─────────────┘                   │   affinity   │                   └─────────┘
//!                                   └──────────────┘
//!
//! ┌─────────────┐     bind()      ┌──────────────┐   tag affinity    ┌──────────┐
//! │  Command    │────────────────▶│ CommandBinder│──────────────────▶│ Controls │
//! │             │                 │              │                   │          │
//! │ - execute   │   Binding       │ - registry   │   event / enabled │ - button │
//! │ - can_exec  │◀────────────────│ - taxonomy   │   wiring          │ - ...    │
//! └─────────────┘  (disposable)   └──────────────┘                   └──────────┘
//! ```
//!
//! The two halves are independent: the mediator knows nothing about controls,
//! the binder nothing about interactions. Both lean on the same scoped-release
//! discipline — registrations and bindings are guards whose drop deterministically
//! undoes them.

pub mod binding;
pub mod controls;
pub mod interaction;
pub mod scheduler;

// Re-export the primary types for easy access
pub use binding::{Binding, Command, CommandBinder, ControlTag, RelayCommand, Subscription};
pub use interaction::{HandlerGuard, Interaction, InteractionContext, UnhandledInteraction};
pub use scheduler::{Scheduler, TestScheduler, TokioScheduler};
