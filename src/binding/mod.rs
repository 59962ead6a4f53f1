//! # Binding Module
//!
//! Command-to-control binding: the [`Command`] contract, the [`Control`]
//! capability surface platform adapters implement, and the affinity-ranked
//! [`CommandBinder`] that picks the right wiring strategy for a target and
//! materializes it as a disposable [`Binding`].

pub mod binder;
pub mod command;
pub mod control;
pub mod subscription;

pub use binder::{BindingError, BindingFactory, CommandBinder};
pub use command::{CanExecuteListener, Command, RelayCommand};
pub use control::{
    BoolProperty, Control, ControlTag, EventListener, FlatTaxonomy, TagTaxonomy, TreeTaxonomy,
    ENABLED,
};
pub use subscription::{Binding, Subscription};
