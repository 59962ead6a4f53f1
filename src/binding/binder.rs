//! # Command Binder
//!
//! Affinity-ranked dispatch from a control's tag to a binding strategy, plus
//! the `bind_to_event` building block those strategies are made of. Platform
//! layers register one entry per control kind they know how to wire; at bind
//! time the most specific compatible entry wins and materializes the live
//! binding.

use std::sync::Arc;

use indexmap::IndexMap;
use thiserror::Error;
use tokio::sync::watch;

use super::command::Command;
use super::control::{BoolProperty, Control, ControlTag, FlatTaxonomy, TagTaxonomy, ENABLED};
use super::subscription::{Binding, Subscription};

/// Failure modes of binding resolution
#[derive(Debug, Error)]
pub enum BindingError {
    /// No registered strategy is compatible with the target's tag
    #[error("no command binding registered for control tag `{0}`")]
    NotSupported(ControlTag),
    /// The control adapter rejected part of the wiring
    #[error("control adapter rejected the binding: {0}")]
    Adapter(#[from] anyhow::Error),
}

/// Strategy that materializes a live binding from a command, a control, and a
/// parameter stream
pub type BindingFactory<P> = Arc<
    dyn Fn(Arc<dyn Command<P>>, Arc<dyn Control>, watch::Receiver<P>) -> Result<Binding, BindingError>
        + Send
        + Sync,
>;

struct BindingInfo<P> {
    affinity: u32,
    factory: BindingFactory<P>,
}

/// Registry resolving control tags to binding strategies by affinity
///
/// Entries keep insertion order, and re-registering an exact tag overwrites
/// in place, so affinity ties always resolve to the same (first-registered)
/// entry.
pub struct CommandBinder<P> {
    entries: IndexMap<ControlTag, BindingInfo<P>>,
    taxonomy: Arc<dyn TagTaxonomy>,
}

impl<P> Default for CommandBinder<P>
where
    P: Clone + Send + Sync + 'static,
{
    /// Binder over a flat taxonomy: tags match only themselves
    fn default() -> Self {
        Self::new(Arc::new(FlatTaxonomy))
    }
}

impl<P> CommandBinder<P>
where
    P: Clone + Send + Sync + 'static,
{
    pub fn new(taxonomy: Arc<dyn TagTaxonomy>) -> Self {
        Self {
            entries: IndexMap::new(),
            taxonomy,
        }
    }

    /// Register (or overwrite) the strategy for an exact tag
    pub fn register(&mut self, tag: impl Into<ControlTag>, affinity: u32, factory: BindingFactory<P>) {
        let tag = tag.into();
        tracing::debug!(%tag, affinity, "registered command binding");
        self.entries.insert(tag, BindingInfo { affinity, factory });
    }

    /// Register the common strategy: wire the command to one named event
    ///
    /// Shorthand for a factory that calls [`bind_to_event`](Self::bind_to_event)
    /// with the control kind's default event and the [`ENABLED`] property.
    pub fn register_event_binding(
        &mut self,
        tag: impl Into<ControlTag>,
        affinity: u32,
        event: &'static str,
    ) {
        self.register(
            tag,
            affinity,
            Arc::new(move |command, control, parameters| {
                Self::bind_to_event(command, control, parameters, event, ENABLED)
            }),
        );
    }

    /// Specificity of the best compatible strategy for `tag`, 0 if none
    ///
    /// When the caller supplies an explicit event target the binder declines
    /// outright (affinity 0): it only handles the default-event case, and an
    /// explicit event goes straight through
    /// [`bind_to_event`](Self::bind_to_event).
    pub fn affinity_for(&self, tag: &ControlTag, has_event_target: bool) -> u32 {
        if has_event_target {
            return 0;
        }
        self.best_match(tag)
            .map(|(_, info)| info.affinity)
            .unwrap_or(0)
    }

    /// Materialize a live binding using the best compatible strategy
    pub fn bind(
        &self,
        command: Arc<dyn Command<P>>,
        control: Arc<dyn Control>,
        parameters: watch::Receiver<P>,
    ) -> Result<Binding, BindingError> {
        let tag = control.tag();
        match self.best_match(&tag) {
            Some((registered, info)) => {
                tracing::debug!(
                    target = %tag,
                    matched = %registered,
                    affinity = info.affinity,
                    "binding command to control"
                );
                (info.factory)(command, control, parameters)
            }
            None => {
                tracing::warn!(target = %tag, "no command binding for control");
                Err(BindingError::NotSupported(tag))
            }
        }
    }

    /// Wire a command to one named event on a control
    ///
    /// Three legs, torn down together by the returned [`Binding`]:
    ///
    /// 1. The named event executes the command with the latest parameter,
    ///    when `can_execute` currently allows it.
    /// 2. Can-execute changes are pushed into the control's `enabled`
    ///    property descriptor; the initial state is pushed synchronously at
    ///    bind time.
    /// 3. The parameter stream stays subscribed so "latest" is always
    ///    current.
    pub fn bind_to_event(
        command: Arc<dyn Command<P>>,
        control: Arc<dyn Control>,
        parameters: watch::Receiver<P>,
        event: &str,
        enabled: BoolProperty,
    ) -> Result<Binding, BindingError> {
        let initial = command.can_execute(&parameters.borrow());
        control.set_bool(&enabled, initial)?;

        let exec_command = Arc::clone(&command);
        let exec_parameters = parameters.clone();
        let event_leg = control.subscribe_event(
            event,
            Box::new(move || {
                let parameter = exec_parameters.borrow().clone();
                if exec_command.can_execute(&parameter) {
                    exec_command.execute(&parameter);
                } else {
                    tracing::trace!("command cannot execute; event ignored");
                }
            }),
        )?;

        let enabled_control = Arc::clone(&control);
        let can_execute_leg = command.subscribe_can_execute_changed(Box::new(move |allowed| {
            if let Err(error) = enabled_control.set_bool(&enabled, allowed) {
                tracing::warn!(%error, "failed to push enabled state into control");
            }
        }));

        // The parameter leg is the watch receiver itself; dropping it is what
        // detaches the binding from the stream.
        let parameter_leg = Subscription::new(move || drop(parameters));

        Ok(Binding::from_parts(vec![
            event_leg,
            can_execute_leg,
            parameter_leg,
        ]))
    }

    /// Highest-affinity entry compatible with `tag`; ties keep the first found
    fn best_match(&self, tag: &ControlTag) -> Option<(&ControlTag, &BindingInfo<P>)> {
        let mut best: Option<(&ControlTag, &BindingInfo<P>)> = None;
        for (registered, info) in &self.entries {
            if !self.taxonomy.is_a(tag, registered) {
                continue;
            }
            match best {
                Some((_, current)) if current.affinity >= info.affinity => {}
                _ => best = Some((registered, info)),
            }
        }
        best
    }
}
