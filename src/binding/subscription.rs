//! Scoped subscription teardown
//!
//! Every live wire in this crate — an event listener on a control, a
//! can-execute listener on a command, a parameter stream — is released
//! through a [`Subscription`]: a guard that runs its teardown exactly once,
//! whether dropped or disposed explicitly. [`Binding`] composes several of
//! them so a whole command binding tears down as one unit.

/// RAII guard around one teardown action
#[must_use = "dropping the subscription tears it down immediately"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a teardown action to run on drop
    pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// Run the teardown now rather than at end of scope
    pub fn dispose(self) {
        // Drop does the work
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.teardown.is_some())
            .finish()
    }
}

/// Composite subscription for one live command binding
///
/// Holds the event leg, the can-execute leg, and the parameter-tracking leg
/// of a binding; dropping the `Binding` releases all of them together.
#[must_use = "dropping the binding tears down all of its subscriptions"]
#[derive(Debug)]
pub struct Binding {
    subscriptions: Vec<Subscription>,
}

impl Binding {
    /// Compose several subscriptions into one unit of teardown
    pub fn from_parts(subscriptions: Vec<Subscription>) -> Self {
        Self { subscriptions }
    }

    /// Number of underlying subscriptions (for testing/debugging)
    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Tear everything down now rather than at end of scope
    pub fn dispose(self) {
        // Drop does the work
    }
}
