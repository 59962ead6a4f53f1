//! # Command Contract
//!
//! The command side of a binding: something executable with a parameter,
//! gated by a can-execute check, that notifies listeners when that gate
//! flips. The binder wires the gate into a control's enabled property and the
//! execution into the control's default event.
//!
//! [`RelayCommand`] is the stock implementation view models reach for:
//! behavior as a closure, gate as an explicit switch.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, Weak,
};

use super::subscription::Subscription;

/// Listener invoked with the new value each time a can-execute gate flips
pub type CanExecuteListener = Box<dyn Fn(bool) + Send + Sync>;

/// An executable action with a can-execute gate
pub trait Command<P>: Send + Sync {
    /// Run the action with the given parameter
    fn execute(&self, parameter: &P);

    /// Whether the action may currently run with the given parameter
    fn can_execute(&self, parameter: &P) -> bool;

    /// Subscribe to changes of the can-execute gate
    ///
    /// The listener is invoked with the new value each time the gate flips.
    /// Dropping the returned subscription detaches it.
    fn subscribe_can_execute_changed(&self, listener: CanExecuteListener) -> Subscription;
}

struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Arc<dyn Fn(bool) + Send + Sync>)>,
}

/// Closure-backed [`Command`] with an explicit can-execute switch
///
/// ```
/// # use crossbind::binding::{Command, RelayCommand};
/// let save = RelayCommand::new(|name: &String| println!("saving {name}"));
/// assert!(save.can_execute(&"draft".to_string()));
/// save.set_can_execute(false);
/// assert!(!save.can_execute(&"draft".to_string()));
/// ```
pub struct RelayCommand<P> {
    run: Box<dyn Fn(&P) + Send + Sync>,
    gate: AtomicBool,
    listeners: Arc<Mutex<Listeners>>,
}

impl<P> RelayCommand<P> {
    /// Create a command that starts out executable
    pub fn new(run: impl Fn(&P) + Send + Sync + 'static) -> Self {
        Self {
            run: Box::new(run),
            gate: AtomicBool::new(true),
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Flip the can-execute gate, notifying subscribers on change
    pub fn set_can_execute(&self, allowed: bool) {
        let previous = self.gate.swap(allowed, Ordering::SeqCst);
        if previous == allowed {
            return;
        }
        let listeners: Vec<_> = {
            let listeners = self.listeners.lock().unwrap();
            listeners
                .entries
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };
        for listener in listeners {
            listener(allowed);
        }
    }
}

impl<P: Send + Sync> Command<P> for RelayCommand<P> {
    fn execute(&self, parameter: &P) {
        (self.run)(parameter);
    }

    fn can_execute(&self, _parameter: &P) -> bool {
        self.gate.load(Ordering::SeqCst)
    }

    fn subscribe_can_execute_changed(&self, listener: CanExecuteListener) -> Subscription {
        let id = {
            let mut listeners = self.listeners.lock().unwrap();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, Arc::from(listener)));
            id
        };

        let weak: Weak<Mutex<Listeners>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                let mut listeners = listeners.lock().unwrap();
                listeners.entries.retain(|(entry_id, _)| *entry_id != id);
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_command_should_execute_with_parameter() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        let command = RelayCommand::new(move |parameter: &u32| {
            seen_clone.lock().unwrap().push(*parameter);
        });

        command.execute(&5);
        command.execute(&6);
        assert_eq!(*seen.lock().unwrap(), vec![5, 6]);
    }

    #[test]
    fn gate_change_should_notify_subscribers() {
        let command: RelayCommand<()> = RelayCommand::new(|_| {});
        let observed = Arc::new(Mutex::new(Vec::new()));
        let observed_clone = observed.clone();

        let subscription = command.subscribe_can_execute_changed(Box::new(move |allowed| {
            observed_clone.lock().unwrap().push(allowed);
        }));

        command.set_can_execute(false);
        command.set_can_execute(false); // no change, no notification
        command.set_can_execute(true);
        assert_eq!(*observed.lock().unwrap(), vec![false, true]);

        subscription.dispose();
        command.set_can_execute(false);
        assert_eq!(*observed.lock().unwrap(), vec![false, true]);
    }

    #[test]
    fn subscription_should_outlive_command_safely() {
        let command: RelayCommand<()> = RelayCommand::new(|_| {});
        let subscription = command.subscribe_can_execute_changed(Box::new(|_| {}));
        drop(command);
        drop(subscription); // listener list is gone; must not panic
    }
}
