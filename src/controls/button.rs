//! Terminal button adapter
//!
//! A focusable "press me" control for terminal UIs: feed it the crossterm
//! key events your event loop reads, and it raises its `pressed` event on
//! Enter or space. Disabled buttons swallow input, which is why the binder's
//! enabled wiring is enough to keep a command from firing through this
//! control.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, Weak,
};

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

use crate::binding::{BoolProperty, Control, ControlTag, EventListener, Subscription};

/// The button's default activation event
pub const PRESSED: &str = "pressed";

struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Arc<dyn Fn() + Send + Sync>)>,
}

/// Key-activated terminal button implementing [`Control`]
pub struct TermButton {
    tag: ControlTag,
    enabled: AtomicBool,
    listeners: Arc<Mutex<Listeners>>,
}

impl TermButton {
    /// Create a button with the stock `"button"` tag
    pub fn new() -> Self {
        Self::with_tag(ControlTag::from_static("button"))
    }

    /// Create a button reporting a more specific tag (e.g. `"submit-button"`)
    pub fn with_tag(tag: ControlTag) -> Self {
        Self {
            tag,
            enabled: AtomicBool::new(true),
            listeners: Arc::new(Mutex::new(Listeners {
                next_id: 0,
                entries: Vec::new(),
            })),
        }
    }

    /// Whether the button currently accepts input
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Offer a key event to the button
    ///
    /// Enter and space press events raise `pressed`; anything else is
    /// ignored, as is all input while the button is disabled.
    pub fn feed_key(&self, key: KeyEvent) {
        if !self.is_enabled() || key.kind != KeyEventKind::Press {
            return;
        }
        if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
            tracing::trace!(tag = %self.tag, "term button pressed");
            self.fire_pressed();
        }
    }

    fn fire_pressed(&self) {
        let listeners: Vec<_> = {
            let listeners = self.listeners.lock().unwrap();
            listeners
                .entries
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect()
        };
        for listener in listeners {
            listener();
        }
    }
}

impl Default for TermButton {
    fn default() -> Self {
        Self::new()
    }
}

impl Control for TermButton {
    fn tag(&self) -> ControlTag {
        self.tag.clone()
    }

    fn subscribe_event(
        &self,
        event: &str,
        listener: EventListener,
    ) -> anyhow::Result<Subscription> {
        anyhow::ensure!(
            event == PRESSED,
            "term button has no event `{event}` (only `{PRESSED}`)"
        );

        let id = {
            let mut listeners = self.listeners.lock().unwrap();
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.entries.push((id, Arc::from(listener)));
            id
        };

        let weak: Weak<Mutex<Listeners>> = Arc::downgrade(&self.listeners);
        Ok(Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                let mut listeners = listeners.lock().unwrap();
                listeners.entries.retain(|(entry_id, _)| *entry_id != id);
            }
        }))
    }

    fn get_bool(&self, property: &BoolProperty) -> anyhow::Result<bool> {
        anyhow::ensure!(
            property.name == "enabled",
            "term button has no property `{}`",
            property.name
        );
        Ok(self.is_enabled())
    }

    fn set_bool(&self, property: &BoolProperty, value: bool) -> anyhow::Result<()> {
        anyhow::ensure!(
            property.name == "enabled",
            "term button has no property `{}`",
            property.name
        );
        self.enabled.store(value, Ordering::SeqCst);
        Ok(())
    }
}
