//! # Control Capability Surface
//!
//! What the binder needs from a native control, expressed as explicit
//! capabilities instead of runtime reflection: an identity tag, named-event
//! subscription, and property access through descriptors the adapter resolves
//! itself. Platform layers implement [`Control`] once per widget kind and
//! describe their widget hierarchy to the binder through a [`TagTaxonomy`].

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use super::subscription::Subscription;

/// Identity tag for a control kind (e.g. `"button"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlTag(Cow<'static, str>);

impl ControlTag {
    pub const fn from_static(tag: &'static str) -> Self {
        Self(Cow::Borrowed(tag))
    }

    pub fn new(tag: impl Into<Cow<'static, str>>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControlTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ControlTag {
    fn from(tag: &'static str) -> Self {
        Self::from_static(tag)
    }
}

/// "Is-a" predicate over control tags, supplied by the platform layer
///
/// The binder asks this when ranking registered bindings against a target's
/// tag, so a binding registered for `"control"` can match a `"button"`
/// target if the platform says buttons are controls.
pub trait TagTaxonomy: Send + Sync {
    /// Whether `tag` is, or descends from, `ancestor`
    fn is_a(&self, tag: &ControlTag, ancestor: &ControlTag) -> bool;
}

/// Taxonomy with no hierarchy: a tag only matches itself
#[derive(Debug, Default, Clone, Copy)]
pub struct FlatTaxonomy;

impl TagTaxonomy for FlatTaxonomy {
    fn is_a(&self, tag: &ControlTag, ancestor: &ControlTag) -> bool {
        tag == ancestor
    }
}

/// Taxonomy built from explicit child → parent edges
///
/// ```
/// # use crossbind::binding::{ControlTag, TagTaxonomy, TreeTaxonomy};
/// let taxonomy = TreeTaxonomy::new()
///     .with_edge("button", "control")
///     .with_edge("submit-button", "button");
/// assert!(taxonomy.is_a(&"submit-button".into(), &"control".into()));
/// assert!(!taxonomy.is_a(&"control".into(), &"button".into()));
/// ```
#[derive(Debug, Default, Clone)]
pub struct TreeTaxonomy {
    parents: HashMap<ControlTag, ControlTag>,
}

impl TreeTaxonomy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare that `child` descends from `parent`
    pub fn with_edge(
        mut self,
        child: impl Into<ControlTag>,
        parent: impl Into<ControlTag>,
    ) -> Self {
        self.parents.insert(child.into(), parent.into());
        self
    }
}

impl TagTaxonomy for TreeTaxonomy {
    fn is_a(&self, tag: &ControlTag, ancestor: &ControlTag) -> bool {
        if tag == ancestor {
            return true;
        }
        let mut current = tag;
        // Edge count bounds the walk, so a malformed cycle cannot spin forever.
        for _ in 0..=self.parents.len() {
            match self.parents.get(current) {
                Some(parent) if parent == ancestor => return true,
                Some(parent) => current = parent,
                None => return false,
            }
        }
        false
    }
}

/// Descriptor for a boolean property a control exposes
///
/// Descriptors are plain named markers; each [`Control`] implementation
/// resolves them to its own storage. Unknown descriptors are an adapter
/// error, surfaced at the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolProperty {
    pub name: &'static str,
}

/// The enabled/disabled state every bindable control carries
pub const ENABLED: BoolProperty = BoolProperty { name: "enabled" };

/// Listener invoked on each occurrence of a subscribed control event
pub type EventListener = Box<dyn Fn() + Send + Sync>;

/// A native control as the binder sees it
///
/// Adapter methods return `anyhow::Result` — what counts as an unknown event
/// or property is the adapter's business; the binder wraps failures into its
/// own error at the binding boundary.
pub trait Control: Send + Sync {
    /// The control-kind tag used for binding resolution
    fn tag(&self) -> ControlTag;

    /// Subscribe to a named event; fails if the control has no such event
    fn subscribe_event(&self, event: &str, listener: EventListener)
        -> anyhow::Result<Subscription>;

    /// Read a boolean property by descriptor
    fn get_bool(&self, property: &BoolProperty) -> anyhow::Result<bool>;

    /// Write a boolean property by descriptor
    fn set_bool(&self, property: &BoolProperty, value: bool) -> anyhow::Result<()>;
}
