//! # Interaction Context
//!
//! One in-flight request as seen by a single handler: the input value plus an
//! output slot that may be filled at most once. Filling the slot is what
//! marks the interaction handled; leaving it empty is how a handler declines
//! so the mediator moves on to the next handler in the chain.

/// Per-handler view of one interaction request
///
/// The mediator creates a fresh context for every handler it tries, so a
/// filled slot always belongs to exactly one responder.
///
/// # Panics
///
/// The output slot enforces its invariants by failing fast — both of these
/// are responder bugs, not recoverable conditions:
///
/// - [`set_output`](Self::set_output) called twice panics.
/// - [`output`](Self::output) read before any set panics.
#[derive(Debug)]
pub struct InteractionContext<I, O> {
    input: I,
    output: Option<O>,
}

impl<I, O> InteractionContext<I, O> {
    /// Create a context for one handler invocation
    pub fn new(input: I) -> Self {
        Self {
            input,
            output: None,
        }
    }

    /// The input value the requester supplied
    pub fn input(&self) -> &I {
        &self.input
    }

    /// Whether a handler has supplied an output
    pub fn is_handled(&self) -> bool {
        self.output.is_some()
    }

    /// Supply the response, marking the interaction handled
    pub fn set_output(&mut self, output: O) {
        if self.output.is_some() {
            panic!("interaction output was already set; a handler may respond at most once");
        }
        self.output = Some(output);
    }

    /// Read the response supplied by [`set_output`](Self::set_output)
    pub fn output(&self) -> &O {
        match &self.output {
            Some(output) => output,
            None => panic!("interaction output read before any handler set it"),
        }
    }

    /// Consume the context, yielding the output if one was set
    pub(crate) fn into_output(self) -> Option<O> {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_context_should_expose_input_and_be_unhandled() {
        let ctx: InteractionContext<u32, String> = InteractionContext::new(7);
        assert_eq!(*ctx.input(), 7);
        assert!(!ctx.is_handled());
    }

    #[test]
    fn set_output_should_mark_handled() {
        let mut ctx: InteractionContext<u32, String> = InteractionContext::new(7);
        ctx.set_output("ok".to_string());
        assert!(ctx.is_handled());
        assert_eq!(ctx.output(), "ok");
        assert_eq!(ctx.into_output(), Some("ok".to_string()));
    }

    #[test]
    #[should_panic(expected = "already set")]
    fn double_set_output_should_panic() {
        let mut ctx: InteractionContext<u32, &str> = InteractionContext::new(1);
        ctx.set_output("first");
        ctx.set_output("second");
    }

    #[test]
    #[should_panic(expected = "read before")]
    fn output_before_set_should_panic() {
        let ctx: InteractionContext<u32, &str> = InteractionContext::new(1);
        let _ = ctx.output();
    }

    #[test]
    fn declining_context_should_yield_no_output() {
        let ctx: InteractionContext<u32, &str> = InteractionContext::new(1);
        assert_eq!(ctx.into_output(), None);
    }
}
