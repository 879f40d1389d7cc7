//! Notification channels from the controller to the renderer.
//!
//! Handlers run synchronously on the owning context, in registration order.
//! A channel is never re-entered: handlers receive a shared snapshot and
//! cannot call back into the controller.

use super::state::ListState;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type StateHandler = Box<dyn FnMut(&ListState) + Send>;
type FooterHandler = Box<dyn FnMut(usize) + Send>;
type RefreshHandler = Box<dyn FnMut() + Send>;

/// Three notification channels: state changed, footer count, refresh completed.
#[derive(Default)]
pub struct Notifier {
    next_id: u64,
    state_handlers: Vec<(Subscription, StateHandler)>,
    footer_handlers: Vec<(Subscription, FooterHandler)>,
    refresh_handlers: Vec<(Subscription, RefreshHandler)>,
}

impl Notifier {
    /// Empty notifier.
    pub fn new() -> Self {
        Self::default()
    }

    fn mint(&mut self) -> Subscription {
        self.next_id += 1;
        Subscription(self.next_id)
    }

    /// Register a state-changed handler.
    pub fn on_state_change<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(&ListState) + Send + 'static,
    {
        let id = self.mint();
        self.state_handlers.push((id, Box::new(handler)));
        id
    }

    /// Register a footer handler; receives the new item count.
    pub fn on_footer_update<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut(usize) + Send + 'static,
    {
        let id = self.mint();
        self.footer_handlers.push((id, Box::new(handler)));
        id
    }

    /// Register a refresh-completed handler.
    pub fn on_refresh_complete<F>(&mut self, handler: F) -> Subscription
    where
        F: FnMut() + Send + 'static,
    {
        let id = self.mint();
        self.refresh_handlers.push((id, Box::new(handler)));
        id
    }

    /// Remove a handler from whichever channel holds it. Returns true if found.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.handler_count();
        self.state_handlers.retain(|(id, _)| *id != subscription);
        self.footer_handlers.retain(|(id, _)| *id != subscription);
        self.refresh_handlers.retain(|(id, _)| *id != subscription);
        self.handler_count() != before
    }

    /// Total registered handlers across all channels.
    pub fn handler_count(&self) -> usize {
        self.state_handlers.len() + self.footer_handlers.len() + self.refresh_handlers.len()
    }

    pub(crate) fn state_changed(&mut self, state: &ListState) {
        for (_, handler) in &mut self.state_handlers {
            handler(state);
        }
    }

    pub(crate) fn footer_updated(&mut self, count: usize) {
        for (_, handler) in &mut self.footer_handlers {
            handler(count);
        }
    }

    pub(crate) fn refresh_completed(&mut self) {
        for (_, handler) in &mut self.refresh_handlers {
            handler();
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier")
            .field("state_handlers", &self.state_handlers.len())
            .field("footer_handlers", &self.footer_handlers.len())
            .field("refresh_handlers", &self.refresh_handlers.len())
            .finish()
    }
}
