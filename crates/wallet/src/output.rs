//! Event collection.

use std::mem;

use msig_wallet_types::WalletEvent;

/// Buffer of events emitted but not yet picked up by the host.
#[derive(Clone, Debug, Default)]
pub(crate) struct EventBuffer {
    events: Vec<WalletEvent>,
}

impl EventBuffer {
    pub(crate) fn emit(&mut self, event: WalletEvent) {
        self.events.push(event);
    }

    pub(crate) fn pending(&self) -> &[WalletEvent] {
        &self.events
    }

    pub(crate) fn take(&mut self) -> Vec<WalletEvent> {
        mem::take(&mut self.events)
    }
}
