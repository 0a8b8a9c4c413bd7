//! Load tickets and their allocator.

use serde::{Deserialize, Serialize};

/// Generation token for one load request.
///
/// The resource echoes the ticket back in [`crate::MediaEvent::CanPlay`]; the
/// player only honours readiness for the ticket it issued last.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct LoadTicket(pub u64);

/// Monotonic allocator for LoadTicket. Ticket 0 is never handed out so a
/// default-constructed ticket can never match a live load.
#[derive(Default, Debug)]
pub struct TicketAllocator {
    last: u64,
}

impl TicketAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc(&mut self) -> LoadTicket {
        self.last = self.last.wrapping_add(1).max(1);
        LoadTicket(self.last)
    }

    /// Most recently issued ticket, if any.
    #[inline]
    pub fn current(&self) -> Option<LoadTicket> {
        (self.last != 0).then_some(LoadTicket(self.last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_monotonic() {
        let mut alloc = TicketAllocator::new();
        assert_eq!(alloc.current(), None);
        assert_eq!(alloc.alloc(), LoadTicket(1));
        assert_eq!(alloc.alloc(), LoadTicket(2));
        assert_eq!(alloc.current(), Some(LoadTicket(2)));
    }

    #[test]
    fn default_ticket_never_issued() {
        let mut alloc = TicketAllocator::new();
        for _ in 0..4 {
            assert_ne!(alloc.alloc(), LoadTicket::default());
        }
    }
}
