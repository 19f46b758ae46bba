//! Last-write-wins slot for results that may be computed out of band.
//!
//! Each request takes a [`Ticket`]. A result is accepted only when its ticket
//! is the newest one issued; results of superseded requests are dropped, so
//! a slow stale computation can never overwrite a fresher one.

/// Identifies one request against a [`LatestSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct LatestSlot<T> {
    issued: u64,
    applied: u64,
    value: T,
}

impl<T> LatestSlot<T> {
    pub fn new(value: T) -> Self {
        LatestSlot {
            issued: 0,
            applied: 0,
            value,
        }
    }

    /// Issue a ticket for a new request, superseding all earlier ones.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Offer a result. Returns `true` if it was stored.
    pub fn offer(&mut self, ticket: Ticket, value: T) -> bool {
        if ticket.0 != self.issued || ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;
        self.value = value;
        true
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// True while a newer request than the stored value is outstanding.
    pub fn is_pending(&self) -> bool {
        self.applied < self.issued
    }
}
