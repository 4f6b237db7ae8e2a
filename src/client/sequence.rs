use std::sync::Arc;

/// Position of a List request in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// A value that only accepts responses newer than the last one applied.
#[derive(Debug)]
pub struct Versioned<T> {
    value: Arc<T>,
    issued: u64,
    applied: u64,
}

impl<T> Versioned<T> {
    pub fn new(value: T) -> Self {
        Versioned { value: Arc::new(value), issued: 0, applied: 0 }
    }

    pub fn value(&self) -> Arc<T> {
        Arc::clone(&self.value)
    }

    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Replaces the value if `ticket` is newer than the last applied one. Returns whether it did.
    pub fn commit(&mut self, ticket: Ticket, value: T) -> bool {
        if ticket.0 <= self.applied {
            return false;
        }
        self.applied = ticket.0;
        self.value = Arc::new(value);
        true
    }
}
