//! The bounded pool of staff that customers queue for.

use std::collections::VecDeque;

use tracing::debug;

use crate::customer::CustomerId;

/// Receives the length of the waiting line whenever it changes.
pub trait QueueObserver {
    fn queue_length_changed(&mut self, time: f64, length: usize);
}

/// How a request for a staff member was settled.
///
/// Every ticket starts [`Pending`](Resolution::Pending) (or is born [`Granted`](Resolution::Granted)) and moves out of
/// `Pending` at most once.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    Pending,
    Granted,
    Expired,
}

/// Index of a [`Ticket`] within its [`StaffPool`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TicketId(usize);

/// One customer's outstanding request for a staff member.
#[derive(Clone, Debug)]
pub struct Ticket {
    owner: CustomerId,
    resolution: Resolution,
}

impl Ticket {
    pub fn owner(&self) -> CustomerId {
        self.owner
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Check-and-set out of `Pending`. Returns `false`, leaving the ticket untouched, if it was already settled.
    fn resolve(&mut self, outcome: Resolution) -> bool {
        if self.resolution != Resolution::Pending {
            return false;
        }
        self.resolution = outcome;
        true
    }
}

/// Outcome of [`StaffPool::withdraw()`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Withdrawal {
    /// The ticket left the line and is now `Expired`.
    Withdrawn,
    /// The ticket had already been granted; the grant stands.
    AlreadyGranted,
    /// The ticket had already been withdrawn.
    AlreadyExpired,
}

/// A fixed number of staff slots with a strictly FIFO waiting line.
///
/// Invariants: `0 <= active_count() <= capacity()`, the line only holds `Pending` tickets, and a ticket is at any time
/// either waiting, granted, or withdrawn.
#[derive(Clone, Debug)]
pub struct StaffPool {
    capacity: usize,
    active: usize,
    waiting: VecDeque<TicketId>,
    tickets: Vec<Ticket>,
}

impl StaffPool {
    /// A pool with `capacity` idle staff. A zero capacity is rejected before a pool is ever built.
    pub fn new(capacity: usize) -> Self {
        debug_assert!(capacity > 0, "staff pool needs at least one slot");
        Self {
            capacity,
            active: 0,
            waiting: VecDeque::new(),
            tickets: Vec::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn active_count(&self) -> usize {
        self.active
    }

    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    pub fn ticket(&self, id: TicketId) -> &Ticket {
        &self.tickets[id.0]
    }

    /// Ask for a staff member on behalf of `owner`.
    ///
    /// With a free slot the ticket comes back already `Granted`. Otherwise it is `Pending` at the back of the line.
    pub fn request(&mut self, owner: CustomerId, now: f64, observer: &mut impl QueueObserver) -> TicketId {
        let id = TicketId(self.tickets.len());
        if self.active < self.capacity {
            self.active += 1;
            self.tickets.push(Ticket {
                owner,
                resolution: Resolution::Granted,
            });
        } else {
            self.tickets.push(Ticket {
                owner,
                resolution: Resolution::Pending,
            });
            self.waiting.push_back(id);
            observer.queue_length_changed(now, self.waiting.len());
        }
        id
    }

    /// Free one slot and hand it to the head of the line, if anyone is waiting.
    ///
    /// Returns the ticket that was just granted. The caller is responsible for resuming its owner.
    pub fn release(&mut self, now: f64, observer: &mut impl QueueObserver) -> Option<TicketId> {
        debug_assert!(self.active > 0, "release without an active slot");
        self.active = self.active.saturating_sub(1);

        let next = self.waiting.pop_front()?;
        let granted = self.tickets[next.0].resolve(Resolution::Granted);
        debug_assert!(granted, "waiting line held a settled ticket");
        self.active += 1;
        observer.queue_length_changed(now, self.waiting.len());
        debug!(time = now, customer = self.tickets[next.0].owner.0, "slot handed to next in line");
        Some(next)
    }

    /// Take a still-pending ticket out of the line. A granted ticket is left alone.
    pub fn withdraw(&mut self, id: TicketId, now: f64, observer: &mut impl QueueObserver) -> Withdrawal {
        let ticket = &mut self.tickets[id.0];
        match ticket.resolution {
            Resolution::Granted => return Withdrawal::AlreadyGranted,
            Resolution::Expired => return Withdrawal::AlreadyExpired,
            Resolution::Pending => {
                ticket.resolve(Resolution::Expired);
            },
        }

        if let Some(position) = self.waiting.iter().position(|waiting| *waiting == id) {
            self.waiting.remove(position);
        }
        observer.queue_length_changed(now, self.waiting.len());
        Withdrawal::Withdrawn
    }
}
