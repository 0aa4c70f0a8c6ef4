//! The life of one caller, as a state machine driven by scheduled events.
//!
//! ```text
//! Arrived ──granted at once──────────────┐
//!    │                                   v
//!    └─> Waiting ──slot released──> Served ──service done──> Completed
//!           │
//!           └──patience ran out──> Reneged
//! ```
//!
//! A waiting customer has two outstanding continuations racing each other: the patience timer scheduled at arrival,
//! and the [`ServiceStart`] that [`StaffPool::release()`] triggers. The ticket's [`Resolution`] settles the race, so
//! whichever loses finds a non-pending ticket and does nothing.
//!
//! When both fall on the same instant the grant wins. The patience timer does not withdraw on its first firing; it
//! re-queues itself behind every event already due at that instant, so a service completion due at the same moment
//! gets to hand its slot over first.
//!
//! [`StaffPool::release()`]: crate::staff::StaffPool::release

use tracing::debug;

use crate::run::{CallCenter, Minutes};
use crate::scheduler::{Event, EventHandle, EventQueue};
use crate::staff::{Resolution, TicketId, Withdrawal};

/// Position of a customer in the order they called in, starting from zero.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerId(pub usize);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CustomerState {
    Arrived,
    Waiting,
    Served,
    Completed,
    Reneged,
}

impl CustomerState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Reneged)
    }
}

#[derive(Clone, Debug)]
pub struct Customer {
    id: CustomerId,
    arrival_time: f64,
    patience: f64,
    service_time: f64,
    state: CustomerState,
    ticket: TicketId,
    wait: Option<f64>,
    /// Whichever patience timer is outstanding.
    timer: Option<EventHandle>,
}

impl Customer {
    pub fn id(&self) -> CustomerId {
        self.id
    }

    pub fn arrival_time(&self) -> f64 {
        self.arrival_time
    }

    pub fn patience(&self) -> f64 {
        self.patience
    }

    pub fn service_time(&self) -> f64 {
        self.service_time
    }

    pub fn state(&self) -> CustomerState {
        self.state
    }

    pub fn ticket(&self) -> TicketId {
        self.ticket
    }

    /// Time spent in line, once a staff member has picked up.
    pub fn wait(&self) -> Option<f64> {
        self.wait
    }
}

/// Spawn a customer at the current time and ask for a staff member.
pub(crate) fn arrive(center: &mut CallCenter, queue: &mut EventQueue<CallCenter, Minutes>) -> crate::Result {
    let now = queue.current_time().into_inner();
    let id = CustomerId(center.customers.len());
    let (patience, service_time) = center.draws.customer_profile();

    let ticket = center.staff.request(id, now, &mut center.stats);
    center.stats.observe_queue_length(now, center.staff.waiting_len());
    center.customers.push(Customer {
        id,
        arrival_time: now,
        patience,
        service_time,
        state: CustomerState::Arrived,
        ticket,
        wait: None,
        timer: None,
    });
    debug!(customer = id.0, time = now, patience, "customer called in");

    if center.staff.ticket(ticket).resolution() == Resolution::Granted {
        return begin_service(id, center, queue);
    }

    let timer = queue.schedule_with_delay(
        PatienceExpired {
            customer: id,
            deferred: false,
        },
        patience,
    )?;
    let customer = &mut center.customers[id.0];
    customer.state = CustomerState::Waiting;
    customer.timer = Some(timer);
    Ok(())
}

/// The customer's ticket has been granted: record the wait and occupy the slot for the service time.
fn begin_service(
    id: CustomerId,
    center: &mut CallCenter,
    queue: &mut EventQueue<CallCenter, Minutes>,
) -> crate::Result {
    let now = queue.current_time().into_inner();
    let customer = &mut center.customers[id.0];
    if let Some(timer) = customer.timer.take() {
        queue.cancel(timer);
    }

    let wait = now - customer.arrival_time;
    customer.state = CustomerState::Served;
    customer.wait = Some(wait);
    let service_time = customer.service_time;
    center.stats.observe_wait(wait);
    debug!(customer = id.0, time = now, wait, service_time, "customer connected");

    queue.schedule_with_delay(ServiceComplete { customer: id }, service_time)?;
    Ok(())
}

/// Wake the owner of a ticket that [`StaffPool::release()`](crate::staff::StaffPool::release) just granted.
fn resume(ticket: TicketId, center: &mut CallCenter, queue: &mut EventQueue<CallCenter, Minutes>) -> crate::Result {
    let owner = center.staff.ticket(ticket).owner();
    if let Some(timer) = center.customers[owner.0].timer.take() {
        queue.cancel(timer);
    }
    queue.schedule_now(ServiceStart { customer: owner })?;
    Ok(())
}

/// Delivery of a grant to a customer who was waiting in line.
#[derive(Debug)]
pub struct ServiceStart {
    customer: CustomerId,
}

impl Event<CallCenter, Minutes> for ServiceStart {
    fn execute(&mut self, center: &mut CallCenter, queue: &mut EventQueue<CallCenter, Minutes>) -> crate::Result {
        begin_service(self.customer, center, queue)
    }
}

/// The staff member finishes with a customer and takes the next caller in line.
#[derive(Debug)]
pub struct ServiceComplete {
    customer: CustomerId,
}

impl Event<CallCenter, Minutes> for ServiceComplete {
    fn execute(&mut self, center: &mut CallCenter, queue: &mut EventQueue<CallCenter, Minutes>) -> crate::Result {
        let now = queue.current_time().into_inner();
        let customer = &mut center.customers[self.customer.0];
        customer.state = CustomerState::Completed;
        center.stats.observe_busy(customer.service_time);
        debug!(customer = self.customer.0, time = now, "call finished");

        if let Some(next) = center.staff.release(now, &mut center.stats) {
            resume(next, center, queue)?;
        }
        center.served += 1;
        center.stats.observe_queue_length(now, center.staff.waiting_len());
        Ok(())
    }
}

/// A waiting customer's patience runs out.
#[derive(Debug)]
pub struct PatienceExpired {
    customer: CustomerId,
    /// Set once the timer has yielded to the other events due at the same instant.
    deferred: bool,
}

impl Event<CallCenter, Minutes> for PatienceExpired {
    fn execute(&mut self, center: &mut CallCenter, queue: &mut EventQueue<CallCenter, Minutes>) -> crate::Result {
        let ticket = center.customers[self.customer.0].ticket;
        if center.staff.ticket(ticket).resolution() != Resolution::Pending {
            return Ok(());
        }

        if !self.deferred {
            let timer = queue.schedule_now(PatienceExpired {
                customer: self.customer,
                deferred: true,
            })?;
            center.customers[self.customer.0].timer = Some(timer);
            return Ok(());
        }

        let now = queue.current_time().into_inner();
        match center.staff.withdraw(ticket, now, &mut center.stats) {
            Withdrawal::Withdrawn => {
                let customer = &mut center.customers[self.customer.0];
                customer.state = CustomerState::Reneged;
                customer.timer = None;
                center.reneged += 1;
                center.stats.observe_queue_length(now, center.staff.waiting_len());
                debug!(customer = self.customer.0, time = now, "customer hung up");
            },
            // the grant stands and its ServiceStart is already queued
            Withdrawal::AlreadyGranted | Withdrawal::AlreadyExpired => {},
        }
        Ok(())
    }
}
