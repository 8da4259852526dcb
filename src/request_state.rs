//! Request lifecycle shared by every backend-driven panel.
//!
//! `idle -> pending -> succeeded | failed`, with a generation counter: each
//! [`RequestState::begin`] hands out a [`Ticket`] and only the newest ticket
//! may resolve. [`RequestState::invalidate`] retires the outstanding ticket,
//! so a response that arrives after its view was left is dropped.

/// Identifies one started request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Coarse view of a [`RequestState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestPhase {
    Idle,
    Pending,
    Succeeded,
    Failed,
}

/// What happened to a response handed to [`RequestState::resolve`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub enum Resolution {
    Applied,
    Stale,
}

impl Resolution {
    pub fn is_applied(self) -> bool {
        self == Self::Applied
    }
}

/// Latest value, latest error and the in-flight ticket of one request kind.
///
/// A failure keeps the previous value so panels can go on showing it.
#[derive(Clone, Debug, PartialEq)]
pub struct RequestState<T> {
    generation: u64,
    in_flight: Option<u64>,
    value: Option<T>,
    error: Option<String>,
}

impl<T> Default for RequestState<T> {
    fn default() -> Self {
        Self {
            generation: 0,
            in_flight: None,
            value: None,
            error: None,
        }
    }
}

impl<T> RequestState<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a request, superseding any outstanding one.
    pub fn begin(&mut self) -> Ticket {
        self.generation += 1;
        self.in_flight = Some(self.generation);
        self.error = None;
        Ticket(self.generation)
    }

    /// Apply `outcome` if `ticket` is still the current request.
    pub fn resolve(&mut self, ticket: Ticket, outcome: Result<T, String>) -> Resolution {
        if self.in_flight != Some(ticket.0) {
            return Resolution::Stale;
        }
        self.in_flight = None;
        match outcome {
            Ok(value) => {
                self.value = Some(value);
                self.error = None;
            }
            Err(message) => self.error = Some(message),
        }
        Resolution::Applied
    }

    /// Retire the outstanding ticket without touching value or error.
    pub fn invalidate(&mut self) {
        if self.in_flight.take().is_some() {
            self.generation += 1;
        }
    }

    /// Forget everything, including any outstanding ticket.
    pub fn reset(&mut self) {
        self.invalidate();
        self.value = None;
        self.error = None;
    }

    pub fn phase(&self) -> RequestPhase {
        if self.in_flight.is_some() {
            RequestPhase::Pending
        } else if self.error.is_some() {
            RequestPhase::Failed
        } else if self.value.is_some() {
            RequestPhase::Succeeded
        } else {
            RequestPhase::Idle
        }
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn value_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
