use std::fmt::Display;

use thiserror::Error;

use crate::engine::DomainMutation;
use crate::propagation::DomainEvent;
use crate::propagation::PropagatorId;
use crate::variables::DomainId;

/// The agent responsible for a domain reduction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Cause {
    /// A reduction applied from outside of propagation, e.g. by the search.
    Decision,
    /// A reduction performed by the propagator with the given id.
    Propagator(PropagatorId),
}

impl Display for Cause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Cause::Decision => write!(f, "decision"),
            Cause::Propagator(propagator_id) => write!(f, "{propagator_id}"),
        }
    }
}

/// The result of a domain reduction: `Ok(true)` when the domain changed, `Ok(false)` when the
/// reduction was already entailed by the domain.
pub type DomainResult = Result<bool, Contradiction>;

/// The result of running a propagator.
pub type PropagationStatus = Result<(), Contradiction>;

/// Detection that the current state is inconsistent, either because a domain became empty or
/// because a propagator found its constraint violated.
///
/// A contradiction is recoverable: after popping the world in which it was raised the state is
/// consistent again.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("contradiction raised by {cause}: {message}")]
pub struct Contradiction {
    /// The agent which raised the contradiction.
    pub cause: Cause,
    /// The domain which would have become empty, if any.
    pub domain: Option<DomainId>,
    /// The event the failed reduction would have raised, if any.
    pub event: Option<DomainEvent>,
    pub message: String,
}

impl Contradiction {
    /// A contradiction caused by applying `mutation` to `domain` leaving it without values.
    pub fn empty_domain(cause: Cause, domain: DomainId, mutation: DomainMutation) -> Self {
        Contradiction {
            cause,
            domain: Some(domain),
            event: Some(mutation.event()),
            message: format!("{mutation} empties the domain of {domain}"),
        }
    }

    /// A contradiction which is detected by the logic of a propagator rather than by a domain
    /// wipe-out.
    pub fn propagator(propagator_id: PropagatorId, message: impl Into<String>) -> Self {
        Contradiction {
            cause: Cause::Propagator(propagator_id),
            domain: None,
            event: None,
            message: message.into(),
        }
    }
}
