//! Contains the main building blocks for propagators.
//!
//! # Background
//!
//! A propagator takes as input a set of variables (<code>x<sub>i</sub> ∈ X</code>) and for each
//! variable a corresponding domain (<code>D<sub>i</sub> ∈ D</code>); it can then be seen as a
//! function which maps `D ↦ D'` such that <code>D'<sub>i</sub> ⊆ D<sub>i</sub></code> for all
//! variables (i.e. the domain of a variable either remains the same after applying the propagator
//! or it becomes a subset of the domain before applying the propagator).
//!
//! An example of a propagator can be the simple not equal (`!=`) propagator, suppose that
//! we have two variables `x ∈ {0}` and `y ∈ {0, 1}` and the constraint `x != y`. The not equal
//! propagator will then take as input the variables `x` and `y` and their respective domains
//! <code>D = {D<sub>x</sub> = {0}, D<sub>y</sub> = {0, 1}</code> and produce a new domain <code>D'
//! = {D'<sub>x</sub> = {0}, D'<sub>y</sub> = {1}}</code> for which we can see that <code>D_x =
//! D'<sub>x</sub></code> and <code>D'<sub>y</sub> ⊆ D<sub>y</sub></code>.
//!
//! A propagator is said to be at fix-point if <code>D<sub>x</sub> = D'<sub>x</sub></code> meaning
//! that no further propagations can take place when applying the propagator. A propagator is said
//! to be "idempotent" if a single call to it will result in it being at fix-point.
//!
//! For more information about the construction of these types of propagation-based engines, we
//! refer to [\[1\]](https://dl.acm.org/doi/pdf/10.1145/1452044.1452046).
//!
//! # Practical
//!
//! Each concrete propagator is associated with one trait: [`Propagator`]. The main function to
//! implement for this trait is [`Propagator::propagate`], which performs the domain reduction.
//!
//! A propagator is created by a [`PropagatorConstructor`]. The constructor registers the
//! variables of the propagator and sets up its state; the events on which the propagator is woken
//! up are its [`Propagator::propagation_conditions`]. Views such as [`AffineView`] translate the
//! conditions to the underlying domain when they are registered.
//!
//! A propagator which can no longer reduce any domain in the current branch can mark itself
//! passive through [`PropagationContext::set_passive`]. The flag lives in the [`Environment`], so
//! backtracking past the world in which it was set makes the propagator active again.
//!
//! Propagators do not record why they reduced a domain. When an explanation is requested through
//! [`State::explain_contradiction`], the engine asks them through [`Propagator::explain`].
//!
//! # Bibliography
//!
//! \[1\] C. Schulte and P. J. Stuckey, ‘Efficient constraint propagation engines’, ACM Transactions
//! on Programming Languages and Systems (TOPLAS), vol. 31, no. 1, pp. 1–43, 2008.
//!
//! \[2\] C. Schulte and G. Tack, ‘Views and iterators for generic constraint implementations’, in
//! International Workshop on Constraint Solving and Constraint Logic Programming, 2005, pp.
//! 118–132.

mod constructor;
mod contexts;
mod domains;
mod local_id;
mod propagator;

pub(crate) mod propagator_id;
pub(crate) mod propagator_var_id;
pub(crate) mod store;

pub use constructor::PropagatorConstructor;
pub use constructor::PropagatorConstructorContext;
pub(crate) use constructor::Registration;
pub use contexts::*;
pub use domains::*;
pub use local_id::*;
pub use propagator::*;
pub use propagator_id::PropagatorId;
pub(crate) use propagator_var_id::PropagatorVarId;
pub use store::PropagatorHandle;

#[cfg(doc)]
use crate::engine::cp::Environment;
pub use crate::engine::notifications::DomainEvent;
pub use crate::engine::notifications::DomainEvents;
pub use crate::engine::notifications::OpaqueDomainEvent;
pub use crate::engine::notifications::OpaqueDomainEvents;
#[cfg(doc)]
use crate::engine::variables::AffineView;
#[cfg(doc)]
use crate::state::State;
