//! Per-call binding state.
//!
//! A [`BindingContext`] is created for every generation call and dropped when
//! the call ends. Directive callbacks running inside the template evaluator
//! reach it through the evaluation context under
//! [`BINDING_CONTEXT_VARIABLE_NAME`].

mod context;
mod naming;

pub use context::{BindingContext, BINDING_CONTEXT_VARIABLE_NAME};
pub use naming::{IterationNamingService, IterationStatus, LoopId};
