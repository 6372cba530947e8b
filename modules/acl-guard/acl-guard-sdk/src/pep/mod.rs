//! PEP (Policy Enforcement Point) helpers.
//!
//! - [`materialize::materialize`]: Turns a templated alternative into a concrete `Permission`
//! - [`decision::decide`]: Runs the matcher over an alternative list (OR, short-circuit)
//! - [`enforcer::PolicyEnforcer`]: Full flow: resolve granted set → decide → allow/deny
//! - [`enforcer::fetch_granted`]: Bulk lookup with the policy's error collapsing

pub mod decision;
pub mod enforcer;
pub mod materialize;

pub use decision::{Decision, Evaluation, GrantBasis, decide};
pub use enforcer::{EmptyValuePolicy, PolicyConfig, PolicyEnforcer, fetch_granted};
pub use materialize::materialize;
