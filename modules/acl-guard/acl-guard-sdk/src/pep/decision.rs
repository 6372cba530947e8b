//! PEP decision over an alternative list.
//!
//! ## Decision matrix (deny by default)
//!
//! | alternatives | granted set | any alternative matches | Result |
//! |--------------|-------------|-------------------------|--------|
//! | empty        | *           | -                       | Deny   |
//! | present      | empty       | -                       | Deny   |
//! | present      | present     | no                      | Deny   |
//! | present      | present     | yes (first one wins)    | Allow  |
//!
//! Matcher mismatches are never errors; only the enforcer turns `Deny` into
//! a `Forbidden` error.

use crate::api::AttemptOutcome;
use crate::matcher::exists_match;
use crate::models::Permission;

/// Outcome of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The alternative at this index (in declaration order) was satisfied.
    Allow { alternative: usize },
    Deny,
}

/// Where the granted set used for the decision came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantBasis {
    /// Trusted pre-supplied permissions carried by the request.
    Supplied,
    /// Permissions already resolved earlier in the same request.
    Resolved,
    /// Fetched from the gateway by this evaluation.
    Fetched,
    /// Per-alternative existence probes against the gateway.
    Probed,
    /// Nothing to evaluate; no granted set was needed.
    NotConsulted,
}

/// Decision plus the per-alternative trail that led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub decision: Decision,
    pub basis: GrantBasis,
    /// One entry per alternative evaluated, in order; stops at the first match.
    pub attempts: Vec<AttemptOutcome>,
}

impl Evaluation {
    #[must_use]
    pub fn deny(basis: GrantBasis, attempts: Vec<AttemptOutcome>) -> Self {
        Self {
            decision: Decision::Deny,
            basis,
            attempts,
        }
    }

    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self.decision, Decision::Allow { .. })
    }

    /// `true` if any attempt failed because the gateway could not answer.
    #[must_use]
    pub fn had_transport_errors(&self) -> bool {
        self.attempts
            .iter()
            .any(|a| matches!(a, AttemptOutcome::TransportError(_)))
    }
}

/// Run the matcher for each alternative in order, stopping at the first match.
#[must_use]
pub fn decide(granted: &[Permission], alternatives: &[Permission], basis: GrantBasis) -> Evaluation {
    let mut attempts = Vec::with_capacity(alternatives.len());

    for (idx, required) in alternatives.iter().enumerate() {
        if exists_match(granted, required) {
            attempts.push(AttemptOutcome::Matched);
            return Evaluation {
                decision: Decision::Allow { alternative: idx },
                basis,
                attempts,
            };
        }
        attempts.push(AttemptOutcome::NotMatched);
    }

    Evaluation::deny(basis, attempts)
}
