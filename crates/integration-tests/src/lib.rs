//! # Integration Tests Crate
//!
//! End-to-end scenarios driven through the invocation adapter against one
//! shared in-memory ledger, switching the caller identity between parties
//! the way successive host invocations would.
//!
//! ## Structure
//!
//! ```text
//! integration-tests/
//! └── src/
//!     ├── lib.rs        # This file
//!     └── scenarios.rs  # Two-party exchange flows and illegal transitions
//! ```

#[cfg(test)]
mod scenarios;
