//! GitOps repository layout module
//!
//! Name validation and folder-state classification. This is the decision
//! core: every add/delete/bootstrap/init command consults these checks
//! before touching the generator or the git executor.

pub mod names;
pub mod state;

pub use names::*;
pub use state::*;
