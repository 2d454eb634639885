//! Domain logic for role panels: pair grammar parsing, role-map merge, and
//! reconciliation planning.
//!
//! Everything here is pure and synchronous; platform calls and persistence
//! live in the sibling crates and are driven by the plans computed here.

pub mod role_map;
pub mod reconcile;

pub use reconcile::{plan_reconciliation, ReconciliationPlan, RoleAction, RoleReconcileOutcome};
pub use role_map::{merge_role_maps, parse_role_pair_spec, RolePair, RolePairParseError};
