//! Reconciliation planning: the grant/revoke deltas between a user's held
//! roles and their latest panel selection.

/// Membership mutation direction for one role id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleAction {
    Grant,
    Revoke,
}

/// Planned mutations for one reconciliation, derived purely from the panel's
/// tracked ids, the submitted selection, and the user's current roles.
///
/// `to_revoke` lists tracked ids the user holds but did not select, in panel
/// order. `to_grant` lists selected ids the user does not hold, in
/// submission order. `already_satisfied` lists tracked ids needing no call.
/// Submitted ids outside the tracked set are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPlan {
    pub to_grant: Vec<String>,
    pub to_revoke: Vec<String>,
    pub already_satisfied: Vec<String>,
}

impl ReconciliationPlan {
    /// True when the submission matches the user's current membership and no
    /// platform call is needed.
    pub fn is_noop(&self) -> bool {
        self.to_grant.is_empty() && self.to_revoke.is_empty()
    }
}

/// Per-role-id outcome of applying a reconciliation plan.
///
/// Failures are recorded instead of aborting the run; a partially applied
/// reconciliation reports exactly which ids were left behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleReconcileOutcome {
    Granted { role_id: String },
    Revoked { role_id: String },
    AlreadySatisfied { role_id: String },
    Failed {
        role_id: String,
        action: RoleAction,
        error: String,
    },
}

/// Computes the reconciliation plan for one submission.
pub fn plan_reconciliation(
    panel_role_ids: &[String],
    selected: &[String],
    held: &[String],
) -> ReconciliationPlan {
    let selected_in_panel: Vec<&String> = selected
        .iter()
        .filter(|id| panel_role_ids.contains(*id))
        .collect();

    let mut to_grant = Vec::new();
    let mut to_revoke = Vec::new();
    let mut already_satisfied = Vec::new();

    for role_id in panel_role_ids {
        let is_selected = selected_in_panel.iter().any(|id| *id == role_id);
        let is_held = held.contains(role_id);
        if !is_selected && is_held {
            to_revoke.push(role_id.clone());
        } else if !is_selected || is_held {
            already_satisfied.push(role_id.clone());
        }
    }
    for role_id in &selected_in_panel {
        if !held.contains(*role_id) {
            to_grant.push((*role_id).clone());
        }
    }

    ReconciliationPlan {
        to_grant,
        to_revoke,
        already_satisfied,
    }
}
