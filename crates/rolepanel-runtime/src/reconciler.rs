//! Best-effort reconciliation of a user's roles against their panel
//! selection.

use std::sync::Arc;

use anyhow::{Context, Result};
use rolepanel_core::{plan_reconciliation, RoleAction, RoleReconcileOutcome};
use rolepanel_discord::DiscordApi;
use rolepanel_store::PanelStore;
use tracing::{debug, warn};

/// One selection-submission event from the platform.
#[derive(Debug, Clone)]
pub struct SelectionSubmission {
    pub message_id: String,
    pub user_id: String,
    /// Role ids the user now has selected; the unselected remainder of the
    /// panel's tracked ids is revoked.
    pub selected: Vec<String>,
}

/// Applies panel selections to guild membership.
pub struct RoleReconciler {
    api: Arc<dyn DiscordApi>,
    store: PanelStore,
}

impl RoleReconciler {
    pub fn new(api: Arc<dyn DiscordApi>, store: PanelStore) -> Self {
        Self { api, store }
    }

    /// Reconciles one submission.
    ///
    /// Returns `Ok(None)` when the message is not a tracked panel; the event
    /// is ignored without any platform call. Otherwise grants and revokes
    /// are attempted sequentially, one call per role id; individual failures
    /// are recorded in the outcome list and do not stop the remaining ids.
    /// Re-submitting the user's current selection performs zero calls.
    pub async fn apply_selection(
        &self,
        submission: &SelectionSubmission,
    ) -> Result<Option<Vec<RoleReconcileOutcome>>> {
        let Some(record) = self.store.get(&submission.message_id)? else {
            debug!(message_id = %submission.message_id, "selection on untracked message ignored");
            return Ok(None);
        };

        let member = self
            .api
            .fetch_member(&record.guild_id, &submission.user_id)
            .await
            .context("failed to fetch member for reconciliation")?;

        let panel_role_ids: Vec<String> = record
            .role_map
            .iter()
            .map(|pair| pair.role_id.clone())
            .collect();
        let plan = plan_reconciliation(&panel_role_ids, &submission.selected, &member.roles);

        let mut outcomes = Vec::with_capacity(panel_role_ids.len());
        for role_id in &plan.to_revoke {
            match self
                .api
                .remove_member_role(&record.guild_id, &submission.user_id, role_id)
                .await
            {
                Ok(()) => outcomes.push(RoleReconcileOutcome::Revoked {
                    role_id: role_id.clone(),
                }),
                Err(error) => {
                    warn!(%role_id, user_id = %submission.user_id, %error, "role revoke failed");
                    outcomes.push(RoleReconcileOutcome::Failed {
                        role_id: role_id.clone(),
                        action: RoleAction::Revoke,
                        error: error.to_string(),
                    });
                }
            }
        }
        for role_id in &plan.to_grant {
            match self
                .api
                .add_member_role(&record.guild_id, &submission.user_id, role_id)
                .await
            {
                Ok(()) => outcomes.push(RoleReconcileOutcome::Granted {
                    role_id: role_id.clone(),
                }),
                Err(error) => {
                    warn!(%role_id, user_id = %submission.user_id, %error, "role grant failed");
                    outcomes.push(RoleReconcileOutcome::Failed {
                        role_id: role_id.clone(),
                        action: RoleAction::Grant,
                        error: error.to_string(),
                    });
                }
            }
        }
        for role_id in &plan.already_satisfied {
            outcomes.push(RoleReconcileOutcome::AlreadySatisfied {
                role_id: role_id.clone(),
            });
        }

        debug!(
            message_id = %submission.message_id,
            user_id = %submission.user_id,
            granted = plan.to_grant.len(),
            revoked = plan.to_revoke.len(),
            "selection reconciled"
        );
        Ok(Some(outcomes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ApiCall, MockDiscordApi};
    use rolepanel_core::RolePair;
    use rolepanel_store::PanelRecord;
    use tempfile::tempdir;

    fn pair(emoji: &str, role_id: &str) -> RolePair {
        RolePair {
            emoji: emoji.to_string(),
            role_id: role_id.to_string(),
        }
    }

    fn tracked_store(role_ids: &[&str]) -> (tempfile::TempDir, PanelStore) {
        let temp = tempdir().expect("tempdir");
        let store = PanelStore::open(temp.path().join("roles.db")).expect("open");
        store
            .upsert(&PanelRecord {
                message_id: "msg-1".to_string(),
                guild_id: "guild-1".to_string(),
                channel_id: "chan-1".to_string(),
                role_map: role_ids.iter().map(|id| pair("🔵", id)).collect(),
            })
            .expect("seed");
        (temp, store)
    }

    fn submission(message_id: &str, selected: &[&str]) -> SelectionSubmission {
        SelectionSubmission {
            message_id: message_id.to_string(),
            user_id: "user-1".to_string(),
            selected: selected.iter().map(|id| id.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn untracked_message_is_ignored_without_platform_calls() {
        let api = Arc::new(MockDiscordApi::default());
        let temp = tempdir().expect("tempdir");
        let store = PanelStore::open(temp.path().join("roles.db")).expect("open");
        let reconciler = RoleReconciler::new(api.clone(), store);

        let outcome = reconciler
            .apply_selection(&submission("msg-unknown", &["100"]))
            .await
            .expect("apply");
        assert!(outcome.is_none());
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn swap_selection_issues_exactly_one_grant_and_one_revoke() {
        // Stored {A,B,C}, user holds {B}, submits {A}.
        let api = Arc::new(MockDiscordApi::default());
        api.set_member_roles(&["B"]);
        let (_temp, store) = tracked_store(&["A", "B", "C"]);
        let reconciler = RoleReconciler::new(api.clone(), store);

        let outcomes = reconciler
            .apply_selection(&submission("msg-1", &["A"]))
            .await
            .expect("apply")
            .expect("tracked");

        let calls = api.calls();
        let mutations: Vec<&ApiCall> = calls
            .iter()
            .filter(|call| {
                matches!(call, ApiCall::AddRole { .. } | ApiCall::RemoveRole { .. })
            })
            .collect();
        assert_eq!(mutations.len(), 2);
        assert!(outcomes.contains(&RoleReconcileOutcome::Revoked {
            role_id: "B".to_string()
        }));
        assert!(outcomes.contains(&RoleReconcileOutcome::Granted {
            role_id: "A".to_string()
        }));
        assert!(outcomes.contains(&RoleReconcileOutcome::AlreadySatisfied {
            role_id: "C".to_string()
        }));
    }

    #[tokio::test]
    async fn resubmitting_current_selection_issues_zero_calls() {
        let api = Arc::new(MockDiscordApi::default());
        api.set_member_roles(&["A"]);
        let (_temp, store) = tracked_store(&["A", "B"]);
        let reconciler = RoleReconciler::new(api.clone(), store);

        let outcomes = reconciler
            .apply_selection(&submission("msg-1", &["A"]))
            .await
            .expect("apply")
            .expect("tracked");

        assert!(!api
            .calls()
            .iter()
            .any(|call| matches!(call, ApiCall::AddRole { .. } | ApiCall::RemoveRole { .. })));
        assert!(outcomes
            .iter()
            .all(|outcome| matches!(outcome, RoleReconcileOutcome::AlreadySatisfied { .. })));
    }

    #[tokio::test]
    async fn per_role_failure_does_not_stop_remaining_mutations() {
        let api = Arc::new(MockDiscordApi::default());
        api.set_member_roles(&["B"]);
        api.fail_mutations_for("B");
        let (_temp, store) = tracked_store(&["A", "B"]);
        let reconciler = RoleReconciler::new(api.clone(), store);

        let outcomes = reconciler
            .apply_selection(&submission("msg-1", &["A"]))
            .await
            .expect("apply")
            .expect("tracked");

        assert!(outcomes.iter().any(|outcome| matches!(
            outcome,
            RoleReconcileOutcome::Failed { role_id, action: RoleAction::Revoke, .. } if role_id == "B"
        )));
        assert!(outcomes.contains(&RoleReconcileOutcome::Granted {
            role_id: "A".to_string()
        }));
    }
}
