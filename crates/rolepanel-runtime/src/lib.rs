//! Runtime orchestration for the role-panel service.
//!
//! Wires the domain logic, the panel store, and the Discord surface into the
//! two operator actions (create/edit panel), the selection reconciler, the
//! interaction router, and the webhook ingress server. Every collaborator is
//! injected at construction so components stay testable against substitute
//! implementations.

pub mod panel_builder;
pub mod reconciler;
pub mod registration;
pub mod router;
pub mod server;

#[cfg(test)]
mod test_support;

pub use panel_builder::{
    CreatePanelReport, CreatePanelRequest, EditPanelReport, EditPanelRequest, PanelActionError,
    PanelBuilder,
};
pub use reconciler::{RoleReconciler, SelectionSubmission};
pub use registration::register_commands;
pub use router::InteractionRouter;
pub use server::{run_webhook_server, webhook_app, WebhookServerConfig};
