//! Application state shared across handlers.

use std::sync::Arc;

use brain_core::Brain;
use database::Database;
use orchestrator::{MessageSender, WhatsAppWorkflow};
use tokio_util::task::TaskTracker;

/// The workflow as wired into the relay.
pub type Workflow = WhatsAppWorkflow<Arc<dyn MessageSender>>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Brain answering the website chat.
    pub chat_brain: Arc<dyn Brain>,
    /// WhatsApp conversation workflow.
    pub workflow: Arc<Workflow>,
    /// Secret expected on inbound webhooks.
    pub webhook_secret: Option<String>,
    /// Background workflow runs started by handlers; drained on shutdown.
    pub tasks: TaskTracker,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        db: Database,
        chat_brain: Arc<dyn Brain>,
        workflow: Workflow,
        webhook_secret: Option<String>,
    ) -> Self {
        Self {
            db,
            chat_brain,
            workflow: Arc::new(workflow),
            webhook_secret,
            tasks: TaskTracker::new(),
        }
    }
}
