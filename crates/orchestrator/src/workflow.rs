//! The WhatsApp conversation workflow.

use std::collections::HashMap;
use std::sync::Arc;

use brain_core::{Brain, BrainError, HistoryMessage, InboundMessage};
use support_database::models::{ConversationMessage, STATUS_FINALIZED};
use support_database::{conversation, Conversation, Database};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use whatssms::normalize_to_e164;

use crate::classifier::{classify, Intent};
use crate::error::OrchestratorError;
use crate::keywords::{is_completion, wants_team_contact};
use crate::notify::{conversation_summary, TeamAlert};
use crate::sender::MessageSender;

/// Client messages allowed before the bot hands over to the team.
pub const MESSAGE_LIMIT: i64 = 20;

/// Placeholder name stored while waiting for the client to introduce themselves.
pub const UNKNOWN_NAME: &str = "Unknown";

pub const ASK_NAME_REPLY: &str = "Hello! What is your name, sir?";
pub const TEAM_CONTACT_REPLY: &str =
    "Perfect! I'll have our team reach out to you shortly to discuss your project requirements in detail.";
pub const FINALIZED_REPLY: &str =
    "Great! Your project description has been saved. Our team will reach out to you soon.";
pub const LIMIT_REPLY: &str = "You've reached the message limit. Our team will contact you shortly.";

/// How the next reply gets produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplyPlan {
    /// A fixed reply, optionally alerting the team.
    Canned {
        text: String,
        alert: Option<TeamAlert>,
    },
    /// Ask the model, with the conversation so far as context.
    AskBrain,
}

impl ReplyPlan {
    fn canned(text: impl Into<String>) -> Self {
        Self::Canned {
            text: text.into(),
            alert: None,
        }
    }

    fn alerting(text: impl Into<String>, alert: TeamAlert) -> Self {
        Self::Canned {
            text: text.into(),
            alert: Some(alert),
        }
    }
}

/// Decide how to answer the newest client message.
///
/// `conversation` must already contain `text` as its last message. Name
/// capture and finalisation update the conversation in place.
pub fn plan_reply(conversation: &mut Conversation, text: &str) -> ReplyPlan {
    let phone = conversation.phone_number.clone();

    if conversation.client_name.is_none() && conversation.messages_used == 1 {
        conversation.client_name = Some(UNKNOWN_NAME.to_string());
        return ReplyPlan::canned(ASK_NAME_REPLY);
    }

    if conversation
        .client_name
        .as_deref()
        .map_or(true, |name| name == UNKNOWN_NAME)
    {
        let name = text.trim().to_string();
        let reply = format!(
            "Nice to meet you, {}! I'm here to help you with your project requirements. \
             What type of app or website are you looking to build?",
            name
        );
        conversation.client_name = Some(name);
        return ReplyPlan::canned(reply);
    }

    let client_name = conversation.client_name.clone();
    let name = client_name.as_deref();

    let classification = classify(text);
    if classification.is_confident() {
        if classification.intent == Intent::Pricing {
            let alert = TeamAlert::new(format!("💰 PRICING INQUIRY\n\nMessage: {}", text))
                .phone(&phone)
                .name(name)
                .details("Client is asking about pricing for our services");
            return ReplyPlan::alerting(classification.reply, alert);
        }
        return ReplyPlan::canned(classification.reply);
    }

    if wants_team_contact(text) {
        let alert = TeamAlert::new(format!("📞 CLIENT WANTS TEAM CONTACT\n\nMessage: {}", text))
            .phone(&phone)
            .name(name)
            .details("Client specifically requested team to reach out for project discussion");
        return ReplyPlan::alerting(TEAM_CONTACT_REPLY, alert);
    }

    if is_completion(text) {
        conversation.status = STATUS_FINALIZED.to_string();
        let alert = TeamAlert::new(format!(
            "✅ PROJECT FINALIZED\n\n{}",
            conversation_summary(conversation)
        ))
        .phone(&phone)
        .name(name)
        .details("Client has finalized their project requirements");
        return ReplyPlan::alerting(FINALIZED_REPLY, alert);
    }

    if conversation.messages_used >= MESSAGE_LIMIT {
        let alert = TeamAlert::new(format!(
            "⚠️ MESSAGE LIMIT REACHED\n\nMessages used: {}",
            conversation.messages_used
        ))
        .phone(&phone)
        .name(name)
        .details("Client has reached the message limit and needs team follow-up");
        return ReplyPlan::alerting(LIMIT_REPLY, alert);
    }

    ReplyPlan::AskBrain
}

/// Map earlier conversation turns to model history.
///
/// The newest message is left out; it is sent as the prompt itself.
pub fn brain_history(conversation: &Conversation) -> Vec<HistoryMessage> {
    let earlier = conversation
        .messages
        .len()
        .saturating_sub(1);

    conversation.messages[..earlier]
        .iter()
        .filter_map(|msg| match msg.role.as_str() {
            ConversationMessage::CLIENT => Some(HistoryMessage::user(&msg.message)),
            ConversationMessage::ASSISTANT => Some(HistoryMessage::assistant(&msg.message)),
            _ => None,
        })
        .collect()
}

/// The apology sent when the model can't answer.
pub fn apology_for(error: &BrainError) -> &'static str {
    match error {
        BrainError::Configuration(_) => {
            "I'm sorry, I'm having trouble connecting to my AI service right now. Please try again later."
        }
        BrainError::ProcessingFailed(_) => {
            "I'm sorry, I'm having trouble processing your message right now. Please try again later."
        }
        _ => {
            "I'm sorry, I encountered an error while processing your message. Please try again later."
        }
    }
}

/// Runs the WhatsApp lead-qualification conversation.
///
/// Each inbound client message is stored, answered (canned reply, team
/// alert or model reply), and the answer delivered back over WhatsApp.
/// Messages from the same phone are handled one at a time.
pub struct WhatsAppWorkflow<S: MessageSender> {
    brain: Arc<dyn Brain>,
    db: Database,
    sender: S,
    team_number: String,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl<S: MessageSender> WhatsAppWorkflow<S> {
    pub fn new(
        brain: Arc<dyn Brain>,
        db: Database,
        sender: S,
        team_number: impl Into<String>,
    ) -> Self {
        Self {
            brain,
            db,
            sender,
            team_number: team_number.into(),
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    pub fn team_number(&self) -> &str {
        &self.team_number
    }

    /// Handle one inbound client message end to end.
    ///
    /// Returns whether the reply was delivered. Storage failures are errors;
    /// model and delivery failures are not.
    pub async fn handle_incoming(&self, phone: &str, text: &str) -> Result<bool, OrchestratorError> {
        let phone = normalize_to_e164(phone);
        if phone.is_empty() {
            return Err(OrchestratorError::NoSender);
        }

        let lock = self.phone_lock(&phone).await;
        let result = {
            let _guard = lock.lock().await;
            self.process(&phone, text).await
        };
        self.release_lock(&phone, lock).await;
        result
    }

    async fn process(&self, phone: &str, text: &str) -> Result<bool, OrchestratorError> {
        info!(phone = %phone, "Processing WhatsApp message");

        let mut convo = conversation::get_or_create_conversation(self.db.pool(), phone).await?;
        convo.push_client(text);

        let reply = match plan_reply(&mut convo, text) {
            ReplyPlan::Canned { text: reply, alert } => {
                if let Some(alert) = alert {
                    self.notify_team(&alert).await;
                }
                reply
            }
            ReplyPlan::AskBrain => self.ask_brain(&convo, phone, text).await,
        };

        convo.push_assistant(&reply);
        conversation::save_conversation(self.db.pool(), &convo).await?;

        let delivered = self.deliver(phone, &reply).await;
        if delivered {
            info!(phone = %phone, "Handled WhatsApp message");
        } else {
            error!(phone = %phone, "Failed to deliver reply");
        }
        Ok(delivered)
    }

    /// Send an alert to the team number. Returns whether it was delivered.
    pub async fn notify_team(&self, alert: &TeamAlert) -> bool {
        let delivered = self.deliver(&self.team_number, &alert.render()).await;
        if delivered {
            info!("Team notification sent to {}", self.team_number);
        } else {
            error!("Failed to send team notification to {}", self.team_number);
        }
        delivered
    }

    /// Send a message directly, outside any conversation.
    pub async fn deliver(&self, recipient: &str, text: &str) -> bool {
        match self.sender.send_message(recipient, text).await {
            Ok(()) => true,
            Err(e) => {
                warn!(recipient = %recipient, error = %e, "Delivery failed");
                false
            }
        }
    }

    /// Load a conversation, creating an empty one if needed.
    pub async fn conversation(&self, phone: &str) -> Result<Conversation, OrchestratorError> {
        let phone = normalize_to_e164(phone);
        if phone.is_empty() {
            return Err(OrchestratorError::NoSender);
        }
        Ok(conversation::get_or_create_conversation(self.db.pool(), &phone).await?)
    }

    async fn ask_brain(&self, convo: &Conversation, phone: &str, text: &str) -> String {
        let message = InboundMessage::direct(phone, text, 0).with_history(brain_history(convo));
        debug!(
            brain = self.brain.name(),
            history = message.history.len(),
            "Asking brain"
        );

        match self.brain.process(message).await {
            Ok(reply) => reply.text,
            Err(e) => {
                error!(error = %e, "Brain failed; sending apology");
                apology_for(&e).to_string()
            }
        }
    }

    async fn phone_lock(&self, phone: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks
            .entry(phone.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the per-phone lock once no other message is holding or waiting on it.
    async fn release_lock(&self, phone: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.locks.lock().await;
        drop(lock);
        if locks.get(phone).is_some_and(|l| Arc::strong_count(l) == 1) {
            locks.remove(phone);
        }
    }
}
