//! Team alert formatting.

use support_database::Conversation;

/// Closing line appended to every team alert.
pub const ALERT_FOOTER: &str =
    "🤖 Bot Response: Please reach out to this client for further discussion about their project requirements.";

/// A message for the sales team about one client.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamAlert {
    pub message: String,
    pub client_phone: Option<String>,
    pub client_name: Option<String>,
    pub project_details: Option<String>,
}

impl TeamAlert {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Self::default()
        }
    }

    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.client_phone = Some(phone.into());
        self
    }

    pub fn name(mut self, name: Option<&str>) -> Self {
        self.client_name = name.map(str::to_string);
        self
    }

    pub fn details(mut self, details: impl Into<String>) -> Self {
        self.project_details = Some(details.into());
        self
    }

    /// Render the alert as sent over WhatsApp.
    pub fn render(&self) -> String {
        let mut text = format!("🚨 TEAM ALERT 🚨\n\n{}", self.message);

        let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);

        if let Some(name) = present(&self.client_name) {
            text.push_str(&format!("\n👤 Client Name: {}", name));
        }
        if let Some(phone) = present(&self.client_phone) {
            text.push_str(&format!("\n📱 Client Phone: {}", phone));
        }
        if let Some(details) = present(&self.project_details) {
            text.push_str(&format!("\n💼 Project Details: {}", details));
        }

        text.push_str("\n\n");
        text.push_str(ALERT_FOOTER);
        text
    }
}

/// Plain-text summary of a conversation for the team.
pub fn conversation_summary(conversation: &Conversation) -> String {
    let mut summary = format!(
        "Client: {}\nPhone: {}\nMessages: {}\nStatus: {}\n\nConversation:\n",
        conversation.client_name.as_deref().unwrap_or("None"),
        conversation.phone_number,
        conversation.messages_used,
        conversation.status,
    );

    for msg in &conversation.messages {
        let emoji = if msg.is_client() { "👤" } else { "🤖" };
        summary.push_str(&format!("{} {}: {}\n", emoji, title_case(&msg.role), msg.message));
    }

    summary
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
