//! Rule-based intent classification for quick canned replies.

use std::sync::LazyLock;

use regex::Regex;

/// What a customer message is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Pricing,
    Support,
    General,
    Greeting,
    Other,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pricing => "pricing",
            Self::Support => "support",
            Self::General => "general",
            Self::Greeting => "greeting",
            Self::Other => "other",
        }
    }
}

/// Result of classifying one message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub intent: Intent,
    /// Canned reply for this intent.
    pub reply: &'static str,
    pub confidence: f32,
}

impl Classification {
    /// Canned replies are only used at or above this confidence.
    pub const REPLY_THRESHOLD: f32 = 0.8;

    pub fn is_confident(&self) -> bool {
        self.confidence >= Self::REPLY_THRESHOLD
    }
}

const THANKS_REPLY: &str = "Thanks for your message! Our team will respond shortly.";

struct Rule {
    intent: Intent,
    reply: &'static str,
    confidence: f32,
    patterns: Vec<Regex>,
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(&format!("(?i){}", p)).expect("static pattern"))
        .collect()
}

// Checked in order; first match wins.
static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule {
            intent: Intent::Pricing,
            reply: "Our pricing starts from $99. Would you like the full details?",
            confidence: 0.9,
            patterns: compile(&[
                r"\b(price|cost|budget|expensive|cheap|affordable)\b",
                r"\b(how much|pricing|quote|estimate|fee|charge)\b",
                r"\b(payment|money|dollar|rupee|costs)\b",
                r"\b(rate|rates|tariff|tariffs)\b",
            ]),
        },
        Rule {
            intent: Intent::Support,
            reply: "I'm here to help. Could you share more details about the issue?",
            confidence: 0.8,
            patterns: compile(&[
                r"\b(help|support|issue|problem|error|bug|fix)\b",
                r"\b(not working|broken|down|trouble|difficulty)\b",
                r"\b(how to|how do|tutorial|guide|instructions)\b",
                r"\b(complaint|complaints|dissatisfied|unhappy)\b",
            ]),
        },
        Rule {
            intent: Intent::General,
            reply: THANKS_REPLY,
            confidence: 0.7,
            patterns: compile(&[
                r"\b(thank|thanks|appreciate|grateful)\b",
                r"\b(information|info|details|more)\b",
                r"\b(contact|reach|get in touch)\b",
            ]),
        },
        Rule {
            intent: Intent::Greeting,
            reply: "Hello 👋 How can I help you today?",
            confidence: 0.9,
            patterns: compile(&[r"\b(hello|hi|hey|good morning|good afternoon|good evening)\b"]),
        },
    ]
});

/// Classify a customer message.
pub fn classify(message: &str) -> Classification {
    let text = message.trim();

    RULES
        .iter()
        .find(|rule| rule.patterns.iter().any(|re| re.is_match(text)))
        .map(|rule| Classification {
            intent: rule.intent,
            reply: rule.reply,
            confidence: rule.confidence,
        })
        .unwrap_or(Classification {
            intent: Intent::Other,
            reply: THANKS_REPLY,
            confidence: 0.5,
        })
}
