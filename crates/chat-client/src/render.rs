//! Presentation of a single message.

use std::fmt;

use crate::message::{ChatMessage, Sender};

/// Terminal width bubbles are aligned against.
pub const LINE_WIDTH: usize = 72;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// A message laid out for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bubble {
    pub align: Align,
    pub label: &'static str,
    pub text: String,
    pub time: String,
}

/// User messages sit on the right, bot messages on the left.
pub fn render(message: &ChatMessage) -> Bubble {
    let (align, label) = match message.sender {
        Sender::User => (Align::Right, "You"),
        Sender::Bot => (Align::Left, "Support"),
    };
    Bubble {
        align,
        label,
        text: message.text.clone(),
        time: message.time.clone(),
    }
}

impl fmt::Display for Bubble {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!("{} · {}", self.label, self.time);
        match self.align {
            Align::Left => {
                writeln!(f, "{}", header)?;
                for line in self.text.lines() {
                    writeln!(f, "  {}", line)?;
                }
            }
            Align::Right => {
                writeln!(f, "{:>width$}", header, width = LINE_WIDTH)?;
                for line in self.text.lines() {
                    writeln!(f, "{:>width$}", line, width = LINE_WIDTH - 2)?;
                }
            }
        }
        Ok(())
    }
}
