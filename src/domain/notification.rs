//! User-visible notifications raised by the view-models.

use std::fmt::{Display, Formatter};

/// Severity of a notification, named after the CSS alert classes the
/// console renders them with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Danger,
    Warning,
    Success,
    Info,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Danger => "danger",
            Level::Warning => "warning",
            Level::Success => "success",
            Level::Info => "info",
        }
    }
}

/// A transient toast shown to the user.
///
/// `message` is plain text: renderers must escape it themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

/// Reverses the entity escaping ammonia's serializer applies to text nodes.
fn unescape_text(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&quot;", "\"")
        .replace("&amp;", "&")
}

impl Notification {
    /// Builds a notification, stripping markup from the message.
    ///
    /// Messages frequently embed text returned by the server; tags are
    /// dropped and the remaining text is kept as written.
    pub fn new(level: Level, message: impl AsRef<str>) -> Self {
        let cleaned = ammonia::Builder::empty()
            .clean(message.as_ref())
            .to_string();
        Self {
            level,
            message: unescape_text(cleaned.trim()),
        }
    }

    pub fn danger(message: impl AsRef<str>) -> Self {
        Self::new(Level::Danger, message)
    }

    pub fn success(message: impl AsRef<str>) -> Self {
        Self::new(Level::Success, message)
    }

    /// The generic transport failure toast.
    pub fn error_occurred(detail: impl Display) -> Self {
        Self::danger(format!("Error occurred: {detail}"))
    }
}

impl Display for Notification {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.level.as_str(), self.message)
    }
}
