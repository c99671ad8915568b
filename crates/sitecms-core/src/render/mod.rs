//! Renderers: pure projections of the document
//!
//! A [`Renderer`] turns the whole document into the whole visible page. There
//! is no incremental update: after any mutation the view persists and calls
//! `render` again.
//!
//! - [`AdminRenderer`]: the form editor
//! - [`PublicRenderer`]: the marketing site
//!
//! Markup is produced with `maud`, so every interpolated value is
//! HTML-escaped.

mod admin;
mod public;

pub use admin::AdminRenderer;
pub use public::PublicRenderer;

use crate::document::{Contact, Document, Theme, ThemeMode};

/// Number used in the deep link when none is configured
pub const FALLBACK_WHATSAPP: &str = "51999999999";

/// Message used in the deep link when none is configured
pub const FALLBACK_WHATSAPP_MESSAGE: &str = "Hola, me gustaría más información.";

/// Ambient, non-persisted inputs to rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderEnv {
    /// The platform prefers a dark color scheme
    pub prefers_dark: bool,
}

impl RenderEnv {
    pub fn new(prefers_dark: bool) -> Self {
        Self { prefers_dark }
    }
}

impl From<&crate::config::DisplayConfig> for RenderEnv {
    fn from(display: &crate::config::DisplayConfig) -> Self {
        Self::new(display.prefers_dark)
    }
}

/// Pure projection of a document to markup
///
/// Implementations must be deterministic: the same document and environment
/// always produce the same output, and nothing is remembered between calls.
pub trait Renderer: Send + Sync {
    /// Short renderer name for logs
    fn name(&self) -> &'static str;

    /// Render the complete page
    fn render(&self, document: &Document, env: &RenderEnv) -> String;
}

impl<R: Renderer + ?Sized> Renderer for Box<R> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn render(&self, document: &Document, env: &RenderEnv) -> String {
        (**self).render(document, env)
    }
}

/// Resolved theme for one render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeDecision {
    pub dark: bool,
    pub primary: String,
    pub accent: String,
}

impl ThemeDecision {
    /// Dark when the mode says so, when the mode follows the system and the
    /// system prefers dark, or when the legacy `dark` flag is set.
    pub fn resolve(theme: &Theme, env: &RenderEnv) -> Self {
        let dark = match theme.mode {
            ThemeMode::Dark => true,
            ThemeMode::System => env.prefers_dark,
            ThemeMode::Light => false,
        } || theme.dark;

        Self {
            dark,
            primary: theme.primary.clone(),
            accent: theme.accent.clone(),
        }
    }

    /// Inline CSS custom properties for the root element
    pub fn css_variables(&self) -> String {
        format!(
            "--color-primary: {}; --color-accent: {};",
            self.primary, self.accent
        )
    }

    /// Icon for the theme toggle: the sun switches to light, the moon to dark
    pub fn toggle_icon(&self) -> &'static str {
        if self.dark {
            "fa-solid fa-sun"
        } else {
            "fa-solid fa-moon"
        }
    }
}

/// Messaging deep link built from the contact section
///
/// `https://wa.me/{number}?text={message}` with the message percent-encoded
/// the way browsers encode a URI component.
/// Empty number or message fall back to [`FALLBACK_WHATSAPP`] and
/// [`FALLBACK_WHATSAPP_MESSAGE`].
pub fn whatsapp_url(contact: &Contact) -> String {
    let number = non_empty_or(&contact.whatsapp, FALLBACK_WHATSAPP);
    let message = non_empty_or(&contact.whats_msg, FALLBACK_WHATSAPP_MESSAGE);
    format!(
        "https://wa.me/{}?text={}",
        number,
        encode_component(message)
    )
}

/// Marks a URI component may carry unescaped besides `A-Z a-z 0-9 - _ . ~`
const UNRESERVED_MARKS: &str = "!'()*";

/// Percent-encode `value` leaving [`UNRESERVED_MARKS`] as they are
fn encode_component(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    let mut buf = [0u8; 4];
    for c in value.chars() {
        if UNRESERVED_MARKS.contains(c) {
            encoded.push(c);
        } else {
            encoded.push_str(&urlencoding::encode(c.encode_utf8(&mut buf)));
        }
    }
    encoded
}

pub(crate) fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.is_empty() { fallback } else { value }
}
