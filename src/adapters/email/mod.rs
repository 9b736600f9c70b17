//! Email adapters.
//!
//! - `MiniJinjaReminderRenderer` - HTML and plain-text reminder content
//! - `SmtpNotificationPort` - Delivery through an SMTP relay via `lettre`

mod renderer;
mod smtp;

pub use renderer::MiniJinjaReminderRenderer;
pub use smtp::SmtpNotificationPort;
