//! Minijinja rendering for reminder emails.
//!
//! Templates are compiled once at construction. Values are pre-formatted in
//! Rust so the templates only place them.

use minijinja::Environment;
use serde::Serialize;

use crate::domain::reminder::RenderError;
use crate::ports::{ReminderContext, ReminderRenderer, RenderedReminder};

const HTML_TEMPLATE: &str = "reminder.html";
const TEXT_TEMPLATE: &str = "reminder.txt";

/// Renders reminders from the bundled HTML and text templates.
pub struct MiniJinjaReminderRenderer {
    env: Environment<'static>,
}

/// What the templates see.
#[derive(Debug, Serialize)]
struct TemplateView<'a> {
    recipient_name: &'a str,
    subscription_name: &'a str,
    renewal_date: String,
    amount: String,
    currency: &'a str,
    billing_cycle: &'static str,
    days_until_renewal: i64,
    category: Option<&'a str>,
    website_url: Option<&'a str>,
}

impl<'a> TemplateView<'a> {
    fn new(context: &'a ReminderContext) -> Self {
        Self {
            recipient_name: &context.recipient_name,
            subscription_name: &context.subscription_name,
            renewal_date: context.renewal_date.format("%B %d, %Y").to_string(),
            amount: format!("{:.2}", context.amount),
            currency: &context.currency,
            billing_cycle: context.billing_cycle.display_name(),
            days_until_renewal: context.days_until_renewal,
            category: non_blank(context.category.as_deref()),
            website_url: non_blank(context.website_url.as_deref()),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

impl MiniJinjaReminderRenderer {
    /// # Errors
    ///
    /// `RenderError::Template` if a bundled template fails to compile.
    pub fn new() -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.add_template(HTML_TEMPLATE, include_str!("templates/reminder.html"))
            .map_err(template_error)?;
        env.add_template(TEXT_TEMPLATE, include_str!("templates/reminder.txt"))
            .map_err(template_error)?;
        Ok(Self { env })
    }

    fn render_template(&self, name: &str, view: &TemplateView<'_>) -> Result<String, RenderError> {
        self.env
            .get_template(name)
            .and_then(|template| template.render(view))
            .map_err(template_error)
    }
}

fn template_error(e: minijinja::Error) -> RenderError {
    RenderError::Template(e.to_string())
}

/// `"Reminder: <name> renews in <n> day(s)"`, or `"... renews today"` at 0.
pub fn reminder_subject(subscription_name: &str, days_until_renewal: i64) -> String {
    match days_until_renewal {
        0 => format!("Reminder: {} renews today", subscription_name),
        1 => format!("Reminder: {} renews in 1 day", subscription_name),
        n => format!("Reminder: {} renews in {} days", subscription_name, n),
    }
}

impl ReminderRenderer for MiniJinjaReminderRenderer {
    fn render(&self, context: &ReminderContext) -> Result<RenderedReminder, RenderError> {
        if context.subscription_name.trim().is_empty() {
            return Err(RenderError::MissingField("subscription_name"));
        }

        let view = TemplateView::new(context);
        Ok(RenderedReminder {
            subject: reminder_subject(&context.subscription_name, context.days_until_renewal),
            html_body: self.render_template(HTML_TEMPLATE, &view)?,
            text_body: self.render_template(TEXT_TEMPLATE, &view)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::subscription::BillingCycle;
    use chrono::NaiveDate;

    fn context() -> ReminderContext {
        ReminderContext {
            recipient_name: "Ada".to_string(),
            subscription_name: "Netflix".to_string(),
            renewal_date: NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
            amount: 15.5,
            currency: "USD".to_string(),
            billing_cycle: BillingCycle::Monthly,
            days_until_renewal: 5,
            category: Some("Streaming".to_string()),
            website_url: Some("https://netflix.com/account".to_string()),
        }
    }

    fn renderer() -> MiniJinjaReminderRenderer {
        MiniJinjaReminderRenderer::new().unwrap()
    }

    #[test]
    fn subject_pluralizes_days() {
        assert_eq!(reminder_subject("Hulu", 5), "Reminder: Hulu renews in 5 days");
        assert_eq!(reminder_subject("Hulu", 1), "Reminder: Hulu renews in 1 day");
        assert_eq!(reminder_subject("Hulu", 0), "Reminder: Hulu renews today");
    }

    #[test]
    fn renders_all_fields() {
        let rendered = renderer().render(&context()).unwrap();

        assert_eq!(rendered.subject, "Reminder: Netflix renews in 5 days");
        for body in [&rendered.html_body, &rendered.text_body] {
            assert!(body.contains("Hello Ada,"));
            assert!(body.contains("March 03, 2025"));
            assert!(body.contains("USD 15.50"));
            assert!(body.contains("Monthly"));
            assert!(body.contains("Streaming"));
            assert!(body.contains("5 days"));
            assert!(body.contains("Manage subscription"));
        }
        assert!(rendered.text_body.contains("https://netflix.com/account"));
    }

    #[test]
    fn renewal_today_says_so() {
        let ctx = ReminderContext {
            days_until_renewal: 0,
            ..context()
        };
        let rendered = renderer().render(&ctx).unwrap();

        assert!(rendered.text_body.contains("Renews today!"));
        assert!(rendered.html_body.contains("Renews today!"));
        assert_eq!(rendered.subject, "Reminder: Netflix renews today");
    }

    #[test]
    fn optional_fields_are_omitted() {
        let ctx = ReminderContext {
            category: None,
            website_url: Some("  ".to_string()),
            ..context()
        };
        let rendered = renderer().render(&ctx).unwrap();

        assert!(!rendered.text_body.contains("Category"));
        assert!(!rendered.text_body.contains("Manage subscription"));
        assert!(!rendered.html_body.contains("Manage subscription"));
    }

    #[test]
    fn html_escapes_user_content() {
        let ctx = ReminderContext {
            subscription_name: "<script>alert(1)</script>".to_string(),
            ..context()
        };
        let rendered = renderer().render(&ctx).unwrap();

        assert!(!rendered.html_body.contains("<script>"));
        assert!(rendered.html_body.contains("&lt;script&gt;"));
    }

    #[test]
    fn empty_name_is_a_render_error() {
        let ctx = ReminderContext {
            subscription_name: String::new(),
            ..context()
        };
        assert_eq!(
            renderer().render(&ctx),
            Err(RenderError::MissingField("subscription_name"))
        );
    }
}
