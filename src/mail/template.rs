use crate::config::MailConfig;
use crate::models::ContactForm;

use super::OutgoingEmail;

/// Minimal HTML escaping for values interpolated into email bodies.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn field(label: &str, value: &str) -> String {
    format!(
        "<div class=\"field\"><div class=\"field-label\">{label}:</div><div class=\"field-value\">{}</div></div>",
        escape_html(value)
    )
}

/// Notification sent to the team for each contact form submission.
/// Replies go straight to the submitter.
pub fn contact_notification(config: &MailConfig, form: &ContactForm, submitted_at: &str) -> OutgoingEmail {
    let company = form.company.as_deref().unwrap_or("Not provided");
    let description = form.project_description.as_deref().unwrap_or("N/A");

    let html = format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: -apple-system, 'Segoe UI', Roboto, Arial, sans-serif; line-height: 1.6; color: #333; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1 style="font-size: 24px;">New Contact Form Submission</h1>
  <h2>Contact Information</h2>
  {name}
  {company}
  {email}
  {submitted}
  <h2>AI Workflow Assessment</h2>
  <div class="field-value" style="white-space: pre-wrap;">{workflow}</div>
  <h2>Project Readiness</h2>
  {has_project}
  {description}
  <h2>Service Preference</h2>
  {preference}
  <hr>
  <p style="font-style: italic;">Reply to this email to start the conversation with {reply_name}.</p>
</body>
</html>"#,
        name = field("Name", &form.name),
        company = field("Company", company),
        email = field("Email", &form.email),
        submitted = field("Submitted", submitted_at),
        workflow = escape_html(&form.ai_workflow),
        has_project = field("Has Project", form.has_project.label()),
        description = field("Project Description", description),
        preference = field("Preferred Service", form.service_preference.label()),
        reply_name = escape_html(&form.name),
    );

    OutgoingEmail {
        from: config.from.clone(),
        to: config.to.clone(),
        reply_to: form.email.clone(),
        subject: format!("New Contact Form Submission - {}", form.name),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HasProject, ServicePreference};

    fn config() -> MailConfig {
        MailConfig {
            api_url: "https://api.resend.com".to_string(),
            api_key: Some("re_test".to_string()),
            from: "Blaq Digital <noreply@blaqdigital.com>".to_string(),
            to: "contact@blaqdigital.com".to_string(),
        }
    }

    fn form() -> ContactForm {
        ContactForm {
            name: "Jane <b>Doe</b>".to_string(),
            company: None,
            email: "jane@example.com".to_string(),
            ai_workflow: "Manual triage & routing".to_string(),
            has_project: HasProject::NotYet,
            project_description: None,
            service_preference: ServicePreference::SelfService,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(escape_html("<script>\"x\" & 'y'</script>"), "&lt;script&gt;&quot;x&quot; &amp; &#39;y&#39;&lt;/script&gt;");
    }

    #[test]
    fn notification_fields() {
        let email = contact_notification(&config(), &form(), "2026-01-30T10:00:00.000Z");
        assert_eq!(email.to, "contact@blaqdigital.com");
        assert_eq!(email.reply_to, "jane@example.com");
        assert_eq!(email.subject, "New Contact Form Submission - Jane <b>Doe</b>");
        assert!(email.html.contains("Jane &lt;b&gt;Doe&lt;/b&gt;"));
        assert!(!email.html.contains("<b>Doe"));
        assert!(email.html.contains("Not provided"));
        assert!(email.html.contains("N/A"));
        assert!(email.html.contains("Not yet"));
        assert!(email.html.contains("Self-Service Platform"));
        assert!(email.html.contains("Manual triage &amp; routing"));
    }
}
