use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{is_valid_email, timestamp};

pub const TABLE: &str = super::contact::TABLE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HasProject {
    Yes,
    NotYet,
}

impl HasProject {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "yes" => Some(Self::Yes),
            "not_yet" => Some(Self::NotYet),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::NotYet => "Not yet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServicePreference {
    FullService,
    SelfService,
}

impl ServicePreference {
    fn parse(s: &str) -> Option<Self> {
        match s {
            "full_service" => Some(Self::FullService),
            "self_service" => Some(Self::SelfService),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::FullService => "Full-Service Implementation",
            Self::SelfService => "Self-Service Platform",
        }
    }
}

/// Public lead-capture submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub company: Option<String>,
    pub email: String,
    pub ai_workflow: String,
    pub has_project: HasProject,
    pub project_description: Option<String>,
    pub service_preference: ServicePreference,
}

/// Row stored in `contact_submissions`; absent optionals are written as `null`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactFormSubmission {
    #[serde(flatten)]
    pub form: ContactForm,
    pub submitted_at: String,
}

fn required<'a>(input: &'a Value, key: &str, message: &str) -> Result<&'a str, String> {
    input
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| message.to_string())
}

fn optional(input: &Value, key: &str) -> Option<String> {
    input
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ContactForm {
    /// Stops at the first problem; the message names the offending field.
    pub fn validate(input: &Value) -> Result<Self, String> {
        let name = required(input, "name", "name is required and must be a string")?;
        let email = required(input, "email", "email is required and must be a string")?;
        if !is_valid_email(email) {
            return Err("email must be a valid email address".to_string());
        }
        let ai_workflow = required(input, "ai_workflow", "ai_workflow is required and must be a string")?;

        let has_project = input
            .get("has_project")
            .and_then(Value::as_str)
            .and_then(HasProject::parse)
            .ok_or_else(|| "has_project must be either \"yes\" or \"not_yet\"".to_string())?;

        let service_preference = input
            .get("service_preference")
            .and_then(Value::as_str)
            .and_then(ServicePreference::parse)
            .ok_or_else(|| "service_preference must be either \"full_service\" or \"self_service\"".to_string())?;

        Ok(Self {
            name: name.to_string(),
            company: optional(input, "company"),
            email: email.to_string(),
            ai_workflow: ai_workflow.to_string(),
            has_project,
            project_description: optional(input, "project_description"),
            service_preference,
        })
    }

    pub fn into_submission(self, now: DateTime<Utc>) -> ContactFormSubmission {
        ContactFormSubmission {
            form: self,
            submitted_at: timestamp(now),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "ai_workflow": "We triage support tickets by hand",
            "has_project": "yes",
            "service_preference": "full_service"
        })
    }

    #[test]
    fn accepts_minimal_submission() {
        let form = ContactForm::validate(&valid()).unwrap();
        assert_eq!(form.company, None);
        assert_eq!(form.has_project, HasProject::Yes);
        assert_eq!(form.service_preference, ServicePreference::FullService);
    }

    #[test]
    fn errors_follow_field_order() {
        assert_eq!(
            ContactForm::validate(&json!({})).unwrap_err(),
            "name is required and must be a string"
        );

        let mut input = valid();
        input["email"] = json!("invalid-email");
        input["has_project"] = json!("maybe");
        assert_eq!(ContactForm::validate(&input).unwrap_err(), "email must be a valid email address");
    }

    #[test]
    fn enum_errors_name_the_field() {
        let mut input = valid();
        input["has_project"] = json!("maybe");
        assert!(ContactForm::validate(&input).unwrap_err().contains("has_project"));

        let mut input = valid();
        input["service_preference"] = json!("diy");
        assert!(ContactForm::validate(&input).unwrap_err().contains("service_preference"));
    }

    #[test]
    fn empty_optionals_are_stored_as_null() {
        let mut input = valid();
        input["company"] = json!("");
        let row = serde_json::to_value(ContactForm::validate(&input).unwrap().into_submission(Utc::now())).unwrap();
        assert_eq!(row["company"], Value::Null);
        assert_eq!(row["project_description"], Value::Null);
        assert_eq!(row["has_project"], "yes");
        assert!(row["submitted_at"].is_string());
    }

    #[test]
    fn labels() {
        assert_eq!(HasProject::NotYet.label(), "Not yet");
        assert_eq!(ServicePreference::SelfService.label(), "Self-Service Platform");
    }
}
