use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{as_object, is_valid_email, optional_text, required_text, sanitize_optional, sanitize_string, timestamp};

pub const TABLE: &str = "contact_submissions";

/// Follow-up state of an admin-tracked contact
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    #[default]
    New,
    Contacted,
    InProgress,
    Completed,
    Archived,
}

impl ContactStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "new" => Some(Self::New),
            "contacted" => Some(Self::Contacted),
            "in_progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            "archived" => Some(Self::Archived),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub project_type: String,
    pub description: String,
    pub company: Option<String>,
    pub phone: Option<String>,
    pub status: Option<ContactStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub project_type: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub status: ContactStatus,
    pub created_at: String,
}

impl NewContact {
    pub fn validate(input: &Value) -> Result<Self, Vec<String>> {
        let obj = as_object(input)?;
        let mut errors = Vec::new();

        let name = required_text(obj, "name", "Name is required and must be a non-empty string", &mut errors);

        let email = match obj.get("email").and_then(Value::as_str) {
            Some(e) if is_valid_email(e.trim()) => e.to_string(),
            _ => {
                errors.push("Valid email is required".to_string());
                String::new()
            }
        };

        let project_type = required_text(
            obj,
            "project_type",
            "Project type is required and must be a non-empty string",
            &mut errors,
        );
        let description = required_text(
            obj,
            "description",
            "Description is required and must be a non-empty string",
            &mut errors,
        );
        let company = optional_text(obj, "company", "Company must be a string", &mut errors);
        let phone = optional_text(obj, "phone", "Phone must be a string", &mut errors);

        let status = match obj.get("status") {
            None | Some(Value::Null) => None,
            Some(v) => {
                let parsed = v.as_str().and_then(ContactStatus::parse);
                if parsed.is_none() {
                    errors.push("Status must be one of: new, contacted, in_progress, completed, archived".to_string());
                }
                parsed
            }
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            name,
            email,
            project_type,
            description,
            company,
            phone,
            status,
        })
    }

    pub fn sanitize(self) -> Self {
        Self {
            name: sanitize_string(&self.name),
            email: sanitize_string(&self.email),
            project_type: sanitize_string(&self.project_type),
            description: sanitize_string(&self.description),
            company: sanitize_optional(self.company),
            phone: sanitize_optional(self.phone),
            status: self.status,
        }
    }

    pub fn into_record(self, now: DateTime<Utc>) -> ContactSubmission {
        ContactSubmission {
            name: self.name,
            email: self.email,
            project_type: self.project_type,
            description: self.description,
            company: self.company,
            phone: self.phone,
            status: self.status.unwrap_or_default(),
            created_at: timestamp(now),
        }
    }
}
