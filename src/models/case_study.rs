use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{as_object, optional_text, required_text, sanitize_optional, sanitize_string, timestamp};

pub const TABLE: &str = "case_studies";

/// Validated input for a new case study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCaseStudy {
    pub title: String,
    pub client: String,
    pub problem: String,
    pub solution: String,
    pub tech_stack: Vec<String>,
    pub ai_used: String,
    pub outcome: String,
    pub image_url: Option<String>,
    pub published: Option<bool>,
    pub order_index: Option<u64>,
}

/// Case study as persisted, with defaults applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseStudy {
    pub title: String,
    pub client: String,
    pub problem: String,
    pub solution: String,
    pub tech_stack: Vec<String>,
    pub ai_used: String,
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub published: bool,
    pub order_index: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl NewCaseStudy {
    pub fn validate(input: &Value) -> Result<Self, Vec<String>> {
        let obj = as_object(input)?;
        let mut errors = Vec::new();

        let title = required_text(obj, "title", "Title is required and must be a non-empty string", &mut errors);
        let client = required_text(obj, "client", "Client is required and must be a non-empty string", &mut errors);
        let problem = required_text(obj, "problem", "Problem is required and must be a non-empty string", &mut errors);
        let solution =
            required_text(obj, "solution", "Solution is required and must be a non-empty string", &mut errors);
        let ai_used = required_text(obj, "ai_used", "AI Used is required and must be a non-empty string", &mut errors);
        let outcome = required_text(obj, "outcome", "Outcome is required and must be a non-empty string", &mut errors);

        let tech_stack = match obj.get("tech_stack") {
            Some(Value::Array(items)) if items.is_empty() => {
                errors.push("Tech stack must contain at least one technology".to_string());
                Vec::new()
            }
            Some(Value::Array(items)) => {
                let techs: Vec<String> = items.iter().filter_map(|v| v.as_str().map(str::to_string)).collect();
                if techs.len() != items.len() {
                    errors.push("Tech stack entries must be strings".to_string());
                }
                techs
            }
            _ => {
                errors.push("Tech stack must be an array".to_string());
                Vec::new()
            }
        };

        let published = match obj.get("published") {
            None | Some(Value::Null) => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => {
                errors.push("Published must be a boolean".to_string());
                None
            }
        };

        let order_index = match obj.get("order_index") {
            None | Some(Value::Null) => None,
            Some(v) => match v.as_u64() {
                Some(n) => Some(n),
                None => {
                    errors.push("Order index must be a non-negative number".to_string());
                    None
                }
            },
        };

        let image_url = optional_text(obj, "image_url", "Image URL must be a string", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(Self {
            title,
            client,
            problem,
            solution,
            tech_stack,
            ai_used,
            outcome,
            image_url,
            published,
            order_index,
        })
    }

    pub fn sanitize(self) -> Self {
        Self {
            title: sanitize_string(&self.title),
            client: sanitize_string(&self.client),
            problem: sanitize_string(&self.problem),
            solution: sanitize_string(&self.solution),
            tech_stack: self.tech_stack.iter().map(|t| sanitize_string(t)).collect(),
            ai_used: sanitize_string(&self.ai_used),
            outcome: sanitize_string(&self.outcome),
            image_url: sanitize_optional(self.image_url),
            published: self.published,
            order_index: self.order_index,
        }
    }

    /// Unpublished and first in order unless the caller said otherwise
    pub fn into_record(self, now: DateTime<Utc>) -> CaseStudy {
        let stamp = timestamp(now);
        CaseStudy {
            title: self.title,
            client: self.client,
            problem: self.problem,
            solution: self.solution,
            tech_stack: self.tech_stack,
            ai_used: self.ai_used,
            outcome: self.outcome,
            image_url: self.image_url,
            published: self.published.unwrap_or(false),
            order_index: self.order_index.unwrap_or(0),
            created_at: stamp.clone(),
            updated_at: stamp,
        }
    }
}
