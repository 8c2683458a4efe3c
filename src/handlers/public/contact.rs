use axum::{body::Bytes, extract::State};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::mail::contact_notification;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::contact_form::TABLE;
use crate::models::{ContactForm, ContactFormSubmission};

/// Result of a contact submission: the stored row is required, the email
/// notification is not, so its failure is carried here instead of raised.
#[derive(Debug)]
pub struct ContactOutcome {
    pub id: Value,
    pub persisted: ContactFormSubmission,
    pub notification: Result<(), String>,
}

impl ContactOutcome {
    fn into_payload(self) -> Value {
        let mut data = json!({
            "id": self.id,
            "name": self.persisted.form.name,
            "email": self.persisted.form.email,
            "email_sent": self.notification.is_ok(),
        });
        if let Err(reason) = self.notification {
            data["email_error"] = Value::String(reason);
        }
        data
    }
}

/// Store first, then notify. A storage failure aborts the request.
pub async fn process_submission(
    state: &AppState,
    form: ContactForm,
    now: DateTime<Utc>,
) -> Result<ContactOutcome, ApiError> {
    let submission = form.into_submission(now);

    let record = serde_json::to_value(&submission).map_err(|e| {
        tracing::error!(error = %e, "Failed to encode contact submission");
        ApiError::step_failed("Failed to store contact submission")
    })?;

    let row = state.tables.insert_row(TABLE, record).await.map_err(|e| {
        tracing::error!(error = %e, table = TABLE, "Contact submission insert failed");
        ApiError::step_failed("Failed to store contact submission")
    })?;
    let id = row.get("id").cloned().unwrap_or(Value::Null);
    tracing::info!(id = %id, "Contact submission stored");

    let email = contact_notification(&state.config.mail, &submission.form, &submission.submitted_at);
    let notification = match state.mailer.send(&email).await {
        Ok(()) => Ok(()),
        Err(e) => {
            tracing::warn!(error = %e, "Contact notification email failed");
            Err(e.to_string())
        }
    };

    Ok(ContactOutcome {
        id,
        persisted: submission,
        notification,
    })
}

/// POST /api/contact
pub async fn submit(State(state): State<AppState>, body: Bytes) -> ApiResult<Value> {
    let input: Value =
        serde_json::from_slice(&body).map_err(|_| ApiError::invalid_input("Invalid JSON in request body"))?;
    let form = ContactForm::validate(&input).map_err(ApiError::invalid_input)?;

    let outcome = process_submission(&state, form, Utc::now()).await?;
    Ok(ApiResponse::success(outcome.into_payload()))
}
