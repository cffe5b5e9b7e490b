use tracing::{error, info};

use crate::domains::verification::audit::AuditEvent;
use crate::domains::verification::delivery::deliver_email;
use crate::domains::verification::email::{access_email_html, ACCESS_EMAIL_SUBJECT};
use crate::domains::verification::models::{VerificationRequest, VerifyResponse};
use crate::kernel::ServerDeps;

/// Result of processing a verification submission
#[derive(Debug)]
pub enum SubmitOutcome {
    /// One or more required fields were missing or blank
    MissingFields,
    /// The submission was processed; delivery may or may not have worked
    Completed(VerifyResponse),
}

/// Process one verification form submission: send the access email and
/// post the audit event that the bot process picks up. Delivery failures
/// are reported in the response, never as errors; an audit post failure
/// is logged and swallowed so the submitter still gets their email.
pub async fn submit_verification(
    deps: &ServerDeps,
    request: &VerificationRequest,
) -> SubmitOutcome {
    if !request.is_complete() {
        return SubmitOutcome::MissingFields;
    }

    let youtube_handle = request.youtube_handle.trim();
    let chat_handle = request.chat_handle.trim();
    let email = request.email.trim();

    info!(youtube_handle, email, "processing verification submission");

    let html = access_email_html(youtube_handle, chat_handle, &deps.invite_url);
    let delivery = deliver_email(deps, email, ACCESS_EMAIL_SUBJECT, &html).await;

    if let Some(audit) = &deps.audit {
        let event = AuditEvent::submission(
            youtube_handle,
            Some(chat_handle.to_string()),
            email,
            delivery.status_line(),
            None,
        );
        if let Err(err) = audit.post_embed(event.to_embed()).await {
            error!(error = %err, "failed to post verification audit event");
        }
    }

    SubmitOutcome::Completed(VerifyResponse::from_delivery(&delivery))
}
