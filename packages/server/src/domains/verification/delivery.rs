use tracing::{info, warn};

use crate::kernel::ServerDeps;

use super::models::{DeliveryMethod, EmailDelivery};

/// Deliver the access email, falling back to a manual-delivery notice in
/// the audit channel when the mailer is missing or fails. Never returns
/// an error: the outcome, including total failure, is data.
pub async fn deliver_email(
    deps: &ServerDeps,
    to: &str,
    subject: &str,
    html: &str,
) -> EmailDelivery {
    let primary_error = match &deps.mailer {
        Some(mailer) => match mailer.send(to, subject, html).await {
            Ok(()) => {
                info!(to, "access email sent");
                return EmailDelivery {
                    sent: true,
                    method: DeliveryMethod::Resend,
                    error: None,
                };
            }
            Err(err) => {
                warn!(to, error = %err, "primary email delivery failed");
                err.to_string()
            }
        },
        None => "No Resend API key".to_string(),
    };

    let Some(audit) = &deps.audit else {
        return EmailDelivery {
            sent: false,
            method: DeliveryMethod::None,
            error: Some("No email service configured".to_string()),
        };
    };

    let notice = format!(
        "**Manual Email Required**\nTo: {}\nSubject: {}\nReason: {}",
        to, subject, primary_error
    );
    match audit.post_content(&notice).await {
        Ok(()) => {
            info!(to, "manual delivery notice posted to audit channel");
            EmailDelivery {
                sent: true,
                method: DeliveryMethod::DiscordWebhook,
                error: Some(primary_error),
            }
        }
        Err(err) => {
            warn!(to, error = %err, "fallback delivery failed");
            EmailDelivery {
                sent: false,
                method: DeliveryMethod::None,
                error: Some(format!(
                    "Resend failed: {}, Discord failed: {}",
                    primary_error, err
                )),
            }
        }
    }
}
