use serde::{Deserialize, Serialize, Serializer};

/// One membership form submission. Transient; lives for the duration of a
/// single HTTP call.
///
/// Absent fields deserialize to empty strings so that a missing key and an
/// empty value fail validation the same way (HTTP 400, not a parse error).
#[derive(Debug, Clone, Deserialize)]
pub struct VerificationRequest {
    #[serde(default, rename = "youtubeHandle")]
    pub youtube_handle: String,
    #[serde(default, rename = "chatHandle")]
    pub chat_handle: String,
    #[serde(default)]
    pub email: String,
}

impl VerificationRequest {
    /// True when every required field is non-empty after trimming.
    pub fn is_complete(&self) -> bool {
        !self.youtube_handle.trim().is_empty()
            && !self.chat_handle.trim().is_empty()
            && !self.email.trim().is_empty()
    }
}

/// Which channel carried the access email.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMethod {
    Resend,
    DiscordWebhook,
    None,
}

impl DeliveryMethod {
    /// Wire tag used in responses and audit lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Resend => "resend",
            DeliveryMethod::DiscordWebhook => "discord_webhook",
            DeliveryMethod::None => "",
        }
    }
}

impl Serialize for DeliveryMethod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Outcome of the dual-channel delivery attempt. Produced by the delivery
/// adapter, consumed by the handler to build its response and audit line.
///
/// `error` can be populated even when `sent` is true: a fallback success
/// keeps the primary channel's failure reason for the audit trail.
#[derive(Debug, Clone)]
pub struct EmailDelivery {
    pub sent: bool,
    pub method: DeliveryMethod,
    pub error: Option<String>,
}

impl EmailDelivery {
    pub fn unattempted() -> Self {
        Self {
            sent: false,
            method: DeliveryMethod::None,
            error: None,
        }
    }

    /// Status line for the audit embed: `Sent via <method>` or
    /// `Failed: <error>`.
    pub fn status_line(&self) -> String {
        if self.sent {
            format!("Sent via {}", self.method.as_str())
        } else {
            format!(
                "Failed: {}",
                self.error.as_deref().unwrap_or("unknown error")
            )
        }
    }
}

/// HTTP 200 response body for `POST /verify`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub success: bool,
    pub email_sent: bool,
    pub email_method: DeliveryMethod,
    pub error: Option<String>,
    pub message: String,
}

impl VerifyResponse {
    /// Build the response contract from a delivery outcome.
    pub fn from_delivery(delivery: &EmailDelivery) -> Self {
        let message = if delivery.sent {
            format!("Email sent successfully via {}", delivery.method.as_str())
        } else {
            format!(
                "Email failed: {}",
                delivery.error.as_deref().unwrap_or("unknown error")
            )
        };

        Self {
            success: delivery.sent,
            email_sent: delivery.sent,
            email_method: delivery.method,
            error: if delivery.sent {
                None
            } else {
                delivery.error.clone()
            },
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_fields_deserialize_to_empty() {
        let request: VerificationRequest = serde_json::from_str(r#"{"email":"a@b.c"}"#).unwrap();

        assert_eq!(request.youtube_handle, "");
        assert_eq!(request.chat_handle, "");
        assert!(!request.is_complete());
    }

    #[test]
    fn whitespace_only_fields_are_incomplete() {
        let request: VerificationRequest = serde_json::from_str(
            r#"{"youtubeHandle":"  ","chatHandle":"someone#1234","email":"a@b.c"}"#,
        )
        .unwrap();

        assert!(!request.is_complete());
    }

    #[test]
    fn delivery_method_wire_tags() {
        assert_eq!(
            serde_json::to_string(&DeliveryMethod::Resend).unwrap(),
            r#""resend""#
        );
        assert_eq!(
            serde_json::to_string(&DeliveryMethod::DiscordWebhook).unwrap(),
            r#""discord_webhook""#
        );
        assert_eq!(serde_json::to_string(&DeliveryMethod::None).unwrap(), r#""""#);
    }

    #[test]
    fn response_nulls_error_on_success() {
        let delivery = EmailDelivery {
            sent: true,
            method: DeliveryMethod::DiscordWebhook,
            // Fallback success retains the primary failure internally.
            error: Some("Resend exploded".to_string()),
        };
        let response = VerifyResponse::from_delivery(&delivery);

        assert!(response.success);
        assert_eq!(response.error, None);
        assert_eq!(
            response.message,
            "Email sent successfully via discord_webhook"
        );

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error"], serde_json::Value::Null);
        assert_eq!(json["emailMethod"], "discord_webhook");
    }

    #[test]
    fn response_reports_failure_message() {
        let delivery = EmailDelivery {
            sent: false,
            method: DeliveryMethod::None,
            error: Some("No email service configured".to_string()),
        };
        let response = VerifyResponse::from_delivery(&delivery);

        assert!(!response.success);
        assert_eq!(response.message, "Email failed: No email service configured");
        assert_eq!(
            response.error.as_deref(),
            Some("No email service configured")
        );
    }
}
