// https://resend.com/docs/api-reference/emails/send-email

pub mod models;

use reqwest::Client;
use thiserror::Error;
use tracing::error;

use crate::models::{SendEmailRequest, SendEmailResponse};

const API_URL: &str = "https://api.resend.com/emails";

/// Errors returned by the Resend API client.
#[derive(Debug, Error)]
pub enum ResendError {
    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response)
    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Parse error (unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Debug, Clone)]
pub struct ResendOptions {
    pub api_key: String,
    /// Sender in `Name <addr@domain>` form.
    pub from: String,
}

#[derive(Debug, Clone)]
pub struct ResendService {
    options: ResendOptions,
    client: Client,
}

impl ResendService {
    pub fn new(options: ResendOptions) -> Self {
        Self {
            options,
            client: Client::new(),
        }
    }

    /// Send a single HTML email. Returns the provider-assigned email id.
    pub async fn send_email(
        &self,
        to: &str,
        subject: &str,
        html: &str,
    ) -> Result<SendEmailResponse, ResendError> {
        let request = SendEmailRequest {
            from: self.options.from.clone(),
            to: vec![to.to_string()],
            subject: subject.to_string(),
            html: html.to_string(),
        };

        let res = self
            .client
            .post(API_URL)
            .bearer_auth(&self.options.api_key)
            .json(&request)
            .send()
            .await;

        match res {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    let body = response.text().await.unwrap_or_default();
                    error!("Resend error ({}): {}", status, body);
                    return Err(ResendError::Api {
                        status: status.as_u16(),
                        body,
                    });
                }

                response
                    .json::<SendEmailResponse>()
                    .await
                    .map_err(|e| ResendError::Parse(e.to_string()))
            }
            Err(e) => {
                error!("Request to Resend failed: {}", e);
                Err(ResendError::Network(e.to_string()))
            }
        }
    }
}
