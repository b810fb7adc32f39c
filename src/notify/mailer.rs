use std::env;

use super::templates::{self, TemplateCache};

const SEND_TIMEOUT_SECS: u64 = 10;

fn mail_url() -> Option<String> {
    env::var("AJOPOD_MAIL_URL").ok().filter(|s| !s.is_empty())
}

fn mail_key() -> String {
    env::var("AJOPOD_MAIL_KEY").unwrap_or_default()
}

/// Check that the mail provider is configured and reachable.
pub fn check_provider() -> Result<(), String> {
    let url = mail_url().ok_or(
        "Mail delivery is not configured. Set AJOPOD_MAIL_URL to your provider's send endpoint.",
    )?;
    ureq::get(&url)
        .timeout(std::time::Duration::from_secs(3))
        .call()
        .map_err(|_| format!("Cannot reach mail provider at {}", url))?;
    Ok(())
}

/// Render a template and hand it off to the mail provider. Delivery retries
/// belong to the provider, not to this client.
pub fn send_email(
    cache: &TemplateCache,
    code: &str,
    to: &str,
    vars: &[(&str, String)],
) -> Result<(), String> {
    let url = mail_url().ok_or(
        "Mail delivery is not configured. Set AJOPOD_MAIL_URL to your provider's send endpoint.",
    )?;

    let rendered = templates::render_email(cache, code, vars)
        .ok_or_else(|| format!("Unknown email template: {}", code))?;

    let request_body = serde_json::json!({
        "to": to,
        "subject": rendered.subject,
        "text": rendered.body,
    });

    ureq::post(&url)
        .set("Authorization", &format!("Bearer {}", mail_key()))
        .set("Content-Type", "application/json")
        .timeout(std::time::Duration::from_secs(SEND_TIMEOUT_SECS))
        .send_json(request_body)
        .map_err(|e| match e {
            ureq::Error::Status(code, resp) => {
                let body = resp.into_string().unwrap_or_default();
                format!(
                    "Mail provider rejected the send (HTTP {}): {}",
                    code,
                    &body[..body.len().min(200)]
                )
            }
            ureq::Error::Transport(t) => format!("Could not reach mail provider: {}", t),
        })?;

    Ok(())
}
