//! QR provisioning.
//!
//! Renders a customer's QR code through an external render endpoint and,
//! when an image host key is configured, re-hosts the image so the stored
//! URL is stable. Provisioning is best-effort end to end: a customer
//! without a QR code is still fully usable, and a later retry can fill it
//! in.

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use secrecy::ExposeSecret;
use serde::Deserialize;
use url::Url;

use bluedrop_core::{AccountId, QrPayload};

use crate::db::customers::CustomerRepository;
use crate::error::AppError;
use crate::models::Customer;
use crate::services::notifier::Notifier;
use crate::state::AppState;

/// Rendered QR image size in pixels.
const QR_SIZE: &str = "300x300";

#[derive(Deserialize)]
struct UploadResponse {
    data: UploadData,
}

#[derive(Deserialize)]
struct UploadData {
    url: String,
}

/// Provision a QR code for a customer and store the result.
///
/// Failures are logged and swallowed; callers never depend on the outcome.
pub async fn provision(state: &AppState, customer: &Customer) {
    let payload = QrPayload::new(customer.id, customer.business_id).to_string();

    match provision_inner(state, &payload).await {
        Ok(image_url) => {
            let result = CustomerRepository::new(state.pool())
                .set_qr(customer.id, &payload, &image_url)
                .await;
            match result {
                Ok(()) => {
                    state
                        .customer_cache()
                        .invalidate(&customer.business_id)
                        .await;
                    tracing::info!(customer_id = %customer.id, "QR code provisioned");
                }
                Err(e) => {
                    tracing::warn!(error = %e, customer_id = %customer.id, "failed to store QR code");
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, customer_id = %customer.id, "QR provisioning failed");
            Notifier::new(state)
                .info(
                    customer.business_id,
                    AccountId::new(customer.business_id.as_uuid()),
                    "QR code not ready",
                    &format!(
                        "Could not prepare a QR code for {}. Retry from the customer page.",
                        customer.name
                    ),
                )
                .await;
        }
    }
}

/// Resolve the hosted image URL for a payload.
async fn provision_inner(state: &AppState, payload: &str) -> Result<String, AppError> {
    let render_url = render_url(&state.config().qr.render_url, payload)
        .map_err(|e| AppError::External(format!("bad QR render URL: {e}")))?;

    let Some(api_key) = state.config().qr.api_key.as_ref() else {
        // Without an image host the render URL itself serves the image.
        return Ok(render_url.into());
    };

    let image_bytes = state
        .http()
        .get(render_url)
        .send()
        .await
        .map_err(|e| AppError::External(format!("QR render request failed: {e}")))?
        .error_for_status()
        .map_err(|e| AppError::External(format!("QR render returned error: {e}")))?
        .bytes()
        .await
        .map_err(|e| AppError::External(format!("QR render body read failed: {e}")))?;

    let form =
        reqwest::multipart::Form::new().text("image", BASE64.encode(&image_bytes));

    let response: UploadResponse = state
        .http()
        .post(&state.config().qr.upload_url)
        .query(&[("key", api_key.expose_secret())])
        .multipart(form)
        .send()
        .await
        .map_err(|e| AppError::External(format!("image upload failed: {e}")))?
        .error_for_status()
        .map_err(|e| AppError::External(format!("image host returned error: {e}")))?
        .json()
        .await
        .map_err(|e| AppError::External(format!("image host response malformed: {e}")))?;

    Ok(response.data.url)
}

/// Build the render endpoint URL for a payload.
fn render_url(base: &str, payload: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(base)?;
    url.query_pairs_mut()
        .append_pair("size", QR_SIZE)
        .append_pair("data", payload);
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_render_url_encodes_payload() {
        let url = render_url(
            "https://api.qrserver.com/v1/create-qr-code/",
            "BLUEDROP:a:b",
        )
        .unwrap();
        let s = url.as_str();
        assert!(s.contains("size=300x300"));
        assert!(s.contains("data=BLUEDROP%3Aa%3Ab"));
    }

    #[test]
    fn test_render_url_rejects_garbage_base() {
        assert!(render_url("not a url", "BLUEDROP:a:b").is_err());
    }
}
