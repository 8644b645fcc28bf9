/// Webhook handler - lifecycle event entry point
use actix_web::{web, HttpRequest, HttpResponse};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::metrics;
use crate::services::webhook::{verify_signature, WebhookEnvelope, SIGNATURE_HEADER};
use crate::services::WebhookProcessor;

/// Receive one lifecycle event from the external platform. The signature is
/// verified over the raw body before anything else happens; a mismatch is a
/// rejected request with no side effects. Once it passes, the event is
/// acknowledged with 200 "OK" regardless of internal processing outcome, so
/// a transient failure on our side does not drive the platform into a retry
/// storm.
pub async fn mux_webhook(
    req: HttpRequest,
    body: web::Bytes,
    config: web::Data<Config>,
    processor: web::Data<WebhookProcessor>,
) -> Result<HttpResponse> {
    let signature = req
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Missing webhook signature".to_string()))?;

    if !verify_signature(&body, signature, &config.mux.webhook_secret) {
        return Err(AppError::Unauthorized(
            "Invalid webhook signature".to_string(),
        ));
    }

    match serde_json::from_slice::<WebhookEnvelope>(&body) {
        Ok(envelope) => processor.handle_event(envelope).await,
        Err(e) => {
            tracing::warn!(error = %e, "acknowledged webhook with unparseable body");
            metrics::WEBHOOK_EVENTS_TOTAL
                .with_label_values(&["unparseable", "failed"])
                .inc();
        }
    }

    Ok(HttpResponse::Ok().body("OK"))
}
