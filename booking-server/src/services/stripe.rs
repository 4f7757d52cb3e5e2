//! StripeService: HTTP client for the Stripe Checkout API
//!
//! Talks to the Stripe REST API directly with form-encoded requests and
//! verifies webhook signatures (`Stripe-Signature` header, HMAC-SHA256
//! over `"{t}.{payload}"`).

use reqwest::Client;
use ring::hmac;
use serde::Deserialize;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::VendorKind;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Accepted clock skew between the signature timestamp and now
const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Parameters for opening a hosted checkout session
#[derive(Debug, Clone)]
pub struct CheckoutParams {
    /// Total charge in cents
    pub amount_cents: i64,
    /// Line item label shown on the hosted page
    pub product_name: String,
    /// Correlated booking ids (one for single-date, many for a batch)
    pub booking_ids: Vec<i64>,
    pub vendor_kind: VendorKind,
    pub num_dates: u32,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: String,
}

/// A created checkout session
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
    #[serde(default)]
    pub payment_intent: Option<String>,
}

/// Retrieved session fields used by the status endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    pub id: String,
    #[serde(default)]
    pub amount_total: Option<i64>,
    #[serde(default)]
    pub payment_status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// HTTP client for the Stripe API
pub struct StripeService {
    client: Client,
    secret_key: String,
    webhook_secret: String,
}

impl StripeService {
    pub fn new(secret_key: String, webhook_secret: String) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            secret_key,
            webhook_secret,
        })
    }

    /// Whether an API key is configured
    pub fn is_configured(&self) -> bool {
        !self.secret_key.is_empty()
    }

    /// Create a hosted checkout session with manual capture
    ///
    /// Correlation metadata is attached twice: on the session, and on the
    /// payment intent (`payment_intent_data[metadata][...]`) so capture
    /// notifications can be matched even when the session notification
    /// was never processed.
    pub async fn create_checkout_session(
        &self,
        params: &CheckoutParams,
    ) -> AppResult<CheckoutSession> {
        if !self.is_configured() {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                "STRIPE_SECRET_KEY is not configured",
            ));
        }

        let mut form: Vec<(String, String)> = vec![
            ("mode".into(), "payment".into()),
            ("success_url".into(), params.success_url.clone()),
            ("cancel_url".into(), params.cancel_url.clone()),
            ("customer_email".into(), params.customer_email.clone()),
            ("line_items[0][quantity]".into(), "1".into()),
            ("line_items[0][price_data][currency]".into(), "usd".into()),
            (
                "line_items[0][price_data][unit_amount]".into(),
                params.amount_cents.to_string(),
            ),
            (
                "line_items[0][price_data][product_data][name]".into(),
                params.product_name.clone(),
            ),
            (
                "payment_intent_data[capture_method]".into(),
                "manual".into(),
            ),
        ];

        for key in ["metadata", "payment_intent_data[metadata]"] {
            if let [single] = params.booking_ids.as_slice() {
                form.push((format!("{key}[booking_id]"), single.to_string()));
            } else {
                let joined = params
                    .booking_ids
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                form.push((format!("{key}[booking_ids]"), joined));
            }
            form.push((
                format!("{key}[vendor_kind]"),
                params.vendor_kind.as_str().to_string(),
            ));
            form.push((format!("{key}[num_dates]"), params.num_dates.to_string()));
        }

        let response = self
            .client
            .post(format!("{STRIPE_API_BASE}/checkout/sessions"))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::checkout_failed(format!("Checkout request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(AppError::checkout_failed(format!(
                "Stripe rejected checkout session: {message}"
            )));
        }

        response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| AppError::checkout_failed(format!("Invalid checkout response: {e}")))
    }

    /// Retrieve a checkout session (for the booking status endpoint)
    pub async fn get_session(&self, session_id: &str) -> AppResult<SessionInfo> {
        if !self.is_configured() {
            return Err(AppError::with_message(
                ErrorCode::ConfigError,
                "STRIPE_SECRET_KEY is not configured",
            ));
        }

        let response = self
            .client
            .get(format!("{STRIPE_API_BASE}/checkout/sessions/{session_id}"))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await
            .map_err(|e| {
                AppError::with_message(
                    ErrorCode::ProviderError,
                    format!("Session lookup failed: {e}"),
                )
            })?;

        if !response.status().is_success() {
            return Err(AppError::with_message(
                ErrorCode::ProviderError,
                format!("Session lookup returned HTTP {}", response.status()),
            ));
        }

        response.json::<SessionInfo>().await.map_err(|e| {
            AppError::with_message(ErrorCode::ProviderError, format!("Invalid session body: {e}"))
        })
    }

    /// Verify a `Stripe-Signature` header against the raw payload
    pub fn verify_signature(&self, payload: &[u8], header: &str) -> AppResult<()> {
        self.verify_signature_at(payload, header, chrono::Utc::now().timestamp())
    }

    /// Signature check with an explicit clock, constant-time compare
    pub fn verify_signature_at(&self, payload: &[u8], header: &str, now: i64) -> AppResult<()> {
        if self.webhook_secret.is_empty() {
            return Err(AppError::new(ErrorCode::WebhookNotConfigured));
        }

        let mut timestamp: Option<i64> = None;
        let mut signatures: Vec<Vec<u8>> = Vec::new();

        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => timestamp = value.parse().ok(),
                Some(("v1", value)) => {
                    if let Ok(bytes) = hex::decode(value) {
                        signatures.push(bytes);
                    }
                }
                _ => {}
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| AppError::bad_signature("Missing timestamp in signature"))?;
        if signatures.is_empty() {
            return Err(AppError::bad_signature("Missing v1 signature"));
        }

        if (now - timestamp).abs() > SIGNATURE_TOLERANCE_SECS {
            return Err(AppError::bad_signature("Signature timestamp out of tolerance"));
        }

        let key = hmac::Key::new(hmac::HMAC_SHA256, self.webhook_secret.as_bytes());
        let mut signed_payload = Vec::with_capacity(payload.len() + 16);
        signed_payload.extend_from_slice(timestamp.to_string().as_bytes());
        signed_payload.push(b'.');
        signed_payload.extend_from_slice(payload);

        for signature in &signatures {
            if hmac::verify(&key, &signed_payload, signature).is_ok() {
                return Ok(());
            }
        }

        Err(AppError::bad_signature("Signature mismatch"))
    }
}
