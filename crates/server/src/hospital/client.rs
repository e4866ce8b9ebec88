//! Thin client for the hospital backend REST API

use std::time::Duration;

use medassist_core::ChatError;
use reqwest::{Method, header};
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

/// Largest page size the appointments endpoint accepts
pub const MAX_APPOINTMENTS_LIMIT: u32 = 50;

/// Client for the hospital backend.
///
/// No retries: a failed request is reported straight back to the caller.
#[derive(Clone)]
pub struct HospitalClient {
    http: reqwest::Client,
    base_url: String,
    client_id: Option<String>,
}

/// Body for `POST /patient/book-appointment`
#[derive(Debug, Clone, Serialize)]
pub struct BookingPayload {
    pub doctor_id: String,
    pub patient_name: String,
    pub patient_phone_number: String,
    pub client_id: String,
    pub meeting_time: String,
    pub appointment_type: String,
    pub status: String,
}

impl HospitalClient {
    /// Create a client for the given API root.
    ///
    /// `client_id` is the hospital client identifier used for bookings that
    /// don't name one explicitly.
    pub fn new(
        base_url: &str,
        client_id: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            client_id,
        })
    }

    /// Configured client identifier for bookings
    pub fn require_client_id(&self) -> Result<&str, ChatError> {
        self.client_id.as_deref().ok_or_else(|| {
            ChatError::NotConfigured(
                "Missing HOSPITAL_CLIENT_ID environment variable required for appointment bookings."
                    .to_string(),
            )
        })
    }

    /// POST /patient/search-doctor
    pub async fn search_doctors(
        &self,
        query: &str,
        city: Option<&str>,
        ai_mode: bool,
    ) -> Result<JsonValue, ChatError> {
        let mut payload = json!({ "query": query, "ai_mode": ai_mode });
        if let Some(city) = city.filter(|c| !c.is_empty()) {
            payload["city"] = json!(city);
        }
        self.request(Method::POST, "/patient/search-doctor", None, Some(&payload))
            .await
    }

    /// GET /doctor/availability/week/{doctor_id}
    pub async fn doctor_availability_week(&self, doctor_id: &str) -> Result<JsonValue, ChatError> {
        let path = format!("/doctor/availability/week/{}", doctor_id);
        self.request::<()>(Method::GET, &path, None, None).await
    }

    /// GET /patient/appointments-by-phone
    pub async fn appointments_by_phone(
        &self,
        phone_number: &str,
        page: u32,
        limit: u32,
    ) -> Result<JsonValue, ChatError> {
        let params = [
            ("phone_number", phone_number.to_string()),
            ("page", page.to_string()),
            ("limit", clamp_limit(limit).to_string()),
        ];
        self.request::<()>(
            Method::GET,
            "/patient/appointments-by-phone",
            Some(&params),
            None,
        )
        .await
    }

    /// POST /patient/book-appointment
    pub async fn book_appointment(&self, payload: &BookingPayload) -> Result<JsonValue, ChatError> {
        self.request(Method::POST, "/patient/book-appointment", None, Some(payload))
            .await
    }

    async fn request<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        params: Option<&[(&str, String)]>,
        body: Option<&B>,
    ) -> Result<JsonValue, ChatError> {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));

        let mut builder = self
            .http
            .request(method.clone(), &url)
            .header(header::ACCEPT, "application/json");
        if let Some(params) = params {
            builder = builder.query(params);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        tracing::debug!(method = %method, url = %url, "Hospital API request");

        let response = builder.send().await.map_err(|e| {
            ChatError::HospitalApi(format!("Hospital API request failed for {}: {}", url, e))
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            ChatError::HospitalApi(format!("Hospital API request failed for {}: {}", url, e))
        })?;

        if !status.is_success() {
            return Err(ChatError::HospitalApi(format!(
                "Hospital API error {} for {}: {}",
                status.as_u16(),
                url,
                text
            )));
        }

        if text.trim().is_empty() {
            return Ok(json!({}));
        }

        serde_json::from_str(&text).map_err(|e| {
            ChatError::HospitalApi(format!("Hospital API returned invalid JSON for {}: {}", url, e))
        })
    }
}

/// Clamp a requested page size to what the backend accepts
pub fn clamp_limit(limit: u32) -> u32 {
    limit.clamp(1, MAX_APPOINTMENTS_LIMIT)
}
