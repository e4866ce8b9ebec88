//! Hospital API operations exposed to the model as callable functions

use medassist_core::{ChatError, normalize_specialty};
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::{Value as JsonValue, json};

use super::client::{BookingPayload, HospitalClient, clamp_limit};
use super::format;
use crate::ai::client::FunctionDeclaration;

#[derive(Debug, Deserialize)]
struct SearchDoctorArgs {
    query: String,
    #[serde(default)]
    city: Option<String>,
    #[serde(default = "default_true")]
    ai_mode: bool,
}

#[derive(Debug, Deserialize)]
struct DoctorAvailabilityArgs {
    doctor_id: String,
}

#[derive(Debug, Deserialize)]
struct AppointmentsByPhoneArgs {
    phone_number: String,
    #[serde(default = "default_page", deserialize_with = "count")]
    page: u32,
    #[serde(default = "default_limit", deserialize_with = "count")]
    limit: u32,
}

#[derive(Debug, Deserialize)]
struct BookAppointmentArgs {
    doctor_id: String,
    patient_name: String,
    patient_phone_number: String,
    meeting_time: String,
    #[serde(default = "default_appointment_type")]
    appointment_type: String,
    #[serde(default = "default_status")]
    status: String,
    #[serde(default)]
    client_id: Option<String>,
}

// Gemini encodes every number as a double, so `2.0` must read as a page number
fn count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    if value.is_finite() && value >= 0.0 {
        Ok(value.min(f64::from(u32::MAX)) as u32)
    } else {
        Err(D::Error::custom("expected a non-negative number"))
    }
}

fn default_true() -> bool {
    true
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

fn default_appointment_type() -> String {
    "online".to_string()
}

fn default_status() -> String {
    "scheduled".to_string()
}

/// Define the tools available to the chatbot
pub fn hospital_tools() -> Vec<FunctionDeclaration> {
    vec![
        FunctionDeclaration {
            name: "search_doctors".to_string(),
            description: "Search for doctors or specialists by name or specialty, optionally filtering by city.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "query": {
                        "type": "string",
                        "description": "Doctor name or specialty to search for."
                    },
                    "city": {
                        "type": "string",
                        "description": "City to filter the doctor search results."
                    },
                    "ai_mode": {
                        "type": "boolean",
                        "description": "Whether to enable AI mode on the backend search endpoint. Defaults to true."
                    }
                },
                "required": ["query"]
            }),
        },
        FunctionDeclaration {
            name: "doctor_weekly_availability".to_string(),
            description: "Retrieve a doctor's weekly availability slots using their UUID.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "doctor_id": {
                        "type": "string",
                        "description": "Doctor UUID to fetch weekly availability."
                    }
                },
                "required": ["doctor_id"]
            }),
        },
        FunctionDeclaration {
            name: "appointments_by_phone".to_string(),
            description: "List appointments for a patient identified by phone number. Supports pagination.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "phone_number": {
                        "type": "string",
                        "description": "Patient's phone number."
                    },
                    "page": {
                        "type": "integer",
                        "description": "Results page to fetch, starting at 1."
                    },
                    "limit": {
                        "type": "integer",
                        "description": "Maximum appointments to return per page (1-50, default 10)."
                    }
                },
                "required": ["phone_number"]
            }),
        },
        FunctionDeclaration {
            name: "book_appointment".to_string(),
            description: "Schedule a new appointment for a patient with a doctor. Requires doctor ID, patient details, meeting time, and uses the configured hospital client identifier when not provided.".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "doctor_id": {
                        "type": "string",
                        "description": "Doctor UUID to book an appointment with."
                    },
                    "patient_name": {
                        "type": "string",
                        "description": "Patient full name."
                    },
                    "patient_phone_number": {
                        "type": "string",
                        "description": "Patient's contact number."
                    },
                    "meeting_time": {
                        "type": "string",
                        "description": "ISO timestamp for the appointment, e.g. 2025-10-09T11:20:03.544Z."
                    },
                    "appointment_type": {
                        "type": "string",
                        "description": "Type of appointment, e.g. online or in_person. Defaults to online."
                    },
                    "status": {
                        "type": "string",
                        "description": "Initial appointment status. Defaults to scheduled."
                    },
                    "client_id": {
                        "type": "string",
                        "description": "Client identifier. Falls back to the configured hospital client ID when omitted."
                    }
                },
                "required": ["doctor_id", "patient_name", "patient_phone_number", "meeting_time"]
            }),
        },
    ]
}

/// Execute a tool call against the hospital API.
///
/// Failures are returned as text so the model can explain them to the
/// patient instead of aborting the conversation.
pub async fn execute_tool(client: &HospitalClient, name: &str, input: &JsonValue) -> String {
    let result = match name {
        "search_doctors" => search_doctors(client, input).await,
        "doctor_weekly_availability" => doctor_availability(client, input).await,
        "appointments_by_phone" => appointments_by_phone(client, input).await,
        "book_appointment" => book_appointment(client, input).await,
        _ => return format!("Requested tool '{name}' is not available."),
    };

    result.unwrap_or_else(|e| format!("Tool '{name}' failed: {e}"))
}

/// Deserialize model-supplied arguments; a call without arguments counts as `{}`
fn parse_args<T: DeserializeOwned>(input: &JsonValue) -> Result<T, ChatError> {
    let input = if input.is_null() { json!({}) } else { input.clone() };
    serde_json::from_value(input).map_err(|e| ChatError::InvalidArguments(e.to_string()))
}

async fn search_doctors(client: &HospitalClient, input: &JsonValue) -> Result<String, ChatError> {
    let args: SearchDoctorArgs = parse_args(input)?;
    let normalized = normalize_specialty(&args.query);
    let city = args.city.as_deref().filter(|c| !c.is_empty());
    if normalized != args.query {
        tracing::debug!(original = %args.query, normalized = %normalized, "Normalized specialty query");
    }

    let response = client.search_doctors(&normalized, city, args.ai_mode).await?;
    Ok(format::format_doctor_search(&response, &normalized, &args.query, city))
}

async fn doctor_availability(client: &HospitalClient, input: &JsonValue) -> Result<String, ChatError> {
    let args: DoctorAvailabilityArgs = parse_args(input)?;
    let response = client.doctor_availability_week(&args.doctor_id).await?;
    Ok(format::format_json(&response))
}

async fn appointments_by_phone(
    client: &HospitalClient,
    input: &JsonValue,
) -> Result<String, ChatError> {
    let args: AppointmentsByPhoneArgs = parse_args(input)?;
    let page = args.page.max(1);
    let limit = clamp_limit(args.limit);
    let response = client
        .appointments_by_phone(&args.phone_number, page, limit)
        .await?;
    Ok(format::format_appointments(&response, &args.phone_number, page, limit))
}

async fn book_appointment(client: &HospitalClient, input: &JsonValue) -> Result<String, ChatError> {
    let args: BookAppointmentArgs = parse_args(input)?;
    let client_id = match args.client_id.filter(|id| !id.is_empty()) {
        Some(id) => id,
        None => client.require_client_id()?.to_string(),
    };
    let payload = BookingPayload {
        doctor_id: args.doctor_id,
        patient_name: args.patient_name,
        patient_phone_number: args.patient_phone_number,
        client_id,
        meeting_time: args.meeting_time,
        appointment_type: args.appointment_type,
        status: args.status,
    };

    tracing::info!(doctor_id = %payload.doctor_id, meeting_time = %payload.meeting_time, "Booking appointment");
    let response = client.book_appointment(&payload).await?;
    Ok(format::format_json(&response))
}
