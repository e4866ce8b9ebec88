//! Render hospital API responses as compact text for the model

use serde_json::{Map, Value as JsonValue};

/// Entries listed before summarizing the rest as a count
const MAX_LISTED: usize = 5;
const MAX_TIPS: usize = 3;

type JsonObject = Map<String, JsonValue>;

/// Pretty JSON, or a fixed notice for an empty payload
pub fn format_json(payload: &JsonValue) -> String {
    let empty = match payload {
        JsonValue::Null => true,
        JsonValue::Object(map) => map.is_empty(),
        JsonValue::Array(items) => items.is_empty(),
        _ => false,
    };
    if empty {
        return "No data returned.".to_string();
    }
    serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
}

/// Summarize a doctor-search response
pub fn format_doctor_search(
    response: &JsonValue,
    normalized_query: &str,
    original_query: &str,
    city: Option<&str>,
) -> String {
    let message = field(response, "message");
    let doctors = array(response, "doctors");
    let suggestions = array(response, "suggestions");
    let mut lines = Vec::new();

    if response.get("status").and_then(JsonValue::as_str) != Some("success") {
        let summary = message.unwrap_or_else(|| "Doctor search failed.".to_string());
        lines.push(format!("Doctor search failed: {}", summary));
    } else if !doctors.is_empty() {
        let city_label = city.unwrap_or("available locations");
        lines.push(format!(
            "Found {} doctor(s) for {} in {}.",
            doctors.len(),
            normalized_query,
            city_label
        ));
        for doctor in doctors.iter().take(MAX_LISTED) {
            let name = field(doctor, "full_name").unwrap_or_else(|| "Unknown doctor".into());
            let specialization =
                field(doctor, "specialization").unwrap_or_else(|| normalized_query.into());
            let hospital =
                field(doctor, "hospital_name").unwrap_or_else(|| "Unknown hospital".into());
            let location = first_field(doctor, &["hospital_address", "location"])
                .unwrap_or_else(|| city_label.into());
            let phone = field(doctor, "phone").unwrap_or_else(|| "Phone not listed".into());
            let doctor_id = field(doctor, "doctor_id").unwrap_or_else(|| "ID unavailable".into());
            let fee_text = match doctor.get("consultation_fee").and_then(JsonValue::as_f64) {
                Some(fee) => format!("Fee: INR {:.0}", fee),
                None => "Fee not listed".to_string(),
            };
            lines.push(format!(
                "- {} ({}) at {}, {}. Phone: {}. Doctor ID: {}. {}.",
                name, specialization, hospital, location, phone, doctor_id, fee_text
            ));
        }
        if doctors.len() > MAX_LISTED {
            lines.push(format!(
                "There are {} more doctor(s) available. Ask if you would like the full list.",
                doctors.len() - MAX_LISTED
            ));
        }
        if !suggestions.is_empty() {
            lines.push("General care tips:".to_string());
            for tip in suggestions.iter().take(MAX_TIPS) {
                lines.push(format!("* {}", display(tip)));
            }
        }
    } else {
        let city_label = city.unwrap_or("the requested area");
        let fallback =
            message.unwrap_or_else(|| "No matching doctors returned by the search API.".into());
        lines.push(format!(
            "No doctors found for {} in {}.",
            normalized_query, city_label
        ));
        lines.push(format!("API message: {}", fallback));
    }

    if normalized_query.to_lowercase() != original_query.to_lowercase() {
        lines.push(format!(
            "(Original query '{}' was interpreted as '{}'.)",
            original_query, normalized_query
        ));
    }

    lines.join("\n")
}

/// Summarize an appointments-by-phone response.
///
/// The backend has answered with a bare array as well as with the list
/// wrapped under one of several keys, so all of those shapes are accepted.
pub fn format_appointments(response: &JsonValue, phone_number: &str, page: u32, limit: u32) -> String {
    let appointments = extract_appointments(response);
    let api_message = field(response, "message");
    let mut lines = Vec::new();

    if appointments.is_empty() {
        lines.push(format!(
            "No appointments found for phone number {} (page {}, limit {}).",
            phone_number, page, limit
        ));
        lines.push(format!(
            "API message: {}",
            api_message.unwrap_or_else(|| "No appointments returned by the API.".into())
        ));
        return lines.join("\n");
    }

    lines.push(format!(
        "Found {} appointment(s) linked to {} (page {}, limit {}).",
        appointments.len(),
        phone_number,
        page,
        limit
    ));
    for appointment in appointments.iter().take(MAX_LISTED) {
        lines.push(appointment_line(appointment));
    }

    if appointments.len() > MAX_LISTED {
        lines.push(format!(
            "There are {} additional appointment(s). Request a higher limit or another page to see more.",
            appointments.len() - MAX_LISTED
        ));
    }

    if let Some(message) = api_message {
        lines.push(format!("API message: {}", message));
    }

    lines.join("\n")
}

fn extract_appointments(response: &JsonValue) -> &[JsonValue] {
    match response {
        JsonValue::Array(items) => items.as_slice(),
        JsonValue::Object(map) => {
            for key in ["appointments", "data", "results", "items"] {
                match map.get(key) {
                    Some(JsonValue::Array(items)) => return items.as_slice(),
                    Some(JsonValue::Object(inner)) => {
                        if let Some(JsonValue::Array(items)) = inner.get("appointments") {
                            return items.as_slice();
                        }
                    }
                    _ => {}
                }
            }
            &[]
        }
        _ => &[],
    }
}

fn appointment_line(appointment: &JsonValue) -> String {
    let empty = JsonObject::new();
    let doctor = appointment
        .get("doctor")
        .and_then(JsonValue::as_object)
        .unwrap_or(&empty);

    let appointment_id = first_field(appointment, &["appointment_id", "id"])
        .unwrap_or_else(|| "Unknown appointment ID".into());
    let doctor_name = field(appointment, "doctor_name")
        .or_else(|| first_object_field(doctor, &["full_name", "name"]));
    let doctor_id = field(appointment, "doctor_id")
        .or_else(|| first_object_field(doctor, &["doctor_id", "id"]));
    let meeting_time = first_field(
        appointment,
        &["meeting_time", "appointment_time", "scheduled_time"],
    )
    .unwrap_or_else(|| "Unknown time".into());
    let status = field(appointment, "status").unwrap_or_else(|| "status unavailable".into());
    let appointment_type = first_field(appointment, &["appointment_type", "type"]);
    let location = first_field(appointment, &["location", "city"])
        .or_else(|| first_object_field(doctor, &["hospital_name", "location"]));

    let mut line = format!("- Appointment {}", appointment_id);
    if let Some(name) = doctor_name {
        line.push_str(&format!(" with {}", name));
        if let Some(id) = doctor_id {
            line.push_str(&format!(" (Doctor ID: {})", id));
        }
    }
    line.push_str(&format!(" on {}.", meeting_time));
    line.push_str(&format!(" Status: {}.", status));
    if let Some(kind) = appointment_type {
        line.push_str(&format!(" Type: {}.", kind));
    }
    if let Some(location) = location {
        line.push_str(&format!(" Location: {}.", location));
    }
    line
}

fn array<'a>(value: &'a JsonValue, key: &str) -> &'a [JsonValue] {
    value
        .get(key)
        .and_then(JsonValue::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Scalar field as display text; null, empty strings and containers count as absent
fn field(value: &JsonValue, key: &str) -> Option<String> {
    value.as_object().and_then(|map| object_field(map, key))
}

fn first_field(value: &JsonValue, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| field(value, key))
}

fn object_field(map: &JsonObject, key: &str) -> Option<String> {
    match map.get(key)? {
        JsonValue::String(s) if s.is_empty() => None,
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn first_object_field(map: &JsonObject, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| object_field(map, key))
}

fn display(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}
