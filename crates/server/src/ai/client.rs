//! Gemini API client for the `generateContent` endpoint

use std::time::Duration;

use medassist_core::ChatError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Client for the Google Gemini `generateContent` API
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f32,
}

/// A turn in the conversation sent to Gemini
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            parts: vec![Part::text(text)],
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            parts: vec![Part::text(text)],
        }
    }

    /// Text parts joined by newlines
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn function_calls(&self) -> Vec<FunctionCall> {
        self.parts
            .iter()
            .filter_map(|part| part.function_call.clone())
            .collect()
    }
}

/// Individual part of a content turn.
///
/// Parts echoed back to the model keep any `thoughtSignature` Gemini attached
/// to a function call, otherwise follow-up requests are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_call: Option<FunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_response: Option<FunctionResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn function_response(call: &FunctionCall, output: String) -> Self {
        Self {
            function_response: Some(FunctionResponse {
                id: call.id.clone(),
                name: call.name.clone(),
                response: serde_json::json!({ "content": output }),
            }),
            ..Default::default()
        }
    }
}

/// Function invocation requested by the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub args: JsonValue,
}

/// Result of a function invocation sent back to the model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub response: JsonValue,
}

/// Tool definition for Gemini
#[derive(Debug, Clone, Serialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: JsonValue,
}

/// Whether the model may call the declared functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolMode {
    Auto,
    /// Tools stay declared so earlier calls in the history remain valid,
    /// but the model must answer in text.
    None,
}

impl ToolMode {
    fn as_str(self) -> &'static str {
        match self {
            ToolMode::Auto => "AUTO",
            ToolMode::None => "NONE",
        }
    }
}

/// Request body for `generateContent`
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<[ToolSet<'a>; 1]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<ToolConfig>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolSet<'a> {
    function_declarations: &'a [FunctionDeclaration],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolConfig {
    function_calling_config: FunctionCallingConfig,
}

#[derive(Serialize)]
struct FunctionCallingConfig {
    mode: &'static str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

/// Response from `generateContent`
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<JsonValue>,
}

/// A single generated answer
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Error detail from the Gemini API
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GeminiClient {
    /// Create a new client for the given model and API root
    pub fn new(
        api_key: String,
        model: String,
        base_url: &str,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, ChatError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChatError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send the conversation with optional tools and return the first candidate
    pub async fn send(
        &self,
        system: Option<&str>,
        contents: &[Content],
        tools: Option<&[FunctionDeclaration]>,
        mode: ToolMode,
    ) -> Result<Candidate, ChatError> {
        let request = ApiRequest {
            contents,
            system_instruction: system.map(|text| Content {
                role: String::new(),
                parts: vec![Part::text(text)],
            }),
            tools: tools.map(|declarations| {
                [ToolSet {
                    function_declarations: declarations,
                }]
            }),
            tool_config: tools.map(|_| ToolConfig {
                function_calling_config: FunctionCallingConfig {
                    mode: mode.as_str(),
                },
            }),
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ChatError::Llm(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            if let Ok(api_err) = serde_json::from_str::<ApiError>(&body) {
                let label = api_err.error.status.unwrap_or_default();
                return Err(ChatError::Llm(format!(
                    "Gemini API error ({}): {} {}",
                    status, label, api_err.error.message
                )));
            }
            return Err(ChatError::Llm(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let parsed = response
            .json::<ApiResponse>()
            .await
            .map_err(|e| ChatError::Llm(format!("Failed to parse response: {}", e)))?;

        match parsed.candidates.into_iter().next() {
            Some(mut candidate) => {
                candidate.content.role = "model".to_string();
                Ok(candidate)
            }
            None => Err(ChatError::Llm(format!(
                "No candidates in response (prompt feedback: {})",
                parsed.prompt_feedback.unwrap_or(JsonValue::Null)
            ))),
        }
    }
}
