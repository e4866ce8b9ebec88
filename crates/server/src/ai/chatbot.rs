//! Hospital receptionist chatbot with tool calling

use medassist_core::{ChatError, ConversationMemory, Message, Role};

use super::client::{Content, FunctionDeclaration, GeminiClient, Part, ToolMode};
use crate::config::Config;
use crate::hospital::{HospitalClient, tools};

const SYSTEM_PROMPT: &str = "You are MedAssist, a hospital front desk assistant. \
Greet patients warmly, gather intent, and answer questions using only the provided information. \
Confirm doctor, patient, and timing before booking. \
If details are missing, ask focused follow-up questions. \
Always verify doctor availability with the search tool before promising an appointment. \
If the search tool does not return the requested doctor, explain that they are unavailable \
and offer alternatives such as searching other specialists. Respond in the same language \
the patient uses, and when the patient writes in Hindi or Marathi, answer using Devanagari script. \
Keep responses concise, empathetic, and professional.";

/// Messages retained per conversation and sent as context
pub const MAX_HISTORY_MESSAGES: usize = 5;

/// Session shared by every caller that sends neither an id nor history
pub const DEFAULT_CONVERSATION_ID: &str = "_default_session";

/// Tool-enabled model calls before a final text-only answer is forced
const MAX_TOOL_ITERATIONS: u32 = 3;

/// Gemini-backed assistant that can call the hospital backend
pub struct ChatService {
    llm: GeminiClient,
    hospital: HospitalClient,
    tools: Vec<FunctionDeclaration>,
    memory: ConversationMemory,
}

impl ChatService {
    pub fn new(llm: GeminiClient, hospital: HospitalClient) -> Self {
        Self {
            llm,
            hospital,
            tools: tools::hospital_tools(),
            memory: ConversationMemory::new(MAX_HISTORY_MESSAGES),
        }
    }

    /// Build the service from configuration.
    ///
    /// Returns `Ok(None)` when no Gemini API key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, ChatError> {
        let Some(api_key) = config.google_api_key.clone() else {
            return Ok(None);
        };

        let llm = GeminiClient::new(
            api_key,
            config.gemini_model.clone(),
            &config.gemini_api_base_url,
            config.llm_temperature,
            config.http_timeout(),
        )?;
        let hospital = HospitalClient::new(
            &config.hospital_api_base_url,
            config.hospital_client_id.clone(),
            config.http_timeout(),
        )?;

        Ok(Some(Self::new(llm, hospital)))
    }

    /// Generate a reply to `user_message` given the prior conversation.
    ///
    /// With a conversation id (or with neither id nor history, which selects
    /// the shared fallback session) the stored history is used and updated.
    /// A client that sends history without an id gets a stateless answer.
    pub async fn generate_reply(
        &self,
        user_message: &str,
        history: Vec<Message>,
        conversation_id: Option<&str>,
    ) -> Result<String, ChatError> {
        let effective_id = match conversation_id.filter(|id| !id.is_empty()) {
            Some(id) => Some(id),
            None if history.is_empty() => Some(DEFAULT_CONVERSATION_ID),
            None => None,
        };

        let history = match effective_id {
            Some(id) => {
                if !history.is_empty() {
                    self.memory.set_history(id, history);
                }
                self.memory.get_history(id)
            }
            None => history,
        };

        let mut contents = to_contents(&history);
        contents.push(Content::user(user_message));

        let system = system_instruction();
        let reply = self.run_tool_loop(&system, &mut contents).await?;

        if let Some(id) = effective_id {
            self.memory.append_messages(
                id,
                [Message::user(user_message), Message::assistant(reply.clone())],
            );
        }

        Ok(reply)
    }

    /// Run the agentic loop.
    ///
    /// Sends the conversation to Gemini with tools, executes any function
    /// calls, and continues until Gemini produces a text answer. When the
    /// iteration budget runs out a final call with tools disabled is made.
    async fn run_tool_loop(
        &self,
        system: &str,
        contents: &mut Vec<Content>,
    ) -> Result<String, ChatError> {
        for iteration in 0..MAX_TOOL_ITERATIONS {
            let candidate = self
                .llm
                .send(Some(system), contents, Some(self.tools.as_slice()), ToolMode::Auto)
                .await?;

            let calls = candidate.content.function_calls();
            tracing::debug!(
                model = %self.llm.model(),
                iteration = iteration,
                finish_reason = ?candidate.finish_reason,
                tool_calls = calls.len(),
                "Chat loop iteration"
            );

            if calls.is_empty() {
                return Ok(candidate.content.text());
            }

            // Append the model turn (with its function calls) to the conversation
            contents.push(candidate.content);

            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                tracing::info!(tool = %call.name, "Executing chat tool");
                metrics::counter!("chat_tool_calls_total", "tool" => call.name.clone())
                    .increment(1);
                let output = tools::execute_tool(&self.hospital, &call.name, &call.args).await;
                results.push(Part::function_response(call, output));
            }

            contents.push(Content {
                role: "user".to_string(),
                parts: results,
            });
        }

        tracing::warn!(
            max_iterations = MAX_TOOL_ITERATIONS,
            "Tool iteration budget exhausted, requesting final answer"
        );
        let candidate = self
            .llm
            .send(Some(system), contents, Some(self.tools.as_slice()), ToolMode::None)
            .await?;
        Ok(candidate.content.text())
    }
}

/// Keep the newest messages and convert them to Gemini turns.
///
/// Client-supplied system messages are dropped so they cannot override the
/// assistant's instructions.
fn to_contents(history: &[Message]) -> Vec<Content> {
    let start = history.len().saturating_sub(MAX_HISTORY_MESSAGES);
    history[start..]
        .iter()
        .filter_map(|message| match message.role {
            Role::User => Some(Content::user(message.content.clone())),
            Role::Assistant => Some(Content::model(message.content.clone())),
            Role::System => None,
        })
        .collect()
}

fn system_instruction() -> String {
    format!(
        "{}\n\nToday's date is {}. Convert relative dates such as \"tomorrow\" into ISO timestamps before booking.",
        SYSTEM_PROMPT,
        chrono::Utc::now().format("%A, %Y-%m-%d")
    )
}
