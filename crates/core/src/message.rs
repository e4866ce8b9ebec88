use serde::{Deserialize, Serialize};

/// Speaker of a single chat turn
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single turn in the chat history
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Incoming request payload for `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// New user input that needs a reply
    pub user_message: String,
    /// Optional prior conversation supplied by the client
    #[serde(default)]
    pub history: Vec<Message>,
    /// Key under which the server retains recent messages across requests
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Response payload for `POST /chat`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub reply: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_defaults_optional_fields() {
        let req: ChatRequest = serde_json::from_str(r#"{"user_message": "hello"}"#).unwrap();
        assert_eq!(req.user_message, "hello");
        assert!(req.history.is_empty());
        assert!(req.conversation_id.is_none());
    }

    #[test]
    fn roles_use_lowercase_names() {
        let req: ChatRequest = serde_json::from_str(
            r#"{
                "user_message": "book me in",
                "conversation_id": "abc",
                "history": [
                    {"role": "system", "content": "ignored"},
                    {"role": "user", "content": "hi"},
                    {"role": "assistant", "content": "Hello! How can I help?"}
                ]
            }"#,
        )
        .unwrap();

        let roles: Vec<Role> = req.history.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
        assert_eq!(req.conversation_id.as_deref(), Some("abc"));
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result = serde_json::from_str::<Message>(r#"{"role": "tool", "content": "x"}"#);
        assert!(result.is_err());
    }
}
