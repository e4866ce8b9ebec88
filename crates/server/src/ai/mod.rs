//! AI features powered by the Gemini API

pub mod chatbot;
pub mod client;

pub use chatbot::ChatService;
