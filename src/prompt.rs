//! Prompt construction around a retrieved context.
//!
//! The retriever's context string is embedded into a system instruction that
//! also tells the model how to render images and map markers. The chat
//! history sent by the front end is converted into provider turns. The
//! resulting [`GenerationRequest`] is what a language-model client sends; the
//! call itself lives outside this crate.

use serde::{Deserialize, Serialize};

use crate::knowledge::ContextRetriever;

/// Author of a chat turn as sent by the front end.
///
/// Any role other than `user` is read as `model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Role {
    User,
    Model,
}

impl From<String> for Role {
    fn from(role: String) -> Self {
        if role == "user" { Role::User } else { Role::Model }
    }
}

/// One message of the conversation so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

impl ChatTurn {
    pub fn user<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model<S: Into<String>>(text: S) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// Text part of a provider turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Part {
    pub text: String,
}

/// Provider-side turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Content {
    /// `"user"` or `"model"`.
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    fn from_text(role: Role, text: &str) -> Self {
        let role = match role {
            Role::User => "user",
            Role::Model => "model",
        };
        Self {
            role: role.to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

/// Everything a language-model client needs for one streamed answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub system_instruction: String,
    pub contents: Vec<Content>,
}

/// System instruction embedding a grounding context.
pub fn system_instruction(context: &str) -> String {
    format!(
        "Tu es Nomadia. Contexte: {context}. Affiche images comme ![alt](url) et cartes comme [MAP: lat, lng]."
    )
}

/// Provider turns for the history followed by the new user message.
pub fn conversation(history: &[ChatTurn], message: &str) -> Vec<Content> {
    history
        .iter()
        .map(|turn| Content::from_text(turn.role, &turn.text))
        .chain(std::iter::once(Content::from_text(Role::User, message)))
        .collect()
}

/// Build a request from an already retrieved context.
pub fn build_request(context: &str, history: &[ChatTurn], message: &str) -> GenerationRequest {
    GenerationRequest {
        system_instruction: system_instruction(context),
        contents: conversation(history, message),
    }
}

/// Retrieve the context for `message` and build the request around it.
pub fn compose(retriever: &ContextRetriever, history: &[ChatTurn], message: &str) -> GenerationRequest {
    let context = retriever.retrieve(message);
    build_request(&context, history, message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::knowledge::KnowledgeBase;
    use crate::ml::ClassifierState;
    use std::sync::Arc;

    #[test]
    fn test_system_instruction() {
        assert_eq!(
            system_instruction("SUJET: food"),
            "Tu es Nomadia. Contexte: SUJET: food. Affiche images comme ![alt](url) et cartes comme [MAP: lat, lng]."
        );
    }

    #[test]
    fn test_conversation_roles() {
        let history = vec![ChatTurn::user("Bonjour"), ChatTurn::model("Bienvenue !")];
        let contents = conversation(&history, "Et Douz ?");

        let roles: Vec<_> = contents.iter().map(|c| c.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "model", "user"]);
        assert_eq!(contents[2].parts[0].text, "Et Douz ?");
    }

    #[test]
    fn test_history_from_front_end_json() {
        let history: Vec<ChatTurn> = serde_json::from_str(
            r#"[{"role": "user", "text": "Salut"}, {"role": "model", "text": "Bonjour"}]"#,
        )
        .unwrap();
        assert_eq!(history[1], ChatTurn::model("Bonjour"));

        let history: Vec<ChatTurn> =
            serde_json::from_str(r#"[{"role": "assistant", "text": "Bonjour"}]"#).unwrap();
        assert_eq!(history[0].role, Role::Model);
    }

    #[test]
    fn test_compose_without_classifier() {
        let retriever = ContextRetriever::new(
            Arc::new(KnowledgeBase::default()),
            ClassifierState::unavailable("test"),
        );
        let request = compose(&retriever, &[], "couscous");

        assert!(request.system_instruction.contains("SUJET: food"));
        assert_eq!(request.contents.len(), 1);
        assert_eq!(request.contents[0].role, "user");
    }
}
