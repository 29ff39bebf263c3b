//! API routes and the models each one accepts.

use crate::registry::Model;

static COMPLETION_MODELS: [Model; 1] = [Model::TextDavinci003];
static CHAT_MODELS: [Model; 3] = [Model::Gpt35Turbo, Model::Gpt4, Model::Gpt4_32k];

/// An API route with its compatible-model list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndPoint {
    /// `POST completions` with a `prompt` body.
    Completions,
    /// `POST chat/completions` with a `messages` body.
    Chat,
}

impl EndPoint {
    /// Path segment appended to the base URL.
    pub fn path(&self) -> &'static str {
        match self {
            EndPoint::Completions => "completions",
            EndPoint::Chat => "chat/completions",
        }
    }

    /// Compatible models, in preference order.
    pub fn models(&self) -> &'static [Model] {
        match self {
            EndPoint::Completions => &COMPLETION_MODELS,
            EndPoint::Chat => &CHAT_MODELS,
        }
    }

    /// The first compatible model; used when no model is configured.
    pub fn default_model(&self) -> &'static Model {
        &self.models()[0]
    }

    pub fn supports(&self, model: &Model) -> bool {
        matches!(model, Model::Custom(_)) || self.models().contains(model)
    }
}
