//! Model registry: symbolic model identifiers and their wire ids.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::client::endpoint::EndPoint;

/// Models known to the client. `Custom` carries any other wire id verbatim.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Model {
    Gpt4,
    Gpt4_32k,
    Gpt35Turbo,
    TextDavinci003,
    Custom(String),
}

impl Model {
    /// Wire id sent in the `model` field of a request.
    pub fn id(&self) -> &str {
        match self {
            Model::Gpt4 => "gpt-4",
            Model::Gpt4_32k => "gpt-4-32k",
            Model::Gpt35Turbo => "gpt-3.5-turbo",
            Model::TextDavinci003 => "text-davinci-003",
            Model::Custom(id) => id,
        }
    }

    pub fn custom(id: impl Into<String>) -> Self {
        Model::Custom(id.into())
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Unknown ids parse into `Model::Custom`, so parsing never fails.
impl FromStr for Model {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "gpt-4" => Model::Gpt4,
            "gpt-4-32k" => Model::Gpt4_32k,
            "gpt-3.5-turbo" => Model::Gpt35Turbo,
            "text-davinci-003" => Model::TextDavinci003,
            other => Model::Custom(other.to_string()),
        })
    }
}

/// Pick the configured model, falling back to the endpoint default.
pub fn resolve<'a>(configured: Option<&'a Model>, endpoint: EndPoint) -> &'a Model {
    configured.unwrap_or_else(|| endpoint.default_model())
}
