use std::collections::BTreeMap;
use std::fmt;
use serde::{Deserialize, Serialize};

/// Contents of ~/.krait.yaml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KraitConfig {
    #[serde(default)]
    pub openai: OpenAiSection,
    /// Keys krait does not know about, kept so `set` does not drop them
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// The `openai:` section
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpenAiSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

impl KraitConfig {
    /// Stored key, treating an empty string the same as an absent one
    pub fn openai_key(&self) -> Option<&str> {
        self.openai.key.as_deref().filter(|k| !k.is_empty())
    }

    pub fn set_openai_key(&mut self, key: &str) {
        self.openai.key = Some(key.to_string());
    }

    pub fn credential(&self) -> Credential {
        Credential::new(self.openai_key().unwrap_or_default())
    }
}

/// Access key for the text-generation service
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The raw secret, for the Authorization header only
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Credential(<empty>)")
        } else {
            f.write_str("Credential(<redacted>)")
        }
    }
}
