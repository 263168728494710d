// Node identity and definition payload
use std::fmt::{Display, Formatter};

use rand::Rng;
use serde::Serialize;

const NAME_PREFIX: &str = "hackday-";
const NAME_SUFFIX: &str = ".hq.local";
const HOST_RANDOM_LEN: usize = 6;
const ASCII_LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Fully qualified name of the machine a trigger provisions. Generated
/// fresh per button press, never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeName(String);

impl NodeName {
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let host: String = (0..HOST_RANDOM_LEN)
            .map(|_| ASCII_LETTERS[rng.random_range(0..ASCII_LETTERS.len())] as char)
            .collect();
        Self(format!("{}{}{}", NAME_PREFIX, host, NAME_SUFFIX))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for NodeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request body for `PUT /v1/node/{name}/definition`.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NodeDefinition {
    pub machine_role: String,
    pub environment: String,
}

impl NodeDefinition {
    pub fn new(machine_role: String, environment: String) -> Self {
        Self {
            machine_role,
            environment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_name_shape() {
        let name = NodeName::generate();
        let name = name.as_str();

        let host = name
            .strip_prefix("hackday-")
            .and_then(|rest| rest.strip_suffix(".hq.local"))
            .unwrap_or_else(|| panic!("unexpected name shape: {}", name));
        assert_eq!(host.len(), 6);
        assert!(host.chars().all(|c| c.is_ascii_alphabetic()));
    }

    #[test]
    fn test_generated_names_differ() {
        assert_ne!(NodeName::generate(), NodeName::generate());
    }

    #[test]
    fn test_definition_serializes_to_wire_body() {
        let definition =
            NodeDefinition::new("infra_bare".to_string(), "production".to_string());
        let body = serde_json::to_value(&definition).unwrap();

        assert_eq!(
            body,
            serde_json::json!({"machine_role": "infra_bare", "environment": "production"})
        );
    }
}
