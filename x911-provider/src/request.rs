//! Request assembly and argument validation.

use serde::Serialize;
use serde_json::Value;

use crate::error::{Result, X911Error};
use crate::types::{Action, Address911, Arguments};

/// One fully validated call: the action id plus its exact argument set.
///
/// Built fresh for every operation and never mutated afterwards. Only the
/// client's builders and [`X911Request::from_values`] construct one, so it is
/// serializable but not deserializable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct X911Request {
    action: Action,
    arguments: Arguments,
}

impl X911Request {
    /// Build a request from text values known at compile time to be strings.
    fn from_pairs<'a>(action: Action, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let arguments: Arguments = pairs
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        debug_assert_eq!(arguments.len(), action.required_params().len());
        Self { action, arguments }
    }

    pub(crate) fn audit_911() -> Self {
        Self::from_pairs(Action::Audit911, std::iter::empty())
    }

    pub(crate) fn did_only(action: Action, did: &str) -> Self {
        Self::from_pairs(action, [("did", did)])
    }

    pub(crate) fn query_911_alert(tn: &str) -> Self {
        Self::from_pairs(Action::Query911Alert, [("tn", tn)])
    }

    pub(crate) fn add_911_alert(tn: &str, email: &str) -> Self {
        Self::from_pairs(Action::Add911Alert, [("tn", tn), ("email", email)])
    }

    pub(crate) fn provision_location(did: &str, location_id: &str) -> Self {
        Self::from_pairs(
            Action::ProvisionLocation,
            [("did", did), ("location_id", location_id)],
        )
    }

    pub(crate) fn remove_location(location_id: &str, did: &str) -> Self {
        Self::from_pairs(
            Action::RemoveLocation,
            [("location_id", location_id), ("did", did)],
        )
    }

    pub(crate) fn validate_911(address: &Address911) -> Self {
        Self::from_pairs(Action::Validate911, address.fields())
    }

    /// `add_location`, `update911` and `insert911` share the DID + address shape.
    pub(crate) fn did_with_address(action: Action, did: &str, address: &Address911) -> Self {
        Self::from_pairs(
            action,
            std::iter::once(("did", did)).chain(address.fields()),
        )
    }

    /// Validate loosely typed input (e.g. decoded JSON) into a request.
    ///
    /// Every required key must be present and hold a JSON string; keys the
    /// action does not declare are rejected. Nothing reaches the executor on
    /// failure.
    pub fn from_values(action: Action, values: &serde_json::Map<String, Value>) -> Result<Self> {
        if !action.is_implemented() {
            return Err(X911Error::NotImplemented {
                action: action.to_string(),
            });
        }

        let required = action.required_params();

        if let Some(extra) = values.keys().find(|k| !required.contains(&k.as_str())) {
            return Err(invalid_argument(action, extra, "unexpected parameter"));
        }

        let mut arguments = Arguments::new();
        for &param in required {
            match values.get(param) {
                None => return Err(invalid_argument(action, param, "missing")),
                Some(Value::String(text)) => {
                    arguments.insert(param.to_string(), text.clone());
                }
                Some(other) => {
                    return Err(invalid_argument(
                        action,
                        param,
                        &format!("expected text, got {}", json_type_name(other)),
                    ));
                }
            }
        }

        Ok(Self { action, arguments })
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn arguments(&self) -> &Arguments {
        &self.arguments
    }

    pub fn into_parts(self) -> (Action, Arguments) {
        (self.action, self.arguments)
    }
}

fn invalid_argument(action: Action, param: &str, detail: &str) -> X911Error {
    X911Error::InvalidArgument {
        action: action.to_string(),
        param: param.to_string(),
        detail: detail.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "text",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
