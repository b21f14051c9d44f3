//! Three-state wrapper for API fields that may be absent, `null`, or set.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A response field that distinguishes "not sent" from "sent as `null`".
///
/// Use with `#[serde(default)]` so that an absent field deserializes to
/// [`Nullable::Unspecified`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Nullable<T> {
    /// The field was not present in the payload.
    #[default]
    Unspecified,
    /// The field was present with a `null` value.
    Null,
    /// The field carried a value.
    Value(T),
}

impl<T> Nullable<T> {
    /// Returns the value, if any.
    #[must_use]
    pub const fn as_option(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            Self::Unspecified | Self::Null => None,
        }
    }

    /// Returns true if the field was sent as `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns true if the field was not sent.
    #[must_use]
    pub const fn is_unspecified(&self) -> bool {
        matches!(self, Self::Unspecified)
    }
}

impl<T: Default + Clone> Nullable<T> {
    /// Returns the value, or `T::default()` when unspecified or `null`.
    #[must_use]
    pub fn value_or_default(&self) -> T {
        self.as_option().cloned().unwrap_or_default()
    }
}

impl<T> From<Option<T>> for Nullable<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Value)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Nullable<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

impl<T: Serialize> Serialize for Nullable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Value(v) => serializer.serialize_some(v),
            Self::Unspecified | Self::Null => serializer.serialize_none(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default)]
        description: Nullable<String>,
    }

    fn parse(json: &str) -> Nullable<String> {
        serde_json::from_str::<Payload>(json)
            .map(|p| p.description)
            .unwrap_or_default()
    }

    #[test]
    fn test_three_states() {
        assert_eq!(parse("{}"), Nullable::Unspecified);
        assert_eq!(parse(r#"{"description": null}"#), Nullable::Null);
        assert_eq!(
            parse(r#"{"description": "hi"}"#),
            Nullable::Value(String::from("hi"))
        );
    }

    #[test]
    fn test_unspecified_and_null_normalize_to_empty() {
        assert_eq!(parse("{}").value_or_default(), "");
        assert_eq!(parse(r#"{"description": null}"#).value_or_default(), "");
        assert_eq!(parse(r#"{"description": ""}"#).value_or_default(), "");
        assert!(parse(r#"{"description": null}"#).is_null());
        assert!(parse("{}").is_unspecified());
    }
}
