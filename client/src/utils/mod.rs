//! Serde helpers for the loosely typed JSON the remote API returns.
//!
//! Identifiers arrive as numbers from some endpoints and strings from others,
//! and coordinates are sometimes serialized as decimal strings. These helpers
//! normalize both at the deserialization boundary.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

/// Deserializes a JSON string or number into its string form.
pub mod serde_id {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match TextOrNumber::deserialize(deserializer)? {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        })
    }

    /// Numeric ids sent either as a JSON integer or as a decimal string.
    pub mod integer {
        use super::*;
        use serde::de::Error as _;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<i64, D::Error>
        where
            D: Deserializer<'de>,
        {
            match TextOrNumber::deserialize(deserializer)? {
                TextOrNumber::Number(number) => number
                    .as_i64()
                    .ok_or_else(|| D::Error::custom(format!("id is not an integer: {number}"))),
                TextOrNumber::Text(text) => text
                    .trim()
                    .parse::<i64>()
                    .map_err(|err| D::Error::custom(format!("invalid id {text:?}: {err}"))),
            }
        }
    }

    /// Variant for optional fields; use together with `#[serde(default)]`.
    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            Ok(
                match Option::<TextOrNumber>::deserialize(deserializer)? {
                    Some(TextOrNumber::Text(text)) => Some(text),
                    Some(TextOrNumber::Number(number)) => Some(number.to_string()),
                    None => None,
                },
            )
        }
    }
}

/// Deserializes a coordinate given either as a JSON number or a decimal string.
pub mod serde_coord {
    use super::*;
    use serde::de::Error as _;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match TextOrNumber::deserialize(deserializer)? {
            TextOrNumber::Number(number) => number
                .as_f64()
                .ok_or_else(|| D::Error::custom(format!("coordinate out of range: {number}"))),
            TextOrNumber::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|err| D::Error::custom(format!("invalid coordinate {text:?}: {err}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Loose {
        #[serde(with = "super::serde_id")]
        id: String,
        #[serde(deserialize_with = "super::serde_coord::deserialize")]
        lat: f64,
        #[serde(default, deserialize_with = "super::serde_id::option::deserialize")]
        owner: Option<String>,
    }

    #[test]
    fn accepts_numbers_and_strings() {
        let a: Loose = serde_json::from_str(r#"{"id": 42, "lat": "51.5072", "owner": 7}"#).unwrap();
        assert_eq!(a.id, "42");
        assert!((a.lat - 51.5072).abs() < f64::EPSILON);
        assert_eq!(a.owner.as_deref(), Some("7"));

        let b: Loose = serde_json::from_str(r#"{"id": "abc", "lat": -0.1276}"#).unwrap();
        assert_eq!(b.id, "abc");
        assert_eq!(b.owner, None);
    }

    #[derive(Deserialize)]
    struct Numbered {
        #[serde(deserialize_with = "super::serde_id::integer::deserialize")]
        id: i64,
    }

    #[test]
    fn integer_ids_accept_numeric_strings() {
        let from_number: Numbered = serde_json::from_str(r#"{"id": 12}"#).unwrap();
        let from_text: Numbered = serde_json::from_str(r#"{"id": " 12"}"#).unwrap();
        assert_eq!(from_number.id, 12);
        assert_eq!(from_text.id, 12);

        assert!(serde_json::from_str::<Numbered>(r#"{"id": "twelve"}"#).is_err());
        assert!(serde_json::from_str::<Numbered>(r#"{"id": 1.5}"#).is_err());
    }

    #[test]
    fn rejects_garbage_coordinates() {
        assert!(serde_json::from_str::<Loose>(r#"{"id": 1, "lat": "north"}"#).is_err());
    }
}
