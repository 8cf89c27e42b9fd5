//! JSON body encoding and decoding.
//!
//! Request bodies are structs of `Option` fields marked
//! `skip_serializing_if = "Option::is_none"`, so unset fields vanish from the
//! output while `0`, `false` and `""` are still sent. `serde_json` writes
//! fields in declaration order with no whitespace.
//!
//! Decoding goes through `Option<T>`: a `null` (or empty) body yields `None`
//! instead of an error, and unknown fields are ignored by default.

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

/// Timestamps keep the offset they were sent with.
pub type Timestamp = DateTime<FixedOffset>;

pub fn encode_body<B>(body: &B) -> Result<String>
where
    B: Serialize + ?Sized,
{
    serde_json::to_string(body).map_err(Error::Encode)
}

pub fn decode_body<T>(body: &[u8]) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<Option<T>>(body).map_err(|source| Error::Decode {
        source,
        body: body.to_vec(),
    })
}

/// RFC 3339 timestamps, written with `Z` for a zero offset.
///
/// Use with `#[serde(with = "rfc3339")]`, or `rfc3339::option` together with
/// `default` and `skip_serializing_if` for optional fields.
pub mod rfc3339 {
    use chrono::{DateTime, SecondsFormat};
    use serde::{de, Deserialize, Deserializer, Serializer};

    use super::Timestamp;

    pub fn format(value: &Timestamp) -> String {
        value.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    pub fn parse(raw: &str) -> Result<Timestamp, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
    }

    pub fn serialize<S: Serializer>(value: &Timestamp, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Timestamp, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(de::Error::custom)
    }

    pub mod option {
        use serde::{de, Deserialize, Deserializer, Serializer};

        use super::super::Timestamp;

        pub fn serialize<S: Serializer>(
            value: &Option<Timestamp>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => serializer.serialize_str(&super::format(value)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<Timestamp>, D::Error> {
            Option::<String>::deserialize(deserializer)?
                .map(|raw| super::parse(&raw).map_err(de::Error::custom))
                .transpose()
        }
    }
}
