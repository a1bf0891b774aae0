//! Clients send ids and difficulty either as JSON numbers or as numeric
//! strings (`"5"`), so both are accepted wherever an integer is expected.

use serde::de::{self, Deserializer};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(i64),
    Text(String),
}

impl NumberOrString {
    fn into_i32<E: de::Error>(self) -> Result<i32, E> {
        match self {
            NumberOrString::Number(n) => i32::try_from(n).map_err(E::custom),
            NumberOrString::Text(s) => s.trim().parse::<i32>().map_err(E::custom),
        }
    }
}

pub fn i32_from_number_or_string<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer)?.into_i32()
}

pub fn optional_i32_from_number_or_string<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(NumberOrString::into_i32)
        .transpose()
}

#[cfg(test)]
mod lenient_tests {
    use super::*;

    #[derive(Deserialize, Debug)]
    struct Sample {
        #[serde(deserialize_with = "i32_from_number_or_string")]
        value: i32,
        #[serde(default, deserialize_with = "optional_i32_from_number_or_string")]
        extra: Option<i32>,
    }

    #[test]
    fn accepts_numbers_and_numeric_strings() {
        let a: Sample = serde_json::from_str(r#"{"value": 4}"#).unwrap();
        let b: Sample = serde_json::from_str(r#"{"value": "4", "extra": " 6 "}"#).unwrap();
        assert_eq!(a.value, 4);
        assert_eq!(a.extra, None);
        assert_eq!(b.value, 4);
        assert_eq!(b.extra, Some(6));
    }

    #[test]
    fn rejects_non_numeric_text() {
        assert!(serde_json::from_str::<Sample>(r#"{"value": "four"}"#).is_err());
        assert!(serde_json::from_str::<Sample>(r#"{"value": 3000000000}"#).is_err());
    }
}
