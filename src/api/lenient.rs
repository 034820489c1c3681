//! Field deserializers tolerating scalars sent either as JSON strings or numbers.
//!
//! The game server is inconsistent: a step may come as `"3"` or `3`, a
//! probability as `"0.93"` or `0.93`. These helpers are meant for
//! `#[serde(deserialize_with = "...")]`.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Scalar::Text(text) => text,
            Scalar::Number(number) => number.to_string(),
            Scalar::Bool(flag) => flag.to_string(),
        }
    }
}

/// Deserializes a string, accepting numbers.
pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Scalar::deserialize(deserializer)?.into_text())
}

/// Deserializes a number, accepting strings holding one.
pub fn number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let text = Scalar::deserialize(deserializer)?.into_text();
    text.trim()
        .parse()
        .map_err(|e| de::Error::custom(format!("invalid number {:?}: {}", text, e)))
}

/// Deserializes a probability, which must be a finite number between 0 and 1.
pub fn probability<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let probability: f64 = number(deserializer)?;
    if (0.0..=1.0).contains(&probability) {
        Ok(probability)
    } else {
        Err(de::Error::custom(format!(
            "probability {} is not between 0 and 1",
            probability
        )))
    }
}

/// Deserializes a flag sent as `0`/`1`, `"0"`/`"1"` or a boolean.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Scalar::deserialize(deserializer)?.into_text().trim() {
        "1" | "true" => Ok(true),
        "0" | "false" | "" => Ok(false),
        other => Err(de::Error::custom(format!("invalid flag {:?}", other))),
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    #[derive(Deserialize, Debug)]
    struct Sample {
        #[serde(deserialize_with = "super::number")]
        integer: u32,
        #[serde(deserialize_with = "super::number")]
        double: f64,
        #[serde(deserialize_with = "super::string")]
        text: String,
        #[serde(default, deserialize_with = "super::flag")]
        flag: bool,
    }

    #[test]
    fn test_accepts_strings() {
        let sample: Sample = serde_json::from_str(
            r#"{"integer": "1", "double": "0.5", "text": "string", "flag": "1"}"#,
        )
        .unwrap();
        assert_eq!(sample.integer, 1);
        assert_eq!(sample.double, 0.5);
        assert_eq!(sample.text, "string");
        assert!(sample.flag);
    }

    #[test]
    fn test_accepts_numbers() {
        let sample: Sample =
            serde_json::from_str(r#"{"integer": 2, "double": 1.5, "text": 1, "flag": 0}"#)
                .unwrap();
        assert_eq!(sample.integer, 2);
        assert_eq!(sample.double, 1.5);
        assert_eq!(sample.text, "1");
        assert!(!sample.flag);
    }

    #[test]
    fn test_integer_as_double() {
        let sample: Sample =
            serde_json::from_str(r#"{"integer": 0, "double": 2, "text": "", "flag": true}"#)
                .unwrap();
        assert_eq!(sample.double, 2.0);
        assert!(sample.flag);
    }

    #[test]
    fn test_missing_flag_defaults_to_false() {
        let sample: Sample =
            serde_json::from_str(r#"{"integer": 0, "double": 0, "text": ""}"#).unwrap();
        assert!(!sample.flag);
    }

    #[derive(Deserialize, Debug)]
    struct Proba {
        #[serde(deserialize_with = "super::probability")]
        proba: f64,
    }

    #[test]
    fn test_probability_bounds() {
        for body in [r#"{"proba": "0"}"#, r#"{"proba": 1}"#, r#"{"proba": "0.93"}"#] {
            assert!(serde_json::from_str::<Proba>(body).is_ok(), "{}", body);
        }
        for body in [
            r#"{"proba": "NaN"}"#,
            r#"{"proba": "inf"}"#,
            r#"{"proba": "-0.1"}"#,
            r#"{"proba": 1.5}"#,
        ] {
            assert!(serde_json::from_str::<Proba>(body).is_err(), "{}", body);
        }
    }

    #[test]
    fn test_rejects_non_numbers() {
        let result = serde_json::from_str::<Sample>(
            r#"{"integer": "not an integer", "double": 0, "text": ""}"#,
        );
        assert!(result.is_err());

        let result =
            serde_json::from_str::<Sample>(r#"{"integer": 0, "double": {}, "text": ""}"#);
        assert!(result.is_err());
    }
}
