//! `application/x-www-form-urlencoded` bodies. The print edit form repeats
//! `source_link_url[]` and `source_link_title[]`, so every pair is kept in
//! submission order.

use crate::error::{PrintedError, Result};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct FormData {
    pairs: Vec<(String, String)>,
}

impl FormData {
    pub fn parse(body: &str) -> Result<Self> {
        let mut pairs = Vec::new();
        for part in body.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = part.split_once('=').unwrap_or((part, ""));
            pairs.push((decode(key)?, decode(value)?));
        }
        Ok(Self { pairs })
    }

    pub fn first(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// A number field. Missing or blank means `default`.
    pub fn number(&self, key: &str, default: f64) -> Result<f64> {
        match self.first(key).map(str::trim) {
            None | Some("") => Ok(default),
            Some(text) => text.parse().map_err(|_| {
                PrintedError::InvalidInput(format!("'{}' is not a number for {}", text, key))
            }),
        }
    }
}

fn decode(text: &str) -> Result<String> {
    urlencoding::decode(&text.replace('+', " "))
        .map(|decoded| decoded.into_owned())
        .map_err(|e| PrintedError::InvalidInput(format!("Malformed form field: {}", e)))
}
