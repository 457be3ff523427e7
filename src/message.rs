use crate::error::ScanError;
use std::collections::HashMap;

/// Header fields of a bounce message, keyed by lower-cased name.
///
/// `Received` is the one field kept as an ordered list; every other field
/// holds the value of its first occurrence.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeaderBag {
    fields: HashMap<String, String>,
    received: Vec<String>,
}

impl HeaderBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a header value. Names are matched case-insensitively.
    pub fn insert(&mut self, name: &str, value: &str) {
        let key = name.trim().to_lowercase();
        if key == "received" {
            self.received.push(value.to_string());
        } else {
            self.fields
                .entry(key)
                .or_insert_with(|| value.to_string());
        }
    }

    pub fn with(mut self, name: &str, value: &str) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn received(&self) -> &[String] {
        &self.received
    }
}

/// A raw email split into its header fields and body.
#[derive(Debug, Clone)]
pub struct Message {
    pub headers: HeaderBag,
    pub body: String,
}

impl Message {
    /// Split a raw RFC 5322 message at the first blank line.
    ///
    /// Folded header lines are joined to the previous value with a single
    /// space.
    pub fn parse(raw: &str) -> Result<Self, ScanError> {
        let mut headers: Vec<(String, String)> = Vec::new();
        let mut body = String::new();
        let mut in_headers = true;

        for line in raw.lines() {
            if in_headers {
                if line.trim().is_empty() {
                    in_headers = false;
                    continue;
                }

                if line.starts_with(' ') || line.starts_with('\t') {
                    // Continuation of previous header
                    if let Some((_, value)) = headers.last_mut() {
                        value.push(' ');
                        value.push_str(line.trim());
                    }
                    continue;
                }

                if let Some((key, value)) = line.split_once(':') {
                    headers.push((key.trim().to_string(), value.trim().to_string()));
                }
            } else {
                body.push_str(line);
                body.push('\n');
            }
        }

        if headers.is_empty() {
            return Err(ScanError::InvalidInput("no header fields".to_string()));
        }
        if in_headers {
            return Err(ScanError::InvalidInput(
                "no blank line between header and body".to_string(),
            ));
        }

        let mut bag = HeaderBag::new();
        for (name, value) in &headers {
            bag.insert(name, value);
        }
        log::debug!(
            "Parsed message: {} header fields, {} Received, {} body bytes",
            headers.len(),
            bag.received().len(),
            body.len()
        );

        Ok(Message { headers: bag, body })
    }
}
