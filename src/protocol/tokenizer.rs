//! Message tokenizer.
//!
//! Splits a message on [`DELIMITER`](super::DELIMITER) into owned fields.
//! Delimiter runs collapse, so no field is ever empty:
//!
//! ```text
//!  "I2C/WRITE/12/0"  →  ["I2C", "WRITE", "12", "0"]
//!  "A//B"            →  ["A", "B"]
//!  "A/B/"            →  ["A", "B"]
//!  ""                →  []
//! ```

use super::DELIMITER;

/// Ordered fields of one message. Owned for the duration of one dispatch.
pub type Tokens = Vec<String>;

/// Split `message` into its non-empty fields, preserving order.
pub fn tokenize(message: &str) -> Tokens {
    message
        .split(DELIMITER)
        .filter(|field| !field.is_empty())
        .map(String::from)
        .collect()
}
