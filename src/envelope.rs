//! Decoded response bodies.

use std::ops::Deref;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

/// A decoded JSON response body.
///
/// The payload is passed through untouched; the only structure the client
/// looks at is the `paging.next` cursor on paginated resources.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Envelope(Value);

impl Envelope {
    /// Wrap an already decoded value.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the decoded value.
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Take the decoded value.
    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }

    /// The `paging.next` URL, if the envelope points at another page.
    ///
    /// Anything other than a mapping holding a `paging` mapping holding a
    /// string `next` means the sequence is over.
    pub fn next_page_url(&self) -> Option<&str> {
        self.0
            .as_object()?
            .get("paging")?
            .as_object()?
            .get("next")?
            .as_str()
            .filter(|next| !next.is_empty())
    }

    /// Read the number at a JSON pointer (e.g. `/data/0/rate`) as an exact
    /// decimal.
    ///
    /// Returns `None` when the pointer does not resolve to a number, or the
    /// number does not fit a [`Decimal`].
    pub fn decimal(&self, pointer: &str) -> Option<Decimal> {
        let number = self.0.pointer(pointer)?.as_number()?;
        let text = number.to_string();
        Decimal::from_str_exact(&text)
            .or_else(|_| Decimal::from_scientific(&text))
            .ok()
    }
}

impl Deref for Envelope {
    type Target = Value;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Value> for Envelope {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<Envelope> for Value {
    fn from(envelope: Envelope) -> Self {
        envelope.0
    }
}

impl FromStr for Envelope {
    type Err = serde_json::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map(Self)
    }
}
