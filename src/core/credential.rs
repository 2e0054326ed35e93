//! Opaque wallet credential. Forwarded unmodified, never printed.

use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Credential(String);

impl Credential {
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }

    /// The raw value, for handing to the wallet container
    pub fn expose(&self) -> &str { &self.0 }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str("Credential(***)") }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self { Self::new(value) }
}

impl From<String> for Credential {
    fn from(value: String) -> Self { Self(value) }
}
