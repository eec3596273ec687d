//! Strongly-typed value objects used by domain entities.
//!
//! These wrappers enforce the registry invariants (opaque identifiers, minimum
//! name length, phone digit counts, document length and checksum) so that once
//! a value reaches the domain layer it can be treated as trusted.
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::document::{digits, is_valid_document};
use crate::domain::format::{format_document, format_phone};

/// Minimum number of characters accepted for a client name.
pub const MIN_NAME_LEN: usize = 3;

/// Accepted phone digit counts: landline (10) and mobile (11).
pub const PHONE_DIGITS: std::ops::RangeInclusive<usize> = 10..=11;

/// Errors produced when attempting to construct a constrained value object.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeConstraintError {
    /// Provided string contained no non-whitespace characters.
    #[error("value cannot be empty")]
    EmptyString,
    /// Provided name is shorter than [`MIN_NAME_LEN`].
    #[error("name must have at least 3 characters")]
    NameTooShort,
    /// Phone number did not have 10 or 11 digits.
    #[error("invalid phone number")]
    InvalidPhone,
    /// Document digit count does not match the client kind.
    #[error("{kind} document must have {expected} digits, got {actual}")]
    DocumentLength {
        kind: ClientKind,
        expected: usize,
        actual: usize,
    },
    /// Document failed the checksum for its kind.
    #[error("invalid {0} check digits")]
    DocumentChecksum(ClientKind),
    /// Unknown client kind code.
    #[error("unknown client kind: {0}")]
    UnknownKind(String),
    /// Provided value failed custom validation.
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Opaque store-assigned client identifier.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String", into = "String")]
pub struct ClientId(String);

impl ClientId {
    /// Wraps an existing identifier, rejecting blank values.
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        Ok(Self(value))
    }

    /// Generates a fresh random identifier for a newly stored client.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for ClientId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ClientId {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ClientId {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientId> for String {
    fn from(value: ClientId) -> Self {
        value.0
    }
}

/// Client display name: trimmed and at least [`MIN_NAME_LEN`] characters.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct ClientName(String);

impl ClientName {
    pub fn new<S: Into<String>>(value: S) -> Result<Self, TypeConstraintError> {
        let trimmed = value.into().trim().to_string();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if trimmed.chars().count() < MIN_NAME_LEN {
            return Err(TypeConstraintError::NameTooShort);
        }
        Ok(Self(trimmed))
    }

    /// Borrow the value as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Deref for ClientName {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ClientName {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for ClientName {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for ClientName {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ClientName> for String {
    fn from(value: ClientName) -> Self {
        value.0
    }
}

/// Phone number stored as its raw digits (area code included).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Strips punctuation and accepts 10 (landline) or 11 (mobile) digits.
    pub fn new<S: AsRef<str>>(value: S) -> Result<Self, TypeConstraintError> {
        let raw = digits(value.as_ref());
        if raw.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if !PHONE_DIGITS.contains(&raw.len()) {
            return Err(TypeConstraintError::InvalidPhone);
        }
        Ok(Self(raw))
    }

    /// Raw digits.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Masked display form, e.g. `(11) 99999-9999`.
    pub fn formatted(&self) -> String {
        format_phone(&self.0)
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for PhoneNumber {
    type Error = TypeConstraintError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

/// Kind of client: individual ("pessoa física") or business ("pessoa jurídica").
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String")]
pub enum ClientKind {
    /// Individual, identified by a CPF.
    #[default]
    PF,
    /// Business, identified by a CNPJ.
    PJ,
}

impl ClientKind {
    /// Number of digits a document of this kind carries.
    pub const fn document_len(self) -> usize {
        match self {
            ClientKind::PF => 11,
            ClientKind::PJ => 14,
        }
    }

    /// Short code used on the wire and in storage.
    pub const fn as_str(self) -> &'static str {
        match self {
            ClientKind::PF => "PF",
            ClientKind::PJ => "PJ",
        }
    }

    /// Name of the identifier carried by this kind.
    pub const fn document_name(self) -> &'static str {
        match self {
            ClientKind::PF => "CPF",
            ClientKind::PJ => "CNPJ",
        }
    }
}

impl Display for ClientKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientKind {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PF" => Ok(ClientKind::PF),
            "PJ" => Ok(ClientKind::PJ),
            other => Err(TypeConstraintError::UnknownKind(other.to_string())),
        }
    }
}

impl TryFrom<String> for ClientKind {
    type Error = TypeConstraintError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Tax identifier (CPF or CNPJ) stored as raw digits together with its kind.
///
/// Construction enforces both the digit count for the kind and the checksum,
/// so a `Document` can never disagree with the client kind it belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Document {
    kind: ClientKind,
    digits: String,
}

impl Document {
    pub fn new<S: AsRef<str>>(kind: ClientKind, value: S) -> Result<Self, TypeConstraintError> {
        let raw = digits(value.as_ref());
        if raw.is_empty() {
            return Err(TypeConstraintError::EmptyString);
        }
        if raw.len() != kind.document_len() {
            return Err(TypeConstraintError::DocumentLength {
                kind,
                expected: kind.document_len(),
                actual: raw.len(),
            });
        }
        if !is_valid_document(&raw, kind) {
            return Err(TypeConstraintError::DocumentChecksum(kind));
        }
        Ok(Self { kind, digits: raw })
    }

    pub const fn kind(&self) -> ClientKind {
        self.kind
    }

    /// Raw digits.
    pub fn as_str(&self) -> &str {
        &self.digits
    }

    /// Masked display form (`DDD.DDD.DDD-DD` or `DD.DDD.DDD/DDDD-DD`).
    pub fn formatted(&self) -> String {
        format_document(&self.digits, self.kind)
    }

    pub fn into_inner(self) -> String {
        self.digits
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.formatted())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_name_trims_and_enforces_length() {
        assert_eq!(ClientName::new("  Ana  ").unwrap().as_str(), "Ana");
        assert_eq!(ClientName::new("Jo"), Err(TypeConstraintError::NameTooShort));
        assert_eq!(ClientName::new("   "), Err(TypeConstraintError::EmptyString));
        // Counts characters, not bytes.
        assert!(ClientName::new("Zé Ó").is_ok());
    }

    #[test]
    fn phone_keeps_digits_only() {
        let phone = PhoneNumber::new("(11) 99999-9999").unwrap();
        assert_eq!(phone.as_str(), "11999999999");
        assert_eq!(phone.formatted(), "(11) 99999-9999");
        assert_eq!(
            PhoneNumber::new("1199"),
            Err(TypeConstraintError::InvalidPhone)
        );
        assert_eq!(
            PhoneNumber::new("-- --"),
            Err(TypeConstraintError::EmptyString)
        );
    }

    #[test]
    fn document_checks_length_before_checksum() {
        assert_eq!(
            Document::new(ClientKind::PJ, "111.444.777-35"),
            Err(TypeConstraintError::DocumentLength {
                kind: ClientKind::PJ,
                expected: 14,
                actual: 11,
            })
        );
        assert_eq!(
            Document::new(ClientKind::PF, "111.444.777-36"),
            Err(TypeConstraintError::DocumentChecksum(ClientKind::PF))
        );

        let cpf = Document::new(ClientKind::PF, "111.444.777-35").unwrap();
        assert_eq!(cpf.as_str(), "11144477735");
        assert_eq!(cpf.to_string(), "111.444.777-35");

        let cnpj = Document::new(ClientKind::PJ, "11222333000181").unwrap();
        assert_eq!(cnpj.kind(), ClientKind::PJ);
        assert_eq!(cnpj.formatted(), "11.222.333/0001-81");
    }

    #[test]
    fn client_kind_parses_codes() {
        assert_eq!("pf".parse::<ClientKind>(), Ok(ClientKind::PF));
        assert_eq!(" PJ ".parse::<ClientKind>(), Ok(ClientKind::PJ));
        assert!("XX".parse::<ClientKind>().is_err());
        assert_eq!(ClientKind::PJ.document_len(), 14);
    }

    #[test]
    fn client_kind_deserializes_like_it_parses() {
        let kind: ClientKind = serde_json::from_str(r#""pj""#).unwrap();
        assert_eq!(kind, ClientKind::PJ);
        assert_eq!(serde_json::to_string(&ClientKind::PF).unwrap(), r#""PF""#);
        assert!(serde_json::from_str::<ClientKind>(r#""XX""#).is_err());
    }

    #[test]
    fn client_id_rejects_blank() {
        assert!(ClientId::new(" ").is_err());
        assert_ne!(ClientId::generate(), ClientId::generate());
    }
}
