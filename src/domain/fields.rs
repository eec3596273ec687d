//! Typed field registry.
//!
//! Each entity shape publishes a static table mapping field names to an
//! accessor, an optional mutator and the mask applied to the value. Callers
//! that work with field names (sorting by column, editing a form field) go
//! through the table instead of indexing the entity dynamically.

use crate::domain::client::Client;
use crate::domain::format::{format_document, format_phone};
use crate::domain::types::ClientKind;

/// Mask applied to a field's value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldFormat {
    Text,
    Phone,
    /// Formatted according to the kind of the owning record.
    Document,
    /// One of a fixed set of options.
    Choice,
}

impl FieldFormat {
    /// Applies the mask; `kind` is only consulted for documents.
    pub fn apply(self, value: &str, kind: ClientKind) -> String {
        match self {
            FieldFormat::Phone => format_phone(value),
            FieldFormat::Document => format_document(value, kind),
            FieldFormat::Text | FieldFormat::Choice => value.to_string(),
        }
    }

    /// Whether the value is compared by its digits only.
    pub const fn is_masked(self) -> bool {
        matches!(self, FieldFormat::Phone | FieldFormat::Document)
    }
}

/// Registry entry describing one field of `T`.
pub struct FieldSpec<T> {
    pub name: &'static str,
    pub format: FieldFormat,
    pub get: fn(&T) -> String,
    pub set: Option<fn(&mut T, &str)>,
}

impl<T> FieldSpec<T> {
    pub fn value(&self, item: &T) -> String {
        (self.get)(item)
    }

    /// Writes `value` through the mutator; read-only fields report `false`.
    pub fn assign(&self, item: &mut T, value: &str) -> bool {
        match self.set {
            Some(set) => {
                set(item, value);
                true
            }
            None => false,
        }
    }
}

/// Entity shapes that publish a field registry.
pub trait FieldSet: Sized + 'static {
    fn fields() -> &'static [FieldSpec<Self>];

    fn field(name: &str) -> Option<&'static FieldSpec<Self>> {
        Self::fields().iter().find(|spec| spec.name == name)
    }
}

fn client_id(c: &Client) -> String {
    c.id.to_string()
}

fn client_name(c: &Client) -> String {
    c.name.to_string()
}

fn client_phone(c: &Client) -> String {
    c.phone.as_str().to_string()
}

fn client_kind(c: &Client) -> String {
    c.kind().to_string()
}

fn client_document(c: &Client) -> String {
    c.document.as_str().to_string()
}

static CLIENT_FIELDS: [FieldSpec<Client>; 5] = [
    FieldSpec {
        name: "id",
        format: FieldFormat::Text,
        get: client_id,
        set: None,
    },
    FieldSpec {
        name: "name",
        format: FieldFormat::Text,
        get: client_name,
        set: None,
    },
    FieldSpec {
        name: "phone",
        format: FieldFormat::Phone,
        get: client_phone,
        set: None,
    },
    FieldSpec {
        name: "type",
        format: FieldFormat::Choice,
        get: client_kind,
        set: None,
    },
    FieldSpec {
        name: "document",
        format: FieldFormat::Document,
        get: client_document,
        set: None,
    },
];

/// Stored clients are read-only through the registry.
impl FieldSet for Client {
    fn fields() -> &'static [FieldSpec<Self>] {
        &CLIENT_FIELDS
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::types::{ClientId, ClientName, Document, PhoneNumber};

    fn client() -> Client {
        Client::new(
            ClientId::new("c1").unwrap(),
            ClientName::new("Oficina do Tonhão").unwrap(),
            PhoneNumber::new("1133334444").unwrap(),
            Document::new(ClientKind::PJ, "11222333000181").unwrap(),
            Utc::now().naive_utc(),
        )
    }

    #[test]
    fn client_fields_resolve_by_name() {
        let client = client();
        assert_eq!(Client::field("name").unwrap().value(&client), "Oficina do Tonhão");
        assert_eq!(Client::field("phone").unwrap().value(&client), "1133334444");
        assert_eq!(Client::field("type").unwrap().value(&client), "PJ");
        assert!(Client::field("email").is_none());
    }

    #[test]
    fn client_fields_are_read_only() {
        let mut client = client();
        let spec = Client::field("name").unwrap();
        assert!(!spec.assign(&mut client, "Other"));
        assert_eq!(client.name.as_str(), "Oficina do Tonhão");
    }

    #[test]
    fn formats_apply_masks() {
        let phone = Client::field("phone").unwrap();
        assert_eq!(
            phone.format.apply("1133334444", ClientKind::PF),
            "(11) 3333-4444"
        );
        assert!(phone.format.is_masked());
        assert!(!FieldFormat::Text.is_masked());
        assert_eq!(
            FieldFormat::Document.apply("11222333000181", ClientKind::PJ),
            "11.222.333/0001-81"
        );
    }
}
