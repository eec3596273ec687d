use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::client::{Client, NewClient, UpdateClient};
use crate::domain::document::digits;
use crate::domain::fields::{FieldFormat, FieldSet, FieldSpec};
use crate::domain::format::format_document;
use crate::domain::types::{
    ClientId, ClientKind, ClientName, Document, PhoneNumber, TypeConstraintError,
};
use crate::forms::{FieldErrors, REQUIRED};

/// Characters, mask included, of the shortest complete document.
const MIN_DOCUMENT_CHARS: usize = 11;

pub const NAME_TOO_SHORT: &str = "Nome deve ter no mínimo 3 caracteres";
pub const PHONE_INCOMPLETE: &str = "Telefone incompleto";
pub const PHONE_INVALID: &str = "Telefone inválido";
pub const DOCUMENT_INCOMPLETE: &str = "Documento incompleto";
pub const DOCUMENT_LENGTH_MISMATCH: &str =
    "O número de dígitos não corresponde ao tipo selecionado (CPF: 11, CNPJ: 14)";

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
/// Client data as typed by a user or posted to the API; values may be masked.
pub struct ClientForm {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_phone"))]
    pub phone: String,
    #[serde(rename = "type")]
    pub kind: ClientKind,
    pub document: String,
}

/// Form contents that passed every rule, ready for a create or update.
#[derive(Clone, Debug, PartialEq)]
pub struct ValidClient {
    pub name: ClientName,
    pub phone: PhoneNumber,
    pub document: Document,
}

impl From<ValidClient> for NewClient {
    fn from(valid: ValidClient) -> Self {
        NewClient::new(valid.name, valid.phone, valid.document)
    }
}

impl From<ValidClient> for UpdateClient {
    fn from(valid: ValidClient) -> Self {
        UpdateClient::new(valid.name, valid.phone, valid.document)
    }
}

fn constraint(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_name(value: &str) -> Result<(), ValidationError> {
    match ClientName::new(value) {
        Ok(_) => Ok(()),
        Err(TypeConstraintError::EmptyString) => Err(constraint("required", REQUIRED)),
        Err(_) => Err(constraint("length", NAME_TOO_SHORT)),
    }
}

fn validate_phone(value: &str) -> Result<(), ValidationError> {
    match PhoneNumber::new(value) {
        Ok(_) => Ok(()),
        Err(TypeConstraintError::EmptyString) => Err(constraint("required", REQUIRED)),
        Err(_) if digits(value).len() < 10 => Err(constraint("incomplete", PHONE_INCOMPLETE)),
        Err(_) => Err(constraint("phone", PHONE_INVALID)),
    }
}

/// Message for a document that does not fit `kind`, if any.
///
/// Checked outside the derive because it depends on two fields and the error
/// belongs to `document`, not to the form as a whole. Values shorter than a
/// complete CPF are reported as incomplete before the kind is considered.
pub fn document_error(value: &str, kind: ClientKind) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return Some(REQUIRED.to_string());
    }
    if value.chars().count() < MIN_DOCUMENT_CHARS {
        return Some(DOCUMENT_INCOMPLETE.to_string());
    }
    match Document::new(kind, value) {
        Ok(_) => None,
        Err(TypeConstraintError::DocumentLength { .. }) => {
            Some(DOCUMENT_LENGTH_MISMATCH.to_string())
        }
        Err(_) => Some(format!("{} não válido", kind.document_name())),
    }
}

impl ClientForm {
    /// Prefills the form from a stored client, masks applied.
    pub fn from_client(client: &Client) -> Self {
        Self {
            name: client.name.to_string(),
            phone: client.phone.formatted(),
            kind: client.kind(),
            document: client.document.formatted(),
        }
    }

    /// All field errors, first message per field.
    pub fn errors(&self) -> FieldErrors {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from(&e),
        };
        if let Some(message) = document_error(&self.document, self.kind) {
            errors.insert("document", message);
        }
        errors
    }

    /// Runs every rule and, when all pass, builds the typed values.
    pub fn check(&self) -> Result<ValidClient, FieldErrors> {
        let errors = self.errors();
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(ValidClient {
            name: ClientName::new(&self.name)
                .map_err(|e| FieldErrors::single("name", e.to_string()))?,
            phone: PhoneNumber::new(&self.phone)
                .map_err(|e| FieldErrors::single("phone", e.to_string()))?,
            document: Document::new(self.kind, &self.document)
                .map_err(|e| FieldErrors::single("document", e.to_string()))?,
        })
    }
}

fn form_name(f: &ClientForm) -> String {
    f.name.clone()
}

fn set_form_name(f: &mut ClientForm, value: &str) {
    f.name = value.to_string();
}

fn form_phone(f: &ClientForm) -> String {
    f.phone.clone()
}

fn set_form_phone(f: &mut ClientForm, value: &str) {
    f.phone = value.to_string();
}

fn form_kind(f: &ClientForm) -> String {
    f.kind.to_string()
}

/// Unknown codes leave the kind unchanged.
fn set_form_kind(f: &mut ClientForm, value: &str) {
    if let Ok(kind) = value.parse() {
        f.kind = kind;
    }
}

fn form_document(f: &ClientForm) -> String {
    f.document.clone()
}

fn set_form_document(f: &mut ClientForm, value: &str) {
    f.document = value.to_string();
}

static CLIENT_FORM_FIELDS: [FieldSpec<ClientForm>; 4] = [
    FieldSpec {
        name: "name",
        format: FieldFormat::Text,
        get: form_name,
        set: Some(set_form_name),
    },
    FieldSpec {
        name: "phone",
        format: FieldFormat::Phone,
        get: form_phone,
        set: Some(set_form_phone),
    },
    FieldSpec {
        name: "type",
        format: FieldFormat::Choice,
        get: form_kind,
        set: Some(set_form_kind),
    },
    FieldSpec {
        name: "document",
        format: FieldFormat::Document,
        get: form_document,
        set: Some(set_form_document),
    },
];

impl FieldSet for ClientForm {
    fn fields() -> &'static [FieldSpec<Self>] {
        &CLIENT_FORM_FIELDS
    }
}

/// Live state of a create or edit form.
///
/// Masks are applied as values are typed, errors are tracked per field and
/// the initial values are kept to answer whether anything changed.
#[derive(Clone, Debug)]
pub struct ClientDraft {
    id: Option<ClientId>,
    initial: ClientForm,
    form: ClientForm,
    errors: FieldErrors,
}

impl Default for ClientDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientDraft {
    /// Empty form for a new client, kind PF.
    pub fn new() -> Self {
        Self {
            id: None,
            initial: ClientForm::default(),
            form: ClientForm::default(),
            errors: FieldErrors::new(),
        }
    }

    pub fn edit(client: &Client) -> Self {
        let form = ClientForm::from_client(client);
        Self {
            id: Some(client.id.clone()),
            initial: form.clone(),
            form,
            errors: FieldErrors::new(),
        }
    }

    /// Id of the client being edited; `None` in create mode.
    pub fn id(&self) -> Option<&ClientId> {
        self.id.as_ref()
    }

    pub fn form(&self) -> &ClientForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Stores a typed value, masked for its field, and clears that field's error.
    ///
    /// Switching `type` re-masks the current document under the new kind.
    /// Returns `false` for unknown fields.
    pub fn set(&mut self, field: &str, value: &str) -> bool {
        let Some(spec) = ClientForm::field(field) else {
            return false;
        };
        let masked = spec.format.apply(value, self.form.kind);
        spec.assign(&mut self.form, &masked);
        if field == "type" {
            self.form.document = format_document(&self.form.document, self.form.kind);
        }
        self.errors.remove(field);
        true
    }

    /// Validates one field, recording or clearing only its error.
    pub fn blur(&mut self, field: &str) {
        match self.form.errors().get(field) {
            Some(message) => {
                self.errors.remove(field);
                self.errors.insert(field, message);
            }
            None => {
                self.errors.remove(field);
            }
        }
    }

    /// Whether any field differs from the initial values; masked fields are
    /// compared by their digits.
    pub fn is_dirty(&self) -> bool {
        ClientForm::fields().iter().any(|spec| {
            let (before, after) = (spec.value(&self.initial), spec.value(&self.form));
            if spec.format.is_masked() {
                digits(&before) != digits(&after)
            } else {
                before != after
            }
        })
    }

    /// Validates everything; on failure every field error is kept for display.
    pub fn submit(&mut self) -> Result<ValidClient, FieldErrors> {
        match self.form.check() {
            Ok(valid) => {
                self.errors = FieldErrors::new();
                Ok(valid)
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn form(name: &str, phone: &str, kind: ClientKind, document: &str) -> ClientForm {
        ClientForm {
            name: name.to_string(),
            phone: phone.to_string(),
            kind,
            document: document.to_string(),
        }
    }

    fn stored() -> Client {
        Client::new(
            ClientId::new("c-1").unwrap(),
            ClientName::new("Oficina Central").unwrap(),
            PhoneNumber::new("1133334444").unwrap(),
            Document::new(ClientKind::PJ, "11222333000181").unwrap(),
            Utc::now().naive_utc(),
        )
    }

    #[test]
    fn valid_masked_form_checks() {
        let valid = form("João Silva", "(11) 99999-9999", ClientKind::PF, "111.444.777-35")
            .check()
            .unwrap();
        assert_eq!(valid.phone.as_str(), "11999999999");
        assert_eq!(valid.document.as_str(), "11144477735");
    }

    #[test]
    fn reports_first_error_per_field() {
        let errors = form("", "", ClientKind::PF, "").check().unwrap_err();
        assert_eq!(errors.get("name"), Some(REQUIRED));
        assert_eq!(errors.get("phone"), Some(REQUIRED));
        assert_eq!(errors.get("document"), Some(REQUIRED));

        let errors = form("Jo", "(11) 9999", ClientKind::PF, "11144477735")
            .check()
            .unwrap_err();
        assert_eq!(errors.get("name"), Some(NAME_TOO_SHORT));
        assert_eq!(errors.get("phone"), Some(PHONE_INCOMPLETE));
        assert_eq!(errors.get("document"), None);
    }

    #[test]
    fn document_errors_belong_to_document() {
        let errors = form("Oficina", "1133334444", ClientKind::PJ, "11144477735")
            .check()
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get("document"), Some(DOCUMENT_LENGTH_MISMATCH));

        let errors = form("Ana Souza", "1133334444", ClientKind::PF, "111.444.777-36")
            .check()
            .unwrap_err();
        assert_eq!(errors.get("document"), Some("CPF não válido"));

        let errors = form("Oficina", "1133334444", ClientKind::PJ, "11.222.333/0001-80")
            .check()
            .unwrap_err();
        assert_eq!(errors.get("document"), Some("CNPJ não válido"));
    }

    #[test]
    fn partial_document_is_incomplete() {
        let errors = form("Ana Souza", "11999999999", ClientKind::PF, "123.4")
            .check()
            .unwrap_err();
        assert_eq!(errors.get("document"), Some(DOCUMENT_INCOMPLETE));

        let errors = form("Oficina", "1133334444", ClientKind::PJ, "11.222.333")
            .check()
            .unwrap_err();
        assert_eq!(errors.get("document"), Some(DOCUMENT_INCOMPLETE));

        // Complete CPF typed under PJ.
        assert_eq!(
            document_error("11144477735", ClientKind::PJ).as_deref(),
            Some(DOCUMENT_LENGTH_MISMATCH)
        );
        assert_eq!(document_error("111.444.777-35", ClientKind::PF), None);
    }

    #[test]
    fn deserializes_wire_names() {
        let form: ClientForm = serde_json::from_str(
            r#"{"name":"Oficina","phone":"1133334444","type":"PJ","document":"11222333000181"}"#,
        )
        .unwrap();
        assert_eq!(form.kind, ClientKind::PJ);
        assert!(form.check().is_ok());

        let form: ClientForm = serde_json::from_str(
            r#"{"name":"Oficina","phone":"1133334444","type":"pj","document":"11222333000181"}"#,
        )
        .unwrap();
        assert_eq!(form.kind, ClientKind::PJ);
    }

    #[test]
    fn draft_masks_while_typing() {
        let mut draft = ClientDraft::new();
        assert!(draft.id().is_none());
        assert!(draft.set("phone", "11999"));
        assert_eq!(draft.form().phone, "(11) 999");
        draft.set("document", "1114447773599");
        assert_eq!(draft.form().document, "111.444.777-35");
        assert!(!draft.set("email", "x"));
    }

    #[test]
    fn switching_kind_reformats_document() {
        let mut draft = ClientDraft::new();
        draft.set("type", "PJ");
        draft.set("document", "11222333000181");
        assert_eq!(draft.form().document, "11.222.333/0001-81");

        draft.set("type", "PF");
        assert_eq!(draft.form().kind, ClientKind::PF);
        assert_eq!(draft.form().document, "112.223.330-00");
    }

    #[test]
    fn blur_touches_only_its_field() {
        let mut draft = ClientDraft::new();
        draft.set("name", "Jo");
        draft.blur("name");
        assert_eq!(draft.errors().get("name"), Some(NAME_TOO_SHORT));
        assert_eq!(draft.errors().get("phone"), None);

        draft.set("name", "João");
        assert_eq!(draft.errors().get("name"), None);
        draft.blur("name");
        assert!(draft.errors().is_empty());
    }

    #[test]
    fn edit_mode_tracks_dirtiness_by_digits() {
        let client = stored();
        let mut draft = ClientDraft::edit(&client);
        assert_eq!(draft.id(), Some(&client.id));
        assert_eq!(draft.form().phone, "(11) 3333-4444");
        assert!(!draft.is_dirty());

        draft.set("phone", "1133334444");
        assert!(!draft.is_dirty());

        draft.set("name", "Oficina Central Ltda");
        assert!(draft.is_dirty());
    }

    #[test]
    fn submit_collects_all_errors() {
        let mut draft = ClientDraft::new();
        draft.set("name", "Ana Souza");
        let errors = draft.submit().unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(draft.errors(), &errors);

        draft.set("phone", "11999999999");
        draft.set("document", "52998224725");
        let valid = draft.submit().unwrap();
        assert_eq!(valid.name.as_str(), "Ana Souza");
        assert!(draft.errors().is_empty());
    }
}
