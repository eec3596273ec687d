//! Wire types exchanged over the JSON API.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::client::Client;
use crate::domain::query::{KindFilter, PageSize, QueryDescriptor, SortDescriptor, SortDirection};
use crate::domain::types::{
    ClientId, ClientKind, ClientName, Document, PhoneNumber, TypeConstraintError,
};
use crate::forms::FieldErrors;

/// Client as sent to callers. Phone and document travel as raw digits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDto {
    pub id: String,
    pub name: String,
    pub phone: String,
    #[serde(rename = "type")]
    pub kind: ClientKind,
    pub document: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<&Client> for ClientDto {
    fn from(client: &Client) -> Self {
        Self {
            id: client.id.to_string(),
            name: client.name.to_string(),
            phone: client.phone.as_str().to_string(),
            kind: client.kind(),
            document: client.document.as_str().to_string(),
            created_at: client.created_at,
            updated_at: client.updated_at,
        }
    }
}

impl From<Client> for ClientDto {
    fn from(client: Client) -> Self {
        Self::from(&client)
    }
}

impl TryFrom<ClientDto> for Client {
    type Error = TypeConstraintError;

    fn try_from(dto: ClientDto) -> Result<Self, Self::Error> {
        let mut client = Client::new(
            ClientId::new(dto.id)?,
            ClientName::new(dto.name)?,
            PhoneNumber::new(dto.phone)?,
            Document::new(dto.kind, dto.document)?,
            dto.created_at,
        );
        client.updated_at = dto.updated_at;
        Ok(client)
    }
}

/// Query string of `GET /api/clients`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
}

impl TryFrom<ClientsQuery> for QueryDescriptor {
    type Error = TypeConstraintError;

    /// Missing parameters take their defaults; `order` without `sort` is ignored.
    fn try_from(query: ClientsQuery) -> Result<Self, Self::Error> {
        let mut descriptor = QueryDescriptor::new().page(query.page.unwrap_or(1));
        if let Some(limit) = query.limit {
            descriptor = descriptor.limit(PageSize::new(limit)?);
        }
        if let Some(search) = query.search {
            descriptor = descriptor.search(search);
        }
        if let Some(kind) = query.kind {
            descriptor = descriptor.kind(kind.parse::<KindFilter>()?);
        }
        if let Some(field) = query.sort.filter(|f| !f.trim().is_empty()) {
            let direction = match query.order {
                Some(order) => order.parse::<SortDirection>()?,
                None => SortDirection::Asc,
            };
            descriptor = descriptor.sort(Some(SortDescriptor {
                field: field.trim().to_string(),
                direction,
            }));
        }
        Ok(descriptor)
    }
}

impl From<&QueryDescriptor> for ClientsQuery {
    fn from(query: &QueryDescriptor) -> Self {
        Self {
            page: Some(query.page),
            limit: Some(query.limit.get()),
            search: query.search.clone(),
            kind: match query.kind {
                KindFilter::All => None,
                KindFilter::Only(kind) => Some(kind.to_string()),
            },
            sort: query.sort.as_ref().map(|s| s.field.clone()),
            order: query.sort.as_ref().map(|s| s.direction.as_str().to_string()),
        }
    }
}

/// Error body returned by every failing endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl ErrorPayload {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: None,
        }
    }

    pub fn with_errors(message: impl Into<String>, errors: FieldErrors) -> Self {
        Self {
            message: message.into(),
            errors: Some(errors),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Profile of the signed-in user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn client_dto_uses_wire_names() {
        let client = Client::new(
            ClientId::new("c-1").unwrap(),
            ClientName::new("Oficina Central").unwrap(),
            PhoneNumber::new("(11) 3333-4444").unwrap(),
            Document::new(ClientKind::PJ, "11222333000181").unwrap(),
            Utc::now().naive_utc(),
        );
        let json = serde_json::to_value(ClientDto::from(&client)).unwrap();
        assert_eq!(json["type"], "PJ");
        assert_eq!(json["phone"], "1133334444");
        assert!(json.get("createdAt").is_some());

        let back: ClientDto = serde_json::from_value(json).unwrap();
        assert_eq!(Client::try_from(back).unwrap(), client);
    }

    #[test]
    fn query_defaults_and_sort() {
        let descriptor = QueryDescriptor::try_from(ClientsQuery::default()).unwrap();
        assert_eq!(descriptor, QueryDescriptor::new());

        let descriptor = QueryDescriptor::try_from(ClientsQuery {
            page: Some(2),
            limit: Some(25),
            search: Some("  ".to_string()),
            kind: Some("pj".to_string()),
            sort: Some("name".to_string()),
            order: Some("desc".to_string()),
        })
        .unwrap();
        assert_eq!(descriptor.page, 2);
        assert_eq!(descriptor.limit.get(), 25);
        assert_eq!(descriptor.search, None);
        assert_eq!(descriptor.kind, KindFilter::Only(ClientKind::PJ));
        assert_eq!(descriptor.sort, Some(SortDescriptor::desc("name")));

        let back = ClientsQuery::from(&descriptor);
        assert_eq!(back.kind.as_deref(), Some("PJ"));
        assert_eq!(back.order.as_deref(), Some("desc"));
    }

    #[test]
    fn query_rejects_unknown_values() {
        let bad_limit = ClientsQuery {
            limit: Some(7),
            ..ClientsQuery::default()
        };
        assert!(QueryDescriptor::try_from(bad_limit).is_err());

        let bad_kind = ClientsQuery {
            kind: Some("XX".to_string()),
            ..ClientsQuery::default()
        };
        assert!(QueryDescriptor::try_from(bad_kind).is_err());
    }

    #[test]
    fn error_payload_omits_missing_errors() {
        let json = serde_json::to_string(&ErrorPayload::new("Não encontrado")).unwrap();
        assert_eq!(json, r#"{"message":"Não encontrado"}"#);
    }
}
