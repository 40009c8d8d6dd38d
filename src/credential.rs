use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

pub const API_VERSION: &str = "client.authentication.k8s.io/v1beta1";
pub const KIND: &str = "ExecCredential";

/// Key under which the document kind is written.
///
/// Consumers of this adapter have always received the kind under a literal `ExecCredential` key,
/// so that stays the default. `Kind` writes the `kind` key client-go documents.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum KindField {
    #[default]
    ExecCredential,
    Kind,
}

impl KindField {
    fn key(&self) -> &'static str {
        match self {
            KindField::ExecCredential => KIND,
            KindField::Kind => "kind",
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CredentialStatus {
    pub token: String,
}

/// Credential handed to the exec authentication plugin caller.
#[derive(Clone, Debug, PartialEq)]
pub struct CredentialDocument {
    kind_field: KindField,
    status: CredentialStatus,
}

impl CredentialDocument {
    pub fn new(token: String) -> Self {
        Self {
            kind_field: KindField::default(),
            status: CredentialStatus { token },
        }
    }

    pub fn with_kind_field(self, kind_field: KindField) -> Self {
        Self { kind_field, ..self }
    }

    pub fn token(&self) -> &str {
        &self.status.token
    }

    /// Renders the document as a single-line JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl Serialize for CredentialDocument {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("apiVersion", API_VERSION)?;
        map.serialize_entry(self.kind_field.key(), KIND)?;
        map.serialize_entry("status", &self.status)?;
        map.end()
    }
}
