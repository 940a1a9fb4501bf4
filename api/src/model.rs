// III-IV
// Copyright 2023 Julio Merino
//
// Licensed under the Apache License, Version 2.0 (the "License"); you may not
// use this file except in compliance with the License.  You may obtain a copy
// of the License at:
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS, WITHOUT
// WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.  See the
// License for the specific language governing permissions and limitations
// under the License.

//! Data types for the documents exposed by the service.

use derive_getters::Getters;
use derive_more::Constructor;
use docrud_core::model::{ModelError, ModelResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

/// Name of the key that carries the identifier in the wire form of a document.
pub(crate) const ID_KEY: &str = "_id";

/// The collections known to the service.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Collection {
    /// Documents of type `User`.
    Users,

    /// Free-form documents of type `Item`.
    Items,
}

impl Collection {
    /// Returns the name of the collection as stored in the database.
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Items => "items",
        }
    }
}

/// Opaque identifier assigned by the store to every document.
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub(crate) struct DocumentId(Uuid);

impl DocumentId {
    /// Generates a new random identifier.
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an identifier from its textual form, as received from an untrusted source.
    pub(crate) fn parse<S: AsRef<str>>(s: S) -> ModelResult<Self> {
        let s = s.as_ref();
        match Uuid::try_parse(s) {
            Ok(uuid) => Ok(Self(uuid)),
            Err(e) => Err(ModelError(format!("Invalid document id '{}': {}", s, e))),
        }
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// A raw document as held by the store: its identifier and its JSON object body.
#[derive(Constructor)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct Document {
    /// Identifier of the document within its collection.
    id: DocumentId,

    /// Contents of the document, excluding the identifier.
    body: Map<String, Value>,
}

impl Document {
    /// Breaks the document into its identifier and body.
    pub(crate) fn into_parts(self) -> (DocumentId, Map<String, Value>) {
        (self.id, self.body)
    }
}

/// Balance of a user account, which is accepted either as a number or as text.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub(crate) enum Balance {
    /// A numeric balance, stored without conversion.
    Number(serde_json::Number),

    /// A textual balance, stored without validation.
    Text(String),
}

/// All the caller-supplied fields of a user.
#[derive(Clone, Constructor, Deserialize, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserFields {
    /// Given name.
    first_name: String,

    /// Family name.
    last_name: String,

    /// Contact address.  Not validated nor required to be unique.
    email: String,

    /// Password, stored as provided.
    password: String,

    /// Account balance.
    balance: Balance,
}

/// A user as stored in the `users` collection.
#[derive(Constructor, Deserialize, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct User {
    /// Identifier of the user.
    #[serde(rename = "_id")]
    id: DocumentId,

    /// Details of the user.
    #[serde(flatten)]
    fields: UserFields,
}

impl TryFrom<Document> for User {
    type Error = ModelError;

    fn try_from(doc: Document) -> ModelResult<Self> {
        let (id, body) = doc.into_parts();
        match serde_json::from_value::<UserFields>(Value::Object(body)) {
            Ok(fields) => Ok(User { id, fields }),
            Err(e) => Err(ModelError(format!("Invalid user {}: {}", id, e))),
        }
    }
}

/// The body of an item as supplied by a caller.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub(crate) struct ItemBody(Map<String, Value>);

impl ItemBody {
    /// Validates that `body` does not try to set a store-managed key.
    pub(crate) fn new(body: Map<String, Value>) -> ModelResult<Self> {
        if body.contains_key(ID_KEY) {
            return Err(ModelError(format!(
                "Items cannot specify their own {}; the key is reserved for the id assigned by \
                 the store",
                ID_KEY
            )));
        }
        Ok(Self(body))
    }
}

/// An item as stored in the `items` collection.
#[derive(Deserialize, Getters, Serialize)]
#[cfg_attr(test, derive(Debug, PartialEq))]
pub(crate) struct Item {
    /// Identifier of the item.
    #[serde(rename = "_id")]
    id: DocumentId,

    /// Caller-supplied contents of the item.
    #[serde(flatten)]
    body: Map<String, Value>,
}

impl From<Document> for Item {
    fn from(doc: Document) -> Self {
        let (id, body) = doc.into_parts();
        Item { id, body }
    }
}

/// Acknowledgment of a document insertion.
#[derive(Getters, Serialize)]
#[cfg_attr(test, derive(Debug, Deserialize, PartialEq))]
#[serde(rename_all = "camelCase")]
pub(crate) struct InsertResult {
    /// Whether the store accepted the write.
    acknowledged: bool,

    /// Identifier assigned to the new document.
    inserted_id: DocumentId,
}

impl From<DocumentId> for InsertResult {
    fn from(inserted_id: DocumentId) -> Self {
        Self { acknowledged: true, inserted_id }
    }
}
