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

//! Common tests for any database implementation.

use crate::db::*;
use docrud_core::db::Db;
use serde_json::json;

/// Converts a JSON value that must be an object into a document body.
fn body(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(body) => body,
        _ => panic!("Test data must be a JSON object"),
    }
}

async fn test_documents_insert_and_find_one(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let body1 = body(json!({"name": "first", "nested": {"a": [1, 2.5, "x"]}}));
    let body2 = body(json!({"name": "second"}));
    let id1 = insert_one(&mut ex, Collection::Items, &body1).await.unwrap();
    let id2 = insert_one(&mut ex, Collection::Items, &body2).await.unwrap();
    assert_ne!(id1, id2);

    assert_eq!(
        Document::new(id1.clone(), body1),
        find_one(&mut ex, Collection::Items, &id1).await.unwrap()
    );
    assert_eq!(
        Document::new(id2.clone(), body2),
        find_one(&mut ex, Collection::Items, &id2).await.unwrap()
    );
}

async fn test_documents_find_one_not_found(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let id = insert_one(&mut ex, Collection::Items, &body(json!({}))).await.unwrap();

    assert_eq!(
        DbError::NotFound,
        find_one(&mut ex, Collection::Items, &DocumentId::generate()).await.unwrap_err()
    );
    assert_eq!(DbError::NotFound, find_one(&mut ex, Collection::Users, &id).await.unwrap_err());
}

async fn test_documents_find_all(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    assert!(find_all(&mut ex, Collection::Users).await.unwrap().is_empty());

    let mut exp_users = vec![];
    for i in 0..5 {
        let body = body(json!({"position": i}));
        let id = insert_one(&mut ex, Collection::Users, &body).await.unwrap();
        exp_users.push(Document::new(id, body));
    }
    let item_body = body(json!({"kind": "item"}));
    let item_id = insert_one(&mut ex, Collection::Items, &item_body).await.unwrap();

    assert_eq!(exp_users, find_all(&mut ex, Collection::Users).await.unwrap());
    assert_eq!(
        vec![Document::new(item_id, item_body)],
        find_all(&mut ex, Collection::Items).await.unwrap()
    );
}

async fn test_documents_replace_one(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let id1 = insert_one(&mut ex, Collection::Users, &body(json!({"v": 1}))).await.unwrap();
    let id2 = insert_one(&mut ex, Collection::Users, &body(json!({"v": 2}))).await.unwrap();

    let new_body = body(json!({"other": "field"}));
    replace_one(&mut ex, Collection::Users, &id1, &new_body).await.unwrap();

    assert_eq!(
        vec![
            Document::new(id1, new_body),
            Document::new(id2, body(json!({"v": 2}))),
        ],
        find_all(&mut ex, Collection::Users).await.unwrap()
    );
}

async fn test_documents_replace_one_not_found(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let id = insert_one(&mut ex, Collection::Items, &body(json!({"v": 1}))).await.unwrap();

    assert_eq!(
        DbError::NotFound,
        replace_one(&mut ex, Collection::Users, &DocumentId::generate(), &body(json!({})))
            .await
            .unwrap_err()
    );
    assert_eq!(
        DbError::NotFound,
        replace_one(&mut ex, Collection::Users, &id, &body(json!({}))).await.unwrap_err()
    );

    assert_eq!(
        Document::new(id.clone(), body(json!({"v": 1}))),
        find_one(&mut ex, Collection::Items, &id).await.unwrap()
    );
}

async fn test_documents_delete_one(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let id1 = insert_one(&mut ex, Collection::Users, &body(json!({"v": 1}))).await.unwrap();
    let id2 = insert_one(&mut ex, Collection::Users, &body(json!({"v": 2}))).await.unwrap();

    delete_one(&mut ex, Collection::Users, &id1).await.unwrap();
    assert_eq!(
        vec![Document::new(id2, body(json!({"v": 2})))],
        find_all(&mut ex, Collection::Users).await.unwrap()
    );

    assert_eq!(DbError::NotFound, delete_one(&mut ex, Collection::Users, &id1).await.unwrap_err());
}

async fn test_documents_delete_one_wrong_collection(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let id = insert_one(&mut ex, Collection::Items, &body(json!({}))).await.unwrap();

    assert_eq!(DbError::NotFound, delete_one(&mut ex, Collection::Users, &id).await.unwrap_err());
    find_one(&mut ex, Collection::Items, &id).await.unwrap();
}

async fn test_documents_init_schema_is_idempotent(db: Box<dyn Db + Send + Sync>) {
    let mut ex = db.ex().await.unwrap();

    let id = insert_one(&mut ex, Collection::Users, &body(json!({"v": 1}))).await.unwrap();
    init_schema(&mut ex).await.unwrap();
    find_one(&mut ex, Collection::Users, &id).await.unwrap();
}

macro_rules! generate_db_tests [
    ( $setup:expr $(, #[$extra:meta] )? ) => {
        docrud_core::db::testutils::generate_tests!(
            $(#[$extra],)?
            $setup,
            $crate::db::tests,
            test_documents_insert_and_find_one,
            test_documents_find_one_not_found,
            test_documents_find_all,
            test_documents_replace_one,
            test_documents_replace_one_not_found,
            test_documents_delete_one,
            test_documents_delete_one_wrong_collection,
            test_documents_init_schema_is_idempotent
        );
    }
];

#[cfg(feature = "postgres")]
mod postgres {
    use super::*;
    use docrud_core::db::postgres::PostgresDb;

    async fn setup() -> PostgresDb {
        let db = docrud_core::db::postgres::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(
        Box::new(setup().await),
        #[ignore = "Requires environment configuration and is expensive"]
    );
}

mod sqlite {
    use super::*;
    use docrud_core::db::sqlite::SqliteDb;

    async fn setup() -> SqliteDb {
        let db = docrud_core::db::sqlite::testutils::setup().await;
        init_schema(&mut db.ex().await.unwrap()).await.unwrap();
        db
    }

    generate_db_tests!(Box::new(setup().await));
}
