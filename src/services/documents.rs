//! Collection-agnostic document CRUD over the JSONB collection tables.

use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::document::{Collection, DeleteResult, Document, DocumentRow};
use crate::models::pagination::Pagination;
use crate::models::record_id;

/// List documents most-recent-first, optionally filtered on the collection's
/// foreign-key field.
///
/// The filter matches both the bare-string and the `$oid` envelope forms.
pub async fn list(
    pool: &PgPool,
    collection: Collection,
    reference: Option<&str>,
    pagination: &Pagination,
) -> Result<Vec<Document>, AppError> {
    let table = collection.table();
    let filter = match (collection.reference_field(), reference) {
        (Some(field), Some(raw)) => record_id::normalize(&Value::String(raw.to_string()))
            .map(|id| (field, id)),
        _ => None,
    };

    let rows = match filter {
        Some((field, id)) => {
            sqlx::query_as::<_, DocumentRow>(&format!(
                "SELECT id, doc, created_at, updated_at FROM {table} \
                 WHERE doc->>$1 = $2 OR doc->$1->>'$oid' = $2 \
                 ORDER BY created_at DESC, id DESC LIMIT $3 OFFSET $4"
            ))
            .bind(field)
            .bind(&id)
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, DocumentRow>(&format!(
                "SELECT id, doc, created_at, updated_at FROM {table} \
                 ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
            ))
            .bind(pagination.limit())
            .bind(pagination.offset())
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows.into_iter().map(Document::from).collect())
}

/// Store a validated payload as a new document with a generated id.
pub async fn create<T: Serialize>(
    pool: &PgPool,
    collection: Collection,
    payload: &T,
) -> Result<Document, AppError> {
    let fields = to_fields(payload)?;
    let id = Uuid::new_v4().to_string();

    let row = sqlx::query_as::<_, DocumentRow>(&format!(
        "INSERT INTO {} (id, doc) VALUES ($1, $2) RETURNING id, doc, created_at, updated_at",
        collection.table()
    ))
    .bind(&id)
    .bind(Value::Object(fields))
    .fetch_one(pool)
    .await?;

    tracing::info!(collection = collection.table(), id = %row.id, "Document created");
    Ok(row.into())
}

/// Merge a validated partial payload into an existing document.
pub async fn update<T: Serialize>(
    pool: &PgPool,
    collection: Collection,
    id: &str,
    payload: &T,
) -> Result<Document, AppError> {
    let patch = to_fields(payload)?;
    if patch.is_empty() {
        return Err(AppError::Validation(
            "At least one field must be provided".to_string(),
        ));
    }

    let row = sqlx::query_as::<_, DocumentRow>(&format!(
        "UPDATE {} SET doc = doc || $2, updated_at = NOW() WHERE id = $1 \
         RETURNING id, doc, created_at, updated_at",
        collection.table()
    ))
    .bind(id)
    .bind(Value::Object(patch))
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("{} '{id}' not found", collection.label())))?;

    tracing::info!(collection = collection.table(), id = %row.id, "Document updated");
    Ok(row.into())
}

/// Delete a document. Deleting a missing id is not an error.
pub async fn delete(
    pool: &PgPool,
    collection: Collection,
    id: &str,
) -> Result<DeleteResult, AppError> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", collection.table()))
        .bind(id)
        .execute(pool)
        .await?;

    let deleted = result.rows_affected() > 0;
    if deleted {
        tracing::info!(collection = collection.table(), id, "Document deleted");
    } else {
        tracing::debug!(collection = collection.table(), id, "Delete of unknown id ignored");
    }

    Ok(DeleteResult {
        id: id.to_string(),
        deleted,
    })
}

/// Count every document in a collection.
pub async fn count(pool: &PgPool, collection: Collection) -> Result<i64, AppError> {
    let total = sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {}",
        collection.table()
    ))
    .fetch_one(pool)
    .await?;
    Ok(total)
}

/// Serialize a payload into the field map stored as the document body.
fn to_fields<T: Serialize>(payload: &T) -> Result<Map<String, Value>, AppError> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(AppError::Internal(format!(
            "payload serialized to a non-object value: {other}"
        ))),
        Err(e) => Err(AppError::Internal(format!("payload serialization failed: {e}"))),
    }
}
