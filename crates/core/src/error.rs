use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Unsupported sort code: {code}")]
    UnsupportedSortCode { code: i16 },

    #[error("Internal error: {0}")]
    Internal(String),
}
