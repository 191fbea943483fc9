use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Database error: {operation} failed: {source}")]
    Operation {
        operation: String,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Starting transaction failed: {source}")]
    TransactionBegin {
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Committing transaction failed: {source}")]
    TransactionCommit {
        #[source]
        source: sea_orm::DbErr,
    },
}

/// Name of the unique constraint `err` violated, if it is a unique violation
///
/// SQLite reports the indexed columns (`users.email`), Postgres the
/// constraint or index name.
pub fn violated_unique_constraint(err: &sea_orm::DbErr) -> Option<String> {
    match err.sql_err() {
        Some(sea_orm::SqlErr::UniqueConstraintViolation(message)) => {
            Some(constraint_name(&message).to_string())
        }
        _ => None,
    }
}

fn constraint_name(message: &str) -> &str {
    if let Some((_, columns)) = message.split_once("UNIQUE constraint failed: ") {
        return columns.trim();
    }
    message.split('"').nth(1).unwrap_or(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_name_from_driver_messages() {
        assert_eq!(
            constraint_name("UNIQUE constraint failed: users.email"),
            "users.email"
        );
        assert_eq!(
            constraint_name(
                "duplicate key value violates unique constraint \"idx_users_single_admin\""
            ),
            "idx_users_single_admin"
        );
    }
}
