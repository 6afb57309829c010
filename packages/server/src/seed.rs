use sea_orm::*;
use sea_query::{Index, PostgresQueryBuilder};
use tracing::info;

use crate::entity::{comment, review};

/// Declared cascade edges of the resource dependency graph, child-side first.
///
/// Each entry is `(constraint, child table, child column, parent table)` and
/// becomes an `ON DELETE CASCADE` foreign key. SeaORM's schema-sync creates
/// the referential columns but does not emit delete actions, so the cascading
/// constraints are declared here and re-applied idempotently on startup.
const CASCADE_FOREIGN_KEYS: &[(&str, &str, &str, &str)] = &[
    ("fk_review_user", "review", "user_id", "user"),
    ("fk_review_wine", "review", "wine_id", "wine"),
    ("fk_comment_review", "comment", "review_id", "review"),
    ("fk_comment_user", "comment", "user_id", "user"),
];

/// Ensure the cascading foreign-key constraints exist.
///
/// With these constraints the storage layer removes dependents atomically
/// with their parent, regardless of where a deletion was interrupted.
pub async fn ensure_constraints(db: &DatabaseConnection) -> Result<(), DbErr> {
    for &(name, table, column, parent) in CASCADE_FOREIGN_KEYS {
        let drop = format!("ALTER TABLE \"{table}\" DROP CONSTRAINT IF EXISTS \"{name}\"");
        db.execute_unprepared(&drop).await?;

        let add = format!(
            "ALTER TABLE \"{table}\" ADD CONSTRAINT \"{name}\" \
             FOREIGN KEY (\"{column}\") REFERENCES \"{parent}\" (\"id\") ON DELETE CASCADE"
        );
        db.execute_unprepared(&add).await?;
    }

    info!(
        "Ensured {} cascading foreign keys",
        CASCADE_FOREIGN_KEYS.len()
    );
    Ok(())
}

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support non-unique secondary indexes,
/// so we create them manually on startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    // Review list filters: WHERE wine_id = ? / WHERE user_id = ?
    let stmts = [
        Index::create()
            .if_not_exists()
            .name("idx_review_wine")
            .table(review::Entity)
            .col(review::Column::WineId)
            .to_string(PostgresQueryBuilder),
        Index::create()
            .if_not_exists()
            .name("idx_review_user")
            .table(review::Entity)
            .col(review::Column::UserId)
            .to_string(PostgresQueryBuilder),
        // Comment lookups by parent review (list and cascade sweeps).
        Index::create()
            .if_not_exists()
            .name("idx_comment_review")
            .table(comment::Entity)
            .col(comment::Column::ReviewId)
            .to_string(PostgresQueryBuilder),
        Index::create()
            .if_not_exists()
            .name("idx_comment_user")
            .table(comment::Entity)
            .col(comment::Column::UserId)
            .to_string(PostgresQueryBuilder),
    ];

    for stmt in stmts {
        if let Err(e) = db.execute_unprepared(&stmt).await {
            tracing::warn!("Failed to create index: {}", e);
        }
    }

    info!("Ensured secondary indexes");
    Ok(())
}
