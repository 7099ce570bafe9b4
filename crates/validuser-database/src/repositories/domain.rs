//! Domain hierarchy reads against `dm.dm_user` and `dm.dm_domain`.

use sqlx::PgConnection;

use validuser_core::result::AppResult;
use validuser_entity::domain::ACTIVE_STATUS_CODE;
use validuser_entity::{DomainGraph, DomainId, DomainNode, DomainStatus, UserId};

use crate::error::map_sqlx;

/// Queries for a user's home domain and the active domain forest.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainRepository;

impl DomainRepository {
    /// The user's home domain, or `None` for an unknown user or a null column.
    pub async fn find_home_domain(
        conn: &mut PgConnection,
        user_id: UserId,
    ) -> AppResult<Option<DomainId>> {
        let home = sqlx::query_scalar::<_, Option<i64>>(
            "SELECT domainid::bigint FROM dm.dm_user WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| map_sqlx(e, "Failed to look up home domain"))?;

        Ok(home.flatten())
    }

    /// All active domain nodes, ordered by id.
    pub async fn find_active(conn: &mut PgConnection) -> AppResult<Vec<DomainNode>> {
        let rows = sqlx::query_as::<_, (i64, Option<i64>, String)>(
            "SELECT id::bigint, domainid::bigint, status::text \
             FROM dm.dm_domain WHERE status = $1 ORDER BY id",
        )
        .bind(ACTIVE_STATUS_CODE)
        .fetch_all(&mut *conn)
        .await
        .map_err(|e| map_sqlx(e, "Failed to load active domains"))?;

        Ok(rows
            .into_iter()
            .map(|(id, parent_id, status)| DomainNode {
                id,
                parent_id,
                status: DomainStatus::from_code(&status),
            })
            .collect())
    }

    /// Load the inputs of closure resolution for one user.
    ///
    /// The forest is skipped entirely when the user has no home domain.
    pub async fn load_graph(conn: &mut PgConnection, user_id: UserId) -> AppResult<DomainGraph> {
        let home = Self::find_home_domain(conn, user_id).await?;
        let nodes = match home {
            Some(_) => Self::find_active(conn).await?,
            None => Vec::new(),
        };
        Ok(DomainGraph { home, nodes })
    }
}
