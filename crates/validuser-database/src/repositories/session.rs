//! Session liveness queries against `dm.dm_user_auth`.

use std::time::Duration;

use sqlx::PgConnection;

use validuser_core::result::AppResult;
use validuser_entity::UserId;

use crate::error::map_sqlx;

/// Queries for session pruning, liveness checks, and refresh.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionRepository;

impl SessionRepository {
    /// Delete every session, for any user, not seen within `window`.
    pub async fn prune_stale(conn: &mut PgConnection, window: Duration) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM dm.dm_user_auth \
             WHERE lastseen < current_timestamp - make_interval(secs => $1)",
        )
        .bind(window.as_secs_f64())
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx(e, "Failed to prune stale sessions"))?;

        Ok(result.rows_affected())
    }

    /// Slide the session's expiry by stamping `lastseen` with the current time.
    ///
    /// Returns `false` when no matching session exists. The update is the
    /// liveness check, so a session pruned by a concurrent request between
    /// statements is never reported live.
    pub async fn touch(
        conn: &mut PgConnection,
        user_id: UserId,
        session_id: &str,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE dm.dm_user_auth SET lastseen = current_timestamp WHERE id = $1 AND jti = $2",
        )
        .bind(user_id)
        .bind(session_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| map_sqlx(e, "Failed to refresh session"))?;

        Ok(result.rows_affected() > 0)
    }
}
