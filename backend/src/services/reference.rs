//! Purchase-request reference generation

use sqlx::PgConnection;

use crate::error::AppResult;
use crate::models::format_reference;

/// Draw the next reference from the database sequence.
///
/// `nextval` is atomic and never hands out the same value twice, even when
/// the surrounding transaction rolls back, so concurrent creates cannot collide.
pub async fn next_reference(conn: &mut PgConnection) -> AppResult<String> {
    let sequence: i64 = sqlx::query_scalar("SELECT nextval('purchase_request_reference_seq')")
        .fetch_one(&mut *conn)
        .await?;

    Ok(format_reference(sequence))
}
