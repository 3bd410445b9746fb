use crate::users::repo_types::User;
use sqlx::SqliteConnection;

impl User {
    /// Find a user by exact username.
    pub async fn find_by_username(
        conn: &mut SqliteConnection,
        username: &str,
    ) -> sqlx::Result<Option<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password
            FROM users
            WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&mut *conn)
        .await
    }

    /// All users in insertion order.
    pub async fn list_all(conn: &mut SqliteConnection) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password
            FROM users
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&mut *conn)
        .await
    }

    /// Insert a new user, returning the stored row with its id.
    pub async fn insert(
        conn: &mut SqliteConnection,
        username: &str,
        email: &str,
        password: &str,
    ) -> sqlx::Result<User> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, email, password)
            VALUES (?1, ?2, ?3)
            RETURNING id, username, email, password
            "#,
        )
        .bind(username)
        .bind(email)
        .bind(password)
        .fetch_one(&mut *conn)
        .await
    }

    pub async fn update_email(
        conn: &mut SqliteConnection,
        id: i64,
        email: &str,
    ) -> sqlx::Result<u64> {
        let done = sqlx::query("UPDATE users SET email = ?1 WHERE id = ?2")
            .bind(email)
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(done.rows_affected())
    }

    pub async fn delete_by_id(conn: &mut SqliteConnection, id: i64) -> sqlx::Result<u64> {
        let done = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(done.rows_affected())
    }

    /// Users whose username or email contains `query` literally (case-sensitive, no wildcards).
    pub async fn search(conn: &mut SqliteConnection, query: &str) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password
            FROM users
            WHERE instr(username, ?1) > 0 OR instr(email, ?1) > 0
            ORDER BY id ASC
            "#,
        )
        .bind(query)
        .fetch_all(&mut *conn)
        .await
    }

    pub async fn count(conn: &mut SqliteConnection) -> sqlx::Result<i64> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&mut *conn)
            .await?;
        Ok(total)
    }

    pub async fn list_page(
        conn: &mut SqliteConnection,
        limit: i64,
        offset: i64,
    ) -> sqlx::Result<Vec<User>> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, email, password
            FROM users
            ORDER BY id ASC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
    }
}
