//! Postgres-backed store implementation.
//!
//! Ids are opaque TEXT columns; ordering clauses always pair `updated_at`
//! with `id` so pages are deterministic under timestamp ties. The embedded
//! fan-out of the feed query is resolved with bounded follow-up queries per
//! page entry, all behind the single `following_page` call the application
//! sees.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use ripple_comments::{Comment, CommentView};
use ripple_core::{
    PaginationWindow, UserId, EMBEDDED_COMMENTS_LIMIT, EMBEDDED_POSTS_LIMIT,
};
use ripple_posts::{Post, PostView};
use ripple_users::{BasicUser, UpdateUser, User};

use super::{user_with_posts, Store, StoreError, UserWithPosts};

const SCHEMA: &str = include_str!("schema.sql");

/// Postgres-backed store.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` and make sure the schema exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await
            .map_err(map_sqlx)?;
        let store = Self::new(pool);
        store.ensure_schema().await?;
        tracing::debug!("connected to postgres and ensured schema");
        Ok(store)
    }

    /// Create tables/indexes if they are missing (idempotent).
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        Ok(())
    }

    async fn posts_of(&self, author: &User) -> Result<Vec<PostView>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, content, published, author_id, created_at, updated_at
            FROM posts
            WHERE author_id = $1
            ORDER BY updated_at DESC, id ASC
            LIMIT $2
            "#,
        )
        .bind(author.id.as_str())
        .bind(EMBEDDED_POSTS_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let mut views = Vec::with_capacity(rows.len());
        for row in rows {
            let post = post_from_row(&row)?;
            let comments = self.comments_of(&post).await?;
            views.push(post.view(author.basic(), Some(comments)));
        }
        Ok(views)
    }

    async fn comments_of(&self, post: &Post) -> Result<Vec<CommentView>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.content, c.post_id, c.author_id, c.created_at, c.updated_at,
                   a.id AS author_row_id, a.name AS author_name, a.email AS author_email
            FROM comments c
            JOIN users a ON a.id = c.author_id
            WHERE c.post_id = $1
            ORDER BY c.updated_at DESC, c.id ASC
            LIMIT $2
            "#,
        )
        .bind(post.id.as_str())
        .bind(EMBEDDED_COMMENTS_LIMIT)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        rows.iter()
            .map(|row| {
                let comment = comment_from_row(row)?;
                let author = BasicUser {
                    id: UserId::from(get::<String>(row, "author_row_id")?),
                    name: get::<Option<String>>(row, "author_name")?,
                    email: get::<String>(row, "author_email")?,
                };
                Ok(comment.view(author))
            })
            .collect()
    }
}

#[async_trait]
impl Store for PgStore {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let row = sqlx::query(
            "SELECT id, email, password, name, image, created_at, updated_at \
             FROM users WHERE id = $1",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        sqlx::query(
            "INSERT INTO users (id, email, password, name, image, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(user.id.as_str())
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.name)
        .bind(&user.image)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(user)
    }

    async fn update_user(&self, id: &UserId, changes: UpdateUser) -> Result<User, StoreError> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                name = COALESCE($3, name),
                image = COALESCE($4, image),
                updated_at = $5
            WHERE id = $1
            RETURNING id, email, password, name, image, created_at, updated_at
            "#,
        )
        .bind(id.as_str())
        .bind(&changes.email)
        .bind(&changes.name)
        .bind(&changes.image)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx)?;

        match row {
            Some(row) => user_from_row(&row),
            None => Err(StoreError::NotFound),
        }
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn insert_post(&self, post: Post) -> Result<Post, StoreError> {
        sqlx::query(
            "INSERT INTO posts (id, title, content, published, author_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(post.id.as_str())
        .bind(&post.title)
        .bind(&post.content)
        .bind(post.published)
        .bind(post.author_id.as_str())
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(post)
    }

    async fn insert_comment(&self, comment: Comment) -> Result<Comment, StoreError> {
        sqlx::query(
            "INSERT INTO comments (id, content, post_id, author_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(comment.id.as_str())
        .bind(&comment.content)
        .bind(comment.post_id.as_str())
        .bind(comment.author_id.as_str())
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(comment)
    }

    async fn insert_follow(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO follows (follower_id, followee_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(follower.as_str())
        .bind(followee.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx)?;
        Ok(())
    }

    async fn following_page(
        &self,
        user_id: &UserId,
        window: PaginationWindow,
    ) -> Result<Vec<UserWithPosts>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.email, u.password, u.name, u.image, u.created_at, u.updated_at
            FROM follows f
            JOIN users u ON u.id = f.followee_id
            WHERE f.follower_id = $1
            ORDER BY u.updated_at DESC, u.id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.as_str())
        .bind(window.take)
        .bind(window.skip)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx)?;

        let mut page = Vec::with_capacity(rows.len());
        for row in rows {
            let followee = user_from_row(&row)?;
            let posts = self.posts_of(&followee).await?;
            page.push(user_with_posts(&followee, posts));
        }
        Ok(page)
    }
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get::<T, _>(column)
        .map_err(|e| StoreError::Backend(format!("column {column}: {e}")))
}

fn user_from_row(row: &PgRow) -> Result<User, StoreError> {
    Ok(User {
        id: UserId::from(get::<String>(row, "id")?),
        email: get(row, "email")?,
        password: get(row, "password")?,
        name: get(row, "name")?,
        image: get(row, "image")?,
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn post_from_row(row: &PgRow) -> Result<Post, StoreError> {
    Ok(Post {
        id: get::<String>(row, "id")?.into(),
        title: get(row, "title")?,
        content: get(row, "content")?,
        published: get(row, "published")?,
        author_id: get::<String>(row, "author_id")?.into(),
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn comment_from_row(row: &PgRow) -> Result<Comment, StoreError> {
    Ok(Comment {
        id: get::<String>(row, "id")?.into(),
        content: get(row, "content")?,
        post_id: get::<String>(row, "post_id")?.into(),
        author_id: get::<String>(row, "author_id")?.into(),
        created_at: get(row, "created_at")?,
        updated_at: get(row, "updated_at")?,
    })
}

fn map_sqlx(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::RowNotFound => StoreError::NotFound,
        sqlx::Error::Database(db) if db.is_unique_violation() || db.is_foreign_key_violation() => {
            StoreError::Constraint(db.message().to_string())
        }
        _ => StoreError::Backend(err.to_string()),
    }
}
