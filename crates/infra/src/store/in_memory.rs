use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use ripple_comments::Comment;
use ripple_core::{
    CommentId, PaginationWindow, PostId, UserId, EMBEDDED_COMMENTS_LIMIT, EMBEDDED_POSTS_LIMIT,
};
use ripple_posts::{Post, PostView};
use ripple_users::{UpdateUser, User};

use super::{user_with_posts, Store, StoreError, UserWithPosts};

/// In-memory store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<UserId, User>,
    posts: HashMap<PostId, Post>,
    comments: HashMap<CommentId, Comment>,
    /// Directional follow edges: (follower, followee).
    follows: Vec<(UserId, UserId)>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("lock poisoned".to_string())
}

#[async_trait]
impl Store for InMemoryStore {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        Ok(inner.users.get(id).cloned())
    }

    async fn insert_user(&self, user: User) -> Result<User, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Constraint(format!(
                "email already taken: {}",
                user.email
            )));
        }
        inner.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    async fn update_user(&self, id: &UserId, changes: UpdateUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let user = inner.users.get_mut(id).ok_or(StoreError::NotFound)?;
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(name) = changes.name {
            user.name = Some(name);
        }
        if let Some(image) = changes.image {
            user.image = Some(image);
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        if inner.users.remove(id).is_none() {
            return Err(StoreError::NotFound);
        }
        inner.follows.retain(|(f, t)| f != id && t != id);
        Ok(())
    }

    async fn insert_post(&self, post: Post) -> Result<Post, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.posts.insert(post.id.clone(), post.clone());
        Ok(post)
    }

    async fn insert_comment(&self, comment: Comment) -> Result<Comment, StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        inner.comments.insert(comment.id.clone(), comment.clone());
        Ok(comment)
    }

    async fn insert_follow(
        &self,
        follower: &UserId,
        followee: &UserId,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().map_err(|_| poisoned())?;
        let edge = (follower.clone(), followee.clone());
        if !inner.follows.contains(&edge) {
            inner.follows.push(edge);
        }
        Ok(())
    }

    async fn following_page(
        &self,
        user_id: &UserId,
        window: PaginationWindow,
    ) -> Result<Vec<UserWithPosts>, StoreError> {
        let inner = self.inner.read().map_err(|_| poisoned())?;
        if !inner.users.contains_key(user_id) {
            // Unknown user means an empty follow list, not an error.
            return Ok(Vec::new());
        }

        let mut followees: Vec<&User> = inner
            .follows
            .iter()
            .filter(|(follower, _)| follower == user_id)
            .filter_map(|(_, followee)| inner.users.get(followee))
            .collect();
        followees.sort_by(|a, b| {
            b.updated_at
                .cmp(&a.updated_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        let page = followees
            .into_iter()
            .skip(window.skip.max(0) as usize)
            .take(window.take.max(0) as usize)
            .map(|followee| {
                let posts = posts_of(&inner, followee);
                user_with_posts(followee, posts)
            })
            .collect();
        Ok(page)
    }
}

fn posts_of(inner: &Inner, author: &User) -> Vec<PostView> {
    let mut posts: Vec<&Post> = inner
        .posts
        .values()
        .filter(|p| p.author_id == author.id)
        .collect();
    posts.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    posts
        .into_iter()
        .take(EMBEDDED_POSTS_LIMIT as usize)
        .map(|post| post.view(author.basic(), Some(comments_of(inner, post))))
        .collect()
}

fn comments_of(inner: &Inner, post: &Post) -> Vec<ripple_comments::CommentView> {
    let mut comments: Vec<&Comment> = inner
        .comments
        .values()
        .filter(|c| c.post_id == post.id)
        .collect();
    comments.sort_by(|a, b| {
        b.updated_at
            .cmp(&a.updated_at)
            .then_with(|| a.id.cmp(&b.id))
    });
    comments
        .into_iter()
        .take(EMBEDDED_COMMENTS_LIMIT as usize)
        // A comment whose author row is gone is dropped rather than surfaced
        // with a dangling reference.
        .filter_map(|c| inner.users.get(&c.author_id).map(|a| c.view(a.basic())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn user(id: &str, email: &str, updated_offset_secs: i64) -> User {
        let now = Utc::now();
        User {
            id: id.into(),
            email: email.to_string(),
            password: "12345678".to_string(),
            name: None,
            image: None,
            created_at: now,
            updated_at: now + Duration::seconds(updated_offset_secs),
        }
    }

    fn post(id: &str, author: &str, updated_offset_secs: i64) -> Post {
        let now = Utc::now();
        Post {
            id: id.into(),
            title: format!("post {id}"),
            content: None,
            published: true,
            author_id: author.into(),
            created_at: now,
            updated_at: now + Duration::seconds(updated_offset_secs),
        }
    }

    fn comment(id: &str, post_id: &str, author: &str, updated_offset_secs: i64) -> Comment {
        let now = Utc::now();
        Comment {
            id: id.into(),
            content: format!("comment {id}"),
            post_id: post_id.into(),
            author_id: author.into(),
            created_at: now,
            updated_at: now + Duration::seconds(updated_offset_secs),
        }
    }

    #[tokio::test]
    async fn update_applies_only_supplied_fields() {
        let store = InMemoryStore::new();
        store.insert_user(user("u1", "a@b.com", 0)).await.unwrap();

        let updated = store
            .update_user(
                &"u1".into(),
                UpdateUser {
                    name: Some("Ada".to_string()),
                    ..UpdateUser::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name.as_deref(), Some("Ada"));
        assert_eq!(updated.email, "a@b.com");
        assert_eq!(updated.image, None);
    }

    #[tokio::test]
    async fn writes_on_missing_ids_report_not_found() {
        let store = InMemoryStore::new();
        let missing: UserId = "nope".into();
        assert_eq!(
            store.update_user(&missing, UpdateUser::default()).await,
            Err(StoreError::NotFound)
        );
        assert_eq!(store.delete_user(&missing).await, Err(StoreError::NotFound));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_constraint_violation() {
        let store = InMemoryStore::new();
        store.insert_user(user("u1", "a@b.com", 0)).await.unwrap();
        let err = store.insert_user(user("u2", "a@b.com", 0)).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn following_page_orders_by_recency_and_windows() {
        let store = InMemoryStore::new();
        store.insert_user(user("u1", "u1@b.com", 0)).await.unwrap();
        store.insert_user(user("old", "old@b.com", 10)).await.unwrap();
        store.insert_user(user("new", "new@b.com", 20)).await.unwrap();
        store.insert_follow(&"u1".into(), &"old".into()).await.unwrap();
        store.insert_follow(&"u1".into(), &"new".into()).await.unwrap();

        let page = store
            .following_page(&"u1".into(), PaginationWindow { skip: 0, take: 1 })
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "new".into());

        let rest = store
            .following_page(&"u1".into(), PaginationWindow { skip: 1, take: 1 })
            .await
            .unwrap();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].id, "old".into());
    }

    #[tokio::test]
    async fn following_page_embeds_limited_posts_and_comments() {
        let store = InMemoryStore::new();
        store.insert_user(user("u1", "u1@b.com", 0)).await.unwrap();
        store.insert_user(user("f1", "f1@b.com", 1)).await.unwrap();
        store.insert_follow(&"u1".into(), &"f1".into()).await.unwrap();

        for i in 0..15 {
            store.insert_post(post(&format!("p{i:02}"), "f1", i)).await.unwrap();
        }
        for i in 0..12 {
            store
                .insert_comment(comment(&format!("c{i:02}"), "p14", "u1", i))
                .await
                .unwrap();
        }

        let page = store
            .following_page(&"u1".into(), PaginationWindow::default())
            .await
            .unwrap();
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].posts.len(), EMBEDDED_POSTS_LIMIT as usize);
        // Most recently updated post first.
        assert_eq!(page[0].posts[0].id, "p14".into());
        let comments = page[0].posts[0].comments.as_ref().unwrap();
        assert_eq!(comments.len(), EMBEDDED_COMMENTS_LIMIT as usize);
        assert_eq!(comments[0].id, "c11".into());
    }

    #[tokio::test]
    async fn following_page_for_unknown_user_is_empty() {
        let store = InMemoryStore::new();
        let page = store
            .following_page(&"ghost".into(), PaginationWindow::default())
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn equal_timestamps_fall_back_to_id_order() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let mut a = user("a", "a@b.com", 0);
        let mut b = user("b", "b@b.com", 0);
        a.updated_at = now;
        b.updated_at = now;
        store.insert_user(user("u1", "u1@b.com", 0)).await.unwrap();
        store.insert_user(b).await.unwrap();
        store.insert_user(a).await.unwrap();
        store.insert_follow(&"u1".into(), &"a".into()).await.unwrap();
        store.insert_follow(&"u1".into(), &"b".into()).await.unwrap();

        let page = store
            .following_page(&"u1".into(), PaginationWindow::default())
            .await
            .unwrap();
        let ids: Vec<&str> = page.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
