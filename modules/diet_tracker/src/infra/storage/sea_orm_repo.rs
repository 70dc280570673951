//! SeaORM-backed implementations of the domain ports.
//!
//! Both repositories are generic over `C: ConnectionTrait`, so they can be
//! built on a `DatabaseConnection` or a transaction. The connection is
//! handed in by the caller; nothing here holds a global handle.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::contract::model::{Feed, FeedPatch, MutationOutcome, User};
use crate::domain::repo::{FeedsRepository, SessionStore};
use crate::infra::storage::entity::{feed, user};

pub struct SeaOrmSessionStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmSessionStore<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> SessionStore for SeaOrmSessionStore<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn resolve(&self, token: Uuid) -> anyhow::Result<Option<User>> {
        let found = user::Entity::find_by_id(token)
            .one(&self.conn)
            .await
            .context("resolve session failed")?;
        Ok(found.map(Into::into))
    }

    async fn issue(&self, email: &str) -> anyhow::Result<User> {
        let m = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_owned()),
        };
        let saved = m.insert(&self.conn).await.context("issue session failed")?;
        Ok(saved.into())
    }
}

pub struct SeaOrmFeedsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmFeedsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    async fn exists(&self, session_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let count = feed::Entity::find()
            .filter(feed::Column::Id.eq(id))
            .filter(feed::Column::SessionId.eq(session_id))
            .count(&self.conn)
            .await
            .context("feed exists check failed")?;
        Ok(count > 0)
    }
}

/// Only supplied fields become `Set`; everything else stays `NotSet` and is
/// left out of the UPDATE statement.
fn patch_to_active_model(patch: &FeedPatch) -> feed::ActiveModel {
    fn set_if<T: Clone + Into<sea_orm::Value>>(v: &Option<T>) -> sea_orm::ActiveValue<T> {
        match v {
            Some(v) => Set(v.clone()),
            None => NotSet,
        }
    }

    feed::ActiveModel {
        id: NotSet,
        session_id: NotSet,
        name: set_if(&patch.name),
        description: match &patch.description {
            Some(d) => Set(Some(d.clone())),
            None => NotSet,
        },
        date: set_if(&patch.date),
        is_on_diet: match patch.is_on_diet {
            Some(flag) => Set(Some(flag)),
            None => NotSet,
        },
    }
}

#[async_trait::async_trait]
impl<C> FeedsRepository for SeaOrmFeedsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, f: Feed) -> anyhow::Result<()> {
        let m = feed::ActiveModel {
            id: Set(f.id),
            session_id: Set(f.session_id),
            name: Set(f.name),
            description: Set(f.description),
            date: Set(f.date),
            is_on_diet: Set(f.is_on_diet),
        };
        let _ = m.insert(&self.conn).await.context("insert feed failed")?;
        Ok(())
    }

    async fn update(
        &self,
        session_id: Uuid,
        id: Uuid,
        patch: &FeedPatch,
    ) -> anyhow::Result<MutationOutcome> {
        // An UPDATE with no SET clause is invalid SQL; an empty patch only
        // has to report whether the feed is there.
        if patch.is_empty() {
            return Ok(if self.exists(session_id, id).await? {
                MutationOutcome::Applied
            } else {
                MutationOutcome::Missing
            });
        }

        let res = feed::Entity::update_many()
            .set(patch_to_active_model(patch))
            .filter(feed::Column::Id.eq(id))
            .filter(feed::Column::SessionId.eq(session_id))
            .exec(&self.conn)
            .await
            .context("update feed failed")?;
        Ok(MutationOutcome::from_rows_affected(res.rows_affected))
    }

    async fn delete(&self, session_id: Uuid, id: Uuid) -> anyhow::Result<MutationOutcome> {
        let res = feed::Entity::delete_many()
            .filter(feed::Column::Id.eq(id))
            .filter(feed::Column::SessionId.eq(session_id))
            .exec(&self.conn)
            .await
            .context("delete feed failed")?;
        Ok(MutationOutcome::from_rows_affected(res.rows_affected))
    }

    async fn find_one(&self, session_id: Uuid, id: Uuid) -> anyhow::Result<Option<Feed>> {
        let found = feed::Entity::find()
            .filter(feed::Column::Id.eq(id))
            .filter(feed::Column::SessionId.eq(session_id))
            .one(&self.conn)
            .await
            .context("find feed failed")?;
        Ok(found.map(Into::into))
    }

    async fn list_all(&self, session_id: Uuid) -> anyhow::Result<Vec<Feed>> {
        let rows = feed::Entity::find()
            .filter(feed::Column::SessionId.eq(session_id))
            .order_by_asc(feed::Column::Date)
            .order_by_asc(feed::Column::Id)
            .all(&self.conn)
            .await
            .context("list feeds failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
