//! SeaORM-backed repository implementation for the domain port.
//!
//! Generic over `C: ConnectionTrait`, so it can be built on a
//! `DatabaseConnection` or on a transaction.

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::contract::model::{Prescription, User};
use crate::domain::repo::{UserCredentials, UsersRepository};
use crate::infra::storage::entity::{prescription, user};
use crate::infra::storage::mapper::{prescription_to_contract, user_to_contract};

pub struct SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }

    async fn prescriptions_of(&self, user_id: Uuid) -> anyhow::Result<Vec<prescription::Model>> {
        prescription::Entity::find()
            .filter(prescription::Column::UserId.eq(user_id))
            .order_by_asc(prescription::Column::UploadedAt)
            .all(&self.conn)
            .await
            .context("load prescriptions failed")
    }
}

#[async_trait::async_trait]
impl<C> UsersRepository for SeaOrmUsersRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let Some(found) = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?
        else {
            return Ok(None);
        };
        let prescriptions = self.prescriptions_of(id).await?;
        Ok(Some(user_to_contract(found, prescriptions)))
    }

    async fn find_credentials(&self, email: &str) -> anyhow::Result<Option<UserCredentials>> {
        let Some(found) = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("find_credentials failed")?
        else {
            return Ok(None);
        };
        let password_hash = found.password_hash.clone();
        let prescriptions = self.prescriptions_of(found.id).await?;
        Ok(Some(UserCredentials {
            user: user_to_contract(found, prescriptions),
            password_hash,
        }))
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let count = user::Entity::find()
            .filter(user::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("email_exists failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, u: &User, password_hash: &str) -> anyhow::Result<bool> {
        let m = user::ActiveModel {
            id: Set(u.id),
            email: Set(u.email.clone()),
            name: Set(u.name.clone()),
            password_hash: Set(password_hash.to_string()),
            date_of_birth: Set(u.date_of_birth),
            gender: Set(u.gender.clone()),
            phone: Set(u.phone.clone()),
            profile_image: Set(u.profile_image.clone()),
            created_at: Set(u.created_at),
            updated_at: Set(u.updated_at),
        };
        match m.insert(&self.conn).await {
            Ok(_) => Ok(true),
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Ok(false)
            }
            Err(e) => Err(anyhow::Error::new(e).context("insert failed")),
        }
    }

    async fn update_profile(&self, u: &User) -> anyhow::Result<()> {
        let m = user::ActiveModel {
            id: Set(u.id),
            name: Set(u.name.clone()),
            date_of_birth: Set(u.date_of_birth),
            gender: Set(u.gender.clone()),
            phone: Set(u.phone.clone()),
            profile_image: Set(u.profile_image.clone()),
            updated_at: Set(u.updated_at),
            ..Default::default()
        };
        let _ = m.update(&self.conn).await.context("update_profile failed")?;
        Ok(())
    }

    async fn add_prescription(&self, user_id: Uuid, p: &Prescription) -> anyhow::Result<()> {
        let m = prescription::ActiveModel {
            id: Set(p.id),
            user_id: Set(user_id),
            name: Set(p.name.clone()),
            file_url: Set(p.file_url.clone()),
            stored_path: Set(p.stored_path.clone()),
            uploaded_at: Set(p.uploaded_at),
        };
        let _ = m.insert(&self.conn).await.context("add_prescription failed")?;
        Ok(())
    }

    async fn find_prescription(
        &self,
        user_id: Uuid,
        id: Uuid,
    ) -> anyhow::Result<Option<Prescription>> {
        let found = prescription::Entity::find_by_id(id)
            .filter(prescription::Column::UserId.eq(user_id))
            .one(&self.conn)
            .await
            .context("find_prescription failed")?;
        Ok(found.map(prescription_to_contract))
    }

    async fn delete_prescription(&self, user_id: Uuid, id: Uuid) -> anyhow::Result<bool> {
        let res = prescription::Entity::delete_many()
            .filter(prescription::Column::Id.eq(id))
            .filter(prescription::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("delete_prescription failed")?;
        Ok(res.rows_affected > 0)
    }
}
