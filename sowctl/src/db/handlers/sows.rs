//! Database repository for statements of work.

use crate::types::{abbrev_uuid, SowId, UserId};
use crate::db::{
    errors::{DbError, Result},
    handlers::repository::Repository,
    models::sows::{SowDBResponse, SowWriteDBRequest},
};
use crate::validation::validate_sow;
use sqlx::PgConnection;
use tracing::instrument;
use uuid::Uuid;

/// Filter for listing SoWs
#[derive(Debug, Clone, Default)]
pub struct SowFilter {
    /// Restrict to records owned by this user
    pub owner: Option<UserId>,
}

pub struct Sows<'c> {
    db: &'c mut PgConnection,
}

impl<'c> Sows<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Run the conditional required-field rules before any write.
    fn check(request: &SowWriteDBRequest) -> Result<()> {
        validate_sow(request).map_err(|missing| DbError::CheckViolation {
            constraint: Some("sow_required_fields".to_string()),
            table: Some("sows".to_string()),
            message: format!("missing required fields: {}", missing.join(", ")),
        })
    }
}

#[async_trait::async_trait]
impl<'c> Repository for Sows<'c> {
    type CreateRequest = SowWriteDBRequest;
    type UpdateRequest = SowWriteDBRequest;
    type Response = SowDBResponse;
    type Id = SowId;
    type Filter = SowFilter;

    #[instrument(skip(self, request), fields(name = %request.name), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        Self::check(request)?;

        let sow_id = Uuid::new_v4();

        let sow = sqlx::query_as::<_, SowDBResponse>(
            r#"
            INSERT INTO sows (id, user_id, name, sow_type, vms, landing_zones,
                              engineer_hourly, architect_hourly, pm_hourly, hours, months)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(sow_id)
        .bind(request.user_id)
        .bind(&request.name)
        .bind(request.sow_type)
        .bind(request.vms)
        .bind(request.landing_zones)
        .bind(request.engineer_hourly)
        .bind(request.architect_hourly)
        .bind(request.pm_hourly)
        .bind(request.hours)
        .bind(request.months)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(sow)
    }

    #[instrument(skip(self), fields(sow_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let sow = sqlx::query_as::<_, SowDBResponse>("SELECT * FROM sows WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(sow)
    }

    #[instrument(skip(self, filter), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let sows = match filter.owner {
            Some(owner) => {
                sqlx::query_as::<_, SowDBResponse>("SELECT * FROM sows WHERE user_id = $1 ORDER BY created_at")
                    .bind(owner)
                    .fetch_all(&mut *self.db)
                    .await?
            }
            None => {
                sqlx::query_as::<_, SowDBResponse>("SELECT * FROM sows ORDER BY created_at")
                    .fetch_all(&mut *self.db)
                    .await?
            }
        };

        Ok(sows)
    }

    #[instrument(skip(self), fields(sow_id = %abbrev_uuid(&id)), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let sow = sqlx::query_as::<_, SowDBResponse>("DELETE FROM sows WHERE id = $1 RETURNING *")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(sow)
    }

    /// Full replacement: every mutable column is overwritten from the
    /// request, so fields from the discarded type group revert to NULL.
    #[instrument(skip(self, request), fields(sow_id = %abbrev_uuid(&id)), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        Self::check(request)?;

        let sow = sqlx::query_as::<_, SowDBResponse>(
            r#"
            UPDATE sows
            SET user_id = $2, name = $3, sow_type = $4, vms = $5, landing_zones = $6,
                engineer_hourly = $7, architect_hourly = $8, pm_hourly = $9,
                hours = $10, months = $11, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(request.user_id)
        .bind(&request.name)
        .bind(request.sow_type)
        .bind(request.vms)
        .bind(request.landing_zones)
        .bind(request.engineer_hourly)
        .bind(request.architect_hourly)
        .bind(request.pm_hourly)
        .bind(request.hours)
        .bind(request.months)
        .fetch_optional(&mut *self.db)
        .await?;

        sow.ok_or(DbError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::sows::SowType;
    use crate::api::models::users::Role;
    use crate::db::handlers::users::Users;
    use crate::db::models::users::UserCreateDBRequest;
    use sqlx::PgPool;

    async fn create_owner(conn: &mut PgConnection) -> UserId {
        let user = Users::new(conn)
            .create(&UserCreateDBRequest {
                username: format!("owner-{}", Uuid::new_v4()),
                password_hash: "$argon2id$test".to_string(),
                roles: vec![Role::Employee],
                active: true,
            })
            .await
            .unwrap();
        user.id
    }

    fn lift_and_shift(user_id: UserId) -> SowWriteDBRequest {
        SowWriteDBRequest {
            user_id,
            name: "Datacenter exit".to_string(),
            sow_type: SowType::LiftAndShift,
            vms: Some(40),
            landing_zones: Some(2),
            engineer_hourly: Some(95.0),
            architect_hourly: Some(140.0),
            pm_hourly: Some(110.0),
            hours: None,
            months: None,
        }
    }

    fn arc_as_a_service(user_id: UserId) -> SowWriteDBRequest {
        SowWriteDBRequest {
            user_id,
            name: "Managed arc".to_string(),
            sow_type: SowType::ArcAsAService,
            vms: None,
            landing_zones: None,
            engineer_hourly: None,
            architect_hourly: None,
            pm_hourly: None,
            hours: Some(160),
            months: Some(12),
        }
    }

    #[sqlx::test]
    async fn test_create_both_types(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let owner = create_owner(&mut conn).await;
        let mut sows = Sows::new(&mut conn);

        let a = sows.create(&lift_and_shift(owner)).await.unwrap();
        assert_eq!(a.sow_type, SowType::LiftAndShift);
        assert_eq!(a.vms, Some(40));
        assert_eq!(a.hours, None);

        let b = sows.create(&arc_as_a_service(owner)).await.unwrap();
        assert_eq!(b.sow_type, SowType::ArcAsAService);
        assert_eq!(b.months, Some(12));
        assert_eq!(b.vms, None);
    }

    #[sqlx::test]
    async fn test_create_rejects_missing_group_fields(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let owner = create_owner(&mut conn).await;
        let mut sows = Sows::new(&mut conn);

        let mut request = lift_and_shift(owner);
        request.pm_hourly = None;
        let err = sows.create(&request).await.unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[sqlx::test]
    async fn test_create_rejects_unknown_owner(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut sows = Sows::new(&mut conn);

        let err = sows.create(&lift_and_shift(Uuid::new_v4())).await.unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[sqlx::test]
    async fn test_update_replaces_every_field(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let owner = create_owner(&mut conn).await;
        let mut sows = Sows::new(&mut conn);

        let created = sows.create(&lift_and_shift(owner)).await.unwrap();

        // Switching type groups must null out the old group's columns
        let mut replacement = arc_as_a_service(owner);
        replacement.name = "Renamed".to_string();
        let updated = sows.update(created.id, &replacement).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.sow_type, SowType::ArcAsAService);
        assert_eq!(updated.hours, Some(160));
        assert_eq!(updated.vms, None);
        assert_eq!(updated.engineer_hourly, None);
    }

    #[sqlx::test]
    async fn test_update_unknown_id_is_not_found(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let owner = create_owner(&mut conn).await;
        let mut sows = Sows::new(&mut conn);

        let err = sows.update(Uuid::new_v4(), &lift_and_shift(owner)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound));
    }

    #[sqlx::test]
    async fn test_delete_returns_the_removed_record(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let owner = create_owner(&mut conn).await;
        let mut sows = Sows::new(&mut conn);

        let created = sows.create(&arc_as_a_service(owner)).await.unwrap();

        let deleted = sows.delete(created.id).await.unwrap().unwrap();
        assert_eq!(deleted.name, "Managed arc");

        assert!(sows.delete(created.id).await.unwrap().is_none());
        assert!(sows.get_by_id(created.id).await.unwrap().is_none());
    }

    #[sqlx::test]
    async fn test_list_filters_by_owner(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let owner_a = create_owner(&mut conn).await;
        let owner_b = create_owner(&mut conn).await;
        let mut sows = Sows::new(&mut conn);

        sows.create(&lift_and_shift(owner_a)).await.unwrap();
        sows.create(&arc_as_a_service(owner_b)).await.unwrap();

        let all = sows.list(&SowFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let only_a = sows.list(&SowFilter { owner: Some(owner_a) }).await.unwrap();
        assert_eq!(only_a.len(), 1);
        assert_eq!(only_a[0].user_id, owner_a);
    }
}
