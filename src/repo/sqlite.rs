use crate::models::{self, schedule::DateSchedule};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use sqlx::{FromRow, Row, SqliteConnection, SqlitePool, sqlite::SqliteRow};
use std::collections::BTreeMap;

use super::{AppRepo, ScheduleWrite, association, sqlite_queries};

#[derive(Clone)]
pub struct SqlxSqliteRepo {
    pub db_pool: SqlitePool,
}

/// Fixed-width UTC text, so the lexical order of the column is the time order
pub fn encode_date_schedule(date_schedule: &DateSchedule) -> String {
    date_schedule
        .with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Micros, false)
}

fn encode_price(price: &Decimal) -> anyhow::Result<f64> {
    price
        .to_f64()
        .ok_or_else(|| anyhow::anyhow!("price {price} does not fit a REAL column"))
}

fn decode_date_schedule(row: &SqliteRow, column: &str) -> sqlx::Result<DateSchedule> {
    let raw: String = row.try_get(column)?;
    DateTime::parse_from_rfc3339(&raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.into(),
        source: Box::new(e),
    })
}

fn decode_price(row: &SqliteRow, column: &str) -> sqlx::Result<Decimal> {
    let raw: f64 = row.try_get(column)?;
    Decimal::try_from(raw).map_err(|e| sqlx::Error::ColumnDecode {
        index: column.into(),
        source: Box::new(e),
    })
}

/// `0` means "not saved yet", the store picks the rowid
fn id_to_bind(id: i64) -> Option<i64> {
    (id != 0).then_some(id)
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

impl FromRow<'_, SqliteRow> for models::client::Client {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            cpf: row.try_get("cpf")?,
            age: row.try_get("age")?,
            is_admin: row.try_get("is_admin")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::pet::Pet {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            client_id: row.try_get("client_id")?,
            name: row.try_get("name")?,
            breed: row.try_get("breed")?,
            age: row.try_get("age")?,
            size_in_centimeters: row.try_get("size_in_centimeters")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::service::Service {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            duration_in_minutes: row.try_get("duration_in_minutes")?,
            type_service: row.try_get("type_service")?,
            price: decode_price(row, "price")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::schedule::Schedule {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            date_schedule: decode_date_schedule(row, "date_schedule")?,
            client_id: row.try_get("client_id")?,
            pet_id: row.try_get("pet_id")?,
        })
    }
}

impl FromRow<'_, SqliteRow> for models::schedule::ScheduleDetails {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        Ok(Self {
            id: row.try_get("id")?,
            date_schedule: decode_date_schedule(row, "date_schedule")?,
            client: models::client::Client {
                id: row.try_get("client_id")?,
                name: row.try_get("client_name")?,
                cpf: row.try_get("client_cpf")?,
                age: row.try_get("client_age")?,
                is_admin: row.try_get("client_is_admin")?,
            },
            pet: models::pet::Pet {
                id: row.try_get("pet_id")?,
                client_id: row.try_get("pet_client_id")?,
                name: row.try_get("pet_name")?,
                breed: row.try_get("pet_breed")?,
                age: row.try_get("pet_age")?,
                size_in_centimeters: row.try_get("pet_size_in_centimeters")?,
            },
            services: vec![],
        })
    }
}

/// Unlinks and deletes each schedule on the given connection
async fn remove_schedules(conn: &mut SqliteConnection, schedule_ids: &[i64]) -> anyhow::Result<()> {
    for schedule_id in schedule_ids {
        association::unlink_all_for_schedule(&mut *conn, *schedule_id).await?;
        sqlx::query("DELETE FROM schedule WHERE id=$1;")
            .bind(*schedule_id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

impl SqlxSqliteRepo {
    /// Fills `services` of every schedule with a single lookup
    async fn attach_services(
        &self,
        mut schedules: Vec<models::schedule::ScheduleDetails>,
    ) -> anyhow::Result<Vec<models::schedule::ScheduleDetails>> {
        if schedules.is_empty() {
            return Ok(schedules);
        }

        let schedule_ids: Vec<i64> = schedules.iter().map(|s| s.id).collect();

        let rows = sqlx::query(sqlite_queries::QUERY_GET_SERVICES_OF_SCHEDULES)
            .bind(serde_json::to_string(&schedule_ids)?)
            .fetch_all(&self.db_pool)
            .await?;

        let mut by_schedule: BTreeMap<i64, Vec<models::service::Service>> = BTreeMap::new();
        for row in rows {
            let schedule_id: i64 = row.try_get("schedule_id")?;
            by_schedule
                .entry(schedule_id)
                .or_default()
                .push(models::service::Service::from_row(&row)?);
        }

        for schedule in schedules.iter_mut() {
            schedule.services = by_schedule.remove(&schedule.id).unwrap_or_default();
        }

        Ok(schedules)
    }
}

#[async_trait]
impl AppRepo for SqlxSqliteRepo {
    async fn max_id(&self, entity: models::Entity) -> anyhow::Result<Option<i64>> {
        Ok(
            sqlx::query_scalar(&format!("SELECT MAX(id) FROM {};", entity.table_name()))
                .fetch_one(&self.db_pool)
                .await?,
        )
    }

    async fn count(&self, entity: models::Entity) -> anyhow::Result<i64> {
        Ok(
            sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {};", entity.table_name()))
                .fetch_one(&self.db_pool)
                .await?,
        )
    }

    async fn exists(&self, entity: models::Entity, id: i64) -> anyhow::Result<bool> {
        Ok(sqlx::query_scalar(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id=$1);",
            entity.table_name()
        ))
        .bind(id)
        .fetch_one(&self.db_pool)
        .await?)
    }

    async fn insert_client(&self, client: &models::client::Client) -> anyhow::Result<i64> {
        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_CLIENT)
            .bind(id_to_bind(client.id))
            .bind(&client.name)
            .bind(&client.cpf)
            .bind(client.age)
            .bind(client.is_admin)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid())
    }

    async fn get_client(&self, client_id: i64) -> anyhow::Result<Option<models::client::Client>> {
        Ok(sqlx::query_as("SELECT * FROM client WHERE id=$1;")
            .bind(client_id)
            .fetch_optional(&self.db_pool)
            .await?)
    }

    async fn get_client_by_cpf(
        &self,
        cpf: &str,
    ) -> anyhow::Result<Option<models::client::Client>> {
        Ok(sqlx::query_as("SELECT * FROM client WHERE cpf=$1;")
            .bind(cpf)
            .fetch_optional(&self.db_pool)
            .await?)
    }

    async fn get_clients(
        &self,
        page: models::Pagination,
    ) -> anyhow::Result<Vec<models::client::Client>> {
        Ok(
            sqlx::query_as("SELECT * FROM client ORDER BY id ASC LIMIT $1 OFFSET $2;")
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn update_client(&self, client: &models::client::Client) -> anyhow::Result<()> {
        Ok(sqlx::query(sqlite_queries::QUERY_UPDATE_CLIENT)
            .bind(client.id)
            .bind(&client.name)
            .bind(&client.cpf)
            .bind(client.age)
            .bind(client.is_admin)
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn delete_client(&self, client_id: i64) -> anyhow::Result<()> {
        let mut transaction = self.db_pool.begin().await?;

        let schedule_ids: Vec<i64> = sqlx::query_scalar(sqlite_queries::QUERY_GET_CLIENT_SCHEDULE_IDS)
            .bind(client_id)
            .fetch_all(&mut *transaction)
            .await?;

        remove_schedules(&mut transaction, &schedule_ids).await?;

        sqlx::query("DELETE FROM pet WHERE client_id=$1;")
            .bind(client_id)
            .execute(&mut *transaction)
            .await?;

        sqlx::query("DELETE FROM client WHERE id=$1;")
            .bind(client_id)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(())
    }

    async fn insert_pet(&self, pet: &models::pet::Pet) -> anyhow::Result<i64> {
        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_PET)
            .bind(id_to_bind(pet.id))
            .bind(pet.client_id)
            .bind(&pet.name)
            .bind(&pet.breed)
            .bind(pet.age)
            .bind(pet.size_in_centimeters)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid())
    }

    async fn get_pet(&self, pet_id: i64) -> anyhow::Result<Option<models::pet::Pet>> {
        Ok(sqlx::query_as("SELECT * FROM pet WHERE id=$1;")
            .bind(pet_id)
            .fetch_optional(&self.db_pool)
            .await?)
    }

    async fn get_pets(&self, page: models::Pagination) -> anyhow::Result<Vec<models::pet::Pet>> {
        Ok(
            sqlx::query_as("SELECT * FROM pet ORDER BY id ASC LIMIT $1 OFFSET $2;")
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn get_pets_by_client(&self, client_id: i64) -> anyhow::Result<Vec<models::pet::Pet>> {
        Ok(
            sqlx::query_as("SELECT * FROM pet WHERE client_id=$1 ORDER BY id ASC;")
                .bind(client_id)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn update_pet(&self, pet: &models::pet::Pet) -> anyhow::Result<()> {
        Ok(sqlx::query(sqlite_queries::QUERY_UPDATE_PET)
            .bind(pet.id)
            .bind(pet.client_id)
            .bind(&pet.name)
            .bind(&pet.breed)
            .bind(pet.age)
            .bind(pet.size_in_centimeters)
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn delete_pet(&self, pet_id: i64) -> anyhow::Result<()> {
        let mut transaction = self.db_pool.begin().await?;

        let schedule_ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM schedule WHERE pet_id=$1;")
            .bind(pet_id)
            .fetch_all(&mut *transaction)
            .await?;

        remove_schedules(&mut transaction, &schedule_ids).await?;

        sqlx::query("DELETE FROM pet WHERE id=$1;")
            .bind(pet_id)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(())
    }

    async fn insert_service(&self, service: &models::service::Service) -> anyhow::Result<i64> {
        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_SERVICE)
            .bind(id_to_bind(service.id))
            .bind(service.duration_in_minutes)
            .bind(&service.type_service)
            .bind(encode_price(&service.price)?)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid())
    }

    async fn get_service(
        &self,
        service_id: i64,
    ) -> anyhow::Result<Option<models::service::Service>> {
        Ok(sqlx::query_as("SELECT * FROM services WHERE id=$1;")
            .bind(service_id)
            .fetch_optional(&self.db_pool)
            .await?)
    }

    async fn get_service_by_type(
        &self,
        type_service: &str,
    ) -> anyhow::Result<Option<models::service::Service>> {
        Ok(
            sqlx::query_as("SELECT * FROM services WHERE type_service=$1 LIMIT 1;")
                .bind(type_service)
                .fetch_optional(&self.db_pool)
                .await?,
        )
    }

    async fn get_services(
        &self,
        page: models::Pagination,
    ) -> anyhow::Result<Vec<models::service::Service>> {
        Ok(
            sqlx::query_as("SELECT * FROM services ORDER BY id ASC LIMIT $1 OFFSET $2;")
                .bind(page.limit)
                .bind(page.offset)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn get_services_by_price(
        &self,
        min_exclusive: Option<Decimal>,
        max_inclusive: Decimal,
    ) -> anyhow::Result<Vec<models::service::Service>> {
        let min_exclusive = min_exclusive.as_ref().map(encode_price).transpose()?;

        Ok(
            sqlx::query_as(sqlite_queries::QUERY_GET_SERVICES_BY_PRICE)
                .bind(min_exclusive)
                .bind(encode_price(&max_inclusive)?)
                .fetch_all(&self.db_pool)
                .await?,
        )
    }

    async fn update_service(&self, service: &models::service::Service) -> anyhow::Result<()> {
        Ok(sqlx::query(sqlite_queries::QUERY_UPDATE_SERVICE)
            .bind(service.id)
            .bind(service.duration_in_minutes)
            .bind(&service.type_service)
            .bind(encode_price(&service.price)?)
            .execute(&self.db_pool)
            .await
            .map(|_| ())?)
    }

    async fn delete_service(&self, service_id: i64) -> anyhow::Result<Vec<i64>> {
        let mut transaction = self.db_pool.begin().await?;

        let touched = association::unlink_all_for_service(&mut transaction, service_id).await?;

        let mut orphans = vec![];
        for schedule_id in touched {
            if association::remaining_services(&mut transaction, schedule_id).await? == 0 {
                orphans.push(schedule_id);
            }
        }

        remove_schedules(&mut transaction, &orphans).await?;

        sqlx::query("DELETE FROM services WHERE id=$1;")
            .bind(service_id)
            .execute(&mut *transaction)
            .await?;

        transaction.commit().await?;

        Ok(orphans)
    }

    async fn get_schedule(
        &self,
        schedule_id: i64,
    ) -> anyhow::Result<Option<models::schedule::Schedule>> {
        Ok(sqlx::query_as("SELECT * FROM schedule WHERE id=$1;")
            .bind(schedule_id)
            .fetch_optional(&self.db_pool)
            .await?)
    }

    async fn get_schedule_by_slot(
        &self,
        client_id: i64,
        date_schedule: &DateSchedule,
    ) -> anyhow::Result<Option<models::schedule::Schedule>> {
        Ok(sqlx::query_as(
            "SELECT * FROM schedule WHERE client_id=$1 AND date_schedule=$2 LIMIT 1;",
        )
        .bind(client_id)
        .bind(encode_date_schedule(date_schedule))
        .fetch_optional(&self.db_pool)
        .await?)
    }

    async fn insert_schedule(
        &self,
        schedule: &models::schedule::Schedule,
        service_ids: &[i64],
    ) -> anyhow::Result<ScheduleWrite> {
        let mut transaction = self.db_pool.begin().await?;

        let inserted = sqlx::query(sqlite_queries::QUERY_INSERT_SCHEDULE)
            .bind(id_to_bind(schedule.id))
            .bind(encode_date_schedule(&schedule.date_schedule))
            .bind(schedule.client_id)
            .bind(schedule.pet_id)
            .execute(&mut *transaction)
            .await;

        let schedule_id = match inserted {
            Ok(done) => done.last_insert_rowid(),
            Err(err) if is_unique_violation(&err) => {
                transaction.rollback().await?;
                return Ok(ScheduleWrite::SlotTaken);
            }
            Err(err) => return Err(err.into()),
        };

        for service_id in service_ids {
            let known: bool =
                sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM services WHERE id=$1);")
                    .bind(*service_id)
                    .fetch_one(&mut *transaction)
                    .await?;

            if !known {
                transaction.rollback().await?;
                return Ok(ScheduleWrite::MissingService(*service_id));
            }

            association::link(&mut transaction, schedule_id, *service_id).await?;
        }

        transaction.commit().await?;

        Ok(ScheduleWrite::Saved(schedule_id))
    }

    async fn update_schedule(
        &self,
        schedule: &models::schedule::Schedule,
    ) -> anyhow::Result<ScheduleWrite> {
        let updated = sqlx::query(sqlite_queries::QUERY_UPDATE_SCHEDULE)
            .bind(schedule.id)
            .bind(encode_date_schedule(&schedule.date_schedule))
            .bind(schedule.client_id)
            .bind(schedule.pet_id)
            .execute(&self.db_pool)
            .await;

        match updated {
            Ok(_) => Ok(ScheduleWrite::Saved(schedule.id)),
            Err(err) if is_unique_violation(&err) => Ok(ScheduleWrite::SlotTaken),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_schedule(&self, schedule_id: i64) -> anyhow::Result<()> {
        let mut transaction = self.db_pool.begin().await?;

        remove_schedules(&mut transaction, &[schedule_id]).await?;

        transaction.commit().await?;

        Ok(())
    }

    async fn get_schedule_services(
        &self,
        schedule_id: i64,
    ) -> anyhow::Result<Vec<models::service::Service>> {
        Ok(sqlx::query_as(
            r#"
            SELECT sv.*
            FROM schedule_services AS ss
            INNER JOIN services AS sv ON (sv.id = ss.services_id)
            WHERE ss.schedule_id=$1
            ORDER BY sv.id ASC;
            "#,
        )
        .bind(schedule_id)
        .fetch_all(&self.db_pool)
        .await?)
    }

    async fn get_schedule_details(
        &self,
        schedule_id: i64,
    ) -> anyhow::Result<Option<models::schedule::ScheduleDetails>> {
        let details: Option<models::schedule::ScheduleDetails> =
            sqlx::query_as(&sqlite_queries::query_get_schedule_details_by_id())
                .bind(schedule_id)
                .fetch_optional(&self.db_pool)
                .await?;

        let Some(details) = details else {
            return Ok(None);
        };

        Ok(self.attach_services(vec![details]).await?.pop())
    }

    async fn get_schedules_details(
        &self,
        page: models::Pagination,
    ) -> anyhow::Result<Vec<models::schedule::ScheduleDetails>> {
        let schedules: Vec<models::schedule::ScheduleDetails> =
            sqlx::query_as(&sqlite_queries::query_get_schedules_details_page())
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(&self.db_pool)
            .await?;

        self.attach_services(schedules).await
    }

    async fn get_schedules_details_between(
        &self,
        start: &DateSchedule,
        end: &DateSchedule,
    ) -> anyhow::Result<Vec<models::schedule::ScheduleDetails>> {
        let schedules: Vec<models::schedule::ScheduleDetails> =
            sqlx::query_as(&sqlite_queries::query_get_schedules_details_between())
            .bind(encode_date_schedule(start))
            .bind(encode_date_schedule(end))
            .fetch_all(&self.db_pool)
            .await?;

        self.attach_services(schedules).await
    }
}

#[cfg(test)]
pub(crate) mod test_utils {
    use super::SqlxSqliteRepo;
    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
    use std::str::FromStr;

    /// Single connection, so every query sees the same in-memory database
    pub async fn setup_memory_repo() -> SqlxSqliteRepo {
        let db_pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(
                SqliteConnectOptions::from_str("sqlite::memory:")
                    .unwrap()
                    .foreign_keys(true),
            )
            .await
            .unwrap();

        crate::utils::run_migrations(&db_pool).await.unwrap();

        SqlxSqliteRepo { db_pool }
    }
}
