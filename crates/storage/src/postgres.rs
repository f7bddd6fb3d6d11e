use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{
    City, PickupPoint, PickupPointId, Product, ProductId, ProductType, Reception, ReceptionId,
    ReceptionStatus,
};
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use uuid::Uuid;

use crate::{
    PointQuery, PointRow, Result, StoreError,
    store::{Store, StoreTx},
};

const OPEN_RECEPTION_CONSTRAINT: &str = "reception_one_in_progress_per_point";
const PICKUP_POINT_FK: &str = "reception_pickup_point_id_fkey";

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        Ok(())
    }

    fn row_to_point_row(row: PgRow) -> Result<PointRow> {
        let city: String = row.try_get("city")?;
        let pickup_point = PickupPoint {
            id: PickupPointId::from_uuid(row.try_get::<Uuid, _>("pvz_id")?),
            registration_date: row.try_get("registration_date")?,
            city: city.parse::<City>()?,
        };

        let reception = match row.try_get::<Option<Uuid>, _>("reception_id")? {
            Some(id) => {
                let status: String = row.try_get("status")?;
                Some(Reception {
                    id: ReceptionId::from_uuid(id),
                    date_time: row.try_get("reception_date_time")?,
                    pvz_id: pickup_point.id,
                    status: status.parse::<ReceptionStatus>()?,
                })
            }
            None => None,
        };

        let product = match (&reception, row.try_get::<Option<Uuid>, _>("product_id")?) {
            (Some(reception), Some(id)) => {
                let product_type: String = row.try_get("product_type")?;
                Some(Product {
                    id: ProductId::from_uuid(id),
                    date_time: row.try_get("product_date_time")?,
                    product_type: product_type.parse::<ProductType>()?,
                    reception_id: reception.id,
                })
            }
            _ => None,
        };

        Ok(PointRow {
            pickup_point,
            reception,
            product,
        })
    }
}

#[async_trait]
impl Store for PostgresStore {
    type Tx = PostgresTx;

    async fn begin(&self) -> Result<PostgresTx> {
        let tx = self.pool.begin().await?;
        Ok(PostgresTx { tx })
    }

    async fn insert_pickup_point(&self, point: &PickupPoint) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO pickup_point (id, registration_date, city)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(point.id.as_uuid())
        .bind(point.registration_date)
        .bind(point.city.as_str())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn fetch_point_rows(&self, query: &PointQuery) -> Result<Vec<PointRow>> {
        // Page over distinct pickup points first, then join their receptions
        // and products. The same date bounds decide which points qualify and
        // which receptions are attached.
        let rows = sqlx::query(
            r#"
            WITH points AS (
                SELECT p.id, p.city, p.registration_date
                FROM pickup_point p
                WHERE ($1::timestamptz IS NULL AND $2::timestamptz IS NULL)
                   OR EXISTS (
                        SELECT 1 FROM reception r
                        WHERE r.pickup_point_id = p.id
                          AND ($1::timestamptz IS NULL OR r.date_time >= $1)
                          AND ($2::timestamptz IS NULL OR r.date_time <= $2)
                   )
                ORDER BY p.id
                LIMIT $3 OFFSET $4
            )
            SELECT
                pt.id AS pvz_id, pt.city, pt.registration_date,
                r.id AS reception_id, r.date_time AS reception_date_time, r.status,
                pr.id AS product_id, pr.date_time AS product_date_time, pr.product_type
            FROM points pt
            LEFT JOIN reception r
                ON r.pickup_point_id = pt.id
               AND ($1::timestamptz IS NULL OR r.date_time >= $1)
               AND ($2::timestamptz IS NULL OR r.date_time <= $2)
            LEFT JOIN product pr ON pr.reception_id = r.id
            ORDER BY pt.id, r.date_time, r.id, pr.date_time, pr.seq
            "#,
        )
        .bind(query.start_date)
        .bind(query.end_date)
        .bind(i64::try_from(query.limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(query.offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_point_row).collect()
    }
}

/// A PostgreSQL transaction. Rolls back on drop unless committed.
pub struct PostgresTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTx for PostgresTx {
    async fn open_reception_id(
        &mut self,
        pickup_point_id: PickupPointId,
    ) -> Result<Option<ReceptionId>> {
        let id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM reception
            WHERE pickup_point_id = $1 AND status = 'in_progress'
            FOR UPDATE
            "#,
        )
        .bind(pickup_point_id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(id.map(ReceptionId::from_uuid))
    }

    async fn insert_reception(&mut self, reception: &Reception) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO reception (id, date_time, pickup_point_id, status)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(reception.id.as_uuid())
        .bind(reception.date_time)
        .bind(reception.pvz_id.as_uuid())
        .bind(reception.status.as_str())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                let constraint = db_err.constraint();
                if let Some(name) = constraint {
                    tracing::debug!(
                        constraint = name,
                        pvz_id = %reception.pvz_id,
                        "reception insert rejected"
                    );
                }
                match constraint {
                    Some(OPEN_RECEPTION_CONSTRAINT) => {
                        return StoreError::OpenReceptionExists {
                            pickup_point_id: reception.pvz_id,
                        };
                    }
                    Some(PICKUP_POINT_FK) => {
                        return StoreError::PickupPointNotFound(reception.pvz_id);
                    }
                    _ => {}
                }
            }
            StoreError::Database(e)
        })?;

        Ok(())
    }

    async fn close_reception(&mut self, reception_id: ReceptionId) -> Result<Reception> {
        let row: Option<PgRow> = sqlx::query(
            r#"
            UPDATE reception SET status = 'closed'
            WHERE id = $1 AND status = 'in_progress'
            RETURNING id, date_time, pickup_point_id, status
            "#,
        )
        .bind(reception_id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await?;

        let row = row.ok_or(StoreError::ReceptionNotOpen(reception_id))?;
        let status: String = row.try_get("status")?;
        Ok(Reception {
            id: ReceptionId::from_uuid(row.try_get::<Uuid, _>("id")?),
            date_time: row.try_get::<DateTime<Utc>, _>("date_time")?,
            pvz_id: PickupPointId::from_uuid(row.try_get::<Uuid, _>("pickup_point_id")?),
            status: status.parse::<ReceptionStatus>()?,
        })
    }

    async fn insert_product(&mut self, product: &Product) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO product (id, date_time, product_type, reception_id)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(product.date_time)
        .bind(product.product_type.as_str())
        .bind(product.reception_id.as_uuid())
        .execute(&mut *self.tx)
        .await?;

        Ok(())
    }

    async fn delete_last_product(&mut self, reception_id: ReceptionId) -> Result<ProductId> {
        let id: Option<Uuid> = sqlx::query_scalar(
            r#"
            DELETE FROM product
            WHERE id = (
                SELECT id FROM product
                WHERE reception_id = $1
                ORDER BY date_time DESC, seq DESC
                LIMIT 1
            )
            RETURNING id
            "#,
        )
        .bind(reception_id.as_uuid())
        .fetch_optional(&mut *self.tx)
        .await?;

        id.map(ProductId::from_uuid)
            .ok_or(StoreError::ProductNotFound { reception_id })
    }

    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self) -> Result<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}
