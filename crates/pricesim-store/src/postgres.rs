//! PostgreSQL 저장소 구현.
//!
//! `bulk_update`는 UNNEST 패턴으로 패치 전체를 단일 왕복으로 적용합니다
//! (N+1 쿼리 방지). 사라진 식별자는 조인에 매치되지 않을 뿐 에러가 아니며,
//! `rows_affected`가 곧 "실제 수정 수"입니다.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::debug;

use pricesim_core::{AssetRecord, PriceUpdate};

use crate::error::Result;
use crate::store::AssetStore;

/// 자산 테이블 데이터베이스 레코드.
#[derive(Debug, FromRow)]
struct AssetRow {
    id: String,
    price: f64,
    base_price: Option<f64>,
    supply: Option<f64>,
}

/// PostgreSQL 자산 저장소.
#[derive(Clone)]
pub struct PgAssetStore {
    pool: PgPool,
}

impl PgAssetStore {
    /// 기존 풀로 생성.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// URL로 연결 후 생성.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// `assets` 테이블이 없으면 생성.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS assets (
                id          TEXT PRIMARY KEY,
                price       DOUBLE PRECISION NOT NULL,
                base_price  DOUBLE PRECISION,
                change_24h  DOUBLE PRECISION NOT NULL DEFAULT 0,
                market_cap  DOUBLE PRECISION NOT NULL DEFAULT 0,
                supply      DOUBLE PRECISION,
                updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl AssetStore for PgAssetStore {
    async fn fetch_all(&self) -> Result<Vec<AssetRecord>> {
        let rows: Vec<AssetRow> = sqlx::query_as(
            r#"
            SELECT id, price, base_price, supply
            FROM assets
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "자산 레코드 조회");

        Ok(rows
            .into_iter()
            .map(|r| AssetRecord {
                id: r.id,
                price: r.price,
                base_price: r.base_price,
                supply: r.supply,
            })
            .collect())
    }

    async fn bulk_update(&self, updates: &[PriceUpdate]) -> Result<u64> {
        if updates.is_empty() {
            return Ok(0);
        }

        let mut ids: Vec<String> = Vec::with_capacity(updates.len());
        let mut prices: Vec<f64> = Vec::with_capacity(updates.len());
        let mut base_prices: Vec<f64> = Vec::with_capacity(updates.len());
        let mut changes: Vec<f64> = Vec::with_capacity(updates.len());
        let mut caps: Vec<f64> = Vec::with_capacity(updates.len());
        let mut times: Vec<DateTime<Utc>> = Vec::with_capacity(updates.len());

        for u in updates {
            ids.push(u.id.clone());
            prices.push(u.price);
            base_prices.push(u.base_price);
            changes.push(u.change_24h);
            caps.push(u.market_cap);
            times.push(u.updated_at);
        }

        // 단일 UPDATE ... FROM UNNEST 왕복. 패치 간 순서 보장 없음.
        let result = sqlx::query(
            r#"
            UPDATE assets AS a SET
                price      = u.price,
                base_price = u.base_price,
                change_24h = u.change_24h,
                market_cap = u.market_cap,
                updated_at = u.updated_at
            FROM (
                SELECT *
                FROM UNNEST(
                    $1::text[], $2::float8[], $3::float8[],
                    $4::float8[], $5::float8[], $6::timestamptz[]
                ) AS t(id, price, base_price, change_24h, market_cap, updated_at)
            ) AS u
            WHERE a.id = u.id
            "#,
        )
        .bind(&ids)
        .bind(&prices)
        .bind(&base_prices)
        .bind(&changes)
        .bind(&caps)
        .bind(&times)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}
