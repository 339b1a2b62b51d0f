use chrono::{DateTime, Utc};
use sqlx::types::Json;

use super::PgStore;
use crate::{
    db::TrendAnalysisRepository,
    error::{AppError, AppResult},
    models::{Criteria, NewTrendAnalysis, TrendAnalysis, TrendResults},
};

const ANALYSIS_COLUMNS: &str = "id, user_id, category, region, analyzed_at, results, criteria";

/// Row shape with the JSONB columns still wrapped
#[derive(sqlx::FromRow)]
struct TrendAnalysisRow {
    id: i64,
    user_id: i64,
    category: String,
    region: String,
    analyzed_at: DateTime<Utc>,
    results: Json<TrendResults>,
    criteria: Json<Criteria>,
}

impl From<TrendAnalysisRow> for TrendAnalysis {
    fn from(row: TrendAnalysisRow) -> Self {
        TrendAnalysis {
            id: row.id,
            user_id: row.user_id,
            category: row.category,
            region: row.region,
            analyzed_at: row.analyzed_at,
            results: row.results.0,
            criteria: row.criteria.0,
        }
    }
}

#[async_trait::async_trait]
impl TrendAnalysisRepository for PgStore {
    async fn create(&self, analysis: NewTrendAnalysis) -> AppResult<TrendAnalysis> {
        let sql = format!(
            r#"
            INSERT INTO trend_analysis (user_id, category, region, analyzed_at, results, criteria)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            ANALYSIS_COLUMNS
        );
        let row = sqlx::query_as::<_, TrendAnalysisRow>(&sql)
            .bind(analysis.user_id)
            .bind(&analysis.category)
            .bind(&analysis.region)
            .bind(analysis.analyzed_at)
            .bind(Json(&analysis.results))
            .bind(Json(&analysis.criteria))
            .fetch_one(&self.pool)
            .await?;
        Ok(row.into())
    }

    async fn get_by_id(&self, id: i64) -> AppResult<Option<TrendAnalysis>> {
        let sql = format!("SELECT {} FROM trend_analysis WHERE id = $1", ANALYSIS_COLUMNS);
        let row = sqlx::query_as::<_, TrendAnalysisRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(TrendAnalysis::from))
    }

    async fn get_by_user(&self, user_id: i64) -> AppResult<Vec<TrendAnalysis>> {
        let sql = format!(
            "SELECT {} FROM trend_analysis WHERE user_id = $1 ORDER BY analyzed_at DESC, id DESC",
            ANALYSIS_COLUMNS
        );
        let rows = sqlx::query_as::<_, TrendAnalysisRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(TrendAnalysis::from).collect())
    }

    async fn update(&self, analysis: &TrendAnalysis) -> AppResult<TrendAnalysis> {
        let sql = format!(
            r#"
            UPDATE trend_analysis
            SET category = $1, region = $2, results = $3, criteria = $4
            WHERE id = $5
            RETURNING {}
            "#,
            ANALYSIS_COLUMNS
        );
        sqlx::query_as::<_, TrendAnalysisRow>(&sql)
            .bind(&analysis.category)
            .bind(&analysis.region)
            .bind(Json(&analysis.results))
            .bind(Json(&analysis.criteria))
            .bind(analysis.id)
            .fetch_optional(&self.pool)
            .await?
            .map(TrendAnalysis::from)
            .ok_or_else(|| AppError::NotFound(format!("Analysis {} not found", analysis.id)))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM trend_analysis WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
