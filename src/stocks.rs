//! 股票代码表的持久化。

use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{
    error::{RadarError, Result},
    model::stock::{NewStock, Stock},
};

const CREATE_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS stocks (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    symbol TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
)";

/// SQLite 上的股票代码仓库。
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    /// 包装一个已连接的连接池。
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// 连接到数据库并确保表结构存在。
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("正在连接股票数据库: {}", database_url);
        let pool = SqlitePool::connect(database_url).await?;
        let repo = Self::new(pool);
        repo.init_schema().await?;
        Ok(repo)
    }

    /// 创建 `stocks` 表（如果尚不存在）。
    pub async fn init_schema(&self) -> Result<()> {
        sqlx::query(CREATE_TABLE_SQL).execute(&self.pool).await?;
        Ok(())
    }

    /// 按插入顺序列出所有股票代码。
    pub async fn list(&self) -> Result<Vec<Stock>> {
        let stocks: Vec<Stock> = sqlx::query_as("SELECT symbol, name FROM stocks ORDER BY id")
            .fetch_all(&self.pool)
            .await?;
        Ok(stocks)
    }

    /// 新增一条股票代码。
    ///
    /// 代码会去掉首尾空白并转为大写，名称去掉首尾空白。
    ///
    /// # 返回
    /// 任一字段为空或代码已存在时返回 `RadarError::Validation`。
    pub async fn add(&self, new_stock: NewStock) -> Result<Stock> {
        let symbol = new_stock.symbol.trim().to_uppercase();
        let name = new_stock.name.trim().to_string();
        if symbol.is_empty() || name.is_empty() {
            return Err(RadarError::validation("symbol 和 name 均不能为空"));
        }

        let result = sqlx::query("INSERT INTO stocks (symbol, name) VALUES (?, ?)")
            .bind(&symbol)
            .bind(&name)
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                debug!("已添加股票代码 {} ({})", symbol, name);
                Ok(Stock { symbol, name })
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => Err(
                RadarError::validation(format!("股票代码 {symbol} 已存在")),
            ),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::test_utils::init_tracing;

    async fn memory_repo() -> StockRepository {
        // 内存数据库只在单个连接内存在
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let repo = StockRepository::new(pool);
        repo.init_schema().await.unwrap();
        repo
    }

    fn new_stock(symbol: &str, name: &str) -> NewStock {
        NewStock {
            symbol: symbol.to_string(),
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_and_list_in_insertion_order() {
        init_tracing();
        let repo = memory_repo().await;
        assert!(repo.list().await.unwrap().is_empty());

        repo.add(new_stock("spot", "Spotify Technology")).await.unwrap();
        repo.add(new_stock(" SIRI ", " Sirius XM ")).await.unwrap();

        let stocks = repo.list().await.unwrap();
        assert_eq!(
            stocks,
            vec![
                Stock {
                    symbol: "SPOT".to_string(),
                    name: "Spotify Technology".to_string()
                },
                Stock {
                    symbol: "SIRI".to_string(),
                    name: "Sirius XM".to_string()
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_symbol_is_rejected() {
        init_tracing();
        let repo = memory_repo().await;
        repo.add(new_stock("SPOT", "Spotify")).await.unwrap();

        let err = repo.add(new_stock("spot", "Spotify again")).await.unwrap_err();
        assert!(matches!(err, RadarError::Validation(_)));
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected() {
        init_tracing();
        let repo = memory_repo().await;

        assert!(matches!(
            repo.add(new_stock("  ", "Name")).await,
            Err(RadarError::Validation(_))
        ));
        assert!(matches!(
            repo.add(new_stock("ABC", "")).await,
            Err(RadarError::Validation(_))
        ));
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_init_schema_is_idempotent() {
        init_tracing();
        let repo = memory_repo().await;
        repo.add(new_stock("SPOT", "Spotify")).await.unwrap();
        repo.init_schema().await.unwrap();
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }
}
