//! 股票代码表的数据模型。

use serde::{Deserialize, Serialize};

/// 一条已保存的股票代码。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Stock {
    /// 大写的股票代码。
    pub symbol: String,
    /// 公司名称。
    pub name: String,
}

/// `/add-stock` 的请求体。
#[derive(Debug, Clone, Deserialize)]
pub struct NewStock {
    /// 股票代码。
    pub symbol: String,
    /// 公司名称。
    pub name: String,
}
