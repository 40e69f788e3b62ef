//! 定义了各个流水线对外返回的数据模型。
//!
//! 这些结构体都是一次请求内的临时投影：由 Provider 从上游响应中转换得到，
//! 序列化为响应后即被丢弃，只包含对外声明过的字段。

pub mod mention;
pub mod show;
pub mod stock;
pub mod video;
