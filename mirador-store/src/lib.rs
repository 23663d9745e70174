pub mod app_config;
pub mod bridge;
pub mod database;
pub mod memory;
pub mod proposal_repo;
pub mod realtime;
pub mod redis_transport;
pub mod reservation_repo;

pub use bridge::SyncBridge;
pub use database::DbClient;
pub use realtime::{ChannelManager, ChangeEvent, ChangeOp, RowChange};
pub use redis_transport::RedisTransport;
