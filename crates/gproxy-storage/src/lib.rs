pub mod entities;
pub mod seaorm;
pub mod sinks;
pub mod snapshot;
pub mod storage;

pub use seaorm::SeaOrmStorage;
pub use sinks::DbEventSink;
pub use snapshot::{CredentialRow, GlobalConfigRow, ProviderRow, StorageSnapshot, UserKeyRow, UserRow};
pub use storage::{
    LogCursor, LogQueryFilter, LogQueryResult, LogRecord, LogRecordKind, Storage, StorageError,
    StorageResult, UsageAggregate, UsageAggregateFilter,
};
