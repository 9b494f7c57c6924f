pub mod error;
pub mod generators;
pub mod order_statistics;
pub mod pool;
pub mod stream;
pub mod stream_configuration;

// Re-export the engine and its collaborators at the crate root
pub use error::{StreamError, StreamResult};
pub use order_statistics::RunningMedian;
pub use pool::{
    BulkMapper,
    InlineMapper,
    InlinePool,
    PoolProvider,
    SequentialPool,
    Task,
    TokioBulkMapper,
    TokioPool,
};
pub use stream::{RS2Stream, Stream};
pub use stream_configuration::{ConcurrencyOptions, ExecutorKind};
