pub mod normalize;
pub mod provider;
pub mod wake;

pub use normalize::{coalesce, normalize_night, select_source};
pub use provider::{fetch_wake_records, InMemorySleepProvider, SampleFuture, SleepSampleProvider};
pub use wake::{latest_asleep_end, resolve_wake_record, resolve_wake_time};
