//! Market data: provider trait, Yahoo and in-memory providers, alignment.

pub mod align;
pub mod memory;
pub mod provider;
pub mod yahoo;

pub use align::{align_closes, fetch_closes, PriceTable};
pub use memory::MemoryProvider;
pub use provider::{
    resolve_range, DataError, DataProvider, DataSource, FetchResult, ProviderConfig,
    ProviderSource, RawBar,
};
pub use yahoo::YahooProvider;
