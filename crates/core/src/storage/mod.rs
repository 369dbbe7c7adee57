mod error;
mod traits;
mod types;

pub use error::{DateRangeError, Result, StoreError};
pub use traits::CalendarStore;
pub use types::{years, DateRange, EventPredicate, Windows, SECONDS_PER_YEAR};
