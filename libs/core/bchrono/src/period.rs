mod cache;
mod month;
mod period;

pub use cache::{month_cache, MonthCache};
pub use month::{Month, MonthIter, NotFirstDayOfMonth, ParseMonthError};
pub use period::{InvalidPeriod, Period};
