pub(crate) mod date;
pub(crate) mod timezone;

pub(crate) use date::{parse_date, parse_date_opt};
pub(crate) use timezone::Timezone;
