mod csv;
mod format;
mod json;
mod period;
mod prompt;
mod table;

pub(crate) use csv::{output_breakdown_csv, output_cross_csv, output_period_csv};
pub(crate) use format::NumberFormat;
pub(crate) use json::{
    output_breakdown_json, output_cross_json, output_lookup_json, output_period_json,
    output_summary_json,
};
pub(crate) use prompt::render_context;
pub(crate) use table::{
    TableOptions, print_breakdown_table, print_cross_table, print_date_lookup, print_load_line,
    print_period_table, print_summary_table,
};
