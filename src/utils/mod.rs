mod perf;
mod time_utils;

pub use time_utils::{
    TimeUtils, end_of_day, format_duration, format_timestamp, from_plot_x, start_of_day,
    to_plot_x,
};
