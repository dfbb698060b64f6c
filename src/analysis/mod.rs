// Pure analysis pipeline over loaded price series
mod date_filter;
mod level_clusterer;
mod level_detector;
mod ratio_aligner;
mod sr_levels;

pub use {
    date_filter::filter,
    level_clusterer::cluster,
    level_detector::{CandidateLevels, detect, pivot_indices},
    ratio_aligner::{align_and_ratio, common_dates, compare, date_overlap},
    sr_levels::find_levels,
};
