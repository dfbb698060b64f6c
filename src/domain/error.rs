use std::{error::Error, fmt};

/// Recoverable failures the presentation layer turns into user-facing messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerError {
    /// A required column is absent from the source.
    Format(String),
    /// No valid rows remain after cleaning.
    EmptyData,
    /// The two series share no date range.
    NoOverlap,
    /// The ratio computation produced no finite rows.
    NoRatioData,
    /// The external fetch failed or returned nothing.
    RefreshUnavailable(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ViewerError::Format(msg) => write!(f, "Format error: {}", msg),
            ViewerError::EmptyData => {
                write!(f, "No valid dates or prices could be read from the source")
            }
            ViewerError::NoOverlap => write!(f, "The two series have no overlapping dates"),
            ViewerError::NoRatioData => {
                write!(f, "Not enough data to compute the ratio in the selected range")
            }
            ViewerError::RefreshUnavailable(msg) => write!(f, "Refresh unavailable: {}", msg),
        }
    }
}

impl Error for ViewerError {}

/// Pulls a `ViewerError` out of an `anyhow` chain, if one is in there.
pub fn as_viewer_error(err: &anyhow::Error) -> Option<&ViewerError> {
    err.chain().find_map(|cause| cause.downcast_ref::<ViewerError>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn typed_error_survives_context_wrapping() {
        let res: anyhow::Result<()> = Err(ViewerError::EmptyData).context("loading AAPL.csv");
        let err = res.unwrap_err();
        assert_eq!(as_viewer_error(&err), Some(&ViewerError::EmptyData));
    }

    #[test]
    fn unrelated_errors_are_not_matched() {
        let err = anyhow::anyhow!("disk on fire");
        assert!(as_viewer_error(&err).is_none());
    }
}
