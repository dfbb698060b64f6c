use {
    crate::config::PERSISTENCE,
    serde::{Deserialize, Serialize},
    std::path::{Path, PathBuf},
    strum_macros::EnumIter,
};

/// Bar granularity of a stored series.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Hash, Eq, PartialEq, EnumIter, Default)]
pub enum Frequency {
    #[default]
    Daily,
    Hourly,
}

impl Frequency {
    pub fn data_dir(&self, root: &Path) -> PathBuf {
        match self {
            Frequency::Daily => root.join(PERSISTENCE.data.daily_dir),
            Frequency::Hourly => root.join(PERSISTENCE.data.hourly_dir),
        }
    }

    /// File-name suffix that marks this granularity.
    pub fn file_suffix(&self) -> &'static str {
        match self {
            Frequency::Daily => "",
            Frequency::Hourly => PERSISTENCE.data.hourly_suffix,
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Frequency::Daily => write!(f, "Daily"),
            Frequency::Hourly => write!(f, "Hourly"),
        }
    }
}

/// An instrument identifier plus the granularity of its stored history.
#[derive(Serialize, Deserialize, Debug, Clone, Hash, Eq, PartialEq)]
pub struct Instrument {
    pub identifier: String,
    pub frequency: Frequency,
}

impl Instrument {
    pub fn new(identifier: impl Into<String>, frequency: Frequency) -> Self {
        Self {
            identifier: identifier.into(),
            frequency,
        }
    }

    /// The base name is the identifier; a trailing `_h` marks hourly data.
    pub fn from_path(path: &Path) -> Option<Self> {
        let stem = path.file_stem()?.to_str()?;
        let suffix = PERSISTENCE.data.hourly_suffix;
        match stem.strip_suffix(suffix) {
            Some(identifier) if !identifier.is_empty() => {
                Some(Self::new(identifier, Frequency::Hourly))
            }
            _ => Some(Self::new(stem, Frequency::Daily)),
        }
    }

    pub fn file_stem(&self) -> String {
        format!("{}{}", self.identifier, self.frequency.file_suffix())
    }

    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self.file_stem(), extension)
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} ({})", self.identifier, self.frequency)
    }
}
