use {
    super::storage::list_series_files,
    crate::{
        config::DF,
        domain::{Frequency, Instrument},
    },
    anyhow::{Context, Result},
    itertools::Itertools,
    serde::{Deserialize, Deserializer},
    std::{io::Read, path::Path},
};

/// One row of the instrument catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogEntry {
    pub identifier: String,
    #[serde(default)]
    pub sector: String,
    #[serde(deserialize_with = "deserialize_flag")]
    pub valid: bool,
}

fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(deserializer)?;
    Ok(matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    ))
}

/// Instruments offered in the selectors. Only validated entries are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrumentCatalog {
    entries: Vec<CatalogEntry>,
}

impl InstrumentCatalog {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let mut entries = Vec::new();
        for (line, row) in reader.deserialize::<CatalogEntry>().enumerate() {
            let entry = row.with_context(|| format!("Bad catalog row {}", line + 1))?;
            if entry.valid && !entry.identifier.is_empty() {
                entries.push(entry);
            }
        }
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open catalog {}", path.display()))?;
        Self::from_reader(file)
    }

    /// Every series file in the frequency directory, all under an empty sector.
    pub fn from_directory(data_root: &Path, frequency: Frequency) -> Result<Self> {
        let entries = list_series_files(&frequency.data_dir(data_root))?
            .iter()
            .filter_map(|p| Instrument::from_path(p))
            .filter(|inst| inst.frequency == frequency)
            .map(|inst| inst.identifier)
            .unique()
            .map(|identifier| CatalogEntry {
                identifier,
                sector: String::new(),
                valid: true,
            })
            .collect();
        Ok(Self { entries })
    }

    /// The catalog file when it exists, otherwise the directory listing.
    pub fn discover(catalog_path: &Path, data_root: &Path, frequency: Frequency) -> Result<Self> {
        if catalog_path.exists() {
            return Self::from_path(catalog_path);
        }
        if DF.log_catalog {
            log::info!(
                "No catalog at {}; listing {}",
                catalog_path.display(),
                frequency.data_dir(data_root).display()
            );
        }
        Self::from_directory(data_root, frequency)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Distinct non-empty sectors, sorted.
    pub fn sectors(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|e| e.sector.as_str())
            .filter(|s| !s.is_empty())
            .sorted()
            .dedup()
            .map(str::to_owned)
            .collect()
    }

    /// Identifiers in `sector`, or every identifier for `None`. Sorted, unique.
    pub fn identifiers(&self, sector: Option<&str>) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| sector.is_none_or(|s| e.sector == s))
            .map(|e| e.identifier.as_str())
            .sorted()
            .dedup()
            .map(str::to_owned)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = "\
identifier,sector,valid
SAN.MC,Banks,true
IBE.MC,Utilities,1
BBVA.MC,Banks,yes
DEAD.MC,Banks,false
ELE.MC, Utilities ,TRUE
NOSECTOR,,true
";

    #[test]
    fn keeps_only_valid_rows() {
        let catalog = InstrumentCatalog::from_reader(CATALOG.as_bytes()).unwrap();
        let all = catalog.identifiers(None);
        assert_eq!(all, vec!["BBVA.MC", "ELE.MC", "IBE.MC", "NOSECTOR", "SAN.MC"]);
        assert!(!all.contains(&"DEAD.MC".to_string()));
    }

    #[test]
    fn sectors_are_sorted_and_unique() {
        let catalog = InstrumentCatalog::from_reader(CATALOG.as_bytes()).unwrap();
        assert_eq!(catalog.sectors(), vec!["Banks", "Utilities"]);
        assert_eq!(catalog.identifiers(Some("Banks")), vec!["BBVA.MC", "SAN.MC"]);
        assert_eq!(catalog.identifiers(Some("Utilities")), vec!["ELE.MC", "IBE.MC"]);
        assert!(catalog.identifiers(Some("Energy")).is_empty());
    }

    #[test]
    fn directory_fallback_matches_frequency() {
        let root = tempfile::tempdir().unwrap();
        let hourly = Frequency::Hourly.data_dir(root.path());
        std::fs::create_dir_all(&hourly).unwrap();
        for name in ["IBE.MC_h.parquet", "SAN.MC_h.csv", "IBE.MC_h.csv", "stray.parquet"] {
            std::fs::write(hourly.join(name), b"").unwrap();
        }

        let catalog = InstrumentCatalog::discover(
            &root.path().join("missing.csv"),
            root.path(),
            Frequency::Hourly,
        )
        .unwrap();
        assert_eq!(catalog.identifiers(None), vec!["IBE.MC", "SAN.MC"]);
        assert!(catalog.sectors().is_empty());
    }
}
