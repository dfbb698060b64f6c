use {
    super::{
        csv_codec::{read_csv, write_csv},
        parquet_codec::{read_parquet, write_parquet},
        table::RawTable,
    },
    crate::{config::PERSISTENCE, domain::Instrument},
    anyhow::{Context, Result, bail},
    std::{
        fs::{self, File},
        io::{BufReader, BufWriter},
        path::{Path, PathBuf},
    },
};

/// Physical encoding of a stored series, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageFormat {
    Csv,
    Parquet,
}

impl StorageFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(StorageFormat::Csv),
            "parquet" => Some(StorageFormat::Parquet),
            _ => None,
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            StorageFormat::Csv => "csv",
            StorageFormat::Parquet => "parquet",
        }
    }
}

impl std::fmt::Display for StorageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

fn format_of(path: &Path) -> Result<StorageFormat> {
    match StorageFormat::from_path(path) {
        Some(format) => Ok(format),
        None => bail!("Unsupported series file (expected .csv or .parquet): {}", path.display()),
    }
}

pub fn read_table(path: &Path) -> Result<RawTable> {
    let format = format_of(path)?;
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let table = match format {
        StorageFormat::Csv => read_csv(BufReader::new(file)),
        StorageFormat::Parquet => read_parquet(file),
    };
    table.with_context(|| format!("Failed to read {}", path.display()))
}

// Helper function to create a new file and any missing parent directories.
fn create_file_with_parents(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))
}

fn write_table_as(path: &Path, format: StorageFormat, table: &RawTable) -> Result<()> {
    let file = create_file_with_parents(path)?;
    let result = match format {
        StorageFormat::Csv => write_csv(table, BufWriter::new(file)),
        StorageFormat::Parquet => write_parquet(table, file),
    };
    result.with_context(|| format!("Failed to write {}", path.display()))
}

/// Writes `table` to `path` in the encoding its extension names.
pub fn write_table(path: &Path, table: &RawTable) -> Result<()> {
    write_table_as(path, format_of(path)?, table)
}

/// Sibling file a replacement is staged in, e.g. `AAPL.csv.tmp`.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".");
    name.push(PERSISTENCE.data.temp_extension);
    path.with_file_name(name)
}

/// Replaces `path` with `table` without ever leaving a partial file behind:
/// the table is written to a sibling file first and renamed over the target.
pub fn replace_table(path: &Path, table: &RawTable) -> Result<()> {
    let format = format_of(path)?;
    let staged = staging_path(path);

    if let Err(e) = write_table_as(&staged, format, table) {
        let _ = fs::remove_file(&staged);
        return Err(e);
    }
    if let Err(e) = fs::rename(&staged, path) {
        let _ = fs::remove_file(&staged);
        return Err(e).with_context(|| format!("Failed to move {} into place", staged.display()));
    }
    Ok(())
}

/// Series files (`.csv`/`.parquet`) directly inside `dir`, sorted by name.
/// A missing directory lists as empty.
pub fn list_series_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && StorageFormat::from_path(p).is_some())
        .collect();
    files.sort();
    Ok(files)
}

/// The stored file for `instrument` under `data_root`. Parquet wins when both
/// encodings exist.
pub fn find_series_file(data_root: &Path, instrument: &Instrument) -> Option<PathBuf> {
    let dir = instrument.frequency.data_dir(data_root);
    [StorageFormat::Parquet, StorageFormat::Csv]
        .iter()
        .map(|format| dir.join(instrument.file_name(format.extension())))
        .find(|path| path.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(StorageFormat::from_path(Path::new("a/B.CSV")), Some(StorageFormat::Csv));
        assert_eq!(
            StorageFormat::from_path(Path::new("IBE.MC_h.parquet")),
            Some(StorageFormat::Parquet)
        );
        assert_eq!(StorageFormat::from_path(Path::new("notes.txt")), None);
        assert_eq!(StorageFormat::from_path(Path::new("AAPL.csv.tmp")), None);
    }

    #[test]
    fn staging_path_is_a_sibling() {
        assert_eq!(
            staging_path(Path::new("data/daily/AAPL.csv")),
            PathBuf::from("data/daily/AAPL.csv.tmp")
        );
    }

    #[test]
    fn listing_skips_other_files_and_missing_dirs() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.parquet", "a.csv", "readme.md", "a.csv.tmp"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let names: Vec<String> = list_series_files(dir.path())
            .unwrap()
            .iter()
            .filter_map(|p| p.file_name()?.to_str().map(str::to_owned))
            .collect();
        assert_eq!(names, vec!["a.csv", "b.parquet"]);
        assert!(list_series_files(&dir.path().join("nope")).unwrap().is_empty());
    }

    #[test]
    fn series_file_prefers_parquet() {
        use crate::domain::Frequency;

        let root = tempfile::tempdir().unwrap();
        let daily = root.path().join(PERSISTENCE.data.daily_dir);
        fs::create_dir_all(&daily).unwrap();
        fs::write(daily.join("AAPL.csv"), b"").unwrap();

        let aapl = Instrument::new("AAPL", Frequency::Daily);
        assert_eq!(find_series_file(root.path(), &aapl), Some(daily.join("AAPL.csv")));

        fs::write(daily.join("AAPL.parquet"), b"").unwrap();
        assert_eq!(find_series_file(root.path(), &aapl), Some(daily.join("AAPL.parquet")));

        let hourly = Instrument::new("AAPL", Frequency::Hourly);
        assert_eq!(find_series_file(root.path(), &hourly), None);
    }
}
