use crate::{
    error::{AppError, AppResult},
    models::{Platform, WhereToWatch},
};
use std::{collections::HashMap, io, path::Path};

const TITLE_COLUMN: &str = "Title";

/// In-memory streaming availability, keyed by exact title
///
/// Built once at startup and shared read-only for the life of the process.
#[derive(Debug, Default)]
pub struct AvailabilityTable {
    rows: HashMap<String, [bool; 4]>,
}

/// Index columns written by dataframe exports carry no data
fn is_auto_index_column(name: &str) -> bool {
    let name = name.trim();
    name.is_empty() || name.starts_with("Unnamed")
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "1.0" | "true" | "True" => Some(true),
        "0" | "0.0" | "false" | "False" | "" => Some(false),
        _ => None,
    }
}

impl AvailabilityTable {
    /// Loads the dataset from a CSV file
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        tracing::info!(path = %path.display(), "Loading availability dataset");

        let file = std::fs::File::open(path).map_err(|e| {
            AppError::Config(format!(
                "Cannot open availability dataset {}: {}",
                path.display(),
                e
            ))
        })?;

        let table = Self::from_reader(file)?;

        tracing::info!(titles = table.len(), "Availability dataset loaded");

        Ok(table)
    }

    /// Parses the dataset from any CSV source
    pub fn from_reader<R: io::Read>(reader: R) -> AppResult<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(false).from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| !is_auto_index_column(h) && h.trim() == name)
                .ok_or_else(|| {
                    AppError::Config(format!("Availability dataset is missing column '{}'", name))
                })
        };

        let title_idx = column(TITLE_COLUMN)?;
        let mut platform_idx = [0usize; 4];
        for (slot, platform) in platform_idx.iter_mut().zip(Platform::ALL) {
            *slot = column(platform.name())?;
        }

        let mut rows = HashMap::new();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let title = record.get(title_idx).unwrap_or_default().to_string();

            let mut flags = [false; 4];
            for ((flag, idx), platform) in flags.iter_mut().zip(platform_idx).zip(Platform::ALL) {
                let raw = record.get(idx).unwrap_or_default();
                *flag = parse_flag(raw).ok_or_else(|| {
                    AppError::Config(format!(
                        "Malformed '{}' value {:?} on data row {}",
                        platform.name(),
                        raw,
                        line + 1
                    ))
                })?;
            }

            // First row wins for duplicated titles
            rows.entry(title).or_insert(flags);
        }

        Ok(Self { rows })
    }

    /// Where a title can be watched; exact, case-sensitive match
    pub fn lookup(&self, title: &str) -> WhereToWatch {
        let Some(flags) = self.rows.get(title) else {
            tracing::debug!(title = %title, "No availability row");
            return WhereToWatch::Purchase;
        };

        let platforms: Vec<Platform> = Platform::ALL
            .into_iter()
            .zip(flags)
            .filter_map(|(platform, &active)| active.then_some(platform))
            .collect();

        if platforms.is_empty() {
            WhereToWatch::Purchase
        } else {
            WhereToWatch::Streaming(platforms)
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = "\
,ID,Title,Year,Age,IMDb,Rotten Tomatoes,Netflix,Hulu,Prime Video,Disney+,Type
0,1,Dune,2021,13+,8.0/10,83/100,1,0,0,0,0
1,2,Inception,2010,13+,8.8/10,87/100,1,1,1,0,0
2,3,Old Silent Film,1925,all,7.1/10,90/100,0,0,0,0,0
3,4,dune,1984,13+,6.3/10,36/100,0,0,0,1,0
4,5,Inception,2010,13+,8.8/10,87/100,0,0,0,1,0
";

    fn sample_table() -> AvailabilityTable {
        AvailabilityTable::from_reader(SAMPLE.as_bytes()).unwrap()
    }

    #[test]
    fn test_lookup_single_platform() {
        let table = sample_table();
        assert_eq!(table.lookup("Dune"), WhereToWatch::Streaming(vec![Platform::Netflix]));
        assert_eq!(table.lookup("Dune").labels(), vec!["Netflix"]);
    }

    #[test]
    fn test_lookup_multiple_platforms_in_column_order() {
        let table = sample_table();
        assert_eq!(
            table.lookup("Inception"),
            WhereToWatch::Streaming(vec![Platform::Netflix, Platform::Hulu, Platform::PrimeVideo])
        );
    }

    #[test]
    fn test_lookup_unknown_title_falls_back() {
        let table = sample_table();
        assert_eq!(table.lookup("Unknown Movie"), WhereToWatch::Purchase);
        assert_eq!(table.lookup("Unknown Movie").labels(), vec!["Buy movie online"]);
    }

    #[test]
    fn test_lookup_without_active_flags_falls_back() {
        let table = sample_table();
        assert_eq!(table.lookup("Old Silent Film"), WhereToWatch::Purchase);
    }

    #[test]
    fn test_lookup_is_case_sensitive() {
        let table = sample_table();
        assert_eq!(table.lookup("dune"), WhereToWatch::Streaming(vec![Platform::DisneyPlus]));
        assert_eq!(table.lookup("DUNE"), WhereToWatch::Purchase);
    }

    #[test]
    fn test_duplicate_title_keeps_first_row() {
        let table = sample_table();
        assert_eq!(table.len(), 4);
        assert!(!table.lookup("Inception").labels().contains(&"Disney+"));
    }

    #[test]
    fn test_unnamed_index_column_is_ignored() {
        let csv = "Unnamed: 0,Title,Netflix,Hulu,Prime Video,Disney+\n0,Up,0,0,0,1\n";
        let table = AvailabilityTable::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(table.lookup("Up"), WhereToWatch::Streaming(vec![Platform::DisneyPlus]));
    }

    #[test]
    fn test_missing_platform_column_is_error() {
        let csv = "Title,Netflix,Hulu,Prime Video\nUp,0,0,1\n";
        let result = AvailabilityTable::from_reader(csv.as_bytes());
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("Disney+")));
    }

    #[test]
    fn test_malformed_flag_is_error() {
        let csv = "Title,Netflix,Hulu,Prime Video,Disney+\nUp,yes,0,0,1\n";
        let result = AvailabilityTable::from_reader(csv.as_bytes());
        assert!(matches!(result, Err(AppError::Config(msg)) if msg.contains("Netflix")));
    }

    #[test]
    fn test_ragged_row_is_error() {
        let csv = "Title,Netflix,Hulu,Prime Video,Disney+\nUp,0,0\n";
        let result = AvailabilityTable::from_reader(csv.as_bytes());
        assert!(matches!(result, Err(AppError::Dataset(_))));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let table = AvailabilityTable::load(file.path()).unwrap();
        assert_eq!(table.len(), 4);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let result = AvailabilityTable::load("/nonexistent/MoviesOnStreamingPlatforms.csv");
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
