//! Processed dataset generation and CSV persistence

use std::fs;
use std::path::{Path, PathBuf};

use contracts::{DatasetRow, FEATURE_B_UPPER, PROCESSED_DATA_FILE_NAME};
use rand::Rng;
use tracing::debug;

use crate::error::{Result, StepError};

/// Generate `count` synthetic rows
pub fn generate_rows<R: Rng>(rng: &mut R, count: usize) -> Vec<DatasetRow> {
    (0..count)
        .map(|_| DatasetRow {
            feature_a: rng.random::<f64>(),
            feature_b: rng.random_range(0..FEATURE_B_UPPER),
            target: rng.random_range(0..2u8),
        })
        .collect()
}

/// Path of the contract file inside a processed-data directory
pub fn processed_data_file(dir: &Path) -> PathBuf {
    dir.join(PROCESSED_DATA_FILE_NAME)
}

/// Write rows as CSV into `dir`, creating it if absent
///
/// Overwrites an existing file. Returns the written file path.
pub fn write_dataset(dir: &Path, rows: &[DatasetRow]) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = processed_data_file(dir);

    let mut writer = csv::Writer::from_path(&path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "dataset written");
    Ok(path)
}

/// Read the contract file from a processed-data directory
///
/// Columns are matched by header name.
///
/// # Errors
/// - [`StepError::ProcessedDataNotFound`] when the file is absent
/// - CSV errors on malformed content or missing columns
pub fn read_dataset(dir: &Path) -> Result<Vec<DatasetRow>> {
    let path = processed_data_file(dir);
    if !path.is_file() {
        return Err(StepError::ProcessedDataNotFound { path });
    }

    let mut reader = csv::Reader::from_path(&path)?;
    let rows = reader
        .deserialize()
        .collect::<std::result::Result<Vec<DatasetRow>, _>>()?;

    debug!(path = %path.display(), rows = rows.len(), "dataset loaded");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::DATASET_COLUMNS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_values_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let rows = generate_rows(&mut rng, 500);
        assert_eq!(rows.len(), 500);
        for row in &rows {
            assert!((0.0..1.0).contains(&row.feature_a));
            assert!((0..FEATURE_B_UPPER).contains(&row.feature_b));
            assert!(row.target <= 1);
        }
    }

    #[test]
    fn test_same_seed_same_rows() {
        let a = generate_rows(&mut StdRng::seed_from_u64(3), 20);
        let b = generate_rows(&mut StdRng::seed_from_u64(3), 20);
        assert_eq!(a, b);
    }

    #[test]
    fn test_header_matches_contract_columns() {
        let dir = tempfile::tempdir().unwrap();
        let rows = generate_rows(&mut StdRng::seed_from_u64(1), 3);
        let path = write_dataset(dir.path(), &rows).unwrap();

        let content = fs::read_to_string(path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(header, DATASET_COLUMNS.join(","));
        assert_eq!(content.lines().count(), 4);
    }

    #[test]
    fn test_write_then_read_preserves_rows() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("nested").join("processed");
        let rows = generate_rows(&mut StdRng::seed_from_u64(11), 100);

        write_dataset(&data_dir, &rows).unwrap();
        let loaded = read_dataset(&data_dir).unwrap();
        assert_eq!(loaded, rows);
    }

    #[test]
    fn test_read_columns_by_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            processed_data_file(dir.path()),
            "target,feature_b,feature_a\n1,4,0.5\n0,9,0.125\n",
        )
        .unwrap();

        let rows = read_dataset(dir.path()).unwrap();
        assert_eq!(
            rows[0],
            DatasetRow {
                feature_a: 0.5,
                feature_b: 4,
                target: 1
            }
        );
        assert_eq!(rows[1].feature_b, 9);
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_dataset(dir.path()).unwrap_err();
        match err {
            StepError::ProcessedDataNotFound { path } => {
                assert!(path.ends_with(PROCESSED_DATA_FILE_NAME));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            processed_data_file(dir.path()),
            "feature_a,target\n0.5,1\n",
        )
        .unwrap();
        assert!(matches!(
            read_dataset(dir.path()).unwrap_err(),
            StepError::Csv(_)
        ));
    }
}
