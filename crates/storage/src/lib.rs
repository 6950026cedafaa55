//! XML persistence of [`vortrac_core::VortexRecord`] and
//! [`vortrac_core::SimplexRecord`] (spec.md §7), appended as an XML element
//! sequence to the configured output directory. `SimplexRecord` persistence
//! exists specifically so a restarted driver can recover the last known
//! search state (spec.md §7: "used for restart continuity").

pub mod error;
pub mod xml_dto;

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use vortrac_core::{SimplexRecord, VortexRecord};
use xml_dto::{SimplexRecordXml, VortexRecordXml};

pub use error::{Result, StorageError};

fn append_element<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let xml = quick_xml::se::to_string(value)?;
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{xml}")?;
    Ok(())
}

/// Append one `VortexRecord` to the VortexList file at `path`.
pub fn append_vortex_record(path: &Path, record: &VortexRecord) -> Result<()> {
    let dto = VortexRecordXml::from(record);
    append_element(path, &dto)
}

/// Append one `SimplexRecord` to the SimplexList file at `path`.
pub fn append_simplex_record(path: &Path, record: &SimplexRecord) -> Result<()> {
    let dto = SimplexRecordXml::from(record);
    append_element(path, &dto)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use vortrac_core::SimplexStatus;

    #[test]
    fn appends_vortex_records_across_calls() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vortex_list.xml");

        let mut record = VortexRecord::new(Utc::now(), "KAMX");
        record.heights_km = vec![2.0];
        record.centers_km = vec![(1.0, 2.0)];
        record.max_vtc0_ms = vec![35.0];
        record.rmw_km = vec![20.0];

        append_vortex_record(&path, &record).unwrap();
        append_vortex_record(&path, &record).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("<VortexRecord>").count(), 2);
    }

    #[test]
    fn appends_simplex_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simplex_list.xml");
        let record = SimplexRecord::empty(2.0, 20.0, SimplexStatus::OutOfCappi);
        append_simplex_record(&path, &record).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("out_of_cappi"));
    }
}
