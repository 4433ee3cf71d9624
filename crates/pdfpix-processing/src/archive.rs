//! In-memory ZIP packaging for extracted images.

use std::io::{Cursor, Read, Write};

use zip::write::{FileOptions, ZipWriter};
use zip::{CompressionMethod, ZipArchive};

#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn entry_options() -> FileOptions {
    FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644)
}

/// Serialize (filename, bytes) pairs into a single ZIP buffer, one entry
/// per pair, names as given, order preserved.
pub fn build_zip(entries: &[(String, Vec<u8>)]) -> Result<Vec<u8>, ArchiveError> {
    let mut buffer = Vec::new();
    {
        let mut writer = ZipWriter::new(Cursor::new(&mut buffer));
        let options = entry_options();

        for (filename, data) in entries {
            writer.start_file(filename.as_str(), options)?;
            writer.write_all(data)?;
        }

        writer.finish()?;
    }

    Ok(buffer)
}

/// Merge several ZIP buffers into one. Buffer `i` (0-based) contributes
/// its entries renamed to `pdf_{i+1}/{name}`, preserving entry order
/// within each source and the order of sources. All-or-nothing: a
/// malformed source yields an error and no output.
pub fn combine_zips(buffers: &[Vec<u8>]) -> Result<Vec<u8>, ArchiveError> {
    let mut buffer = Vec::new();
    {
        let mut writer = ZipWriter::new(Cursor::new(&mut buffer));
        let options = entry_options();

        for (source_index, data) in buffers.iter().enumerate() {
            let mut archive = ZipArchive::new(Cursor::new(data.as_slice()))?;

            for entry_index in 0..archive.len() {
                let mut entry = archive.by_index(entry_index)?;
                let renamed = format!("pdf_{}/{}", source_index + 1, entry.name());

                let mut content = Vec::with_capacity(entry.size() as usize);
                entry.read_to_end(&mut content)?;

                writer.start_file(renamed, options)?;
                writer.write_all(&content)?;
            }
        }

        writer.finish()?;
    }

    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_entries(zip_bytes: &[u8]) -> Vec<(String, Vec<u8>)> {
        let mut archive = ZipArchive::new(Cursor::new(zip_bytes)).expect("valid zip");
        let mut entries = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).expect("entry");
            let mut content = Vec::new();
            entry.read_to_end(&mut content).expect("read entry");
            entries.push((entry.name().to_string(), content));
        }
        entries
    }

    #[test]
    fn test_build_zip_preserves_names_and_bytes() {
        let entries = vec![
            ("page_1_image_1.png".to_string(), vec![1u8, 2, 3]),
            ("page_2_image_1.jpg".to_string(), vec![4u8, 5]),
        ];
        let zip_bytes = build_zip(&entries).unwrap();
        assert_eq!(read_entries(&zip_bytes), entries);
    }

    #[test]
    fn test_build_zip_empty() {
        let zip_bytes = build_zip(&[]).unwrap();
        assert!(read_entries(&zip_bytes).is_empty());
    }

    #[test]
    fn test_combine_zips_prefixes_and_preserves_order() {
        let a = build_zip(&[
            ("a1".to_string(), b"one".to_vec()),
            ("a2".to_string(), b"two".to_vec()),
        ])
        .unwrap();
        let b = build_zip(&[("b1".to_string(), b"three".to_vec())]).unwrap();

        let combined = combine_zips(&[a, b]).unwrap();
        let entries = read_entries(&combined);

        assert_eq!(
            entries,
            vec![
                ("pdf_1/a1".to_string(), b"one".to_vec()),
                ("pdf_1/a2".to_string(), b"two".to_vec()),
                ("pdf_2/b1".to_string(), b"three".to_vec()),
            ]
        );
    }

    #[test]
    fn test_combine_zips_rejects_malformed_input() {
        let good = build_zip(&[("a".to_string(), b"x".to_vec())]).unwrap();
        let bad = b"definitely not a zip".to_vec();
        assert!(combine_zips(&[good, bad]).is_err());
    }

    #[test]
    fn test_combine_zips_empty_input() {
        let combined = combine_zips(&[]).unwrap();
        assert!(read_entries(&combined).is_empty());
    }
}
