use super::types::VendorBook;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default vendor book file path (~/.config/rfp-bro/vendors.json)
pub fn get_store_path() -> PathBuf {
    crate::config::get_config_dir().join("vendors.json")
}

/// Load the vendor book from a JSON file
///
/// If the file doesn't exist, returns a new empty book.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_book(path: &Path) -> Result<VendorBook> {
    if !path.exists() {
        return Ok(VendorBook::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open vendor book at {}", path.display()))?;

    let book: VendorBook = serde_json::from_reader(file).context("Failed to load vendor book")?;

    // Version check
    if book.version != 1 {
        anyhow::bail!("Unsupported vendor book version: {}", book.version);
    }

    Ok(book)
}

/// Save the vendor book to a JSON file atomically
///
/// Uses atomic-write-file so a crash mid-write never leaves a corrupted
/// book behind. Creates the config directory if it doesn't exist.
pub fn save_book(path: &Path, book: &VendorBook) -> Result<()> {
    crate::config::ensure_config_dir()?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, book).context("Failed to serialize vendor book")?;

    file.commit().context("Failed to save vendor book")?;

    Ok(())
}
