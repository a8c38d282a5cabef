//! `msync status` – show the files currently mirrored.

use anyhow::Result;
use msync_core::local_dir::LocalDirectory;
use std::path::Path;

pub fn run_status(dest: &Path) -> Result<()> {
    if !dest.is_dir() {
        println!("Destination {} does not exist yet.", dest.display());
        return Ok(());
    }
    let listing = LocalDirectory::new(dest).list_files()?;
    if listing.files.is_empty() {
        println!("No files in {}.", dest.display());
    } else {
        println!("{} file(s) in {}:", listing.files.len(), dest.display());
        for name in &listing.files {
            println!("  {}", name);
        }
    }
    Ok(())
}
