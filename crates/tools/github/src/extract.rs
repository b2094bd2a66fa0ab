//! Archive extraction (zip, tar.gz).

use flate2::read::GzDecoder;
use setup_task_core::{Error, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tar::Archive;
use tracing::debug;

/// Extract `archive` into `dest`, choosing the format from the file name.
///
/// # Errors
///
/// Returns [`Error::UnsupportedArchive`] for names ending in neither `.zip`
/// nor `.tar.gz`, and [`Error::Extraction`] if the archive cannot be read or
/// unpacked.
pub fn extract_archive(archive: &Path, dest: &Path) -> Result<()> {
    let name = archive
        .file_name()
        .map(|n| n.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();

    match name {
        n if n.ends_with(".zip") => extract_zip(archive, dest)?,
        n if n.ends_with(".tar.gz") => extract_tar_gz(archive, dest)?,
        _ => return Err(Error::unsupported_archive(archive)),
    }

    debug!(archive = %archive.display(), dest = %dest.display(), "Extracted archive");
    Ok(())
}

fn extract_zip(archive: &Path, dest: &Path) -> Result<()> {
    let fail = |e: &dyn std::fmt::Display| Error::extraction(archive, e.to_string());

    let file = File::open(archive).map_err(|e| fail(&e))?;
    let mut zip = zip::ZipArchive::new(BufReader::new(file)).map_err(|e| fail(&e))?;
    std::fs::create_dir_all(dest).map_err(|e| fail(&e))?;

    for i in 0..zip.len() {
        let mut entry = zip.by_index(i).map_err(|e| fail(&e))?;
        let Some(relative) = entry.enclosed_name() else {
            debug!(name = entry.name(), "Skipping zip entry outside the archive root");
            continue;
        };
        let out = dest.join(relative);

        if entry.is_dir() {
            std::fs::create_dir_all(&out).map_err(|e| fail(&e))?;
            continue;
        }
        if let Some(parent) = out.parent() {
            std::fs::create_dir_all(parent).map_err(|e| fail(&e))?;
        }
        let mut target = File::create(&out).map_err(|e| fail(&e))?;
        std::io::copy(&mut entry, &mut target).map_err(|e| fail(&e))?;

        #[cfg(unix)]
        if let Some(mode) = entry.unix_mode() {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&out, std::fs::Permissions::from_mode(mode))
                .map_err(|e| fail(&e))?;
        }
    }
    Ok(())
}

fn extract_tar_gz(archive: &Path, dest: &Path) -> Result<()> {
    let file = File::open(archive).map_err(|e| Error::extraction(archive, e.to_string()))?;
    std::fs::create_dir_all(dest).map_err(|e| Error::extraction(archive, e.to_string()))?;
    Archive::new(GzDecoder::new(BufReader::new(file)))
        .unpack(dest)
        .map_err(|e| Error::extraction(archive, e.to_string()))
}
