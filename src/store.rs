// src/store.rs
use crate::cert::Asset;
use crate::utils::logging::Logger;
use std::{fs, io, path::Path};
use tempfile::Builder;

/// Writes each asset under `dir` at its well-known relative path. The target
/// directory must be missing or empty. Assets are staged in a sibling
/// directory and moved into place once all of them are written, so a failed
/// run leaves `dir` untouched.
pub fn write_assets(dir: &Path, assets: &[Asset], logger: &mut dyn Logger) -> io::Result<()> {
    write_assets_with(dir, assets, logger, |path, data| fs::write(path, data))
}

fn write_assets_with<W>(
    dir: &Path,
    assets: &[Asset],
    logger: &mut dyn Logger,
    mut write: W,
) -> io::Result<()>
where
    W: FnMut(&Path, &[u8]) -> io::Result<()>,
{
    let target_exists = dir.exists();
    if target_exists && fs::read_dir(dir)?.next().is_some() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("asset directory {} is not empty", dir.display()),
        ));
    }

    let parent = match dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;
    let staging = Builder::new().prefix(".assets-").tempdir_in(parent)?;

    for asset in assets {
        let path = staging.path().join(asset.name.path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        logger.debug_log(&format!("Writing {}", dir.join(asset.name.path()).display()));
        write(&path, &asset.data)?;

        #[cfg(unix)]
        if asset.name.is_private_key() {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
    }

    if target_exists {
        fs::remove_dir(dir)?;
    }
    // Dropping `staging` after the rename finds nothing left to remove.
    fs::rename(staging.path(), dir)?;

    logger.log(&format!("Wrote {} assets to {}", assets.len(), dir.display()));
    Ok(())
}
