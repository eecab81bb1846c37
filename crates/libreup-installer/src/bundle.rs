use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use crate::command::run_command;
use crate::fs_utils::{copy_dir_recursive, remove_dir_if_exists};

const STAGING_SUFFIX: &str = "libreup-staging";
const BACKUP_SUFFIX: &str = "libreup-backup";

pub fn build_bundle_copy_command(src: &Path, dst: &Path) -> Command {
    let mut command = Command::new("ditto");
    command.arg(src).arg(dst);
    command
}

pub fn copy_bundle(src: &Path, dst: &Path) -> Result<()> {
    if cfg!(target_os = "macos") {
        run_command(
            &mut build_bundle_copy_command(src, dst),
            "failed to copy application bundle",
        )
    } else {
        copy_dir_recursive(src, dst)
    }
}

pub fn replace_bundle(source: &Path, dest: &Path) -> Result<()> {
    replace_bundle_with_hooks(source, dest, copy_bundle, |from, to| fs::rename(from, to))
}

// Stage next to `dest`, then swap in with same-directory renames.
pub(crate) fn replace_bundle_with_hooks<CopyBundle, RenameEntry>(
    source: &Path,
    dest: &Path,
    mut copy: CopyBundle,
    mut rename: RenameEntry,
) -> Result<()>
where
    CopyBundle: FnMut(&Path, &Path) -> Result<()>,
    RenameEntry: FnMut(&Path, &Path) -> io::Result<()>,
{
    if !source.is_dir() {
        return Err(anyhow!("source bundle not found: {}", source.display()));
    }

    let parent = dest
        .parent()
        .ok_or_else(|| anyhow!("bundle destination has no parent: {}", dest.display()))?;
    fs::create_dir_all(parent)
        .with_context(|| format!("failed to create {}", parent.display()))?;

    let staging = sibling_path(dest, STAGING_SUFFIX)?;
    let backup = sibling_path(dest, BACKUP_SUFFIX)?;
    for stale in [&staging, &backup] {
        remove_dir_if_exists(stale)
            .with_context(|| format!("failed to remove stale {}", stale.display()))?;
    }

    debug!(source = %source.display(), staging = %staging.display(), "staging bundle");
    if let Err(err) = copy(source, &staging) {
        let _ = remove_dir_if_exists(&staging);
        return Err(err);
    }

    let had_previous = fs::symlink_metadata(dest).is_ok();
    if had_previous {
        rename(dest, &backup).with_context(|| {
            format!(
                "failed to move existing bundle aside: {} -> {}",
                dest.display(),
                backup.display()
            )
        })?;
    }

    if let Err(err) = rename(&staging, dest) {
        let restore = if had_previous {
            rename(&backup, dest).err()
        } else {
            None
        };
        let _ = remove_dir_if_exists(&staging);
        let err = anyhow::Error::new(err).context(format!(
            "failed to move staged bundle into place: {}",
            dest.display()
        ));
        return Err(match restore {
            None => err,
            Some(restore_err) => err.context(format!(
                "additionally failed to restore previous bundle from {}: {restore_err}",
                backup.display()
            )),
        });
    }

    if had_previous {
        if let Err(err) = remove_dir_if_exists(&backup) {
            warn!(backup = %backup.display(), "failed to remove previous bundle: {err}");
        }
    }

    Ok(())
}

fn sibling_path(dest: &Path, suffix: &str) -> Result<PathBuf> {
    let name = dest
        .file_name()
        .ok_or_else(|| anyhow!("bundle destination has no file name: {}", dest.display()))?;
    let mut sibling = OsString::from(".");
    sibling.push(name);
    sibling.push(".");
    sibling.push(suffix);
    Ok(dest.with_file_name(sibling))
}
