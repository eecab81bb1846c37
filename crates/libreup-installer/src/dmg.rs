use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, Result};
use tracing::{debug, warn};

use crate::command::run_command;
use crate::fs_utils::{make_unique_dir, remove_dir_if_exists};

pub fn build_dmg_attach_command(image_path: &Path, mount_point: &Path) -> Command {
    let mut command = Command::new("hdiutil");
    command
        .arg("attach")
        .arg(image_path)
        .arg("-readonly")
        .arg("-nobrowse")
        .arg("-mountpoint")
        .arg(mount_point);
    command
}

pub fn build_dmg_detach_command(mount_point: &Path) -> Command {
    let mut command = Command::new("hdiutil");
    command.arg("detach").arg(mount_point);
    command
}

pub fn attach_disk_image(image_path: &Path, mount_base: &Path) -> Result<PathBuf> {
    attach_disk_image_with_runner(image_path, mount_base, run_command)
}

pub(crate) fn attach_disk_image_with_runner<RunCommand>(
    image_path: &Path,
    mount_base: &Path,
    mut run: RunCommand,
) -> Result<PathBuf>
where
    RunCommand: FnMut(&mut Command, &str) -> Result<()>,
{
    if !image_path.is_file() {
        return Err(anyhow!("disk image not found: {}", image_path.display()));
    }

    let mount_point = make_unique_dir(mount_base, "libreup-mount")?;
    let mut attach = build_dmg_attach_command(image_path, &mount_point);
    debug!(
        image = %image_path.display(),
        mount_point = %mount_point.display(),
        "attaching disk image"
    );
    if let Err(err) = run(&mut attach, "failed to attach disk image") {
        let _ = remove_dir_if_exists(&mount_point);
        return Err(err);
    }
    Ok(mount_point)
}

pub fn detach_disk_image(mount_point: &Path) -> Result<()> {
    detach_disk_image_with_runner(mount_point, run_command)
}

pub(crate) fn detach_disk_image_with_runner<RunCommand>(
    mount_point: &Path,
    mut run: RunCommand,
) -> Result<()>
where
    RunCommand: FnMut(&mut Command, &str) -> Result<()>,
{
    let mut detach = build_dmg_detach_command(mount_point);
    run(&mut detach, "failed to detach disk image")?;
    if let Err(err) = remove_dir_if_exists(mount_point) {
        warn!(mount_point = %mount_point.display(), "failed to remove mount point: {err}");
    }
    Ok(())
}

pub fn locate_bundle(mount_point: &Path, app_name: &str) -> Result<PathBuf> {
    let bundle = mount_point.join(format!("{app_name}.app"));
    if !bundle.is_dir() {
        return Err(anyhow!(
            "disk image mounted at {} does not contain {app_name}.app",
            mount_point.display()
        ));
    }
    Ok(bundle)
}
