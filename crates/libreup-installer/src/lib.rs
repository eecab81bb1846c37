mod bundle;
mod command;
mod dmg;
mod fs_utils;
mod probe;
mod processes;

pub use bundle::{build_bundle_copy_command, copy_bundle, replace_bundle};
pub use command::{capture_command, render_command, run_command, CommandOutput};
pub use dmg::{
    attach_disk_image, build_dmg_attach_command, build_dmg_detach_command, detach_disk_image,
    locate_bundle,
};
pub use fs_utils::{copy_dir_recursive, make_unique_dir, remove_dir_if_exists};
pub use probe::{detect_install_channel, read_bundle_version, FsAppProbe};
pub use processes::{
    build_pgrep_command, build_process_owner_command, build_quit_app_command, parse_pids,
    quit_all, unique_owners, ProcessControl, QuitReport, SystemProcessControl,
};
