use std::path::Path;

use crate::fsutil;

/// Hostname used when none can be determined.
pub const FALLBACK_HOSTNAME: &str = "localhost";

/// Resolves the hostname of the machine rooted at `rootfs`.
///
/// Tries `<rootfs>/etc/hostname`, then `<rootfs>/proc/sys/kernel/hostname`. Falls back to
/// [`FALLBACK_HOSTNAME`] if neither yields a non-empty name.
pub fn resolve_hostname(rootfs: impl AsRef<Path>) -> String {
    let rootfs = rootfs.as_ref();
    for candidate in ["etc/hostname", "proc/sys/kernel/hostname"] {
        let path = rootfs.join(candidate);
        match fsutil::read_to_string(&path) {
            Ok(contents) => {
                let hostname = contents.trim();
                if !hostname.is_empty() {
                    return hostname.to_owned();
                }
                log::debug!("Hostname file `{}` is empty", path.display());
            }
            Err(err) => log::debug!("{err}"),
        }
    }

    log::warn!(
        "Could not determine hostname below `{}`, using `{FALLBACK_HOSTNAME}`",
        rootfs.display()
    );
    FALLBACK_HOSTNAME.to_owned()
}
