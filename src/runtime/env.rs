//! Host environment queries (permission mask, OS family).

use super::RealRuntime;

impl RealRuntime {
    #[tracing::instrument(skip(self))]
    pub(crate) fn umask_impl(&self) -> u32 {
        #[cfg(unix)]
        {
            use nix::sys::stat::{Mode, umask};
            // The mask can only be read by setting it, so set it back right away.
            let current = umask(Mode::empty());
            umask(current);
            current.bits() as u32
        }
        #[cfg(not(unix))]
        {
            0
        }
    }

    #[tracing::instrument(skip(self))]
    pub(crate) fn is_windows_impl(&self) -> bool {
        cfg!(windows)
    }
}
