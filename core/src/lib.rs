//! Builds unattended-install Debian ISOs for a numbered series of hosts.
//!
//! [`hosts`] derives the host list, [`prompt`] walks an operator through
//! confirming it, [`render`] turns it into preseed and boot menu files, and
//! [`pipeline`] masters those into a new image.

pub mod hosts;
pub mod pipeline;
pub mod prompt;
pub mod render;
