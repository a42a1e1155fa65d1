//! POSIX backend.
//!
//! Path arguments are raw byte paths; nothing here assumes they are UTF-8.
//! String results are converted lossily.

mod link;
mod stat;
mod user_group;

#[cfg(all(
    feature = "acl",
    any(target_os = "linux", target_os = "macos", target_os = "freebsd")
))]
mod acl;
#[cfg(not(all(
    feature = "acl",
    any(target_os = "linux", target_os = "macos", target_os = "freebsd")
)))]
#[path = "acl_stub.rs"]
mod acl;

#[cfg(feature = "xattr")]
mod xattr;
#[cfg(not(feature = "xattr"))]
#[path = "xattr_stub.rs"]
mod xattr;

pub use acl::{acl_get_file_access, acl_get_file_default};
pub use link::{canonicalize_file_name, read_link_bytes, readlink};
pub use stat::lstat;
pub use user_group::{getgrgid, getpwuid};
pub use xattr::{lgetxattr, llistxattr};
