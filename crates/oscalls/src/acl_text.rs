//! Short text form of POSIX ACLs.
//!
//! Renders entries the way `acl_to_any_text` does with
//! `TEXT_ABBREVIATE` and a `,` separator: `u::rw-,u:alice:r--,g::r--,m::rwx,o::r--`.

use std::fmt;

/// Qualifier of one ACL entry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum AclTag {
    UserObj,
    User(String),
    GroupObj,
    Group(String),
    Mask,
    Other,
}

/// One entry: a qualifier plus `rwx` permissions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AclTextEntry {
    pub tag: AclTag,
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

impl AclTextEntry {
    #[must_use]
    pub const fn new(tag: AclTag, read: bool, write: bool, execute: bool) -> Self {
        Self {
            tag,
            read,
            write,
            execute,
        }
    }
}

impl fmt::Display for AclTextEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            AclTag::UserObj => f.write_str("u::")?,
            AclTag::User(name) => write!(f, "u:{name}:")?,
            AclTag::GroupObj => f.write_str("g::")?,
            AclTag::Group(name) => write!(f, "g:{name}:")?,
            AclTag::Mask => f.write_str("m::")?,
            AclTag::Other => f.write_str("o::")?,
        }
        let bit = |set: bool, c: char| if set { c } else { '-' };
        write!(
            f,
            "{}{}{}",
            bit(self.read, 'r'),
            bit(self.write, 'w'),
            bit(self.execute, 'x')
        )
    }
}

/// Formats `entries` in canonical order as one comma-separated string.
#[must_use]
pub fn format_short(mut entries: Vec<AclTextEntry>) -> String {
    // Stable so named entries keep the order the OS returned them in.
    entries.sort_by_key(|entry| rank(&entry.tag));
    entries
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

const fn rank(tag: &AclTag) -> u8 {
    match tag {
        AclTag::UserObj => 0,
        AclTag::User(_) => 1,
        AclTag::GroupObj => 2,
        AclTag::Group(_) => 3,
        AclTag::Mask => 4,
        AclTag::Other => 5,
    }
}
