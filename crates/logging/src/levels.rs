//! crates/logging/src/levels.rs
//! Debug categories and their per-category levels.

/// Debug categories of the shim.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DebugFlag {
    /// Cursor creation, exhaustion and release.
    Cursor,
    /// `lstat` and file information queries.
    Stat,
    /// Symlink, reparse point and canonical path resolution.
    Link,
    /// User and group database lookups.
    Owner,
    /// ACL text conversion.
    Acl,
    /// Extended attribute listing and reads.
    Xattr,
    /// Security descriptor queries.
    Security,
    /// Alternate data stream enumeration and reads.
    Streams,
    /// C ABI entry points.
    Ffi,
}

impl DebugFlag {
    /// Every category, in declaration order.
    pub const ALL: [Self; 9] = [
        Self::Cursor,
        Self::Stat,
        Self::Link,
        Self::Owner,
        Self::Acl,
        Self::Xattr,
        Self::Security,
        Self::Streams,
        Self::Ffi,
    ];

    /// Returns the token used in the environment toggle.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Cursor => "cursor",
            Self::Stat => "stat",
            Self::Link => "link",
            Self::Owner => "owner",
            Self::Acl => "acl",
            Self::Xattr => "xattr",
            Self::Security => "security",
            Self::Streams => "streams",
            Self::Ffi => "ffi",
        }
    }

    /// Looks a category up by its token.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|flag| flag.name() == name)
    }
}

/// Debug level for each category. Zero disables the category.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct DebugLevels {
    /// Cursor protocol level.
    pub cursor: u8,
    /// Stat level.
    pub stat: u8,
    /// Link resolution level.
    pub link: u8,
    /// Owner lookup level.
    pub owner: u8,
    /// ACL level.
    pub acl: u8,
    /// Extended attribute level.
    pub xattr: u8,
    /// Security descriptor level.
    pub security: u8,
    /// Data stream level.
    pub streams: u8,
    /// C ABI level.
    pub ffi: u8,
}

impl DebugLevels {
    /// Get the level for a specific flag.
    pub const fn get(&self, flag: DebugFlag) -> u8 {
        match flag {
            DebugFlag::Cursor => self.cursor,
            DebugFlag::Stat => self.stat,
            DebugFlag::Link => self.link,
            DebugFlag::Owner => self.owner,
            DebugFlag::Acl => self.acl,
            DebugFlag::Xattr => self.xattr,
            DebugFlag::Security => self.security,
            DebugFlag::Streams => self.streams,
            DebugFlag::Ffi => self.ffi,
        }
    }

    /// Set the level for a specific flag.
    pub const fn set(&mut self, flag: DebugFlag, level: u8) {
        match flag {
            DebugFlag::Cursor => self.cursor = level,
            DebugFlag::Stat => self.stat = level,
            DebugFlag::Link => self.link = level,
            DebugFlag::Owner => self.owner = level,
            DebugFlag::Acl => self.acl = level,
            DebugFlag::Xattr => self.xattr = level,
            DebugFlag::Security => self.security = level,
            DebugFlag::Streams => self.streams = level,
            DebugFlag::Ffi => self.ffi = level,
        }
    }

    /// Set all flags to the specified level.
    pub const fn set_all(&mut self, level: u8) {
        self.cursor = level;
        self.stat = level;
        self.link = level;
        self.owner = level;
        self.acl = level;
        self.xattr = level;
        self.security = level;
        self.streams = level;
        self.ffi = level;
    }

    /// Returns `true` when at least one category is enabled.
    pub fn any(&self) -> bool {
        DebugFlag::ALL.into_iter().any(|flag| self.get(flag) > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_lookup() {
        for flag in DebugFlag::ALL {
            assert_eq!(DebugFlag::from_name(flag.name()), Some(flag));
        }
        assert_eq!(DebugFlag::from_name("own"), None);
    }

    #[test]
    fn set_and_get_are_independent_per_flag() {
        let mut levels = DebugLevels::default();
        levels.set(DebugFlag::Acl, 2);
        assert_eq!(levels.get(DebugFlag::Acl), 2);
        assert_eq!(levels.get(DebugFlag::Xattr), 0);
        assert!(levels.any());
    }

    #[test]
    fn set_all_covers_every_flag() {
        let mut levels = DebugLevels::default();
        assert!(!levels.any());
        levels.set_all(3);
        assert!(DebugFlag::ALL.into_iter().all(|flag| levels.get(flag) == 3));
    }
}
