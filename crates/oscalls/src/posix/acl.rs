use std::io;
use std::path::Path;

use exacl::{AclEntry, AclEntryKind, AclOption, Perm};
use valxfer::Cursor;
use valxfer::handler::SingleValue;

use crate::acl_text::{AclTag, AclTextEntry, format_short};
use crate::adapter::complete;
use crate::error::AdapterError;

/// Streams the access ACL of `path` as one `acl_text` string.
#[must_use]
pub fn acl_get_file_access(path: &Path) -> Cursor {
    acl_text(path, None, "read access ACL")
}

/// Streams the default ACL of the directory `path` as one `acl_text` string.
#[must_use]
pub fn acl_get_file_default(path: &Path) -> Cursor {
    acl_text(path, Some(AclOption::DEFAULT_ACL), "read default ACL")
}

fn acl_text(path: &Path, option: Option<AclOption>, context: &'static str) -> Cursor {
    logging::trace_acl!(path = %path.display(), default = option.is_some(), "acl_get_file");
    let result = read_entries(path, option)
        .map(|entries| {
            let text = format_short(entries);
            logging::trace_acl!(text = %text, "acl_to_text");
            SingleValue::new("acl_text", text)
        })
        .map_err(|error| AdapterError::new(context, path, error));
    complete(result)
}

fn read_entries(path: &Path, option: Option<AclOption>) -> io::Result<Vec<AclTextEntry>> {
    let entries = exacl::getfacl(path, option)?;
    Ok(entries.iter().filter_map(to_text_entry).collect())
}

fn to_text_entry(entry: &AclEntry) -> Option<AclTextEntry> {
    let named = |name: &str| (!name.is_empty()).then(|| name.to_owned());
    let tag = match entry.kind {
        AclEntryKind::User => named(&entry.name).map_or(AclTag::UserObj, AclTag::User),
        AclEntryKind::Group => named(&entry.name).map_or(AclTag::GroupObj, AclTag::Group),
        AclEntryKind::Mask => AclTag::Mask,
        AclEntryKind::Other => AclTag::Other,
        _ => return None,
    };
    Some(AclTextEntry::new(
        tag,
        entry.perms.contains(Perm::READ),
        entry.perms.contains(Perm::WRITE),
        entry.perms.contains(Perm::EXECUTE),
    ))
}
