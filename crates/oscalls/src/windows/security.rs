use std::ffi::c_void;
use std::io;
use std::path::Path;
use std::ptr;

use valxfer::Cursor;
use valxfer::handler::SingleValue;
use windows_sys::Win32::Foundation::{ERROR_SUCCESS, LocalFree};
use windows_sys::Win32::Security::Authorization::{
    ConvertSecurityDescriptorToStringSecurityDescriptorW, GetNamedSecurityInfoW, SDDL_REVISION_1,
    SE_FILE_OBJECT,
};
use windows_sys::Win32::Security::{
    DACL_SECURITY_INFORMATION, GROUP_SECURITY_INFORMATION, OWNER_SECURITY_INFORMATION,
    SACL_SECURITY_INFORMATION,
};

use super::{decode, wide};
use crate::adapter::complete;
use crate::error::AdapterError;
use crate::win_mapping::ERROR_PRIVILEGE_NOT_HELD;

/// Buffer allocated by the system with `LocalAlloc`.
struct LocalBuffer(*mut c_void);

impl Drop for LocalBuffer {
    fn drop(&mut self) {
        if !self.0.is_null() {
            // SAFETY: the pointer came from a Win32 call documented to
            // allocate with LocalAlloc and is freed once.
            unsafe {
                LocalFree(self.0);
            }
        }
    }
}

/// Streams the security descriptor of `path` as one `sddl` string.
///
/// Owner, group, and DACL are always requested. The SACL is added when
/// `include_sacl` is set and silently dropped when the caller lacks the
/// privilege to read it.
#[must_use]
pub fn win_get_sd(path: &Path, include_sacl: bool) -> Cursor {
    logging::trace_security!(path = %path.display(), include_sacl, "win_get_sd");
    let result = read_sddl(path, include_sacl)
        .map(|sddl| SingleValue::new("sddl", sddl))
        .map_err(|error| AdapterError::new("read security descriptor", path, error));
    complete(result)
}

fn query(name: &[u16], info: u32) -> Result<LocalBuffer, u32> {
    let mut descriptor: *mut c_void = ptr::null_mut();
    // SAFETY: `name` is NUL-terminated; the out-pointers we do not need are null.
    let status = unsafe {
        GetNamedSecurityInfoW(
            name.as_ptr(),
            SE_FILE_OBJECT,
            info,
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            ptr::null_mut(),
            &mut descriptor,
        )
    };
    if status == ERROR_SUCCESS {
        Ok(LocalBuffer(descriptor))
    } else {
        Err(status)
    }
}

fn read_sddl(path: &Path, include_sacl: bool) -> io::Result<String> {
    let name = wide(path.as_os_str());
    let mut info =
        OWNER_SECURITY_INFORMATION | GROUP_SECURITY_INFORMATION | DACL_SECURITY_INFORMATION;
    if include_sacl {
        info |= SACL_SECURITY_INFORMATION;
    }

    let descriptor = match query(&name, info) {
        Ok(descriptor) => descriptor,
        Err(status) if include_sacl && status == ERROR_PRIVILEGE_NOT_HELD as u32 => {
            logging::trace_security!("SACL not readable, retrying without it");
            info &= !SACL_SECURITY_INFORMATION;
            query(&name, info).map_err(|status| io::Error::from_raw_os_error(status as i32))?
        }
        Err(status) => return Err(io::Error::from_raw_os_error(status as i32)),
    };

    let mut text: *mut u16 = ptr::null_mut();
    let mut length = 0_u32;
    // SAFETY: `descriptor` is a valid self-relative descriptor and `text`
    // receives a LocalAlloc'd wide string of `length` units.
    let ok = unsafe {
        ConvertSecurityDescriptorToStringSecurityDescriptorW(
            descriptor.0,
            SDDL_REVISION_1,
            info,
            &mut text,
            &mut length,
        )
    };
    if ok == 0 {
        return Err(io::Error::last_os_error());
    }
    let owned = LocalBuffer(text.cast());

    // SAFETY: the conversion returned `length` units including the terminator.
    let units = unsafe { std::slice::from_raw_parts(text, length as usize) };
    let units = units.strip_suffix(&[0]).unwrap_or(units);
    let sddl = decode(units);
    drop(owned);
    sddl
}
