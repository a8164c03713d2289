//! Executable lookup, in the manner of `which` (Unix) and `where` (Windows).

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Whether `name` resolves to a runnable executable on this host.
#[must_use]
pub fn is_runnable(name: &str) -> bool {
    find_executable(name).is_some()
}

/// Resolves `name` against the process `PATH`.
#[must_use]
pub fn find_executable(name: &str) -> Option<PathBuf> {
    let name = lookup_name(name)?;
    which::which(name).ok()
}

/// Resolves `name` against the given search path list.
///
/// Unix:
/// - A name containing a separator (`/bin/sh`, `./run`, `bin/tool`) is checked as is.
/// - A bare name is looked up in each directory of `search_paths`.
/// - A match must be a regular file with an execute bit.
///
/// Windows: any directory component is stripped and the file name is looked
/// up in `search_paths`, trying each `PATHEXT` extension when the name has none.
#[must_use]
pub fn find_executable_in(search_paths: &OsStr, name: &str) -> Option<PathBuf> {
    let name = lookup_name(name)?;
    let cwd = std::env::current_dir().ok()?;
    which::which_in(name, Some(search_paths), cwd).ok()
}

#[cfg(not(windows))]
fn lookup_name(name: &str) -> Option<&Path> {
    let name = name.trim();
    (!name.is_empty()).then(|| Path::new(name))
}

#[cfg(windows)]
fn lookup_name(name: &str) -> Option<&Path> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Path::new(name).file_name().map(Path::new)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;

    fn osstr(s: &str) -> &OsStr {
        OsStr::new(s)
    }

    #[test]
    fn empty_and_blank_names_do_not_resolve() {
        assert_eq!(find_executable_in(osstr("/bin"), ""), None);
        assert_eq!(find_executable_in(osstr("/bin"), "   "), None);
        assert!(!is_runnable("  "));
    }

    #[test]
    fn absolute_path_resolves_to_itself() {
        assert_eq!(find_executable_in(osstr(""), "/bin/sh"), Some(PathBuf::from("/bin/sh")));
        assert_eq!(find_executable_in(osstr(""), "/bin/nonexisting"), None);
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(find_executable_in(osstr(""), "  /bin/sh \n"), Some(PathBuf::from("/bin/sh")));
    }

    #[test]
    fn bare_name_is_searched_in_path() {
        let found = find_executable_in(osstr("/nonexistent:/bin"), "sh").unwrap();
        assert_eq!(found, PathBuf::from("/bin/sh"));
        assert_eq!(find_executable_in(osstr("/bin"), "nonexisting-tool"), None);
    }

    #[test]
    fn non_executable_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("data");
        fs::write(&plain, "not a program").unwrap();
        fs::set_permissions(&plain, fs::Permissions::from_mode(0o644)).unwrap();

        let search = dir.path().as_os_str();
        assert_eq!(find_executable_in(search, "data"), None);

        fs::set_permissions(&plain, fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(find_executable_in(search, "data"), Some(plain));
    }

    #[test]
    fn directories_are_not_executables() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(find_executable_in(osstr(""), dir.path().to_str().unwrap()), None);
    }

    #[test]
    fn process_path_finds_sh() {
        assert!(is_runnable("sh"));
        assert!(!is_runnable("definitely-not-a-real-tool-4f1c"));
    }
}
