use super::Load_Error;
use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};

// Shared by every loader in the process, so no two copies ever get the same name.
static COPY_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Makes `path` absolute. Relative paths are taken relative to `base_dir`, or to the
/// working directory if `base_dir` is empty. `.` components are dropped.
pub fn resolve_module_path(base_dir: &Path, path: &Path) -> Result<PathBuf, Load_Error> {
    let fail = |reason: &'static str| Load_Error::Path_Resolution_Failed {
        path: PathBuf::from(path),
        reason,
    };

    if path.as_os_str().is_empty() {
        return Err(fail("the path is empty"));
    }

    let mut resolved = if path.is_absolute() {
        PathBuf::new()
    } else if !base_dir.as_os_str().is_empty() {
        PathBuf::from(base_dir)
    } else {
        std::env::current_dir().map_err(|_| fail("cannot determine the working directory"))?
    };

    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            comp => resolved.push(comp.as_os_str()),
        }
    }

    let names_a_file = matches!(
        path.components().filter(|c| *c != Component::CurDir).last(),
        Some(Component::Normal(_))
    );
    if names_a_file {
        Ok(resolved)
    } else {
        Err(fail("the path does not name a file"))
    }
}

/// Returns a path in `copy_dir` no previous call (from any loader) has returned:
/// `<copy_dir>/<stem>_<counter>.<ext>`.
pub fn unique_copy_path(copy_dir: &Path, source: &Path) -> Result<PathBuf, Load_Error> {
    let stem = source
        .file_stem()
        .ok_or_else(|| Load_Error::Path_Resolution_Failed {
            path: PathBuf::from(source),
            reason: "the path does not name a file",
        })?;
    let counter = COPY_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    Ok(copy_dir.join(copy_file_name(stem, source.extension(), counter)))
}

fn copy_file_name(stem: &OsStr, ext: Option<&OsStr>, counter: u32) -> OsString {
    let mut name = OsString::from(stem);
    name.push(format!("_{}", counter));
    if let Some(ext) = ext {
        name.push(".");
        name.push(ext);
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn relative_paths_are_joined_to_base_dir() {
        let base = PathBuf::from("/opt/imm");
        assert_eq!(
            resolve_module_path(&base, Path::new("./libimm_game.so")).unwrap(),
            PathBuf::from("/opt/imm/libimm_game.so")
        );
        assert_eq!(
            resolve_module_path(&base, Path::new("lib/./libimm_game.so")).unwrap(),
            PathBuf::from("/opt/imm/lib/libimm_game.so")
        );
    }

    #[test]
    fn absolute_paths_are_kept() {
        assert_eq!(
            resolve_module_path(Path::new("/opt/imm"), Path::new("/tmp/libimm_game.so")).unwrap(),
            PathBuf::from("/tmp/libimm_game.so")
        );
    }

    #[test]
    fn empty_base_dir_falls_back_to_working_dir() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(
            resolve_module_path(Path::new(""), Path::new("libimm_game.so")).unwrap(),
            cwd.join("libimm_game.so")
        );
    }

    #[test]
    fn paths_without_a_file_name_are_refused() {
        for bad in &["", ".", "..", "lib/.."] {
            let res = resolve_module_path(Path::new("/opt/imm"), Path::new(bad));
            assert!(
                matches!(res, Err(Load_Error::Path_Resolution_Failed { .. })),
                "{:?} was accepted",
                bad
            );
        }
    }

    #[test]
    fn copy_names_keep_stem_and_extension() {
        assert_eq!(
            copy_file_name(OsStr::new("libimm_game"), Some(OsStr::new("so")), 7),
            OsString::from("libimm_game_7.so")
        );
        assert_eq!(
            copy_file_name(OsStr::new("game"), None, 1),
            OsString::from("game_1")
        );
    }

    #[test]
    fn copy_paths_never_repeat() {
        let dir = Path::new("/opt/imm");
        let source = Path::new("/opt/imm/imm_game.dll");
        let paths = (0..100)
            .map(|_| unique_copy_path(dir, source).unwrap())
            .collect::<HashSet<_>>();
        assert_eq!(paths.len(), 100);
        assert!(paths.iter().all(|p| p.parent() == Some(dir)));
    }
}
