use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct Env_Info {
    pub full_exe_path: Box<Path>,
    /// The directory containing the executable. Hotloaded module copies land here.
    pub app_dir: Box<Path>,
    /// The directory relative assets are looked up from.
    pub working_dir: Box<Path>,
    pub assets_root: Box<Path>,
}

impl Env_Info {
    pub fn gather() -> std::io::Result<Env_Info> {
        let full_exe_path = fs::canonicalize(env::current_exe()?)?;
        let app_dir = match full_exe_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => PathBuf::from(dir),
            _ => env::current_dir()?,
        };
        let working_dir = find_working_dir(&app_dir);
        Ok(Self::new(full_exe_path.into_boxed_path(), app_dir, working_dir))
    }

    pub fn new(full_exe_path: Box<Path>, app_dir: PathBuf, working_dir: PathBuf) -> Env_Info {
        let assets_root = {
            let mut assets_root_buf = working_dir.clone();
            assets_root_buf.push("assets");
            assets_root_buf.into_boxed_path()
        };
        Env_Info {
            full_exe_path,
            app_dir: app_dir.into_boxed_path(),
            working_dir: working_dir.into_boxed_path(),
            assets_root,
        }
    }
}

/// Find out if we're in a dev environment and, if so, use the repository root as working dir
/// (so we don't have to symlink/copy assets).
fn find_working_dir(app_dir: &Path) -> PathBuf {
    let mut working_dir = PathBuf::from(app_dir);
    let cur_dir = working_dir.as_path().file_name().and_then(OsStr::to_str);
    let parent_dir = working_dir
        .as_path()
        .parent()
        .and_then(Path::file_name)
        .and_then(OsStr::to_str);
    if matches!(cur_dir, Some("debug" | "release" | "profile"))
        && matches!(parent_dir, Some("target"))
    {
        working_dir.pop();
        working_dir.pop();
    } else if matches!(cur_dir, Some("deps"))
        && matches!(parent_dir, Some("debug" | "release" | "profile"))
    {
        working_dir.pop();
        working_dir.pop();
        working_dir.pop();
    }
    lverbose!("Working dir resolved to {:?}", working_dir);
    working_dir
}

#[inline]
pub fn asset_path(env: &Env_Info, file: &str) -> Box<Path> {
    let mut s = PathBuf::from(env.assets_root.as_ref());
    s.push(file);
    s.into_boxed_path()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dev_build_dirs_resolve_to_repo_root() {
        let root = PathBuf::from("/home/me/imm");
        assert_eq!(find_working_dir(&root.join("target").join("debug")), root);
        assert_eq!(
            find_working_dir(&root.join("target").join("release").join("deps")),
            root
        );
    }

    #[test]
    fn installed_dirs_are_kept() {
        let dir = PathBuf::from("/opt/imm/bin");
        assert_eq!(find_working_dir(&dir), dir);
    }

    #[test]
    fn asset_path_is_under_assets_root() {
        let env = Env_Info::new(
            PathBuf::from("/opt/imm/imm").into_boxed_path(),
            PathBuf::from("/opt/imm"),
            PathBuf::from("/opt/imm"),
        );
        assert_eq!(
            asset_path(&env, "config.toml").as_ref(),
            Path::new("/opt/imm/assets/config.toml")
        );
    }
}
