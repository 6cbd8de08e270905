pub mod module_backend;
pub mod module_path;

use crate::game_api::{Game_Api, Game_State_Blob};
use module_backend::{Backend_Error, Module_Backend};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

#[derive(Debug, thiserror::Error)]
pub enum Load_Error {
    #[error("cannot resolve module path {path:?}: {reason}")]
    Path_Resolution_Failed { path: PathBuf, reason: &'static str },

    #[error("module file {0:?} not found")]
    File_Not_Found(PathBuf),

    #[error("failed to copy module {from:?} to {to:?}: {source}")]
    Copy_Failed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to open module copy {path:?}: {source}")]
    Open_Failed { path: PathBuf, source: Backend_Error },

    #[error("module {path:?} lacks the entry points: {}", .missing.join(", "))]
    Symbol_Resolution_Failed {
        path: PathBuf,
        missing: Vec<&'static str>,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum Unload_Error {
    #[error("failed to release module {path:?}: {source}")]
    Unload_Failed { path: PathBuf, source: Backend_Error },
}

#[derive(Debug, thiserror::Error)]
pub enum Reload_Error {
    #[error(transparent)]
    Load(#[from] Load_Error),

    #[error(transparent)]
    Unload(#[from] Unload_Error),

    /// The new module could not take the old state, and starting it from scratch failed too.
    #[error("reloaded module failed to prepare (code {code})")]
    Prepare_Failed { code: i32 },
}

pub struct Loader_Config {
    /// The module as built. Never loaded directly: we always load a copy of it.
    pub source_path: PathBuf,
    /// Relative `source_path`s are resolved against this (usually the executable's directory).
    pub base_dir: PathBuf,
    /// Where module copies are written. Defaults to `base_dir`, relative paths are relative to it.
    pub copy_dir: Option<PathBuf>,
    /// Minimum time between two looks at the source file. Zero checks on every call.
    pub check_interval: Duration,
    /// If false, modules without get_state/set_state are accepted, and reloading them
    /// restarts the game from scratch.
    pub require_state_transfer: bool,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Loader_Stats {
    pub copies_created: u32,
    pub loads: u32,
    pub unloads: u32,
    pub reloads: u32,
}

struct Live_Module<M> {
    api: Game_Api,
    module: M,
    copy_path: PathBuf,
}

/// Owns the (single) loaded game module and swaps it with a fresh build whenever
/// the module file on disk changes.
pub struct Hotload_Loader<B: Module_Backend> {
    backend: B,
    source_path: PathBuf,
    copy_dir: PathBuf,
    check_interval: Duration,
    require_state_transfer: bool,

    live: Option<Live_Module<B::Module>>,
    /// Modification time of the source file as of the last load attempt.
    fingerprint: Option<SystemTime>,
    next_check: Option<Instant>,
    /// State taken from the last unloaded module and not yet handed to a new one.
    pending_state: Option<Game_State_Blob>,
    /// Copy of the previous module, deleted once its successor is loaded.
    stale_copy: Option<PathBuf>,

    stats: Loader_Stats,
}

impl<B: Module_Backend> Hotload_Loader<B> {
    /// Loads the module for the first time. On failure nothing is left loaded.
    pub fn load(backend: B, cfg: Loader_Config) -> Result<Self, Load_Error> {
        let source_path = module_path::resolve_module_path(&cfg.base_dir, &cfg.source_path)?;
        let copy_dir = match cfg.copy_dir {
            Some(dir) if dir.is_absolute() || cfg.base_dir.as_os_str().is_empty() => dir,
            Some(dir) => cfg.base_dir.join(dir),
            None if !cfg.base_dir.as_os_str().is_empty() => cfg.base_dir.clone(),
            None => source_path
                .parent()
                .map(PathBuf::from)
                .unwrap_or_default(),
        };
        lverbose!("Module copies go to {:?}", copy_dir);

        let mut loader = Hotload_Loader {
            backend,
            source_path,
            copy_dir,
            check_interval: cfg.check_interval,
            require_state_transfer: cfg.require_state_transfer,
            live: None,
            fingerprint: None,
            next_check: None,
            pending_state: None,
            stale_copy: None,
            stats: Loader_Stats::default(),
        };
        loader.load_module()?;
        loader.schedule_next_check();
        Ok(loader)
    }

    /// The entry points of the current module, or None if no module is loaded
    /// (i.e. the last reload failed).
    pub fn api(&self) -> Option<&Game_Api> {
        self.live.as_ref().map(|live| &live.api)
    }

    pub fn is_loaded(&self) -> bool {
        self.live.is_some()
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn current_copy(&self) -> Option<&Path> {
        self.live.as_ref().map(|live| live.copy_path.as_path())
    }

    pub fn stats(&self) -> Loader_Stats {
        self.stats
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &B {
        &self.backend
    }

    /// Cheap unless the source file changed: then the current module is unloaded and
    /// a new copy is loaded, carrying the game state over.
    /// Returns true if a new module was loaded.
    /// If no module is loaded (a previous reload failed) a new load is attempted every time
    /// the source file changes, and any state saved from the last module is handed to it.
    pub fn check_and_reload(&mut self) -> Result<bool, Reload_Error> {
        if let Some(next_check) = self.next_check {
            if Instant::now() < next_check {
                return Ok(false);
            }
        }
        self.schedule_next_check();

        let cur_fingerprint = file_fingerprint(&self.source_path);
        if cur_fingerprint == self.fingerprint {
            return Ok(false);
        }

        lverbose!(
            "Module {:?} changed ({:?} -> {:?}).",
            self.source_path,
            self.fingerprint,
            cur_fingerprint
        );

        if let Some(live) = &self.live {
            match live.api.get_state() {
                Some(state) => {
                    ldebug!("Saved {} bytes of game state.", state.len());
                    self.pending_state = Some(state);
                }
                None => {
                    lwarn!(
                        "Module {:?} cannot hand out its state: the game will restart from scratch.",
                        live.copy_path
                    );
                }
            }
            self.unload_module()?;
        }

        // Even if the load fails, don't retry until the file changes again.
        self.fingerprint = cur_fingerprint;
        self.load_module()?;
        self.stats.reloads += 1;

        self.restore_state()?;
        lok!("Reloaded module from {:?}.", self.source_path);
        Ok(true)
    }

    /// Releases the current module and deletes its copy.
    pub fn unload(&mut self) -> Result<(), Unload_Error> {
        let res = self.unload_module();
        self.delete_stale_copy();
        res
    }

    fn schedule_next_check(&mut self) {
        self.next_check = if self.check_interval > Duration::default() {
            Some(Instant::now() + self.check_interval)
        } else {
            None
        };
    }

    fn load_module(&mut self) -> Result<(), Load_Error> {
        debug_assert!(self.live.is_none(), "load_module called with a live module!");

        let source = &self.source_path;
        if !source.is_file() {
            return Err(Load_Error::File_Not_Found(source.clone()));
        }
        // Read before copying: if the file changes while we copy it, the next check catches it.
        let fingerprint = file_fingerprint(source);

        let copy_path = module_path::unique_copy_path(&self.copy_dir, source)?;
        fs::copy(source, &copy_path).map_err(|err| Load_Error::Copy_Failed {
            from: source.clone(),
            to: copy_path.clone(),
            source: err,
        })?;
        self.stats.copies_created += 1;
        linfo!("Copied module {:?} to {:?}", source, copy_path);

        let module = match self.backend.open(&copy_path) {
            Ok(module) => module,
            Err(err) => {
                remove_copy(&copy_path);
                return Err(Load_Error::Open_Failed {
                    path: copy_path,
                    source: err,
                });
            }
        };

        let backend = &self.backend;
        let resolved = unsafe {
            Game_Api::resolve(
                |name| backend.resolve(&module, name),
                self.require_state_transfer,
            )
        };
        let api = match resolved {
            Ok(api) => api,
            Err(missing) => {
                if let Err(err) = self.backend.close(module) {
                    lwarn!("Failed to close incomplete module {:?}: {}", copy_path, err);
                }
                remove_copy(&copy_path);
                return Err(Load_Error::Symbol_Resolution_Failed {
                    path: copy_path,
                    missing,
                });
            }
        };

        lok!(
            "Loaded module {:?} (source modified at {:?})",
            copy_path,
            fingerprint
        );
        self.live = Some(Live_Module {
            api,
            module,
            copy_path,
        });
        self.fingerprint = fingerprint;
        self.stats.loads += 1;
        self.delete_stale_copy();

        Ok(())
    }

    fn unload_module(&mut self) -> Result<(), Unload_Error> {
        let Live_Module {
            api,
            module,
            copy_path,
        } = match self.live.take() {
            Some(live) => live,
            None => return Ok(()),
        };
        // The entry points die with the module.
        drop(api);

        let res = self.backend.close(module);
        // The copy is of no use anymore even if the module could not be closed.
        self.stale_copy = Some(copy_path.clone());
        if let Err(err) = res {
            return Err(Unload_Error::Unload_Failed {
                path: copy_path,
                source: err,
            });
        }
        self.stats.unloads += 1;
        ldebug!("Unloaded module {:?}", copy_path);
        Ok(())
    }

    fn restore_state(&mut self) -> Result<(), Reload_Error> {
        let api = match self.live.as_ref() {
            Some(live) => &live.api,
            None => return Ok(()),
        };

        if let Some(state) = self.pending_state.take() {
            match api.set_state(&state) {
                Some(0) => {
                    lok!("Restored {} bytes of game state.", state.len());
                    return Ok(());
                }
                Some(code) => {
                    lerr!(
                        "The new module rejected the game state (code {}): restarting the game.",
                        code
                    );
                }
                None => {
                    lwarn!("The new module cannot take the game state: restarting the game.");
                }
            }
        }

        // Nothing to carry over: start the new module like a new game.
        let code = api.prepare();
        if code != 0 {
            return Err(Reload_Error::Prepare_Failed { code });
        }
        api.create_window();
        Ok(())
    }

    fn delete_stale_copy(&mut self) {
        if let Some(stale) = self.stale_copy.take() {
            remove_copy(&stale);
        }
    }
}

impl<B: Module_Backend> Drop for Hotload_Loader<B> {
    fn drop(&mut self) {
        if let Err(err) = self.unload() {
            lerr!("{}", err);
        }
    }
}

fn file_fingerprint(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}

fn remove_copy(path: &Path) {
    if let Err(err) = fs::remove_file(path) {
        lwarn!("Failed to remove old module copy {:?}: {}", path, err);
    }
}

#[cfg(test)]
mod tests {
    use super::module_backend::test_backend::Fake_Backend;
    use super::*;
    use crate::game_api::{self, test_game, Prepare_Fn, Set_State_Fn};
    use inle_test::test_common::set_file_mtime;
    use std::os::raw::c_void;

    const MODULE_NAME: &str = "libimm_game.so";

    struct Fixture {
        dir: tempfile::TempDir,
        backend: Fake_Backend,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            fs::write(dir.path().join(MODULE_NAME), b"module v1").unwrap();
            set_file_mtime(&dir.path().join(MODULE_NAME), 1000);
            Fixture {
                dir,
                backend: Fake_Backend::new(),
            }
        }

        fn config(&self) -> Loader_Config {
            Loader_Config {
                source_path: PathBuf::from(MODULE_NAME),
                base_dir: PathBuf::from(self.dir.path()),
                copy_dir: None,
                check_interval: Duration::default(),
                require_state_transfer: true,
            }
        }

        fn load(&self) -> Hotload_Loader<Fake_Backend> {
            Hotload_Loader::load(self.backend.clone(), self.config()).unwrap()
        }

        fn source(&self) -> PathBuf {
            self.dir.path().join(MODULE_NAME)
        }

        fn rebuild(&self, mtime: u64) {
            fs::write(self.source(), format!("module built at {}", mtime)).unwrap();
            set_file_mtime(&self.source(), mtime);
        }

        /// Every file in the directory except the module itself.
        fn copies(&self) -> Vec<PathBuf> {
            let mut copies = fs::read_dir(self.dir.path())
                .unwrap()
                .map(|e| e.unwrap().path())
                .filter(|p| *p != self.source())
                .collect::<Vec<_>>();
            copies.sort();
            copies
        }

        fn export(&self, name: &'static str, sym: Option<*const c_void>) {
            let mut state = self.backend.state.borrow_mut();
            match sym {
                Some(sym) => state.exports.insert(name, sym),
                None => state.exports.remove(name),
            };
        }
    }

    #[test]
    fn load_opens_a_copy_not_the_source() {
        let fx = Fixture::new();
        let loader = fx.load();

        assert!(loader.is_loaded());
        let copy = loader.current_copy().unwrap().to_path_buf();
        assert_ne!(copy, fx.source());
        assert_eq!(copy.parent(), Some(fx.dir.path()));
        assert_eq!(fs::read(&copy).unwrap(), b"module v1");
        assert_eq!(fx.backend.state.borrow().opened, vec![copy]);
        assert_eq!(loader.stats().copies_created, 1);
    }

    #[test]
    fn relative_copy_dir_is_under_base_dir() {
        let fx = Fixture::new();
        fs::create_dir(fx.dir.path().join("copies")).unwrap();
        let mut cfg = fx.config();
        cfg.copy_dir = Some(PathBuf::from("copies"));

        let loader = Hotload_Loader::load(fx.backend.clone(), cfg).unwrap();
        assert_eq!(
            loader.current_copy().unwrap().parent(),
            Some(fx.dir.path().join("copies").as_path())
        );
    }

    #[test]
    fn load_fails_on_missing_file() {
        let fx = Fixture::new();
        fs::remove_file(fx.source()).unwrap();

        let res = Hotload_Loader::load(fx.backend.clone(), fx.config());
        assert!(matches!(res, Err(Load_Error::File_Not_Found(ref p)) if *p == fx.source()));
        assert_eq!(fx.backend.state.borrow().live, 0);
        assert!(fx.copies().is_empty());
    }

    #[test]
    fn load_fails_on_unopenable_module() {
        let fx = Fixture::new();
        fx.backend.state.borrow_mut().fail_open = true;

        let res = Hotload_Loader::load(fx.backend.clone(), fx.config());
        assert!(matches!(res, Err(Load_Error::Open_Failed { .. })));
        assert!(fx.copies().is_empty());
    }

    #[test]
    fn load_fails_on_uncopyable_module() {
        let fx = Fixture::new();
        let mut cfg = fx.config();
        cfg.copy_dir = Some(fx.dir.path().join("does_not_exist"));

        let res = Hotload_Loader::load(fx.backend.clone(), cfg);
        assert!(matches!(res, Err(Load_Error::Copy_Failed { .. })));
        assert!(fx.backend.state.borrow().opened.is_empty());
    }

    #[test]
    fn partial_resolution_leaves_nothing_loaded() {
        let fx = Fixture::new();
        fx.export(game_api::SYM_GET_STATE, None);

        let res = Hotload_Loader::load(fx.backend.clone(), fx.config());
        match res {
            Err(Load_Error::Symbol_Resolution_Failed { missing, .. }) => {
                assert_eq!(missing, vec![game_api::SYM_GET_STATE])
            }
            Err(err) => panic!("unexpected error {}", err),
            Ok(_) => panic!("a module with missing entry points was accepted"),
        }
        let state = fx.backend.state.borrow();
        assert_eq!(state.opened.len(), 1);
        assert_eq!(state.closed.len(), 1);
        assert_eq!(state.live, 0);
        drop(state);
        assert!(fx.copies().is_empty());
    }

    #[test]
    fn unchanged_source_is_a_noop() {
        let fx = Fixture::new();
        let mut loader = fx.load();
        let copies_before = fx.copies();

        for _ in 0..10 {
            assert!(!loader.check_and_reload().unwrap());
        }
        assert_eq!(fx.copies(), copies_before);
        assert_eq!(loader.stats().copies_created, 1);
        assert_eq!(loader.stats().reloads, 0);
        assert_eq!(fx.backend.state.borrow().opened.len(), 1);
    }

    #[test]
    fn changed_source_is_reloaded_exactly_once() {
        let fx = Fixture::new();
        let mut loader = fx.load();
        let first_copy = loader.current_copy().unwrap().to_path_buf();

        fx.rebuild(2000);

        assert!(loader.check_and_reload().unwrap());
        assert!(!loader.check_and_reload().unwrap());
        assert!(!loader.check_and_reload().unwrap());

        let stats = loader.stats();
        assert_eq!(stats.reloads, 1);
        assert_eq!(stats.unloads, 1);
        assert_eq!(stats.loads, 2);
        assert_eq!(stats.copies_created, 2);

        let new_copy = loader.current_copy().unwrap().to_path_buf();
        assert_ne!(new_copy, first_copy);
        // The superseded copy is gone, the new one holds the new build.
        assert_eq!(fx.copies(), vec![new_copy.clone()]);
        assert_eq!(fs::read(&new_copy).unwrap(), b"module built at 2000");

        let backend_state = fx.backend.state.borrow();
        assert_eq!(backend_state.live, 1);
        assert_eq!(backend_state.closed, vec![1]);
    }

    #[test]
    fn an_older_timestamp_also_counts_as_a_change() {
        let fx = Fixture::new();
        let mut loader = fx.load();

        fx.rebuild(500);
        assert!(loader.check_and_reload().unwrap());
    }

    #[test]
    fn state_survives_reload() {
        let fx = Fixture::new();
        let mut loader = fx.load();
        {
            let api = loader.api().unwrap();
            assert_eq!(api.prepare(), 0);
            api.create_window();
            api.loop_frame();
            api.loop_frame();
        }
        test_game::set_score(987_654_321);
        let before = test_game::game();

        fx.rebuild(2000);
        assert!(loader.check_and_reload().unwrap());

        let after = test_game::game();
        assert_eq!(after.frames, before.frames);
        assert_eq!(after.score, before.score);
        // The state was injected, the game was not restarted
        assert_eq!(after.prepared, 0);
    }

    #[test]
    fn reload_without_state_transfer_restarts_the_game() {
        let fx = Fixture::new();
        fx.export(game_api::SYM_GET_STATE, None);
        fx.export(game_api::SYM_SET_STATE, None);
        let mut cfg = fx.config();
        cfg.require_state_transfer = false;
        let mut loader = Hotload_Loader::load(fx.backend.clone(), cfg).unwrap();
        assert!(!loader.api().unwrap().has_state_transfer());

        test_game::set_score(5);
        fx.rebuild(2000);
        assert!(loader.check_and_reload().unwrap());

        let game = test_game::game();
        assert_eq!(game.score, 0);
        assert_eq!(game.prepared, 1);
        assert_eq!(game.windows_created, 1);
    }

    #[test]
    fn rejected_state_restarts_the_game() {
        let fx = Fixture::new();
        let mut loader = fx.load();
        test_game::set_score(5);

        fx.export(
            game_api::SYM_SET_STATE,
            Some(test_game::set_state_rejecting as Set_State_Fn as *const c_void),
        );
        fx.rebuild(2000);
        assert!(loader.check_and_reload().unwrap());

        let game = test_game::game();
        assert_eq!(game.score, 0);
        assert_eq!(game.prepared, 1);
    }

    #[test]
    fn rejected_state_and_failing_prepare_is_an_error() {
        let fx = Fixture::new();
        let mut loader = fx.load();

        fx.export(
            game_api::SYM_SET_STATE,
            Some(test_game::set_state_rejecting as Set_State_Fn as *const c_void),
        );
        fx.export(
            game_api::SYM_PREPARE,
            Some(test_game::prepare_failing as Prepare_Fn as *const c_void),
        );
        fx.rebuild(2000);
        assert!(matches!(
            loader.check_and_reload(),
            Err(Reload_Error::Prepare_Failed { code: 1 })
        ));
    }

    #[test]
    fn deleted_source_fails_the_reload_and_leaves_nothing_loaded() {
        let fx = Fixture::new();
        let mut loader = fx.load();

        fs::remove_file(fx.source()).unwrap();
        let res = loader.check_and_reload();
        assert!(matches!(
            res,
            Err(Reload_Error::Load(Load_Error::File_Not_Found(_)))
        ));
        assert!(!loader.is_loaded());
        assert!(loader.api().is_none());
        assert_eq!(fx.backend.state.borrow().live, 0);

        // Nothing changed since the failed attempt: no retry
        assert!(!loader.check_and_reload().unwrap());
    }

    #[test]
    fn failed_reload_recovers_with_the_saved_state() {
        let fx = Fixture::new();
        let mut loader = fx.load();
        test_game::set_score(77);

        // A broken build...
        fx.export(game_api::SYM_LOOP, None);
        fx.rebuild(2000);
        assert!(matches!(
            loader.check_and_reload(),
            Err(Reload_Error::Load(Load_Error::Symbol_Resolution_Failed { .. }))
        ));
        assert!(!loader.is_loaded());

        // ...then a fixed one.
        fx.export(
            game_api::SYM_LOOP,
            Some(test_game::loop_frame as game_api::Loop_Fn as *const c_void),
        );
        fx.rebuild(3000);
        assert!(loader.check_and_reload().unwrap());
        assert!(loader.is_loaded());
        assert_eq!(test_game::game().score, 77);
    }

    #[test]
    fn unload_failure_is_reported() {
        let fx = Fixture::new();
        let mut loader = fx.load();

        fx.backend.state.borrow_mut().fail_close = true;
        fx.rebuild(2000);
        assert!(matches!(
            loader.check_and_reload(),
            Err(Reload_Error::Unload(Unload_Error::Unload_Failed { .. }))
        ));
        assert!(!loader.is_loaded());
        fx.backend.state.borrow_mut().fail_close = false;

        // The copy of the module that failed to close is still cleaned up.
        drop(loader);
        assert!(fx.copies().is_empty());
    }

    #[test]
    fn failed_unload_still_deletes_the_copy() {
        let fx = Fixture::new();
        let mut loader = fx.load();

        fx.backend.state.borrow_mut().fail_close = true;
        assert!(matches!(
            loader.unload(),
            Err(Unload_Error::Unload_Failed { .. })
        ));
        fx.backend.state.borrow_mut().fail_close = false;
        assert!(!loader.is_loaded());
        assert!(fx.copies().is_empty());
    }

    #[test]
    fn oversized_state_restarts_the_game() {
        let fx = Fixture::new();
        fx.export(
            game_api::SYM_GET_STATE,
            Some(test_game::get_state_huge as game_api::Get_State_Fn as *const c_void),
        );
        let mut loader = fx.load();
        test_game::set_score(9);

        fx.rebuild(2000);
        assert!(loader.check_and_reload().unwrap());
        assert!(loader.is_loaded());
        let game = test_game::game();
        assert_eq!(game.score, 0);
        assert_eq!(game.prepared, 1);
    }

    #[test]
    fn sequential_reloads_use_distinct_copies() {
        let fx = Fixture::new();
        let mut loader = fx.load();
        let mut seen = vec![loader.current_copy().unwrap().to_path_buf()];

        for i in 0..5 {
            fx.rebuild(2000 + i);
            assert!(loader.check_and_reload().unwrap());
            let copy = loader.current_copy().unwrap().to_path_buf();
            assert!(!seen.contains(&copy), "{:?} was reused", copy);
            seen.push(copy);
        }
        assert_eq!(loader.stats().reloads, 5);
        assert_eq!(fx.copies().len(), 1);
    }

    #[test]
    fn checks_are_throttled() {
        let fx = Fixture::new();
        let mut cfg = fx.config();
        cfg.check_interval = Duration::from_secs(3600);
        let mut loader = Hotload_Loader::load(fx.backend.clone(), cfg).unwrap();

        fx.rebuild(2000);
        assert!(!loader.check_and_reload().unwrap());
        assert_eq!(loader.stats().reloads, 0);
    }

    #[test]
    fn unload_releases_the_module_and_its_copy() {
        let fx = Fixture::new();
        let mut loader = fx.load();

        loader.unload().unwrap();
        assert!(!loader.is_loaded());
        assert!(fx.copies().is_empty());
        assert_eq!(fx.backend.state.borrow().live, 0);

        // Unloading twice is harmless
        loader.unload().unwrap();
        assert_eq!(fx.backend.state.borrow().closed.len(), 1);
    }

    #[test]
    fn dropping_the_loader_unloads() {
        let fx = Fixture::new();
        {
            let _loader = fx.load();
            assert_eq!(fx.backend.state.borrow().live, 1);
        }
        assert_eq!(fx.backend.state.borrow().live, 0);
        assert!(fx.copies().is_empty());
    }

    #[test]
    fn get_state_is_read_from_the_module_before_unloading() {
        let fx = Fixture::new();
        let mut loader = fx.load();
        // The fake module forgets its globals when reopened, like a real one would.
        test_game::set_score(3);
        fx.rebuild(2000);
        assert!(loader.check_and_reload().unwrap());
        assert_eq!(test_game::game().score, 3);
        assert_eq!(loader.backend().state.borrow().closed, vec![1]);
    }
}
