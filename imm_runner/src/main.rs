#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
#![allow(non_camel_case_types)]
#![cfg_attr(debug_assertions, allow(dead_code))]

#[macro_use]
extern crate inle_diagnostics;

mod cmdline;
mod game_api;
mod hotload;

use clap::Parser;
use hotload::module_backend::{Module_Backend, Native_Backend};
use hotload::{Hotload_Loader, Loader_Config, Reload_Error};
use inle_core::env::Env_Info;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

#[cfg(target_os = "linux")]
const GAME_MODULE_FILE: &str = "libimm_game.so";
#[cfg(target_os = "windows")]
const GAME_MODULE_FILE: &str = "imm_game.dll";
#[cfg(target_os = "macos")]
const GAME_MODULE_FILE: &str = "libimm_game.dylib";

// How long to wait between two attempts while waiting for a working module.
const KEEP_ALIVE_POLL: Duration = Duration::from_millis(100);

#[derive(Debug, thiserror::Error)]
enum Run_Error {
    #[error("failed to gather environment info: {0}")]
    Env(#[from] std::io::Error),

    #[error(transparent)]
    Load(#[from] hotload::Load_Error),

    #[error(transparent)]
    Reload(#[from] Reload_Error),

    #[error(transparent)]
    Unload(#[from] hotload::Unload_Error),

    #[error("game_prepare failed with code {0}")]
    Prepare_Failed(i32),
}

fn main() -> ExitCode {
    let args = cmdline::Cmdline_Args::parse();
    inle_diagnostics::prelude::set_verbose(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            lerr!("{}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &cmdline::Cmdline_Args) -> Result<(), Run_Error> {
    let env = Env_Info::gather()?;
    lverbose!("Running from {:?}", env.full_exe_path);

    let loader_cfg = Loader_Config {
        source_path: args
            .module
            .clone()
            .unwrap_or_else(|| PathBuf::from(GAME_MODULE_FILE)),
        base_dir: PathBuf::from(env.app_dir.as_ref()),
        copy_dir: args.copy_dir.clone(),
        check_interval: args.check_interval(),
        require_state_transfer: !args.legacy_reload,
    };

    let mut loader = Hotload_Loader::load(Native_Backend, loader_cfg)?;
    run_session(&mut loader, args.keep_alive)?;
    loader.unload()?;

    lok!("Game session ended.");
    Ok(())
}

fn run_session<B: Module_Backend>(
    loader: &mut Hotload_Loader<B>,
    keep_alive: bool,
) -> Result<(), Run_Error> {
    {
        let api = loader.api().ok_or_else(fatal_no_module)?;
        let code = api.prepare();
        if code != 0 {
            return Err(Run_Error::Prepare_Failed(code));
        }
        api.create_window();
    }

    loop {
        match loader.api() {
            Some(api) => {
                if api.window_should_close() {
                    api.close_window();
                    return Ok(());
                }
                api.loop_frame();
            }
            None => wait_for_working_module(loader)?,
        }

        match loader.check_and_reload() {
            Ok(_) => {}
            Err(Reload_Error::Load(err)) if keep_alive => {
                lerr!("{}", err);
                lwarn!("Waiting for a working module at {:?}...", loader.source_path());
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Only checks the module file until a reload succeeds: there is no game to run meanwhile.
fn wait_for_working_module<B: Module_Backend>(
    loader: &mut Hotload_Loader<B>,
) -> Result<(), Run_Error> {
    while !loader.is_loaded() {
        match loader.check_and_reload() {
            Ok(true) => {
                lok!("A working module was loaded: resuming.");
            }
            Ok(false) => std::thread::sleep(KEEP_ALIVE_POLL),
            Err(Reload_Error::Load(err)) => {
                lerr!("{}", err);
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn fatal_no_module() -> Run_Error {
    fatal!("the loader returned without a loaded module!");
}
