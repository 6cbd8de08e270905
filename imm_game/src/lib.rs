#![warn(clippy::all)]
#![allow(clippy::new_without_default)]
#![allow(non_camel_case_types)]
#![cfg_attr(debug_assertions, allow(dead_code))]

#[macro_use]
extern crate inle_diagnostics;

#[macro_use]
extern crate lazy_static;

#[cfg(test)]
#[macro_use]
extern crate inle_test;

pub mod camera;
pub mod game_state;
pub mod level;
pub mod session;
pub mod settings;
pub mod window;

use game_state::Game_State;
use inle_core::env::{self, Env_Info};
use session::Game_Session;
use std::sync::{Mutex, MutexGuard};

const CONFIG_FILE: &str = "config.toml";

// game_set_state return codes
pub const STATE_OK: i32 = 0;
pub const STATE_EMPTY: i32 = 1;
pub const STATE_UNREADABLE: i32 = 2;
pub const STATE_UNUSABLE: i32 = 3;

lazy_static! {
    // The only global of the module: the C entry points have nowhere else to keep the session.
    static ref SESSION: Mutex<Option<Game_Session>> = Mutex::new(None);
}

fn lock_session() -> MutexGuard<'static, Option<Game_Session>> {
    match SESSION.lock() {
        Ok(guard) => guard,
        // A panic mid-frame leaves the session as good as any other frame boundary would.
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Loads the config and sets up a new game. Returns 0 on success.
#[no_mangle]
pub extern "C" fn game_prepare() -> i32 {
    linfo!("Preparing game...");
    match prepare_session() {
        Ok(session) => {
            *lock_session() = Some(session);
            lok!("Game prepared.");
            0
        }
        Err(err) => {
            lerr!("Failed to prepare the game: {}", err);
            1
        }
    }
}

fn prepare_session() -> std::io::Result<Game_Session> {
    let env = Env_Info::gather()?;
    let cfg_path = env::asset_path(&env, CONFIG_FILE);
    Game_Session::prepare(&cfg_path)
}

#[no_mangle]
pub extern "C" fn game_create_window() {
    match lock_session().as_mut() {
        Some(session) => session.create_window(),
        None => {
            lerr!("game_create_window called before game_prepare!");
        }
    }
}

#[no_mangle]
pub extern "C" fn game_loop() {
    if let Some(session) = lock_session().as_mut() {
        session.tick();
    }
}

#[no_mangle]
pub extern "C" fn game_window_should_close() -> bool {
    lock_session().as_ref().map_or(true, Game_Session::should_close)
}

/// Closes the window and ends the game.
#[no_mangle]
pub extern "C" fn game_close_window() {
    if let Some(mut session) = lock_session().take() {
        session.close_window();
    }
}

/// Writes the encoded game state into `buf` if `cap` is enough to hold it.
/// Returns the size of the encoded state either way (0 if there is no game).
///
/// # Safety
/// `buf` must be null or valid for `cap` bytes of writes.
#[no_mangle]
pub unsafe extern "C" fn game_get_state(buf: *mut u8, cap: usize) -> usize {
    let bytes = match encode_session() {
        Some(bytes) => bytes,
        None => return 0,
    };
    if !buf.is_null() && cap >= bytes.len() {
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), buf, bytes.len());
    }
    bytes.len()
}

fn encode_session() -> Option<Vec<u8>> {
    let state = lock_session().as_ref()?.save_state();
    match state.encode() {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            lerr!("Failed to encode the game state: {}", err);
            None
        }
    }
}

/// Replaces the current game (if any) with the one encoded in `buf`.
/// Returns STATE_OK on success, or one of the other STATE_* codes.
///
/// # Safety
/// `buf` must be null or valid for `len` bytes of reads.
#[no_mangle]
pub unsafe extern "C" fn game_set_state(buf: *const u8, len: usize) -> i32 {
    if buf.is_null() || len == 0 {
        lwarn!("game_set_state: no state given.");
        return STATE_EMPTY;
    }
    let bytes = std::slice::from_raw_parts(buf, len);
    restore_session(bytes)
}

fn restore_session(bytes: &[u8]) -> i32 {
    let state = match Game_State::decode(bytes) {
        Ok(state) => state,
        Err(err) => {
            lerr!("game_set_state: {}", err);
            return STATE_UNREADABLE;
        }
    };
    match Game_Session::restore(state) {
        Ok(session) => {
            ldebug!("Restored game at frame {}.", session.cur_frame());
            *lock_session() = Some(session);
            STATE_OK
        }
        Err(err) => {
            lerr!("game_set_state: cannot restore the game: {}", err);
            STATE_UNUSABLE
        }
    }
}
