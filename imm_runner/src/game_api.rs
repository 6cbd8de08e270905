use std::os::raw::c_void;

pub type Prepare_Fn = unsafe extern "C" fn() -> i32;
pub type Create_Window_Fn = unsafe extern "C" fn();
pub type Loop_Fn = unsafe extern "C" fn();
pub type Window_Should_Close_Fn = unsafe extern "C" fn() -> bool;
pub type Close_Window_Fn = unsafe extern "C" fn();
/// Writes the encoded state into `buf` if `cap` is big enough. Always returns the encoded size.
pub type Get_State_Fn = unsafe extern "C" fn(buf: *mut u8, cap: usize) -> usize;
/// Returns 0 if the state was accepted.
pub type Set_State_Fn = unsafe extern "C" fn(buf: *const u8, len: usize) -> i32;

pub const SYM_PREPARE: &str = "game_prepare";
pub const SYM_CREATE_WINDOW: &str = "game_create_window";
pub const SYM_LOOP: &str = "game_loop";
pub const SYM_WINDOW_SHOULD_CLOSE: &str = "game_window_should_close";
pub const SYM_CLOSE_WINDOW: &str = "game_close_window";
pub const SYM_GET_STATE: &str = "game_get_state";
pub const SYM_SET_STATE: &str = "game_set_state";

// Guards against a module whose state keeps growing between the size query and the copy.
const MAX_GET_STATE_ATTEMPTS: usize = 4;

/// A module reporting a bigger state than this is assumed broken and its state is dropped.
pub const MAX_STATE_SIZE: usize = 64 * 1024 * 1024;

/// The game state as handed out by the old module and handed back to the new one.
/// The host never looks inside: the module owns the format (and its versioning).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Game_State_Blob(Vec<u8>);

impl Game_State_Blob {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

struct State_Transfer_Api {
    get_state: Get_State_Fn,
    set_state: Set_State_Fn,
}

/// The entry points resolved from one loaded game module.
/// Deliberately neither Copy nor Clone: a Game_Api is only ever reachable by reference from the
/// loader that owns the module, so the borrow checker prevents calling into an unloaded module.
pub struct Game_Api {
    prepare: Prepare_Fn,
    create_window: Create_Window_Fn,
    loop_fn: Loop_Fn,
    window_should_close: Window_Should_Close_Fn,
    close_window: Close_Window_Fn,
    state_transfer: Option<State_Transfer_Api>,
}

impl Game_Api {
    /// Resolves every entry point through `lookup`. Either all the required entry points are
    /// found, or the names of the missing ones are returned and no table is built.
    /// The state transfer pair is required when `require_state_transfer` is set; otherwise it
    /// must be either fully present or fully absent.
    ///
    /// # Safety
    /// Every address returned by `lookup` must point to a function with the signature declared
    /// for that symbol, and must stay valid for as long as the returned Game_Api lives.
    pub unsafe fn resolve<F>(
        mut lookup: F,
        require_state_transfer: bool,
    ) -> Result<Game_Api, Vec<&'static str>>
    where
        F: FnMut(&'static str) -> Option<*const c_void>,
    {
        let mut missing = vec![];
        let mut find = |name: &'static str| {
            let sym = lookup(name).filter(|addr| !addr.is_null());
            if sym.is_none() {
                missing.push(name);
            }
            sym
        };

        let prepare = find(SYM_PREPARE);
        let create_window = find(SYM_CREATE_WINDOW);
        let loop_fn = find(SYM_LOOP);
        let window_should_close = find(SYM_WINDOW_SHOULD_CLOSE);
        let close_window = find(SYM_CLOSE_WINDOW);

        let (get_state, set_state) = if require_state_transfer {
            (find(SYM_GET_STATE), find(SYM_SET_STATE))
        } else {
            let get_state = lookup(SYM_GET_STATE).filter(|addr| !addr.is_null());
            let set_state = lookup(SYM_SET_STATE).filter(|addr| !addr.is_null());
            // Half a state transfer api is a broken module, not a legacy one.
            match (get_state, set_state) {
                (Some(_), None) => missing.push(SYM_SET_STATE),
                (None, Some(_)) => missing.push(SYM_GET_STATE),
                _ => {}
            }
            (get_state, set_state)
        };

        match (
            prepare,
            create_window,
            loop_fn,
            window_should_close,
            close_window,
        ) {
            (
                Some(prepare),
                Some(create_window),
                Some(loop_fn),
                Some(window_should_close),
                Some(close_window),
            ) if missing.is_empty() => Ok(Game_Api {
                prepare: std::mem::transmute::<*const c_void, Prepare_Fn>(prepare),
                create_window: std::mem::transmute::<*const c_void, Create_Window_Fn>(
                    create_window,
                ),
                loop_fn: std::mem::transmute::<*const c_void, Loop_Fn>(loop_fn),
                window_should_close: std::mem::transmute::<*const c_void, Window_Should_Close_Fn>(
                    window_should_close,
                ),
                close_window: std::mem::transmute::<*const c_void, Close_Window_Fn>(close_window),
                state_transfer: match (get_state, set_state) {
                    (Some(get_state), Some(set_state)) => Some(State_Transfer_Api {
                        get_state: std::mem::transmute::<*const c_void, Get_State_Fn>(get_state),
                        set_state: std::mem::transmute::<*const c_void, Set_State_Fn>(set_state),
                    }),
                    _ => None,
                },
            }),
            _ => Err(missing),
        }
    }

    pub fn prepare(&self) -> i32 {
        unsafe { (self.prepare)() }
    }

    pub fn create_window(&self) {
        unsafe { (self.create_window)() }
    }

    pub fn loop_frame(&self) {
        unsafe { (self.loop_fn)() }
    }

    pub fn window_should_close(&self) -> bool {
        unsafe { (self.window_should_close)() }
    }

    pub fn close_window(&self) {
        unsafe { (self.close_window)() }
    }

    pub fn has_state_transfer(&self) -> bool {
        self.state_transfer.is_some()
    }

    /// Returns None if the module does not export the state transfer entry points.
    pub fn get_state(&self) -> Option<Game_State_Blob> {
        let api = self.state_transfer.as_ref()?;
        let mut needed = unsafe { (api.get_state)(std::ptr::null_mut(), 0) };
        for _ in 0..MAX_GET_STATE_ATTEMPTS {
            if needed > MAX_STATE_SIZE {
                lerr!(
                    "The module reported a game state of {} bytes (max is {}): treating it as empty.",
                    needed,
                    MAX_STATE_SIZE
                );
                return Some(Game_State_Blob::default());
            }
            let mut buf = vec![0u8; needed];
            let written = unsafe { (api.get_state)(buf.as_mut_ptr(), buf.len()) };
            if written <= buf.len() {
                buf.truncate(written);
                return Some(Game_State_Blob(buf));
            }
            lverbose!("Game state grew from {} to {} bytes while reading it.", needed, written);
            needed = written;
        }
        lwarn!("Game state kept changing size while reading it: treating it as empty.");
        Some(Game_State_Blob::default())
    }

    /// Returns None if the module does not export the state transfer entry points,
    /// otherwise the module's status code (0 = accepted).
    pub fn set_state(&self, state: &Game_State_Blob) -> Option<i32> {
        let api = self.state_transfer.as_ref()?;
        Some(unsafe { (api.set_state)(state.0.as_ptr(), state.0.len()) })
    }
}
