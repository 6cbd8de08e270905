use crate::camera::Camera;
use crate::level::{Box_Def, Color};

mod null;

use self::null as backend;

pub type Window_Handle = backend::Window_Handle;
pub type Create_Window_Args = backend::Create_Window_Args;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    F11,
}

/// What needs to survive a hotload for the window to look untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Window_Snapshot {
    pub size: (u32, u32),
    pub title: String,
    pub fullscreen: bool,
    pub frames_presented: u64,
}

impl AsRef<Window_Handle> for Window_Handle {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl AsMut<Window_Handle> for Window_Handle {
    fn as_mut(&mut self) -> &mut Self {
        self
    }
}

pub fn create_window(args: &Create_Window_Args, size: (u32, u32), title: &str) -> Window_Handle {
    backend::create_window(args, size, title)
}

/// Recreates a window as it was when `snapshot` was taken.
pub fn restore_window(args: &Create_Window_Args, snapshot: &Window_Snapshot) -> Window_Handle {
    let mut window = backend::create_window(args, snapshot.size, &snapshot.title);
    backend::set_fullscreen(&mut window, snapshot.fullscreen);
    backend::set_frames_presented(&mut window, snapshot.frames_presented);
    window
}

pub fn snapshot<W: AsRef<Window_Handle>>(window: &W) -> Window_Snapshot {
    let window = window.as_ref();
    Window_Snapshot {
        size: backend::get_size(window),
        title: String::from(backend::get_title(window)),
        fullscreen: backend::is_fullscreen(window),
        frames_presented: backend::frames_presented(window),
    }
}

#[inline(always)]
pub fn close_window<W: AsMut<Window_Handle>>(window: &mut W) {
    backend::close_window(window.as_mut());
}

#[inline(always)]
pub fn should_close<W: AsRef<Window_Handle>>(window: &W) -> bool {
    backend::should_close(window.as_ref())
}

#[inline(always)]
pub fn get_size<W: AsRef<Window_Handle>>(window: &W) -> (u32, u32) {
    backend::get_size(window.as_ref())
}

#[inline(always)]
pub fn set_size<W: AsMut<Window_Handle>>(window: &mut W, size: (u32, u32)) {
    backend::set_size(window.as_mut(), size);
}

#[inline(always)]
pub fn is_fullscreen<W: AsRef<Window_Handle>>(window: &W) -> bool {
    backend::is_fullscreen(window.as_ref())
}

pub fn toggle_fullscreen<W: AsMut<Window_Handle>>(window: &mut W) {
    let window = window.as_mut();
    let fullscreen = !backend::is_fullscreen(window);
    backend::set_fullscreen(window, fullscreen);
    linfo!("Fullscreen: {}", fullscreen);
}

#[inline(always)]
pub fn set_max_frames<W: AsMut<Window_Handle>>(window: &mut W, max_frames: u64) {
    backend::set_max_frames(window.as_mut(), max_frames);
}

/// To be called once per frame, before querying keys.
#[inline(always)]
pub fn poll_input<W: AsMut<Window_Handle>>(window: &mut W) {
    backend::poll_input(window.as_mut());
}

/// True if `key` went down since the previous poll_input().
#[inline(always)]
pub fn is_key_pressed<W: AsRef<Window_Handle>>(window: &W, key: Key) -> bool {
    backend::is_key_pressed(window.as_ref(), key)
}

#[inline(always)]
pub fn clear<W: AsMut<Window_Handle>>(window: &mut W, color: Color) {
    backend::clear(window.as_mut(), color);
}

#[inline(always)]
pub fn draw_box<W: AsMut<Window_Handle>>(window: &mut W, camera: &Camera, b: &Box_Def) {
    backend::draw_box(window.as_mut(), camera, b);
}

#[inline(always)]
pub fn draw_grid<W: AsMut<Window_Handle>>(window: &mut W, slices: u32, spacing: f32) {
    backend::draw_grid(window.as_mut(), slices, spacing);
}

#[inline(always)]
pub fn draw_text<W: AsMut<Window_Handle>>(window: &mut W, text: &str, pos: (i32, i32)) {
    backend::draw_text(window.as_mut(), text, pos);
}

#[inline(always)]
pub fn display<W: AsMut<Window_Handle>>(window: &mut W) {
    backend::display(window.as_mut());
}

#[cfg(test)]
pub use self::null::{draw_calls_last_frame, inject_key_press};
