use super::Key;
use crate::camera::Camera;
use crate::level::{Box_Def, Color};
use std::collections::VecDeque;

#[derive(Default)]
pub struct Create_Window_Args;

/// A headless window: keeps track of what a real one would show, and never shows it.
pub struct Window_Handle {
    size: (u32, u32),
    title: String,
    fullscreen: bool,
    open: bool,

    frames_presented: u64,
    /// Close after presenting this many frames (0 = never).
    max_frames: u64,

    pending_keys: VecDeque<Key>,
    pressed_keys: Vec<Key>,

    draw_calls: u32,
    draw_calls_last_frame: u32,
}

pub fn create_window(_args: &Create_Window_Args, size: (u32, u32), title: &str) -> Window_Handle {
    ldebug!("Created null window {:?} of size {:?}", title, size);
    Window_Handle {
        size,
        title: String::from(title),
        fullscreen: false,
        open: true,
        frames_presented: 0,
        max_frames: 0,
        pending_keys: VecDeque::default(),
        pressed_keys: vec![],
        draw_calls: 0,
        draw_calls_last_frame: 0,
    }
}

pub fn close_window(window: &mut Window_Handle) {
    window.open = false;
}

pub fn should_close(window: &Window_Handle) -> bool {
    !window.open || (window.max_frames > 0 && window.frames_presented >= window.max_frames)
}

pub fn get_size(window: &Window_Handle) -> (u32, u32) {
    window.size
}

pub fn set_size(window: &mut Window_Handle, size: (u32, u32)) {
    window.size = size;
}

pub fn get_title(window: &Window_Handle) -> &str {
    &window.title
}

pub fn is_fullscreen(window: &Window_Handle) -> bool {
    window.fullscreen
}

pub fn set_fullscreen(window: &mut Window_Handle, fullscreen: bool) {
    window.fullscreen = fullscreen;
}

pub fn frames_presented(window: &Window_Handle) -> u64 {
    window.frames_presented
}

pub fn set_frames_presented(window: &mut Window_Handle, frames: u64) {
    window.frames_presented = frames;
}

pub fn set_max_frames(window: &mut Window_Handle, max_frames: u64) {
    window.max_frames = max_frames;
}

pub fn poll_input(window: &mut Window_Handle) {
    window.pressed_keys.clear();
    window.pressed_keys.extend(window.pending_keys.drain(..));
}

pub fn is_key_pressed(window: &Window_Handle, key: Key) -> bool {
    window.pressed_keys.contains(&key)
}

pub fn clear(window: &mut Window_Handle, _color: Color) {
    window.draw_calls += 1;
}

pub fn draw_box(window: &mut Window_Handle, _camera: &Camera, _b: &Box_Def) {
    // Solid + wireframe
    window.draw_calls += 2;
}

pub fn draw_grid(window: &mut Window_Handle, _slices: u32, _spacing: f32) {
    window.draw_calls += 1;
}

pub fn draw_text(window: &mut Window_Handle, _text: &str, _pos: (i32, i32)) {
    window.draw_calls += 1;
}

pub fn display(window: &mut Window_Handle) {
    window.frames_presented += 1;
    window.draw_calls_last_frame = window.draw_calls;
    window.draw_calls = 0;
}

#[cfg(test)]
pub fn inject_key_press(window: &mut Window_Handle, key: Key) {
    window.pending_keys.push_back(key);
}

#[cfg(test)]
pub fn draw_calls_last_frame(window: &Window_Handle) -> u32 {
    window.draw_calls_last_frame
}
