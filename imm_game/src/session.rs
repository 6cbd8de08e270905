use crate::camera::Camera;
use crate::game_state::Game_State;
use crate::level::{self, colors};
use crate::settings::Game_Settings;
use crate::window::{self, Create_Window_Args, Key, Window_Handle};
use inle_cfg::Config;
use inle_core::frame_limiter::Frame_Limiter;
use inle_core::time::Time;
use std::path::{Path, PathBuf};

/// All the state of a running game. It lives inside the game module and is handed to the next
/// module as a Game_State when the module is reloaded.
pub struct Game_Session {
    config: Config,
    settings: Game_Settings,
    camera: Camera,
    window: Option<Window_Handle>,
    time: Time,
    frame_limiter: Frame_Limiter,
    cur_frame: u64,
}

impl Game_Session {
    pub fn prepare(cfg_path: &Path) -> std::io::Result<Game_Session> {
        let config = Config::new_from_file(cfg_path)?;
        let settings = Game_Settings::from_config(&config);
        let mut camera = Camera::default();
        camera.set_fovy(settings.fov);
        let frame_limiter = Frame_Limiter::new(settings.target_fps);

        Ok(Game_Session {
            config,
            settings,
            camera,
            window: None,
            time: Time::default(),
            frame_limiter,
            cur_frame: 0,
        })
    }

    /// Rebuilds a session from the state of a previous module. The config file is re-read: if it
    /// was edited since the state was saved, the edits are applied right away.
    pub fn restore(state: Game_State) -> std::io::Result<Game_Session> {
        let config = Config::new_from_file(&PathBuf::from(&state.config_path))?;
        let config_changed = config.last_modified() != state.config_last_mod;

        let window = state.window.as_ref().map(|snapshot| {
            let mut win = window::restore_window(&Create_Window_Args::default(), snapshot);
            window::set_max_frames(&mut win, state.settings.max_frames);
            win
        });

        let mut session = Game_Session {
            config,
            frame_limiter: Frame_Limiter::new(state.settings.target_fps),
            settings: state.settings,
            camera: state.camera,
            window,
            time: Time::resumed_from(state.real_time),
            cur_frame: state.cur_frame,
        };
        if config_changed {
            linfo!("{:?} changed during the reload.", session.config.path());
            session.apply_config_changes();
        }
        Ok(session)
    }

    pub fn save_state(&self) -> Game_State {
        Game_State {
            settings: self.settings.clone(),
            camera: self.camera,
            window: self.window.as_ref().map(window::snapshot),
            cur_frame: self.cur_frame,
            real_time: self.time.real_time(),
            config_path: self.config.path().to_string_lossy().into_owned(),
            config_last_mod: self.config.last_modified(),
        }
    }

    pub fn create_window(&mut self) {
        if self.window.is_some() {
            lwarn!("create_window called twice: ignoring.");
            return;
        }
        let mut win = window::create_window(
            &Create_Window_Args::default(),
            self.settings.win_size(),
            &self.settings.title,
        );
        window::set_max_frames(&mut win, self.settings.max_frames);
        self.window = Some(win);
        lok!(
            "Created window {:?} ({}x{}).",
            self.settings.title,
            self.settings.width,
            self.settings.height
        );
    }

    pub fn tick(&mut self) {
        self.time.update();
        self.cur_frame += 1;

        if self.config.update(self.time.real_time()) {
            self.apply_config_changes();
        }

        let window = match self.window.as_mut() {
            Some(window) => window,
            None => return,
        };

        window::poll_input(window);
        if window::is_key_pressed(window, Key::F11) {
            window::toggle_fullscreen(window);
        }

        window::clear(window, colors::RAY_WHITE);
        for b in level::LEVEL_BOXES.iter() {
            window::draw_box(window, &self.camera, b);
        }
        window::draw_grid(window, level::GRID_SLICES, level::GRID_SPACING);
        window::draw_text(
            window,
            &format!(
                "FOV: {:.1} | FPS cap: {} | F11: fullscreen",
                self.camera.fovy, self.settings.target_fps
            ),
            (10, 40),
        );
        window::display(window);

        self.frame_limiter.end_frame();
    }

    fn apply_config_changes(&mut self) {
        if !self.settings.apply_live_changes(&self.config) {
            return;
        }
        self.camera.set_fovy(self.settings.fov);
        self.frame_limiter.set_target_fps(self.settings.target_fps);
        if let Some(window) = self.window.as_mut() {
            window::set_size(window, self.settings.win_size());
        }
        linfo!(
            "Applied config: fov = {}, target fps = {}, window = {}x{}",
            self.settings.fov,
            self.settings.target_fps,
            self.settings.width,
            self.settings.height
        );
    }

    /// True if there is no window to run the game in.
    pub fn should_close(&self) -> bool {
        self.window.as_ref().map_or(true, window::should_close)
    }

    pub fn close_window(&mut self) {
        if let Some(mut window) = self.window.take() {
            window::close_window(&mut window);
            lok!("Closed window after {} frames.", self.cur_frame);
        }
    }

    pub fn cur_frame(&self) -> u64 {
        self.cur_frame
    }

    pub fn settings(&self) -> &Game_Settings {
        &self.settings
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn window(&self) -> Option<&Window_Handle> {
        self.window.as_ref()
    }
}
