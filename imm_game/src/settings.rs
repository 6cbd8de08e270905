use crate::camera::DEFAULT_FOV;
use inle_cfg::Config;
use inle_serialize::{Binary_Serializable, Byte_Stream};

pub const DEFAULT_WIN_SIZE: (u32, u32) = (800, 450);
pub const DEFAULT_TITLE: &str = "imm prototype";
pub const DEFAULT_TARGET_FPS: u32 = 60;

/// The typed view of the values in config.toml the game cares about.
#[derive(Clone, Debug, PartialEq)]
pub struct Game_Settings {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Close the window after this many frames (0 = never).
    pub max_frames: u64,
    pub fov: f32,
    /// 0 = unlimited.
    pub target_fps: u32,
}

impl Default for Game_Settings {
    fn default() -> Self {
        Game_Settings {
            width: DEFAULT_WIN_SIZE.0,
            height: DEFAULT_WIN_SIZE.1,
            title: String::from(DEFAULT_TITLE),
            max_frames: 0,
            fov: DEFAULT_FOV,
            target_fps: DEFAULT_TARGET_FPS,
        }
    }
}

impl Game_Settings {
    pub fn from_config(cfg: &Config) -> Self {
        let defaults = Game_Settings::default();
        Game_Settings {
            width: read_positive(cfg, "window/width", defaults.width),
            height: read_positive(cfg, "window/height", defaults.height),
            title: cfg.read_string_or("window/title", &defaults.title),
            max_frames: read_non_negative(cfg, "window/max_frames", 0) as u64,
            fov: cfg.read_float_or("camera/fov", defaults.fov),
            target_fps: read_non_negative(cfg, "render/target_fps", defaults.target_fps),
        }
    }

    /// Takes the values that can change while the game runs. Returns true if any did.
    pub fn apply_live_changes(&mut self, cfg: &Config) -> bool {
        let new = Game_Settings::from_config(cfg);
        let changed = self.width != new.width
            || self.height != new.height
            || (self.fov - new.fov).abs() > std::f32::EPSILON
            || self.target_fps != new.target_fps;
        self.width = new.width;
        self.height = new.height;
        self.fov = new.fov;
        self.target_fps = new.target_fps;
        changed
    }

    pub fn win_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn read_positive(cfg: &Config, path: &str, default: u32) -> u32 {
    let val = cfg.read_int_or(path, default as i32);
    if val > 0 {
        val as u32
    } else {
        lwarn!("{} must be positive (is {}): using {}", path, val, default);
        default
    }
}

fn read_non_negative(cfg: &Config, path: &str, default: u32) -> u32 {
    let val = cfg.read_int_or(path, default as i32);
    if val >= 0 {
        val as u32
    } else {
        lwarn!("{} must not be negative (is {}): using {}", path, val, default);
        default
    }
}

impl Binary_Serializable for Game_Settings {
    fn serialize(&self, output: &mut Byte_Stream) -> std::io::Result<()> {
        output.write_u32(self.width)?;
        output.write_u32(self.height)?;
        self.title.serialize(output)?;
        output.write_u64(self.max_frames)?;
        output.write_f32(self.fov)?;
        output.write_u32(self.target_fps)
    }

    fn deserialize(input: &mut Byte_Stream) -> std::io::Result<Self> {
        Ok(Game_Settings {
            width: input.read_u32()?,
            height: input.read_u32()?,
            title: String::deserialize(input)?,
            max_frames: input.read_u64()?,
            fov: input.read_f32()?,
            target_fps: input.read_u32()?,
        })
    }
}
