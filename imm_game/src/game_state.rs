use crate::camera::Camera;
use crate::settings::Game_Settings;
use crate::window::Window_Snapshot;
use inle_serialize::{Binary_Serializable, Byte_Stream};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub const STATE_MAGIC: [u8; 4] = *b"IMMS";
/// Bump whenever the payload layout changes.
pub const STATE_VERSION: u16 = 1;
const HEADER_SIZE: usize = 4 + 2 + 4;

#[derive(Debug, thiserror::Error)]
pub enum State_Error {
    #[error("state is too short ({0} bytes) to hold a header")]
    Truncated(usize),

    #[error("state has bad magic {0:?}")]
    Bad_Magic([u8; 4]),

    #[error("state version {found} cannot be read by this module (expected {expected})")]
    Version_Mismatch { found: u16, expected: u16 },

    #[error("state declares a {declared} bytes payload but carries {actual}")]
    Size_Mismatch { declared: u32, actual: usize },

    #[error("corrupt state payload: {0}")]
    Corrupt(#[from] std::io::Error),
}

/// Everything that survives a hotload. The level is static data, so it's not here.
#[derive(Clone, Debug, PartialEq)]
pub struct Game_State {
    pub settings: Game_Settings,
    pub camera: Camera,
    /// None if the window was not created yet.
    pub window: Option<Window_Snapshot>,
    pub cur_frame: u64,
    pub real_time: Duration,
    pub config_path: String,
    /// Modification time of the config file as last seen by the game.
    pub config_last_mod: Option<SystemTime>,
}

impl Game_State {
    pub fn encode(&self) -> std::io::Result<Vec<u8>> {
        let mut payload = Byte_Stream::new();
        self.serialize_payload(&mut payload)?;
        let payload = payload.into_vec();

        let mut out = Byte_Stream::new();
        out.write_bytes(&STATE_MAGIC)?;
        out.write_u16(STATE_VERSION)?;
        out.write_u32(payload.len() as u32)?;
        out.write_bytes(&payload)?;
        Ok(out.into_vec())
    }

    pub fn decode(bytes: &[u8]) -> Result<Game_State, State_Error> {
        if bytes.len() < HEADER_SIZE {
            return Err(State_Error::Truncated(bytes.len()));
        }

        let mut input = Byte_Stream::new_from_vec(bytes.to_vec());
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&input.read_bytes(4)?);
        if magic != STATE_MAGIC {
            return Err(State_Error::Bad_Magic(magic));
        }

        let version = input.read_u16()?;
        if version != STATE_VERSION {
            return Err(State_Error::Version_Mismatch {
                found: version,
                expected: STATE_VERSION,
            });
        }

        let declared = input.read_u32()?;
        if declared as usize != input.remaining() {
            return Err(State_Error::Size_Mismatch {
                declared,
                actual: input.remaining(),
            });
        }

        let state = Self::deserialize_payload(&mut input)?;
        if input.remaining() != 0 {
            return Err(State_Error::Size_Mismatch {
                declared,
                actual: declared as usize - input.remaining(),
            });
        }
        Ok(state)
    }

    fn serialize_payload(&self, output: &mut Byte_Stream) -> std::io::Result<()> {
        self.settings.serialize(output)?;
        self.camera.serialize(output)?;
        match &self.window {
            Some(win) => {
                true.serialize(output)?;
                output.write_u32(win.size.0)?;
                output.write_u32(win.size.1)?;
                win.title.serialize(output)?;
                win.fullscreen.serialize(output)?;
                output.write_u64(win.frames_presented)?;
            }
            None => false.serialize(output)?,
        }
        output.write_u64(self.cur_frame)?;
        write_duration(output, self.real_time)?;
        self.config_path.serialize(output)?;
        match self.config_last_mod {
            Some(t) => {
                true.serialize(output)?;
                // A time before the epoch is as good as unknown.
                write_duration(output, t.duration_since(UNIX_EPOCH).unwrap_or_default())
            }
            None => false.serialize(output),
        }
    }

    fn deserialize_payload(input: &mut Byte_Stream) -> std::io::Result<Self> {
        let settings = Game_Settings::deserialize(input)?;
        let camera = Camera::deserialize(input)?;
        let window = if bool::deserialize(input)? {
            let w = input.read_u32()?;
            let h = input.read_u32()?;
            Some(Window_Snapshot {
                size: (w, h),
                title: String::deserialize(input)?,
                fullscreen: bool::deserialize(input)?,
                frames_presented: input.read_u64()?,
            })
        } else {
            None
        };
        let cur_frame = input.read_u64()?;
        let real_time = read_duration(input)?;
        let config_path = String::deserialize(input)?;
        let config_last_mod = if bool::deserialize(input)? {
            Some(UNIX_EPOCH + read_duration(input)?)
        } else {
            None
        };

        Ok(Game_State {
            settings,
            camera,
            window,
            cur_frame,
            real_time,
            config_path,
            config_last_mod,
        })
    }
}

fn write_duration(output: &mut Byte_Stream, d: Duration) -> std::io::Result<()> {
    output.write_u64(d.as_secs())?;
    output.write_u32(d.subsec_nanos())
}

fn read_duration(input: &mut Byte_Stream) -> std::io::Result<Duration> {
    let secs = input.read_u64()?;
    let nanos = input.read_u32()?;
    if nanos >= 1_000_000_000 {
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("{} is not a valid nanosecond count", nanos),
        ));
    }
    Ok(Duration::new(secs, nanos))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Vec3f;

    fn sample_state() -> Game_State {
        let mut camera = Camera::default();
        camera.position = Vec3f::new(3.0, 2.0, 1.0);
        camera.fovy = 70.0;
        Game_State {
            settings: Game_Settings {
                width: 1024,
                height: 768,
                title: String::from("imm"),
                max_frames: 100,
                fov: 70.0,
                target_fps: 30,
            },
            camera,
            window: Some(Window_Snapshot {
                size: (1024, 768),
                title: String::from("imm"),
                fullscreen: true,
                frames_presented: 41,
            }),
            cur_frame: 42,
            real_time: Duration::from_millis(1234),
            config_path: String::from("assets/config.toml"),
            config_last_mod: Some(UNIX_EPOCH + Duration::new(1_600_000_000, 500)),
        }
    }

    #[test]
    fn state_survives_encoding() {
        let state = sample_state();
        let bytes = state.encode().unwrap();
        assert_eq!(&bytes[..4], b"IMMS");
        assert_eq!(Game_State::decode(&bytes).unwrap(), state);

        let mut no_window = sample_state();
        no_window.window = None;
        no_window.config_last_mod = None;
        let bytes = no_window.encode().unwrap();
        assert_eq!(Game_State::decode(&bytes).unwrap(), no_window);
    }

    #[test]
    fn header_layout() {
        let bytes = sample_state().encode().unwrap();
        assert_eq!(u16::from_le_bytes([bytes[4], bytes[5]]), STATE_VERSION);
        let declared = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
        assert_eq!(declared as usize, bytes.len() - HEADER_SIZE);
    }

    #[test]
    fn short_input_is_truncated() {
        assert!(matches!(Game_State::decode(&[]), Err(State_Error::Truncated(0))));
        assert!(matches!(
            Game_State::decode(b"IMMS\x01"),
            Err(State_Error::Truncated(5))
        ));
    }

    #[test]
    fn bad_magic_is_rejected() {
        let mut bytes = sample_state().encode().unwrap();
        bytes[0] = b'X';
        assert!(matches!(
            Game_State::decode(&bytes),
            Err(State_Error::Bad_Magic(m)) if &m == b"XMMS"
        ));
    }

    #[test]
    fn other_versions_are_rejected() {
        let mut bytes = sample_state().encode().unwrap();
        bytes[4..6].copy_from_slice(&(STATE_VERSION + 1).to_le_bytes());
        assert!(matches!(
            Game_State::decode(&bytes),
            Err(State_Error::Version_Mismatch { found, expected })
                if found == STATE_VERSION + 1 && expected == STATE_VERSION
        ));
    }

    #[test]
    fn payload_size_must_match() {
        let mut bytes = sample_state().encode().unwrap();
        bytes.push(0);
        assert!(matches!(
            Game_State::decode(&bytes),
            Err(State_Error::Size_Mismatch { .. })
        ));

        let mut bytes = sample_state().encode().unwrap();
        bytes.truncate(bytes.len() - 3);
        assert!(matches!(
            Game_State::decode(&bytes),
            Err(State_Error::Size_Mismatch { .. })
        ));
    }

    #[test]
    fn lying_size_with_short_payload_is_corrupt() {
        let mut bytes = sample_state().encode().unwrap();
        let keep = HEADER_SIZE + 8;
        bytes.truncate(keep);
        bytes[6..10].copy_from_slice(&8u32.to_le_bytes());
        assert!(matches!(
            Game_State::decode(&bytes),
            Err(State_Error::Corrupt(_))
        ));
    }
}
