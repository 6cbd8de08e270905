use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "imm", about = "Runs the imm game and hot-reloads it when it's rebuilt")]
pub struct Cmdline_Args {
    #[arg(long, value_name = "path")]
    /// The game module to load. Relative paths are relative to the executable's directory.
    pub module: Option<PathBuf>,

    #[arg(long, value_name = "dir")]
    /// Where to put the copies of the module that actually get loaded.
    pub copy_dir: Option<PathBuf>,

    #[arg(long, value_name = "ms", default_value_t = 500)]
    /// Minimum time between two checks of the module file.
    pub check_interval_ms: u64,

    #[arg(long)]
    /// If a reload fails mid-session, wait for a working module instead of exiting.
    pub keep_alive: bool,

    #[arg(long)]
    /// Accept modules without game_get_state/game_set_state (reloading restarts the game).
    pub legacy_reload: bool,

    #[arg(long, short)]
    /// Print verbose diagnostics (debug builds only).
    pub verbose: bool,
}

impl Cmdline_Args {
    pub fn check_interval(&self) -> Duration {
        Duration::from_millis(self.check_interval_ms)
    }
}
