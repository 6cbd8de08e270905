use std::time::{Duration, Instant};

/// Sleeps away whatever is left of the frame budget given by a target fps.
/// A target of 0 disables limiting.
pub struct Frame_Limiter {
    target_frame_time: Option<Duration>,
    frame_start: Instant,
}

impl Frame_Limiter {
    pub fn new(target_fps: u32) -> Self {
        Frame_Limiter {
            target_frame_time: frame_time_for(target_fps),
            frame_start: Instant::now(),
        }
    }

    pub fn set_target_fps(&mut self, target_fps: u32) {
        self.target_frame_time = frame_time_for(target_fps);
    }

    pub fn target_frame_time(&self) -> Option<Duration> {
        self.target_frame_time
    }

    /// Returns how long we slept.
    pub fn end_frame(&mut self) -> Duration {
        let elapsed = self.frame_start.elapsed();
        let slept = match self.target_frame_time {
            Some(target) if target > elapsed => {
                let remaining = target - elapsed;
                std::thread::sleep(remaining);
                remaining
            }
            _ => Duration::default(),
        };
        self.frame_start = Instant::now();
        slept
    }
}

fn frame_time_for(target_fps: u32) -> Option<Duration> {
    if target_fps == 0 {
        None
    } else {
        Some(Duration::from_nanos(1_000_000_000 / u64::from(target_fps)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_fps_disables_limiting() {
        let mut limiter = Frame_Limiter::new(0);
        assert_eq!(limiter.target_frame_time(), None);
        assert_eq!(limiter.end_frame(), Duration::default());
    }

    #[test]
    fn target_frame_time_follows_fps() {
        let mut limiter = Frame_Limiter::new(50);
        assert_eq!(limiter.target_frame_time(), Some(Duration::from_millis(20)));
        limiter.set_target_fps(100);
        assert_eq!(limiter.target_frame_time(), Some(Duration::from_millis(10)));
    }
}
