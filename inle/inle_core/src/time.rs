use std::time::Duration;
use std::time::Instant;

pub struct Time {
    /// The starting instant, used as reference to compute real_time.
    start_time: Instant,

    /// How much time elapsed since the start of Time, as latest recorded during update()
    real_time: Duration,

    /// The latest updated real delta time
    real_dt: Duration,
}

impl Default for Time {
    fn default() -> Self {
        Time {
            start_time: Instant::now(),
            real_time: Duration::default(),
            real_dt: Duration::default(),
        }
    }
}

impl Time {
    /// Starts counting from `already_elapsed` instead of zero. Used to carry the clock over a hotload.
    pub fn resumed_from(already_elapsed: Duration) -> Self {
        let now = Instant::now();
        Time {
            start_time: now.checked_sub(already_elapsed).unwrap_or(now),
            real_time: already_elapsed,
            real_dt: Duration::default(),
        }
    }

    pub fn update(&mut self) {
        let prev_real_time = self.real_time;
        self.real_time = self.start_time.elapsed();
        self.real_dt = self.real_time.saturating_sub(prev_real_time);
    }

    #[inline(always)]
    pub fn real_dt(&self) -> Duration {
        self.real_dt
    }

    #[inline(always)]
    pub fn dt_secs(&self) -> f32 {
        self.real_dt.as_secs_f32()
    }

    #[inline(always)]
    pub fn real_time(&self) -> Duration {
        self.real_time
    }
}

#[inline(always)]
pub fn to_ms_frac(d: &Duration) -> f32 {
    d.as_secs_f32() * 1000.
}
