use super::parsing::{self, Cfg_Section};
use super::value::Cfg_Value;
use std::collections::{hash_map::Entry, HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

/// How often the backing file's modification time is polled.
pub const DEFAULT_CHECK_INTERVAL: Duration = Duration::from_millis(500);

/// A flat `section/key` -> value table loaded from a single cfg file, which
/// picks up edits to that file while the program runs.
pub struct Config {
    path: PathBuf,
    cfg_var_table: HashMap<String, Cfg_Value>,
    just_changed: HashSet<String>,

    last_mod: Option<SystemTime>,
    check_interval: Duration,
    next_check: Duration,
}

impl Config {
    pub fn new_from_file(path: &Path) -> std::io::Result<Config> {
        #[cfg(debug_assertions)]
        let start_t = std::time::Instant::now();

        let last_mod = modified_time(path);
        let sections = parsing::parse_config_file(path)?;
        let cfg_var_table = flatten(sections);

        #[cfg(debug_assertions)]
        {
            let diff = start_t.elapsed();
            lok!(
                "Loaded cfg file {:?} ({} vars) in {} ms.",
                path,
                cfg_var_table.len(),
                diff.as_secs_f32() * 1000.0,
            );
        }

        Ok(Config {
            path: PathBuf::from(path),
            cfg_var_table,
            just_changed: HashSet::default(),
            last_mod,
            check_interval: DEFAULT_CHECK_INTERVAL,
            next_check: Duration::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn last_modified(&self) -> Option<SystemTime> {
        self.last_mod
    }

    pub fn set_check_interval(&mut self, interval: Duration) {
        self.check_interval = interval;
    }

    /// To be called once per frame with the current time. Re-reads the file when its modification
    /// time differs from the last one seen, at most once per check interval.
    /// Returns true if any var changed value.
    pub fn update(&mut self, now: Duration) -> bool {
        self.just_changed.clear();

        if now < self.next_check {
            return false;
        }
        self.next_check = now + self.check_interval;

        let cur_mod = modified_time(&self.path);
        if cur_mod == self.last_mod {
            return false;
        }
        self.last_mod = cur_mod;

        match parsing::parse_config_file(&self.path) {
            Ok(sections) => {
                self.apply_changes(flatten(sections));
                if !self.just_changed.is_empty() {
                    linfo!(
                        "Reloaded cfg file {:?}: {} vars changed.",
                        self.path,
                        self.just_changed.len()
                    );
                }
                !self.just_changed.is_empty()
            }
            Err(err) => {
                lerr!(
                    "Failed to reload cfg file {:?}: {}. Keeping the old values.",
                    self.path,
                    err
                );
                false
            }
        }
    }

    fn apply_changes(&mut self, new_table: HashMap<String, Cfg_Value>) {
        // Vars removed from the file go back to their defaults.
        let removed: Vec<String> = self
            .cfg_var_table
            .keys()
            .filter(|key| !new_table.contains_key(*key))
            .cloned()
            .collect();
        for key in removed {
            self.cfg_var_table.remove(&key);
            self.just_changed.insert(key);
        }

        for (key, value) in new_table {
            let changed = self.cfg_var_table.get(&key) != Some(&value);
            if changed {
                if let Err(msg) = self.write_cfg(&key, value) {
                    lwarn!("{}", msg);
                }
            }
        }
    }

    pub fn read_cfg(&self, path: &str) -> Option<&Cfg_Value> {
        self.cfg_var_table.get(path)
    }

    pub fn read_int_or(&self, path: &str, default: i32) -> i32 {
        self.read_or(path, default, Cfg_Value::as_int)
    }

    pub fn read_float_or(&self, path: &str, default: f32) -> f32 {
        self.read_or(path, default, Cfg_Value::as_float)
    }

    pub fn read_bool_or(&self, path: &str, default: bool) -> bool {
        self.read_or(path, default, Cfg_Value::as_bool)
    }

    pub fn read_string_or(&self, path: &str, default: &str) -> String {
        match self.read_cfg(path).and_then(Cfg_Value::as_str) {
            Some(s) => String::from(s),
            None => {
                lverbose!("Could not find cfg_var {}: using default {}", path, default);
                String::from(default)
            }
        }
    }

    fn read_or<T, F>(&self, path: &str, default: T, conv: F) -> T
    where
        T: std::fmt::Display,
        F: Fn(&Cfg_Value) -> Option<T>,
    {
        match self.read_cfg(path) {
            Some(value) => conv(value).unwrap_or_else(|| {
                lwarn!(
                    "Cfg_Var {} has incompatible value {}: using default {}",
                    path,
                    value,
                    default
                );
                default
            }),
            None => {
                lverbose!("Could not find cfg_var {}: using default {}", path, default);
                default
            }
        }
    }

    pub fn write_cfg(&mut self, path: &str, val: Cfg_Value) -> Result<(), String> {
        match self.cfg_var_table.entry(String::from(path)) {
            Entry::Vacant(v) => {
                v.insert(val);
            }
            Entry::Occupied(mut o) => {
                if same_kind(&val, o.get()) {
                    o.insert(val);
                } else {
                    return Err(format!("Cfg_Var {} was not updated because its current value ({}) has a type different from the new one ({}).", path, o.get(), val));
                }
            }
        }
        self.just_changed.insert(String::from(path));
        Ok(())
    }

    pub fn has_changed(&self, path: &str) -> bool {
        self.just_changed.contains(path)
    }

}

// `fov = 60` and `fov = 60.5` are both a number: only a change of kind is refused.
fn same_kind(a: &Cfg_Value, b: &Cfg_Value) -> bool {
    match (a, b) {
        (Cfg_Value::Int(_), Cfg_Value::Float(_)) | (Cfg_Value::Float(_), Cfg_Value::Int(_)) => {
            true
        }
        _ => std::mem::discriminant(a) == std::mem::discriminant(b),
    }
}

// Flatten section/entries into `section/key` paths
fn flatten(sections: Vec<Cfg_Section>) -> HashMap<String, Cfg_Value> {
    let mut table = HashMap::new();
    for section in sections.into_iter() {
        for entry in section.entries.into_iter() {
            let name = if section.header.is_empty() {
                entry.key
            } else {
                format!("{}/{}", section.header, entry.key)
            };
            table.insert(name, entry.value);
        }
    }
    table
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}
