use std::fmt;

#[derive(Clone, Debug, PartialEq)]
pub enum Cfg_Value {
    Nil,
    Bool(bool),
    Int(i32),
    Float(f32),
    String(String),
}

impl Cfg_Value {
    pub fn as_int(&self) -> Option<i32> {
        match self {
            Cfg_Value::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// Ints are accepted as floats, since `fov = 60` is parsed as an Int.
    pub fn as_float(&self) -> Option<f32> {
        match self {
            Cfg_Value::Float(v) => Some(*v),
            Cfg_Value::Int(v) => Some(*v as f32),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Cfg_Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cfg_Value::String(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for Cfg_Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Cfg_Value::Nil => write!(f, "nil"),
            Cfg_Value::Bool(v) => write!(f, "{}", v),
            Cfg_Value::Int(v) => write!(f, "{}", v),
            Cfg_Value::Float(v) => write!(f, "{:?}", v),
            Cfg_Value::String(v) => write!(f, "\"{}\"", v),
        }
    }
}

impl From<bool> for Cfg_Value {
    fn from(v: bool) -> Self {
        Cfg_Value::Bool(v)
    }
}

impl From<i32> for Cfg_Value {
    fn from(v: i32) -> Self {
        Cfg_Value::Int(v)
    }
}

impl From<f32> for Cfg_Value {
    fn from(v: f32) -> Self {
        Cfg_Value::Float(v)
    }
}

impl From<&str> for Cfg_Value {
    fn from(v: &str) -> Self {
        Cfg_Value::String(String::from(v))
    }
}
