use super::value::Cfg_Value;
use std::fs::File;
use std::io::prelude::*;
use std::io::BufReader;
use std::path::Path;
use std::vec::Vec;

const HEADER_START: char = '[';
const HEADER_END: char = ']';
const KEY_VALUE_SEPARATOR: char = '=';
const COMMENT_START: char = '#';
const STRING_DELIM: char = '"';

#[derive(Clone, Debug, PartialEq)]
pub struct Cfg_Entry {
    pub key: String,
    pub value: Cfg_Value,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Cfg_Section {
    pub header: String,
    pub entries: Vec<Cfg_Entry>,
}

pub fn parse_config_file(path: &Path) -> Result<Vec<Cfg_Section>, std::io::Error> {
    let file = File::open(path)?;
    let mut lines = vec![];
    for line in BufReader::new(file).lines() {
        lines.push(line?);
    }
    Ok(parse_lines(lines.into_iter(), path))
}

/// Entries appearing before the first header go in a section with an empty header.
pub fn parse_lines(lines: impl std::iter::Iterator<Item = String>, path: &Path) -> Vec<Cfg_Section> {
    let mut sections = vec![];
    let mut cur_section = Cfg_Section {
        header: String::from(""),
        entries: vec![],
    };

    for (lineno, line) in lines.enumerate() {
        let line = strip_comment(&line).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with(HEADER_START) {
            if !line.ends_with(HEADER_END) {
                lwarn!(
                    "Line {} in file {:?} has an unterminated header: `{}`",
                    lineno + 1,
                    path,
                    line
                );
                continue;
            }
            if !cur_section.header.is_empty() || !cur_section.entries.is_empty() {
                sections.push(cur_section);
            }
            cur_section = Cfg_Section {
                header: String::from(line[1..line.len() - 1].trim()),
                entries: vec![],
            };
        } else {
            let (key, val) = match line.find(KEY_VALUE_SEPARATOR) {
                Some(idx) => (line[..idx].trim(), line[idx + 1..].trim()),
                None => {
                    lwarn!(
                        "Line {} in file {:?} is not a `key = value` pair: `{}`",
                        lineno + 1,
                        path,
                        line
                    );
                    continue;
                }
            };
            if key.is_empty() || key.contains(char::is_whitespace) {
                lwarn!(
                    "Line {} in file {:?} has an invalid key: `{}`",
                    lineno + 1,
                    path,
                    line
                );
                continue;
            }
            lverbose!("Parsed cfg entry {}/{} = {}", cur_section.header, key, val);
            cur_section.entries.push(Cfg_Entry {
                key: String::from(key),
                value: parse_value(val),
            });
        }
    }
    if !cur_section.header.is_empty() || !cur_section.entries.is_empty() {
        sections.push(cur_section);
    }

    sections
}

// A `#` inside a quoted string is not a comment.
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (idx, c) in line.char_indices() {
        match c {
            STRING_DELIM => in_string = !in_string,
            COMMENT_START if !in_string => return &line[..idx],
            _ => {}
        }
    }
    line
}

fn parse_value(raw: &str) -> Cfg_Value {
    if raw.is_empty() {
        Cfg_Value::Nil
    } else if raw.len() >= 2 && raw.starts_with(STRING_DELIM) && raw.ends_with(STRING_DELIM) {
        Cfg_Value::String(String::from(&raw[1..raw.len() - 1]))
    }
    // @Speed: this is easy but inefficient! An actual lexer would be faster, but for now this is ok.
    else if let Ok(v) = raw.parse::<i32>() {
        Cfg_Value::Int(v)
    } else if let Ok(v) = raw.parse::<f32>() {
        Cfg_Value::Float(v)
    } else if let Ok(v) = raw.parse::<bool>() {
        Cfg_Value::Bool(v)
    } else {
        Cfg_Value::String(String::from(raw))
    }
}
