use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Write};
use std::vec::Vec;

/// Little-endian in-memory stream used for everything we serialize.
#[derive(Default)]
pub struct Byte_Stream {
    cursor: Cursor<Vec<u8>>,
}

impl std::convert::AsRef<[u8]> for Byte_Stream {
    fn as_ref(&self) -> &[u8] {
        self.cursor.get_ref()
    }
}

impl Byte_Stream {
    pub fn new() -> Byte_Stream {
        Byte_Stream {
            cursor: Cursor::new(vec![]),
        }
    }

    pub fn new_from_vec(data: Vec<u8>) -> Byte_Stream {
        Byte_Stream {
            cursor: Cursor::new(data),
        }
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.cursor.into_inner()
    }

    pub fn seek(&mut self, pos: u64) {
        self.cursor.set_position(pos);
    }

    pub fn pos(&self) -> u64 {
        self.cursor.position()
    }

    pub fn len(&self) -> usize {
        self.cursor.get_ref().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many bytes are left to read from the current position.
    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.pos() as usize)
    }

    pub fn write_u8(&mut self, x: u8) -> std::io::Result<()> {
        self.cursor.write_u8(x)
    }

    pub fn write_u16(&mut self, x: u16) -> std::io::Result<()> {
        self.cursor.write_u16::<LittleEndian>(x)
    }

    pub fn write_u32(&mut self, x: u32) -> std::io::Result<()> {
        self.cursor.write_u32::<LittleEndian>(x)
    }

    pub fn write_i32(&mut self, x: i32) -> std::io::Result<()> {
        self.cursor.write_i32::<LittleEndian>(x)
    }

    pub fn write_u64(&mut self, x: u64) -> std::io::Result<()> {
        self.cursor.write_u64::<LittleEndian>(x)
    }

    pub fn write_f32(&mut self, x: f32) -> std::io::Result<()> {
        self.cursor.write_f32::<LittleEndian>(x)
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.cursor.write_all(bytes)
    }

    pub fn read_u8(&mut self) -> std::io::Result<u8> {
        self.cursor.read_u8()
    }

    pub fn read_u16(&mut self) -> std::io::Result<u16> {
        self.cursor.read_u16::<LittleEndian>()
    }

    pub fn read_u32(&mut self) -> std::io::Result<u32> {
        self.cursor.read_u32::<LittleEndian>()
    }

    pub fn read_i32(&mut self) -> std::io::Result<i32> {
        self.cursor.read_i32::<LittleEndian>()
    }

    pub fn read_u64(&mut self) -> std::io::Result<u64> {
        self.cursor.read_u64::<LittleEndian>()
    }

    pub fn read_f32(&mut self) -> std::io::Result<f32> {
        self.cursor.read_f32::<LittleEndian>()
    }

    pub fn read_bytes(&mut self, n: usize) -> std::io::Result<Vec<u8>> {
        if n > self.remaining() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                format!("wanted {} bytes but only {} are left", n, self.remaining()),
            ));
        }
        let mut buf = vec![0; n];
        self.cursor.read_exact(&mut buf)?;
        Ok(buf)
    }
}
