use super::byte_stream::Byte_Stream;

pub trait Binary_Serializable: Sized {
    fn serialize(&self, output: &mut Byte_Stream) -> std::io::Result<()>;

    fn deserialize(input: &mut Byte_Stream) -> std::io::Result<Self>;
}

impl Binary_Serializable for bool {
    fn serialize(&self, output: &mut Byte_Stream) -> std::io::Result<()> {
        output.write_u8(*self as u8)
    }

    fn deserialize(input: &mut Byte_Stream) -> std::io::Result<Self> {
        match input.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            x => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("{} is not a valid bool", x),
            )),
        }
    }
}

impl Binary_Serializable for String {
    fn serialize(&self, output: &mut Byte_Stream) -> std::io::Result<()> {
        output.write_u32(self.len() as u32)?;
        output.write_bytes(self.as_bytes())
    }

    fn deserialize(input: &mut Byte_Stream) -> std::io::Result<Self> {
        let len = input.read_u32()? as usize;
        let bytes = input.read_bytes(len)?;
        String::from_utf8(bytes)
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
    }
}
