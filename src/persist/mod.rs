mod employee;

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::debug;

use crate::error::{FormatError, PersistError, PersistResult};

pub use employee::Employee;

pub const DEFAULT_ARTIFACT: &str = "reyan_ali.ser";

const MAGIC: [u8; 4] = *b"PREC";
const STREAM_VERSION: u8 = 1;
const MAX_TEXT_LEN: usize = 16 * 1024 * 1024;

const TAG_NULL: u8 = 0;
const TAG_STR: u8 = 1;

pub trait Persistable: Sized {
    const TYPE_NAME: &'static str;
    const VERSION: u16;

    fn write_fields(&self, out: &mut FieldWriter);

    fn read_fields(fields: &mut FieldSet) -> Result<Self, FormatError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Str(String),
}

impl FieldValue {
    fn tag(&self) -> u8 {
        match self {
            FieldValue::Null => TAG_NULL,
            FieldValue::Str(_) => TAG_STR,
        }
    }
}

#[derive(Debug, Default)]
pub struct FieldWriter {
    fields: Vec<(&'static str, FieldValue)>,
}

impl FieldWriter {
    pub fn str(&mut self, name: &'static str, value: &str) {
        self.fields.push((name, FieldValue::Str(value.to_owned())));
    }

    pub fn opt_str(&mut self, name: &'static str, value: Option<&str>) {
        let value = value.map_or(FieldValue::Null, |v| FieldValue::Str(v.to_owned()));
        self.fields.push((name, value));
    }
}

#[derive(Debug, Default)]
pub struct FieldSet {
    fields: Vec<(String, FieldValue)>,
}

impl FieldSet {
    fn insert(&mut self, name: String, value: FieldValue) -> Result<(), FormatError> {
        if self.fields.iter().any(|(existing, _)| *existing == name) {
            return Err(FormatError::DuplicateField(name));
        }
        self.fields.push((name, value));
        Ok(())
    }

    fn take(&mut self, name: &str) -> Option<FieldValue> {
        let idx = self.fields.iter().position(|(field, _)| field == name)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn take_str(&mut self, name: &'static str) -> Result<String, FormatError> {
        match self.take(name) {
            Some(FieldValue::Str(value)) => Ok(value),
            Some(FieldValue::Null) => Err(FormatError::UnexpectedNull(name)),
            None => Err(FormatError::MissingField(name)),
        }
    }

    pub fn take_opt_str(&mut self, name: &'static str) -> Result<Option<String>, FormatError> {
        match self.take(name) {
            Some(FieldValue::Str(value)) => Ok(Some(value)),
            Some(FieldValue::Null) | None => Ok(None),
        }
    }

    fn remaining(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

pub fn encode<T: Persistable>(record: &T) -> PersistResult<Vec<u8>> {
    let mut fields = FieldWriter::default();
    record.write_fields(&mut fields);

    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(&MAGIC);
    buf.push(STREAM_VERSION);
    put_text_u16(&mut buf, T::TYPE_NAME)?;
    buf.extend_from_slice(&T::VERSION.to_le_bytes());
    buf.extend_from_slice(&len_u16(fields.fields.len())?.to_le_bytes());

    for (name, value) in &fields.fields {
        put_text_u16(&mut buf, name)?;
        buf.push(value.tag());
        if let FieldValue::Str(text) = value {
            put_text_u32(&mut buf, text)?;
        }
    }

    Ok(buf)
}

pub fn decode<T: Persistable>(bytes: &[u8]) -> PersistResult<T> {
    let mut source = bytes;
    let record = read_record(&mut source)?;
    if !source.is_empty() {
        return Err(FormatError::TrailingBytes(source.len()).into());
    }
    Ok(record)
}

pub fn write_record<T: Persistable, W: Write>(mut sink: W, record: &T) -> PersistResult<()> {
    let bytes = encode(record)?;
    sink.write_all(&bytes)?;
    sink.flush()?;
    Ok(())
}

// Leaves whatever follows the record in `source`.
pub fn read_record<T: Persistable, R: Read>(mut source: R) -> PersistResult<T> {
    let magic: [u8; 4] = read_array(&mut source)?;
    if magic != MAGIC {
        return Err(FormatError::BadMagic(magic).into());
    }

    let [stream_version] = read_array(&mut source)?;
    if stream_version != STREAM_VERSION {
        return Err(FormatError::UnsupportedStreamVersion(stream_version).into());
    }

    let type_len = read_u16(&mut source)? as usize;
    let type_name = read_text(&mut source, type_len)?;
    if type_name != T::TYPE_NAME {
        return Err(FormatError::TypeMismatch {
            expected: T::TYPE_NAME,
            found: type_name,
        }
        .into());
    }

    let version = read_u16(&mut source)?;
    if version != T::VERSION {
        return Err(FormatError::VersionMismatch {
            type_name: T::TYPE_NAME,
            expected: T::VERSION,
            found: version,
        }
        .into());
    }

    let count = read_u16(&mut source)?;
    let mut fields = FieldSet::default();
    for _ in 0..count {
        let name_len = read_u16(&mut source)? as usize;
        let name = read_text(&mut source, name_len)?;
        let [tag] = read_array(&mut source)?;
        let value = match tag {
            TAG_NULL => FieldValue::Null,
            TAG_STR => {
                let len = u32::from_le_bytes(read_array(&mut source)?) as usize;
                FieldValue::Str(read_text(&mut source, len)?)
            }
            tag => return Err(FormatError::UnknownTag { field: name, tag }.into()),
        };
        fields.insert(name, value)?;
    }

    let record = T::read_fields(&mut fields)?;
    for name in fields.remaining() {
        debug!("skipping unknown field `{name}` in `{}` record", T::TYPE_NAME);
    }
    Ok(record)
}

pub fn save<T: Persistable>(path: impl AsRef<Path>, record: &T) -> PersistResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    write_record(BufWriter::new(file), record)?;
    debug!("saved `{}` record to {}", T::TYPE_NAME, path.display());
    Ok(())
}

pub fn load<T: Persistable>(path: impl AsRef<Path>) -> PersistResult<T> {
    let path = path.as_ref();
    let mut source = BufReader::new(File::open(path)?);
    let record = read_record(&mut source)?;

    let mut rest = Vec::new();
    source.read_to_end(&mut rest)?;
    if !rest.is_empty() {
        return Err(FormatError::TrailingBytes(rest.len()).into());
    }

    debug!("loaded `{}` record from {}", T::TYPE_NAME, path.display());
    Ok(record)
}

fn len_u16(len: usize) -> Result<u16, FormatError> {
    u16::try_from(len).map_err(|_| FormatError::LengthOverflow {
        len,
        max: u16::MAX as usize,
    })
}

fn put_text_u16(buf: &mut Vec<u8>, text: &str) -> Result<(), FormatError> {
    buf.extend_from_slice(&len_u16(text.len())?.to_le_bytes());
    buf.extend_from_slice(text.as_bytes());
    Ok(())
}

fn put_text_u32(buf: &mut Vec<u8>, text: &str) -> Result<(), FormatError> {
    if text.len() > MAX_TEXT_LEN {
        return Err(FormatError::LengthOverflow {
            len: text.len(),
            max: MAX_TEXT_LEN,
        });
    }
    buf.extend_from_slice(&(text.len() as u32).to_le_bytes());
    buf.extend_from_slice(text.as_bytes());
    Ok(())
}

fn read_array<const N: usize, R: Read>(source: &mut R) -> PersistResult<[u8; N]> {
    let mut buf = [0u8; N];
    source.read_exact(&mut buf).map_err(PersistError::from_read)?;
    Ok(buf)
}

fn read_u16<R: Read>(source: &mut R) -> PersistResult<u16> {
    Ok(u16::from_le_bytes(read_array(source)?))
}

fn read_text<R: Read>(source: &mut R, len: usize) -> PersistResult<String> {
    if len > MAX_TEXT_LEN {
        return Err(FormatError::LengthOverflow {
            len,
            max: MAX_TEXT_LEN,
        }
        .into());
    }

    let mut buf = Vec::with_capacity(len.min(4096));
    source
        .take(len as u64)
        .read_to_end(&mut buf)
        .map_err(PersistError::from_read)?;
    if buf.len() < len {
        return Err(FormatError::Truncated.into());
    }

    String::from_utf8(buf).map_err(|_| FormatError::InvalidUtf8.into())
}
