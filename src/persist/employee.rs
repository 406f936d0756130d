use std::fmt::{self, Display, Formatter};

use crate::error::FormatError;
use crate::persist::{FieldSet, FieldWriter, Persistable};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    name: String,
    national_id: i32,
    phone: Option<String>,
    address: Option<String>,
}

impl Employee {
    pub fn new(name: impl Into<String>, national_id: i32) -> Self {
        Self {
            name: name.into(),
            national_id,
            phone: None,
            address: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn national_id(&self) -> i32 {
        self.national_id
    }

    pub fn phone(&self) -> Option<&str> {
        self.phone.as_deref()
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.phone = Some(phone.into());
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.address = Some(address.into());
    }
}

impl Persistable for Employee {
    const TYPE_NAME: &'static str = "Employee";
    const VERSION: u16 = 1;

    // national_id stays in memory only.
    fn write_fields(&self, out: &mut FieldWriter) {
        out.str("name", &self.name);
        out.opt_str("phone", self.phone.as_deref());
        out.opt_str("address", self.address.as_deref());
    }

    fn read_fields(fields: &mut FieldSet) -> Result<Self, FormatError> {
        Ok(Self {
            name: fields.take_str("name")?,
            national_id: 0,
            phone: fields.take_opt_str("phone")?,
            address: fields.take_opt_str("address")?,
        })
    }
}

impl Display for Employee {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "{}", self.national_id)?;
        writeln!(f, "{}", self.phone().unwrap_or("null"))?;
        writeln!(f, "{}", self.address().unwrap_or("null"))
    }
}
