use crate::error::ValueError;
use crate::types::name::is_tag_char;

/// An extended string: a type name plus an encoded string value, written
/// `Type("val")` in Zinc.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XStr {
    type_name: String,
    val: String,
}

impl XStr {
    /// `type_name` must start with an ASCII uppercase letter. `C` is reserved
    /// for coordinates.
    pub fn new(type_name: impl Into<String>, val: impl Into<String>) -> Result<Self, ValueError> {
        let type_name = type_name.into();
        let mut chars = type_name.chars();
        let valid = matches!(chars.next(), Some(c) if c.is_ascii_uppercase())
            && chars.all(is_tag_char)
            && type_name != "C";
        if !valid {
            return Err(ValueError::InvalidXStrType(type_name));
        }
        Ok(Self {
            type_name,
            val: val.into(),
        })
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn val(&self) -> &str {
        &self.val
    }
}

#[cfg(test)]
mod tests {
    use super::XStr;

    #[test]
    fn validates_type_name() {
        let x = XStr::new("Span", "today").unwrap();
        assert_eq!(x.type_name(), "Span");
        assert_eq!(x.val(), "today");
        assert!(XStr::new("span", "x").is_err());
        assert!(XStr::new("C", "x").is_err());
        assert!(XStr::new("Bad-Type", "x").is_err());
    }
}
