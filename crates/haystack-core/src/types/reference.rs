use crate::error::ValueError;
use crate::types::name::is_ref_id;
use core::hash::{Hash, Hasher};

/// An entity identifier with an optional display string.
///
/// Identity is the `id` alone: two refs with the same id and different
/// display strings are equal.
#[derive(Debug, Clone, Eq)]
pub struct Ref {
    id: String,
    dis: Option<String>,
}

impl Ref {
    pub fn new(id: impl Into<String>) -> Result<Self, ValueError> {
        let id = id.into();
        if !is_ref_id(&id) {
            return Err(ValueError::InvalidRef(id));
        }
        Ok(Self { id, dis: None })
    }

    pub fn with_dis(id: impl Into<String>, dis: impl Into<String>) -> Result<Self, ValueError> {
        let mut r = Self::new(id)?;
        r.dis = Some(dis.into());
        Ok(r)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn dis(&self) -> Option<&str> {
        self.dis.as_deref()
    }

    /// Display text: the display string when present, otherwise the id.
    pub fn display(&self) -> &str {
        self.dis.as_deref().unwrap_or(&self.id)
    }

    /// Copy of this ref without its display string.
    pub fn without_dis(&self) -> Self {
        Self {
            id: self.id.clone(),
            dis: None,
        }
    }
}

impl PartialEq for Ref {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for Ref {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// A symbolic name such as `^elec-meter`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Result<Self, ValueError> {
        let name = name.into();
        if !is_ref_id(&name) {
            return Err(ValueError::InvalidSymbol(name));
        }
        Ok(Self(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}
