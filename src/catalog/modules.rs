//! Module registry: rotated tile variants with stable integer identities
//!
//! A module is a `(type, rotation)` pair. Ids are assigned on first encounter
//! and never change for the lifetime of the registry. Each type belongs to one
//! symmetry class, which decides how many distinct rotated variants it has.

use std::collections::HashMap;
use std::fmt;

use crate::io::error::{Result, TilewaveError};
use crate::math::rotation::Rotation;

/// Stable identity of a module within one registry
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub usize);

impl ModuleId {
    /// Position of this module in membership sets
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a module type behaves under rotation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SymmetryClass {
    /// All four rotations are distinct
    #[default]
    Asymmetric,
    /// Rotating by 180° is a no-op
    TwoWay,
    /// Rotation is always a no-op
    FourWay,
}

impl SymmetryClass {
    /// Reduce a rotation to the representative this class keeps distinct
    pub const fn canonical(self, rotation: Rotation) -> Rotation {
        match self {
            Self::Asymmetric => rotation,
            Self::TwoWay => match rotation {
                Rotation::R180 => Rotation::R0,
                Rotation::R270 => Rotation::R90,
                other => other,
            },
            Self::FourWay => Rotation::R0,
        }
    }
}

/// A typed, rotated tile variant
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Module {
    /// Type name shared by every rotation of the tile
    pub kind: String,
    /// Rotation of this variant
    pub rotation: Rotation,
    /// Stable identity
    pub id: ModuleId,
    /// Number of concrete placements that produced this module
    pub frequency: usize,
}

/// Catalog of module variants with find-or-create lookup
#[derive(Clone, Debug, Default)]
pub struct ModuleRegistry {
    modules: Vec<Module>,
    index: HashMap<(String, Rotation), ModuleId>,
    symmetry: HashMap<String, SymmetryClass>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare the symmetry class of a type
    ///
    /// Must happen before any module of that type is registered, since the
    /// class decides which rotations collapse onto the same identity.
    pub fn set_symmetry(&mut self, kind: &str, class: SymmetryClass) {
        self.symmetry.insert(kind.to_string(), class);
    }

    /// Symmetry class of a type, asymmetric when undeclared
    pub fn symmetry_class(&self, kind: &str) -> SymmetryClass {
        self.symmetry.get(kind).copied().unwrap_or_default()
    }

    /// Number of registered modules
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether no module is registered
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Look up the id of a `(type, rotation)` pair without creating it
    pub fn find(&self, kind: &str, rotation: Rotation) -> Option<ModuleId> {
        let rotation = self.symmetry_class(kind).canonical(rotation);
        self.index.get(&(kind.to_string(), rotation)).copied()
    }

    /// Find or create the id of a `(type, rotation)` pair
    ///
    /// Returns the id and whether it was newly created. Requesting the same
    /// pair again always yields the same id.
    pub fn upsert(&mut self, kind: &str, rotation: Rotation) -> (ModuleId, bool) {
        let rotation = self.symmetry_class(kind).canonical(rotation);
        let key = (kind.to_string(), rotation);
        if let Some(&id) = self.index.get(&key) {
            return (id, false);
        }

        let id = ModuleId(self.modules.len());
        self.modules.push(Module {
            kind: key.0.clone(),
            rotation,
            id,
            frequency: 0,
        });
        self.index.insert(key, id);
        (id, true)
    }

    /// Find or create the id of a `(type, rotation)` pair
    pub fn identity_of(&mut self, kind: &str, rotation: Rotation) -> ModuleId {
        self.upsert(kind, rotation).0
    }

    /// Re-insert a module read back from a catalog artifact
    ///
    /// # Errors
    ///
    /// Returns an error if the record's id does not match the next free id or
    /// the `(type, rotation)` pair is already registered under another id
    pub fn insert_record(
        &mut self,
        kind: &str,
        id: ModuleId,
        frequency: usize,
        rotation: Rotation,
    ) -> Result<()> {
        if id.index() != self.modules.len() {
            return Err(TilewaveError::InvalidSourceData {
                reason: format!(
                    "module '{kind}' has id {id}, expected {}",
                    self.modules.len()
                ),
            });
        }
        let key = (kind.to_string(), rotation);
        if let Some(existing) = self.index.get(&key) {
            return Err(TilewaveError::InvalidSourceData {
                reason: format!("module '{kind}' {rotation} registered twice ({existing} and {id})"),
            });
        }
        self.modules.push(Module {
            kind: kind.to_string(),
            rotation,
            id,
            frequency,
        });
        self.index.insert(key, id);
        Ok(())
    }

    /// Borrow a module by id
    ///
    /// # Errors
    ///
    /// Returns `UnknownModule` if the id was never registered
    pub fn get(&self, id: ModuleId) -> Result<&Module> {
        self.modules
            .get(id.index())
            .ok_or(TilewaveError::UnknownModule {
                id,
                registered: self.modules.len(),
            })
    }

    /// Whether an id is registered
    pub fn contains(&self, id: ModuleId) -> bool {
        id.index() < self.modules.len()
    }

    /// Count one concrete placement of a module
    ///
    /// # Errors
    ///
    /// Returns `UnknownModule` if the id was never registered
    pub fn record_placement(&mut self, id: ModuleId) -> Result<()> {
        let registered = self.modules.len();
        let module = self
            .modules
            .get_mut(id.index())
            .ok_or(TilewaveError::UnknownModule { id, registered })?;
        module.frequency += 1;
        Ok(())
    }

    /// Rotate a module, registering the rotated variant if it is new
    ///
    /// Four-way symmetric modules come back unchanged. Two-way symmetric
    /// modules treat 180° as 0° and 270° as 90°. Everything else composes
    /// directly.
    ///
    /// # Errors
    ///
    /// Returns `UnknownModule` if `id` was never registered
    pub fn rotate_module(&mut self, id: ModuleId, by: Rotation) -> Result<ModuleId> {
        let module = self.get(id)?;
        let class = self.symmetry_class(&module.kind);
        if class == SymmetryClass::FourWay {
            return Ok(id);
        }

        let rotation = module.rotation.compose(class.canonical(by));
        let kind = module.kind.clone();
        Ok(self.identity_of(&kind, rotation))
    }

    /// Iterate over every module in id order
    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.iter()
    }

    /// Id of the rotation-zero variant of a type
    ///
    /// # Errors
    ///
    /// Returns `UnknownModuleType` if no such module is registered
    pub fn base_variant(&self, kind: &str) -> Result<ModuleId> {
        self.find(kind, Rotation::R0)
            .ok_or_else(|| TilewaveError::UnknownModuleType {
                kind: kind.to_string(),
            })
    }
}
