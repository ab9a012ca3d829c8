use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use core::cell::RefCell;
use core::fmt;

use arbor_reflect::Reflect;
use arbor_reflect::info::TypeInfo;
use arbor_reflect::ops::ReflectRef;
use arbor_utils::hash::HashMap;
use log::debug;

use crate::error::DecodeError;
use crate::metadata::ConstructFn;

// -----------------------------------------------------------------------------
// ReferenceTable

/// Values registered under a reference id during one decode.
#[derive(Default)]
pub(crate) struct ReferenceTable {
    values: HashMap<String, Box<dyn Reflect>>,
}

impl ReferenceTable {
    /// Keeps a handle to `value`. Only shared objects and strings have
    /// identity; anything else is ignored.
    fn register(&mut self, id: &str, value: &dyn Reflect) {
        let handle: Box<dyn Reflect> = match value.reflect_ref() {
            ReflectRef::Shared(shared) => shared.share(),
            ReflectRef::String(text) => Box::new(String::from(text.as_str())),
            _ => {
                debug!(
                    "reference id `{id}` names a `{}`, which has no identity",
                    value.reflect_type_path()
                );
                return;
            }
        };
        self.values.insert(id.into(), handle);
    }

    pub fn resolve(&self, id: &str) -> Option<&dyn Reflect> {
        self.values.get(id).map(|value| &**value)
    }
}

pub(crate) type SharedReferences = Rc<RefCell<ReferenceTable>>;

// -----------------------------------------------------------------------------
// WorkingObject

enum Slot<'a> {
    Empty,
    Owned(Box<dyn Reflect>),
    /// A value that already exists, such as a base field or the contents of
    /// a shared object. It may be replaced once.
    Borrowed {
        target: &'a mut dyn Reflect,
        replaced: bool,
    },
}

/// The result cell of decoding one node.
///
/// A working object starts empty, unless it stands for a value that already
/// exists. [`set`](Self::set) fills it, and registers the value under the
/// node's reference id right away, so nodes further down the same subtree
/// can refer to it.
pub struct WorkingObject<'a> {
    slot: Slot<'a>,
    info: &'static TypeInfo,
    constructor: Option<ConstructFn>,
    reference_id: Option<String>,
    references: SharedReferences,
}

impl<'a> WorkingObject<'a> {
    pub(crate) fn new(
        info: &'static TypeInfo,
        constructor: Option<ConstructFn>,
        reference_id: Option<String>,
        references: SharedReferences,
    ) -> Self {
        Self {
            slot: Slot::Empty,
            info,
            constructor,
            reference_id,
            references,
        }
    }

    pub(crate) fn borrowed(
        target: &'a mut dyn Reflect,
        info: &'static TypeInfo,
        references: SharedReferences,
    ) -> Self {
        Self {
            slot: Slot::Borrowed {
                target,
                replaced: false,
            },
            info,
            constructor: None,
            reference_id: None,
            references,
        }
    }

    /// The type being decoded.
    #[inline]
    pub fn type_info(&self) -> &'static TypeInfo {
        self.info
    }

    /// The reference id the value is registered under once set.
    #[inline]
    pub fn reference_id(&self) -> Option<&str> {
        self.reference_id.as_deref()
    }

    #[inline]
    pub fn is_set(&self) -> bool {
        !matches!(self.slot, Slot::Empty)
    }

    pub fn get(&self) -> Option<&dyn Reflect> {
        match &self.slot {
            Slot::Empty => None,
            Slot::Owned(value) => Some(&**value),
            Slot::Borrowed { target, .. } => Some(&**target),
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut dyn Reflect> {
        match &mut self.slot {
            Slot::Empty => None,
            Slot::Owned(value) => Some(&mut **value),
            Slot::Borrowed { target, .. } => Some(&mut **target),
        }
    }

    /// Stores the decoded value.
    ///
    /// Fails with [`DecodeError::AlreadySet`] when a value was set before.
    pub fn set(&mut self, value: Box<dyn Reflect>) -> Result<(), DecodeError> {
        match &mut self.slot {
            Slot::Empty => self.slot = Slot::Owned(value),
            Slot::Borrowed { target, replaced } if !*replaced => {
                let expected = target.reflect_type_path();
                target.set(value).map_err(|value| DecodeError::TypeMismatch {
                    expected,
                    found: value.reflect_type_path(),
                })?;
                *replaced = true;
            }
            _ => {
                return Err(DecodeError::AlreadySet {
                    type_path: self.info.type_path(),
                });
            }
        }
        if let Some(id) = &self.reference_id
            && let Some(value) = self.get()
        {
            self.references.borrow_mut().register(id, value);
        }
        Ok(())
    }

    /// The current value, creating it with the type's constructor first if
    /// the object is empty.
    pub fn get_existing_or_create_new(&mut self) -> Result<&mut dyn Reflect, DecodeError> {
        let type_path = self.info.type_path();
        if !self.is_set() {
            let constructor = self
                .constructor
                .ok_or(DecodeError::NoConstructor { type_path })?;
            self.set(constructor())?;
        }
        self.get_mut().ok_or(DecodeError::NoConstructor { type_path })
    }

    pub(crate) fn into_value(self) -> Option<Box<dyn Reflect>> {
        match self.slot {
            Slot::Owned(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Debug for WorkingObject<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkingObject")
            .field("type_path", &self.info.type_path())
            .field("is_set", &self.is_set())
            .field("reference_id", &self.reference_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use alloc::rc::Rc;
    use core::cell::RefCell;

    use arbor_reflect::info::Typed;
    use arbor_reflect::{Reflect, Shared};

    use super::{ReferenceTable, WorkingObject};
    use crate::error::DecodeError;

    #[test]
    fn set_registers_before_population() {
        let refs = Rc::new(RefCell::new(ReferenceTable::default()));
        let info = <Shared<u32>>::type_info();
        let mut working = WorkingObject::new(info, None, Some("1".into()), refs.clone());

        working.set(Shared::new(7_u32).into_boxed_reflect()).unwrap();
        let stored = refs.borrow().resolve("1").unwrap().downcast_ref::<Shared<u32>>().cloned();
        *working.get().unwrap().downcast_ref::<Shared<u32>>().unwrap().write() = 8;
        assert_eq!(*stored.unwrap().read(), 8);

        let err = working.set(Shared::new(1_u32).into_boxed_reflect()).unwrap_err();
        assert!(matches!(err, DecodeError::AlreadySet { .. }));

        // The rejected value does not replace the registered one.
        let kept = refs.borrow().resolve("1").unwrap().downcast_ref::<Shared<u32>>().cloned();
        assert_eq!(*kept.unwrap().read(), 8);
    }

    #[test]
    fn borrowed_objects_replace_once() {
        let refs = Rc::new(RefCell::new(ReferenceTable::default()));
        let mut target = 1_u8;
        let mut working = WorkingObject::borrowed(&mut target, u8::type_info(), refs);

        assert!(working.is_set());
        assert!(working.set(2_u16.into_boxed_reflect()).is_err());
        working.set(3_u8.into_boxed_reflect()).unwrap();
        assert!(working.set(4_u8.into_boxed_reflect()).is_err());
        assert!(working.into_value().is_none());
        assert_eq!(target, 3);
    }

    #[test]
    fn missing_constructor() {
        let refs = Rc::new(RefCell::new(ReferenceTable::default()));
        let mut working = WorkingObject::new(u8::type_info(), None, None, refs);
        assert!(matches!(
            working.get_existing_or_create_new(),
            Err(DecodeError::NoConstructor { .. })
        ));
    }
}
