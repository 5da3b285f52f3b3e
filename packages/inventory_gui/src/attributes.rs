//! Type-erased attribute maps attached to GUI and page states.

use std::{
    any::{Any, type_name},
    borrow::Cow,
    collections::HashMap,
    fmt::{self, Formatter, Debug},
    marker::PhantomData,
};
use parking_lot::Mutex;


/// Typed name of an attribute.
pub struct AttrKey<T> {
    name: Cow<'static, str>,
    _p: PhantomData<fn() -> T>,
}

impl<T> AttrKey<T> {
    pub const fn new(name: &'static str) -> Self {
        AttrKey {
            name: Cow::Borrowed(name),
            _p: PhantomData,
        }
    }

    pub fn owned(name: String) -> Self {
        AttrKey {
            name: Cow::Owned(name),
            _p: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Clone for AttrKey<T> {
    fn clone(&self) -> Self {
        AttrKey {
            name: self.name.clone(),
            _p: PhantomData,
        }
    }
}

impl<T> Debug for AttrKey<T> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "AttrKey<{}>({:?})", type_name::<T>(), self.name)
    }
}


/// Map from attribute name to a value of any type. Interior mutability, so it can be shared
/// behind an `Arc`.
#[derive(Default)]
pub struct Attributes(Mutex<HashMap<String, Box<dyn Any + Send + Sync>>>);

impl Attributes {
    /// Construct empty.
    pub fn new() -> Self {
        Default::default()
    }

    /// Get a copy of the value under `key`, if present and of the right type.
    pub fn get<T: Clone + 'static>(&self, key: &AttrKey<T>) -> Option<T> {
        let map = self.0.lock();
        let val = map.get(key.name())?;
        let val = val.downcast_ref::<T>();
        if val.is_none() {
            warn!(key = %key.name(), expected = %type_name::<T>(), "attribute has unexpected type");
        }
        val.cloned()
    }

    /// Set the value under `key`, replacing any previous value.
    pub fn put<T: Send + Sync + 'static>(&self, key: &AttrKey<T>, val: T) {
        self.0.lock().insert(key.name().to_owned(), Box::new(val));
    }

    /// Remove the value under `key`. Returns whether there was one.
    pub fn remove<T>(&self, key: &AttrKey<T>) -> bool {
        self.0.lock().remove(key.name()).is_some()
    }

    pub fn contains<T>(&self, key: &AttrKey<T>) -> bool {
        self.0.lock().contains_key(key.name())
    }
}

impl Debug for Attributes {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let map = self.0.lock();
        f.debug_set().entries(map.keys()).finish()
    }
}


#[test]
fn test_attributes_typed_access() {
    const COUNT: AttrKey<usize> = AttrKey::new("count");
    let attrs = Attributes::new();
    assert_eq!(attrs.get(&COUNT), None);
    attrs.put(&COUNT, 3);
    assert_eq!(attrs.get(&COUNT), Some(3));
    assert!(attrs.contains(&COUNT));

    let wrong = AttrKey::<String>::owned("count".to_owned());
    assert_eq!(attrs.get(&wrong), None);

    assert!(attrs.remove(&COUNT));
    assert!(!attrs.contains(&COUNT));
}
