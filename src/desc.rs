use core::any::type_name;
use core::marker::PhantomData;

/// Read-only view of one element slot, produced by dereferencing a cursor.
///
/// Ordinary descriptors hand out the slot itself; the managed-string
/// descriptor hands out a view into the string's character buffer instead of
/// the raw slot.
#[derive(Debug, PartialEq)]
pub enum SlotRef<'a, T> {
    Slot(&'a T),
    Str(&'a str),
}

impl<T> Clone for SlotRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T> Copy for SlotRef<'_, T> {}

impl<'a, T> SlotRef<'a, T> {
    /// The underlying slot, or `None` for a managed-string view.
    pub fn slot(self) -> Option<&'a T> {
        match self {
            SlotRef::Slot(s) => Some(s),
            SlotRef::Str(_) => None,
        }
    }

    /// The string view, or `None` for an ordinary slot.
    pub fn as_str(self) -> Option<&'a str> {
        match self {
            SlotRef::Slot(_) => None,
            SlotRef::Str(s) => Some(s),
        }
    }
}

/// Capability set describing one element type.
///
/// The deque never inspects slots itself; sizing, construction, copying,
/// ordering and teardown all go through the descriptor. All slots of one
/// deque share the descriptor fixed at construction.
pub trait ElementDesc {
    /// Storage for one element.
    type Slot;

    /// Size of one slot in bytes. Used for capacity ceilings and allocator
    /// accounting, never for addressing.
    fn slot_size(&self) -> usize;

    /// Identifies the element type. Two deques interoperate only when their
    /// descriptors report the same name and slot size.
    fn type_name(&self) -> &str;

    /// Produce a default-initialized slot.
    fn init(&self) -> Self::Slot;

    /// Deep-copy `src` into `dst`. Returns `false` on failure.
    fn copy(&self, dst: &mut Self::Slot, src: &Self::Slot) -> bool;

    /// Strict order between two slots.
    fn less(&self, a: &Self::Slot, b: &Self::Slot) -> bool;

    /// Tear down a slot, releasing anything it owns and leaving it in the
    /// default-initialized state. Returns `false` on failure.
    fn destroy(&self, slot: &mut Self::Slot) -> bool;

    /// Dereference one slot.
    fn view<'a>(&self, slot: &'a Self::Slot) -> SlotRef<'a, Self::Slot> {
        SlotRef::Slot(slot)
    }

    /// Whether dereferencing yields a string view rather than the raw slot.
    fn is_managed_str(&self) -> bool {
        false
    }
}

/// Descriptor for plain value types.
///
/// Distinct deques of the same Rust type can still be made incompatible by
/// giving their descriptors different names via [`PlainDesc::named`].
pub struct PlainDesc<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> PlainDesc<T> {
    pub fn new() -> Self {
        Self {
            name: type_name::<T>(),
            _marker: PhantomData,
        }
    }

    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }
}

impl<T> Default for PlainDesc<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for PlainDesc<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            _marker: PhantomData,
        }
    }
}
impl<T> Copy for PlainDesc<T> {}

impl<T> ElementDesc for PlainDesc<T>
where
    T: Clone + Ord + Default,
{
    type Slot = T;

    fn slot_size(&self) -> usize {
        core::mem::size_of::<T>()
    }

    fn type_name(&self) -> &str {
        self.name
    }

    fn init(&self) -> T {
        T::default()
    }

    fn copy(&self, dst: &mut T, src: &T) -> bool {
        dst.clone_from(src);
        true
    }

    fn less(&self, a: &T, b: &T) -> bool {
        a < b
    }

    fn destroy(&self, slot: &mut T) -> bool {
        *slot = T::default();
        true
    }
}

/// Descriptor for heap-owned strings.
///
/// Each slot owns a separately allocated `String`; dereferencing yields a
/// [`SlotRef::Str`] view into its character buffer, never the slot itself.
#[derive(Clone, Copy, Default)]
pub struct StrDesc;

impl ElementDesc for StrDesc {
    type Slot = String;

    fn slot_size(&self) -> usize {
        core::mem::size_of::<String>()
    }

    fn type_name(&self) -> &str {
        "string"
    }

    fn init(&self) -> String {
        String::new()
    }

    fn copy(&self, dst: &mut String, src: &String) -> bool {
        dst.clone_from(src);
        true
    }

    fn less(&self, a: &String, b: &String) -> bool {
        a < b
    }

    fn destroy(&self, slot: &mut String) -> bool {
        *slot = String::new();
        true
    }

    fn view<'a>(&self, slot: &'a String) -> SlotRef<'a, String> {
        SlotRef::Str(slot)
    }

    fn is_managed_str(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn plain_desc_defaults_to_rust_type_name() {
        let d = PlainDesc::<u32>::new();
        assert_eq!(d.type_name(), "u32");
        assert_eq!(d.slot_size(), 4);
        assert!(!d.is_managed_str());
    }

    #[test]
    fn named_descriptors_differ() {
        let a = PlainDesc::<i32>::named("celsius");
        let b = PlainDesc::<i32>::named("fahrenheit");
        assert_ne!(a.type_name(), b.type_name());
    }

    #[test]
    fn str_desc_views_the_buffer() {
        let d = StrDesc;
        let slot = String::from("hello");
        assert!(d.is_managed_str());
        match d.view(&slot) {
            SlotRef::Str(s) => assert_eq!(s, "hello"),
            SlotRef::Slot(_) => panic!("expected a string view"),
        }
    }

    #[test]
    fn destroy_resets_the_slot() {
        let d = StrDesc;
        let mut slot = String::from("payload");
        assert!(d.destroy(&mut slot));
        assert!(slot.is_empty());
        assert_eq!(slot.capacity(), 0);
    }
}
