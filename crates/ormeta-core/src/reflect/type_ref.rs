//! Type handles used as cache keys and association targets.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::{ScalarType, TypeInfo};

/// A type that can describe its declared mapping hints.
pub trait Reflect: 'static {
    /// Declared hints of the type.
    fn type_info() -> TypeInfo;
}

/// A copyable handle to a reflected type.
///
/// Equality and hashing use the [`TypeId`] only.
#[derive(Clone, Copy)]
pub struct TypeRef {
    id: TypeId,
    path: &'static str,
    info: fn() -> TypeInfo,
}

impl TypeRef {
    /// Handle for `T`.
    pub fn of<T: Reflect>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            path: std::any::type_name::<T>(),
            info: T::type_info,
        }
    }

    /// The underlying type id.
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type path.
    pub fn path(&self) -> &'static str {
        self.path
    }

    /// Last path segment without generic arguments, e.g. `WithId` for
    /// `app::fixture::WithId`.
    pub fn simple_name(&self) -> &'static str {
        let base = self.path.split('<').next().unwrap_or(self.path);
        base.rsplit("::").next().unwrap_or(base)
    }

    /// Read the declared hints of the type.
    pub fn info(&self) -> TypeInfo {
        (self.info)()
    }

    /// Check if the type carries the entity marker.
    pub fn is_entity(&self) -> bool {
        self.info().is_entity()
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeRef {}

impl Hash for TypeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.simple_name())
    }
}

macro_rules! impl_reflect_scalar {
    ($($ty:ty => $scalar:ident),* $(,)?) => {
        $(
            impl Reflect for $ty {
                fn type_info() -> TypeInfo {
                    TypeInfo::scalar(ScalarType::$scalar)
                }
            }
        )*
    };
}

impl_reflect_scalar! {
    bool => Bool,
    i8 => Int32,
    i16 => Int32,
    i32 => Int32,
    u8 => Int32,
    u16 => Int32,
    i64 => Int64,
    u32 => Int64,
    u64 => Int64,
    f32 => Float32,
    f64 => Float64,
    char => String,
    String => String,
    Vec<u8> => Bytes,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::marker::PhantomData;

    struct Account;
    struct Wrapper<T>(PhantomData<T>);

    impl Reflect for Account {
        fn type_info() -> TypeInfo {
            TypeInfo::entity()
        }
    }

    impl<T: 'static> Reflect for Wrapper<T> {
        fn type_info() -> TypeInfo {
            TypeInfo::entity()
        }
    }

    #[test]
    fn test_generic_instantiations_share_simple_name() {
        let accounts = TypeRef::of::<Wrapper<Account>>();
        let names = TypeRef::of::<Wrapper<String>>();

        assert_eq!(accounts.simple_name(), "Wrapper");
        assert_eq!(accounts.simple_name(), names.simple_name());
        assert_ne!(accounts, names);
        assert_ne!(accounts.path(), names.path());
    }

    #[test]
    fn test_simple_name() {
        assert_eq!(TypeRef::of::<Account>().simple_name(), "Account");
        assert_eq!(TypeRef::of::<String>().simple_name(), "String");
        assert_eq!(TypeRef::of::<Vec<u8>>().simple_name(), "Vec");
        assert_eq!(TypeRef::of::<i64>().simple_name(), "i64");
    }

    #[test]
    fn test_identity_by_type_id() {
        let mut set = HashSet::new();
        set.insert(TypeRef::of::<Account>());
        set.insert(TypeRef::of::<Account>());
        set.insert(TypeRef::of::<String>());

        assert_eq!(set.len(), 2);
        assert_eq!(TypeRef::of::<Account>(), TypeRef::of::<Account>());
        assert_ne!(TypeRef::of::<Account>(), TypeRef::of::<String>());
    }

    #[test]
    fn test_scalar_reflection() {
        assert_eq!(TypeRef::of::<String>().info().scalar, Some(ScalarType::String));
        assert_eq!(TypeRef::of::<u32>().info().scalar, Some(ScalarType::Int64));
        assert!(!TypeRef::of::<i64>().is_entity());
        assert!(TypeRef::of::<Account>().is_entity());
    }
}
