use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;


/// Layers one configuration value over another.
///
/// Leaves are replaced. Optional values only replace when the incoming side
/// is `Some`, and maps merge key by key so unspecified keys keep their
/// existing value.
pub trait Merge {
    fn merge(&mut self, other: Self);
}

impl<T: Merge> Merge for Option<T> {
    fn merge(&mut self, other: Self) {
        if let Some(other) = other {
            match self {
                Some(current) => current.merge(other),
                None => *self = Some(other),
            }
        }
    }
}

impl<K: Ord, V: Merge> Merge for BTreeMap<K, V> {
    fn merge(&mut self, other: Self) {
        for (key, value) in other {
            match self.get_mut(&key) {
                Some(current) => current.merge(value),
                None => {
                    self.insert(key, value);
                }
            }
        }
    }
}

impl<T: ?Sized> Merge for Arc<T> {
    fn merge(&mut self, other: Self) {
        *self = other;
    }
}

macro_rules! merge_by_replace {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Merge for $ty {
                fn merge(&mut self, other: Self) {
                    *self = other;
                }
            }
        )*
    };
}

merge_by_replace!(String, bool, u16, u32, u64, Duration);
