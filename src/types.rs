use crate::error::{RelationError, RelationResult};
use std::collections::HashMap;

/// Iteration over every entity of a row or column set, in declaration order.
pub trait Entities<T> {
    fn names() -> Vec<String>;
    fn iter(&self) -> std::vec::IntoIter<&T>;
    fn iter_mut(&mut self) -> std::vec::IntoIter<&mut T>;
}

/// Declares a set of named entities stored as `T`, so the same layout can hold one row of
/// field elements or whole columns.
macro_rules! define_entities {
    (
        $(#[$meta:meta])*
        pub struct $name:ident<T> {
            $($field:ident),* $(,)?
        }
        $(arrays { $($array:ident: [$len:literal]),* $(,)? })?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq, Eq)]
        pub struct $name<T> {
            $(pub $field: T,)*
            $($(pub $array: [T; $len],)*)?
        }

        impl<T> $crate::types::Entities<T> for $name<T> {
            fn names() -> Vec<String> {
                #[allow(unused_mut)]
                let mut names = vec![$(stringify!($field).to_string()),*];
                $($(
                    names.extend((0..$len).map(|i| format!("{}_{}", stringify!($array), i)));
                )*)?
                names
            }

            fn iter(&self) -> std::vec::IntoIter<&T> {
                #[allow(unused_mut)]
                let mut items = vec![$(&self.$field),*];
                $($(items.extend(self.$array.iter());)*)?
                items.into_iter()
            }

            fn iter_mut(&mut self) -> std::vec::IntoIter<&mut T> {
                #[allow(unused_mut)]
                let mut items = vec![$(&mut self.$field),*];
                $($(items.extend(self.$array.iter_mut());)*)?
                items.into_iter()
            }
        }

        impl<T: Copy + Default> $name<T> {
            /// Reads row `index` out of a column set of the same layout.
            pub fn copy_row(&mut self, columns: &$name<Vec<T>>, index: usize) {
                $(self.$field = columns.$field[index];)*
                $($(
                    for (dst, src) in self.$array.iter_mut().zip(columns.$array.iter()) {
                        *dst = src[index];
                    }
                )*)?
            }

            /// Reads row `index + 1`, or zero past the last row.
            pub fn copy_shifted_row(&mut self, columns: &$name<Vec<T>>, index: usize) {
                $(self.$field = $crate::types::shifted_value(&columns.$field, index);)*
                $($(
                    for (dst, src) in self.$array.iter_mut().zip(columns.$array.iter()) {
                        *dst = $crate::types::shifted_value(src, index);
                    }
                )*)?
            }
        }
    };
}

pub(crate) use define_entities;

/// Value of the shift of `column` at `index`, the column is treated as zero past its end.
#[inline]
pub(crate) fn shifted_value<T: Copy + Default>(column: &[T], index: usize) -> T {
    column.get(index + 1).copied().unwrap_or_default()
}

/// Moves the named columns out of `columns` into `entities`.
pub(crate) fn take_columns<T, E: Entities<Vec<T>>>(
    flavor: &'static str,
    entities: &mut E,
    columns: &mut HashMap<String, Vec<T>>,
) -> RelationResult<()> {
    for (name, dst) in E::names().into_iter().zip(entities.iter_mut()) {
        *dst = columns
            .remove(&name)
            .ok_or(RelationError::MissingColumn {
                flavor,
                column: name,
            })?;
    }
    Ok(())
}
