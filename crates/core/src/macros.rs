// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative macros shared by the studio crates.

/// `Display` for a fieldless enum, one string per variant.
///
/// ```ignore
/// crate::simple_display! {
///     RunStatus {
///         Pending => "pending",
///         Running => "running",
///     }
/// }
/// ```
#[macro_export]
macro_rules! simple_display {
    ($enum:ty { $( $variant:ident => $text:literal ),+ $(,)? }) => {
        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let text = match self {
                    $( Self::$variant => $text, )+
                };
                f.write_str(text)
            }
        }
    };
}

/// Test builder for a plain struct: `Default`, one setter per field, and
/// `build()`, all compiled only under `test` or the `test-support` feature.
///
/// Each field is tagged with how its setter takes the value:
/// - `into`: `impl Into<T>`
/// - `set`: `T` as is
/// - `option`: the struct field is `Option<T>`; the setter wraps `impl Into<T>` in `Some`
///
/// ```ignore
/// crate::builder! {
///     pub struct RunBuilder => Run {
///         into task_slug: String = "my_task",
///         set remote: bool = false,
///         option parent_id: RunId = None,
///     }
/// }
/// ```
#[macro_export]
macro_rules! builder {
    (@field option $ty:ty) => { Option<$ty> };
    (@field $mode:ident $ty:ty) => { $ty };

    (@default into $default:expr) => { ($default).into() };
    (@default $mode:ident $default:expr) => { $default };

    (@setter into $field:ident $ty:ty) => {
        pub fn $field(mut self, v: impl Into<$ty>) -> Self {
            self.$field = v.into();
            self
        }
    };
    (@setter set $field:ident $ty:ty) => {
        pub fn $field(mut self, v: $ty) -> Self {
            self.$field = v;
            self
        }
    };
    (@setter option $field:ident $ty:ty) => {
        pub fn $field(mut self, v: impl Into<$ty>) -> Self {
            self.$field = Some(v.into());
            self
        }
    };

    (
        $(#[$meta:meta])*
        pub struct $builder:ident => $target:ident {
            $( $mode:ident $field:ident : $ty:ty = $default:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[cfg(any(test, feature = "test-support"))]
        #[derive(Debug, Clone)]
        pub struct $builder {
            $( $field: $crate::builder!(@field $mode $ty), )+
        }

        #[cfg(any(test, feature = "test-support"))]
        impl Default for $builder {
            fn default() -> Self {
                Self { $( $field: $crate::builder!(@default $mode $default), )+ }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $( $crate::builder!(@setter $mode $field $ty); )+

            pub fn build(self) -> $target {
                $target { $( $field: self.$field, )+ }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            pub fn builder() -> $builder {
                $builder::default()
            }
        }
    };
}
