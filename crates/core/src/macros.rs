// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Declarative helpers shared by the domain types.

/// Give a fieldless enum the upper-case labels used in build records and
/// notifications.
///
/// Generates `label()` returning the static label and a `Display` impl
/// that writes it.
///
/// ```ignore
/// crate::labelled_enum! {
///     Pocket {
///         Release => "RELEASE",
///         Updates => "UPDATES",
///     }
/// }
/// ```
#[macro_export]
macro_rules! labelled_enum {
    ($enum:ty { $( $variant:ident => $label:literal ),+ $(,)? }) => {
        impl $enum {
            pub const fn label(&self) -> &'static str {
                match self {
                    $( Self::$variant => $label, )+
                }
            }
        }

        impl std::fmt::Display for $enum {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

/// Fixture builder for a domain record, only compiled for tests and the
/// `test-support` feature.
///
/// Each field lands in one of three groups, which decides its setter:
/// `into` fields accept `impl Into<T>`, `set` fields take `T` as is, and
/// `option` fields hold `Option<T>` and are switched on by their setter.
/// Defaults are given inline and become `Target::builder()`.
///
/// ```ignore
/// crate::builder! {
///     pub struct ArchiveBuilder => Archive {
///         into { name: String = "primary" }
///         set { private: bool = false }
///         option { buildd_secret: String = None }
///     }
/// }
/// ```
#[macro_export]
macro_rules! builder {
    (
        pub struct $builder:ident => $target:ident {
            $(into { $( $i:ident : $ity:ty = $idef:expr ),* $(,)? })?
            $(set { $( $s:ident : $sty:ty = $sdef:expr ),* $(,)? })?
            $(option { $( $o:ident : $oty:ty = $odef:expr ),* $(,)? })?
        }
    ) => {
        #[cfg(any(test, feature = "test-support"))]
        pub struct $builder {
            $($( $i: $ity, )*)?
            $($( $s: $sty, )*)?
            $($( $o: Option<$oty>, )*)?
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $target {
            /// Fixture builder preloaded with plausible defaults.
            pub fn builder() -> $builder {
                $builder {
                    $($( $i: $idef.into(), )*)?
                    $($( $s: $sdef, )*)?
                    $($( $o: $odef, )*)?
                }
            }
        }

        #[cfg(any(test, feature = "test-support"))]
        impl $builder {
            $($(
                pub fn $i(self, v: impl Into<$ity>) -> Self {
                    Self { $i: v.into(), ..self }
                }
            )*)?
            $($(
                pub fn $s(self, v: $sty) -> Self {
                    Self { $s: v, ..self }
                }
            )*)?
            $($(
                pub fn $o(self, v: impl Into<$oty>) -> Self {
                    Self { $o: Some(v.into()), ..self }
                }
            )*)?

            pub fn build(self) -> $target {
                $target {
                    $($( $i: self.$i, )*)?
                    $($( $s: self.$s, )*)?
                    $($( $o: self.$o, )*)?
                }
            }
        }
    };
}
