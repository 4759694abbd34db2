//! Macros for declaring status enumerations.

/// Declare a unit-variant status enum and implement [`State`](crate::core::State) for it.
///
/// Variants listed under `final:`, `error:` and `in_flight:` drive the
/// corresponding trait methods. The enum also gets an `ALL` constant listing
/// every variant in declaration order.
///
/// # Example
///
/// ```
/// use querycycle::status_enum;
/// use querycycle::core::State;
///
/// status_enum! {
///     pub enum SyncStatus {
///         Idle,
///         Syncing,
///         Synced,
///         Failed,
///     }
///     final: [Synced, Failed]
///     error: [Failed]
///     in_flight: [Syncing]
/// }
///
/// assert_eq!(SyncStatus::ALL.len(), 4);
/// assert!(SyncStatus::Syncing.is_in_flight());
/// assert_eq!(SyncStatus::Failed.name(), "Failed");
/// ```
#[macro_export]
macro_rules! status_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }

        $(final: [$($final:ident),* $(,)?])?
        $(error: [$($error:ident),* $(,)?])?
        $(in_flight: [$($in_flight:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn is_final(&self) -> bool {
                match self {
                    $($(Self::$final => true,)*)?
                    _ => false,
                }
            }

            fn is_error(&self) -> bool {
                match self {
                    $($(Self::$error => true,)*)?
                    _ => false,
                }
            }

            fn is_in_flight(&self) -> bool {
                match self {
                    $($(Self::$in_flight => true,)*)?
                    _ => false,
                }
            }
        }
    };
}
