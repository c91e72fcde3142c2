//! Wire-stable enumerations shared by messages and the state model.
//!
//! Each enum has a fixed integer code that is written to recordings as an
//! `I32`. The codes must never be renumbered once recordings exist.

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ::serde::Serialize, ::serde::Deserialize,
        )]
        #[cfg_attr(feature = "tauri", derive(specta::Type))]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $code ),*
        }

        impl $name {
            /// All variants in code order.
            pub const ALL: &'static [$name] = &[$($name::$variant),*];

            /// Integer code written to the wire.
            pub const fn code(self) -> i32 {
                self as i32
            }

            /// Resolves a wire code, rejecting unknown values.
            pub fn from_code(code: i32) -> $crate::Result<Self> {
                match code {
                    $( $code => Ok($name::$variant), )*
                    other => Err($crate::TimingError::domain(
                        stringify!($name),
                        format!("unknown code {other}"),
                    )),
                }
            }
        }

        impl TryFrom<i32> for $name {
            type Error = $crate::TimingError;

            fn try_from(code: i32) -> $crate::Result<Self> {
                Self::from_code(code)
            }
        }

        impl From<$name> for i32 {
            fn from(value: $name) -> i32 {
                value.code()
            }
        }
    };
}

pub(crate) use wire_enum;

wire_enum! {
    /// Kind of session currently running.
    pub enum SessionType {
        #[default]
        None = 0,
        Practice = 1,
        Qually = 2,
        Race = 3,
    }
}

wire_enum! {
    /// Track status flag for the session.
    pub enum SessionStatus {
        #[default]
        Green = 0,
        Yellow = 1,
        Red = 2,
        Finished = 3,
    }
}

wire_enum! {
    /// Where a driver currently is.
    pub enum DriverStatus {
        #[default]
        OnTrack = 0,
        InPits = 1,
        Out = 2,
        Stopped = 3,
        Retired = 4,
    }
}

wire_enum! {
    /// A column of the timing grid.
    pub enum GridColumn {
        #[default]
        Position = 0,
        CarNumber = 1,
        DriverName = 2,
        LapTime = 3,
        Gap = 4,
        S1 = 5,
        S2 = 6,
        S3 = 7,
        Laps = 8,
        Interval = 9,
        Q1 = 10,
        Q2 = 11,
        Q3 = 12,
        PitCount = 13,
        PitLap1 = 14,
        PitLap2 = 15,
        PitLap3 = 16,
        Unknown = 17,
    }
}

wire_enum! {
    /// Text colour of a grid cell.
    pub enum GridColumnColour {
        #[default]
        Black = 0,
        White = 1,
        Red = 2,
        Green = 3,
        Magenta = 4,
        Blue = 5,
        Yellow = 6,
        Grey = 7,
    }
}
