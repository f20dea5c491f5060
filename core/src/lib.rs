pub mod buffer;
pub mod builder;
pub mod config;
pub mod dump;
pub mod error;
pub mod layout;
pub mod macroblock;
pub mod mask;

pub use buffer::{MacroblockBuffer, MbIdx};
pub use config::CompilerConfig;
pub use error::CompilerError;
pub use layout::{GuestFlags, StateLayout};
pub use macroblock::{
    Macroblock, MacroblockKind, MbDef, MbOp, MemAccess, RotateMask,
    ThreeRegs, TwoRegsImm, MB_DEFS,
};
pub use mask::RegMask;
