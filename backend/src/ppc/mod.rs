pub mod codegen;
pub mod emitter;
pub mod regs;

pub use codegen::PpcCodeGen;
