//! Generated data bindings for copybook record layouts.
//!
//! One module per copybook record family, mirroring the source
//! copybooks these bindings were produced from. Each module holds the
//! field containers for its copybook groups; the `bind` submodule holds
//! the binding descriptor factories and the host transformer wrappers.
//!
//! Everything here is written the way the binding generator emits it:
//! field metadata mirrors the copybook text exactly, containers perform
//! no validation of their own, and the wrappers only delegate to the
//! runtime in `copybook-binding`.

pub mod kc3ogp06;
pub mod kcp05;
