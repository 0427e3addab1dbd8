pub mod hash;

pub use hash::digest_hex;
