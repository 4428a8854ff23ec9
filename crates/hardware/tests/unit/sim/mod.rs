/// Address decoding.
pub mod layout;
