pub(crate) mod constants;
pub(crate) mod input;
pub(crate) mod render;
