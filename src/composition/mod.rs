pub(crate) mod layer;
pub(crate) mod settings;
pub(crate) mod stack;
