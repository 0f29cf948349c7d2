pub(crate) mod aggregate;
pub(crate) mod fear;
pub(crate) mod rows;
pub(crate) mod source;
