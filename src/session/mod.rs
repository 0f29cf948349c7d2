pub(crate) mod opts;
pub(crate) mod page;
pub(crate) mod story;
