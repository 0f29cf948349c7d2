pub(crate) mod node;
pub(crate) mod recording;
pub(crate) mod surface;
