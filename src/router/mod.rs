pub(crate) mod scene_id;
pub(crate) mod scene_router;
pub(crate) mod state;
