//! Host command names and the argument keys they expect.

pub const ERROR_POPUP: &str = "error_popup";
pub const GET_GROUPS: &str = "get_groups";
pub const NEW_GROUP: &str = "new_group";
pub const UPDATE_GROUP: &str = "update_group";
pub const DELETE_GROUP: &str = "delete_group";

pub mod args {
    pub const MSG: &str = "msg";
    pub const GROUP: &str = "group";
    pub const INDEX: &str = "index";
}
