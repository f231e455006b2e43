mod commands;
mod handlers;

pub use commands::{AddCommand, AddRecord, Cli, Commands, FieldAction, FieldCommand};
pub use handlers::{
    handle_add_card, handle_add_note, handle_delete, handle_export, handle_favorite,
    handle_field_add, handle_field_remove, handle_import, handle_init, handle_list,
    handle_search, handle_show,
};
