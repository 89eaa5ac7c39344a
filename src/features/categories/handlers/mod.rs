pub mod category_handler;

pub use category_handler::{
    __path_create_category, __path_delete_category, __path_get_category,
    __path_list_categories, __path_update_category, create_category, delete_category,
    get_category, list_categories, update_category,
};
