pub mod organization;
pub mod random_id;
pub mod sanitize;
pub mod slug;
