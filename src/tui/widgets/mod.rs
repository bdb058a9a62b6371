//! Form widget components

pub mod fields;
pub mod footer;
pub mod help;
pub mod notification;

pub use fields::render_fields;
pub use footer::render_footer;
pub use help::render_help;
pub use notification::render_notification;
