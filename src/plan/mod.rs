mod template;

pub use template::{Template, Todo};
