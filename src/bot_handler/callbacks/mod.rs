pub mod change_name;
pub mod settings;
